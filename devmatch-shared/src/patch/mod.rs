/// Partial-update applier
///
/// Applies a `{field name → new value}` document to a persisted entity:
/// only the named fields are mutated, everything else is left untouched, and
/// the result is written back in a single UPDATE.
///
/// Field names are resolved through a closed, per-entity dispatch table (the
/// [`Patchable`] trait) rather than runtime reflection: each entity declares
/// the exact set of patchable field names and a typed setter for each. A key
/// outside that set fails with [`PatchError::UnknownField`] before any field
/// is written, so a rejected patch never leaves a half-mutated row.
///
/// The applier performs **no business-rule validation**: it will set
/// `username`, `email`, or `password_hash` without re-checking uniqueness or
/// format. The database's unique indexes are the only backstop; when one
/// fires the applier surfaces [`PatchError::DuplicateConstraint`]. Callers
/// that want pre-validation layer it above this module.
///
/// # Concurrency
///
/// The load-mutate-persist sequence is not atomic across concurrent patches
/// to the same row. The default [`ConcurrencyControl::LastWriterWins`] keeps
/// that behavior; [`ConcurrencyControl::Optimistic`] checks the entity's
/// `version` counter on write and fails with
/// [`PatchError::VersionConflict`] when another writer got there first. Both
/// modes bump `version` on every write.
///
/// # Example
///
/// ```no_run
/// use devmatch_shared::models::company_info::CompanyInfo;
/// use devmatch_shared::patch::{apply_patch, PatchDocument};
/// use serde_json::json;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, info_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let mut patch = PatchDocument::new();
/// patch.insert("ceo".to_string(), json!("Bob"));
///
/// let updated: CompanyInfo = apply_patch(&pool, info_id, &patch).await?;
/// assert_eq!(updated.ceo, "Bob");
/// # Ok(())
/// # }
/// ```

pub mod coerce;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// A patch payload: field name → new value, as deserialized from a request
/// body. Iteration order is irrelevant; each key names a distinct field.
pub type PatchDocument = Map<String, JsonValue>;

/// Error type for patch operations
///
/// All variants are deterministic, non-transient failures and are surfaced
/// to the caller unmodified; there is no retry or local recovery here.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The entity id did not resolve to a row
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A patch key does not name a declared field of the entity
    #[error("unknown field `{field}` on {entity}")]
    UnknownField { entity: &'static str, field: String },

    /// A patch value cannot be coerced to the field's declared type
    #[error("field `{field}` expects {expected}, got {actual}")]
    TypeCoercion {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The row's version changed between load and write (optimistic mode)
    #[error("{entity} {id} was modified concurrently")]
    VersionConflict { entity: &'static str, id: Uuid },

    /// A patched value violated a unique index
    ///
    /// Also available to callers that re-validate uniqueness above the
    /// applier; the applier itself only surfaces what the database rejects.
    #[error("duplicate value violates unique constraint `{constraint}`")]
    DuplicateConstraint { constraint: String },

    /// Any other database failure
    #[error(transparent)]
    Database(sqlx::Error),
}

impl PatchError {
    /// Maps a sqlx error, turning unique-index violations into
    /// [`PatchError::DuplicateConstraint`].
    fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(constraint) = db_err.constraint() {
                return PatchError::DuplicateConstraint {
                    constraint: constraint.to_string(),
                };
            }
        }
        PatchError::Database(err)
    }
}

impl From<sqlx::Error> for PatchError {
    fn from(err: sqlx::Error) -> Self {
        PatchError::from_sqlx(err)
    }
}

/// Concurrency control applied on the persist step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyControl {
    /// Write unconditionally; a concurrent patch to the same row is silently
    /// overwritten. This matches the platform's historical behavior and is
    /// the default.
    #[default]
    LastWriterWins,

    /// Write only if the row's `version` still matches the loaded value;
    /// otherwise fail with [`PatchError::VersionConflict`]. Recommended for
    /// callers that cannot tolerate lost updates.
    Optimistic,
}

/// Options for a patch operation
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
    /// How to handle a concurrent write to the same row
    pub concurrency: ConcurrencyControl,
}

/// Closed per-entity field dispatch
///
/// Implemented by every patchable entity. `FIELDS` is the complete set of
/// patchable field names; `set_field` coerces the JSON value to the field's
/// declared type and assigns it. Field visibility never gates patching —
/// anything listed in `FIELDS` is settable by name. Bookkeeping columns
/// (`id`, `version`, timestamps) are owned by the persistence layer and are
/// not fields.
pub trait Patchable {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// The complete set of patchable field names
    const FIELDS: &'static [&'static str];

    /// Coerces `value` and assigns it to the named field
    ///
    /// # Errors
    ///
    /// - [`PatchError::UnknownField`] if `field` is not in `FIELDS`
    /// - [`PatchError::TypeCoercion`] if `value` cannot be coerced
    fn set_field(&mut self, field: &str, value: &JsonValue) -> Result<(), PatchError>;
}

/// Storage access for patchable entities
///
/// The persistence side of a patch: load a row by id and write the whole
/// struct back in one statement. `persist` writes unconditionally;
/// `persist_checked` adds a `version` guard and returns `None` when the
/// guard fails.
#[async_trait]
pub trait PatchTarget: Patchable + Sized + Send + Sync {
    /// The entity's surrogate id
    fn id(&self) -> Uuid;

    /// The version counter as loaded
    fn version(&self) -> i64;

    /// Loads the entity by id
    async fn load(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error>;

    /// Writes every field back, bumping `version`
    async fn persist(&self, pool: &PgPool) -> Result<Self, sqlx::Error>;

    /// Writes every field back only if `version` is unchanged
    async fn persist_checked(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error>;
}

/// Applies a patch with default options (last-writer-wins)
///
/// See [`apply_patch_with`] for the full contract.
pub async fn apply_patch<E: PatchTarget>(
    pool: &PgPool,
    id: Uuid,
    patch: &PatchDocument,
) -> Result<E, PatchError> {
    apply_patch_with(pool, id, patch, PatchOptions::default()).await
}

/// Applies a patch to the entity with the given id
///
/// Contract:
///
/// 1. Every key in `patch` is validated against the entity's declared field
///    set **before** anything is mutated — an unknown key fails the whole
///    call with no partial application.
/// 2. The entity is loaded by id ([`PatchError::NotFound`] when absent).
/// 3. Each named field is set to its coerced value. The result is
///    order-independent: keys are field names and each is written once.
/// 4. The entity is persisted exactly once, covering all patched fields
///    together with any other in-memory state of the loaded instance.
///
/// # Errors
///
/// [`PatchError::NotFound`], [`PatchError::UnknownField`],
/// [`PatchError::TypeCoercion`], [`PatchError::VersionConflict`] (optimistic
/// mode only), [`PatchError::DuplicateConstraint`], or a passthrough
/// [`PatchError::Database`].
pub async fn apply_patch_with<E: PatchTarget>(
    pool: &PgPool,
    id: Uuid,
    patch: &PatchDocument,
    options: PatchOptions,
) -> Result<E, PatchError> {
    // All-or-nothing: reject unknown keys before touching the row.
    for key in patch.keys() {
        if !E::FIELDS.contains(&key.as_str()) {
            return Err(PatchError::UnknownField {
                entity: E::ENTITY,
                field: key.clone(),
            });
        }
    }

    let mut entity = E::load(pool, id)
        .await?
        .ok_or(PatchError::NotFound {
            entity: E::ENTITY,
            id,
        })?;

    for (key, value) in patch {
        entity.set_field(key, value)?;
    }

    debug!(
        entity = E::ENTITY,
        %id,
        fields = patch.len(),
        concurrency = ?options.concurrency,
        "Applying patch"
    );

    match options.concurrency {
        ConcurrencyControl::LastWriterWins => {
            entity.persist(pool).await.map_err(PatchError::from_sqlx)
        }
        ConcurrencyControl::Optimistic => entity
            .persist_checked(pool)
            .await
            .map_err(PatchError::from_sqlx)?
            .ok_or(PatchError::VersionConflict {
                entity: E::ENTITY,
                id,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_last_writer_wins() {
        let options = PatchOptions::default();
        assert_eq!(options.concurrency, ConcurrencyControl::LastWriterWins);
    }

    #[test]
    fn test_duplicate_constraint_message_names_the_constraint() {
        let err = PatchError::DuplicateConstraint {
            constraint: "companies_email_key".to_string(),
        };
        assert!(err.to_string().contains("companies_email_key"));
    }

    #[test]
    fn test_unknown_field_message_names_entity_and_field() {
        let err = PatchError::UnknownField {
            entity: "company",
            field: "hometown".to_string(),
        };
        assert_eq!(err.to_string(), "unknown field `hometown` on company");
    }

    // apply_patch itself needs a database; integration tests live in
    // tests/patch_applier_tests.rs.
}
