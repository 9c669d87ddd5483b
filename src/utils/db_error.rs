//! PostgreSQL error classification helpers.

/// Name of the uniqueness constraint guarding `mappings.code`.
pub const CODE_UNIQUE_CONSTRAINT: &str = "mappings_code_key";

/// SQLSTATE codes PostgreSQL raises when a transaction loses a race.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(CODE_UNIQUE_CONSTRAINT))
}

pub fn is_serialization_failure(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    matches!(
        db_err.code().as_deref(),
        Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
    )
}
