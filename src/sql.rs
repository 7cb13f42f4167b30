use tokio_postgres::{Error as PgError};
use tokio_postgres::error::SqlState;

/// name of the violated unique constraint, if that is what failed
pub fn unique_constraint_error(error: &PgError) -> Option<&str> {
    let Some(db_error) = error.as_db_error() else {
        return None;
    };

    if *db_error.code() == SqlState::UNIQUE_VIOLATION {
        db_error.constraint()
    } else {
        None
    }
}
