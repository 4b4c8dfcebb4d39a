use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("no user with id {0}")]
    UnknownOwner(i64),

    #[error("no artwork with id {0}")]
    ArtworkNotFound(i64),

    #[error("storage unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage unavailable: connection lock poisoned")]
    LockPoisoned,
}

/// True when `err` is a constraint failure with the given extended result code.
pub(crate) fn is_constraint(err: &rusqlite::Error, extended_code: std::os::raw::c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}
