/**
 * Responsibility
 * - What a repository failure means to the layers above
 */
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("missing reference")]
    MissingReference,
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return RepoError::Conflict,
                Some(FOREIGN_KEY_VIOLATION) => return RepoError::MissingReference,
                _ => {}
            }
        }
        RepoError::Db(e)
    }

    /// On DELETE a foreign-key violation means the row is still referenced.
    pub fn from_sqlx_on_delete(e: sqlx::Error) -> Self {
        match Self::from_sqlx(e) {
            RepoError::MissingReference => RepoError::Conflict,
            other => other,
        }
    }
}
