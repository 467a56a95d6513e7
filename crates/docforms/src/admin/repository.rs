/// Failures surfaced by any persistence collaborator.
///
/// `Conflict` is how a storage-level uniqueness constraint reports itself; lifecycle
/// services translate it into the matching duplicate error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
