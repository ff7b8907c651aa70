use thiserror::Error;

/// Storage-level conflicts that handlers must tell apart from plain
/// database failures. Repositories map constraint violations into these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("subject name already exists")]
    DuplicateSubjectName,
    #[error("referenced subject does not exist")]
    MissingSubject,
}
