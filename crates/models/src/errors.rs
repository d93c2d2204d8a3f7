use thiserror::Error;

/// Rejections of a submission before it touches the store.
///
/// The display text is shown to the submitter verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Name and email are required")]
    MissingRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}
