//! Errors raised while assembling or storing a registration

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Two fields would be submitted under the same name
    #[error("field name `{0}` is used more than once")]
    DuplicateField(String),

    #[error("the form can only be submitted from the final section")]
    NotReadyToSubmit,

    #[error("failed to write submission: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize submission: {0}")]
    Serialize(#[from] serde_json::Error),
}
