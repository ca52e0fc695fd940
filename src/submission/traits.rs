//! Trait abstraction for submission storage to enable mocking in tests

use super::Submission;
use crate::error::RegistrationError;
use async_trait::async_trait;

/// Receives completed registrations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Store a submission, returning a human readable location for it
    async fn submit(&self, submission: &Submission) -> Result<String, RegistrationError>;
}
