//! Where completed registrations go

mod file_sink;
mod traits;

pub use file_sink::{JsonFileSink, Submission};
pub use traits::SubmissionSink;

#[cfg(test)]
pub use traits::MockSubmissionSink;
