//! Stores each submission as a pretty-printed JSON file

use super::SubmissionSink;
use crate::error::RegistrationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// One completed registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub fields: BTreeMap<String, String>,
}

impl Submission {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            fields,
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }
}

/// Writes submissions into a directory, one file per submission
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory, or the working directory if there is none
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("io", "rego", "rego-tui")
            .map(|dirs| dirs.data_dir().join("submissions"))
            .unwrap_or_else(|| PathBuf::from("submissions"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SubmissionSink for JsonFileSink {
    async fn submit(&self, submission: &Submission) -> Result<String, RegistrationError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(submission.file_name());
        let content = serde_json::to_string_pretty(submission)?;
        tokio::fs::write(&path, content).await?;
        info!(id = %submission.id, path = %path.display(), "submission stored");
        Ok(path.display().to_string())
    }
}
