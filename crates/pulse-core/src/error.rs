//! Error types for Pulse

use thiserror::Error;

use crate::models::ClassifierKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Malformed input data: {0}")]
    DataShape(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("No trainable model for {topic}: {reason}")]
    UntrainableTopic { topic: String, reason: String },

    #[error("{kind} failed to fit: {reason}")]
    ClassifierFit { kind: ClassifierKind, reason: String },

    #[error("Feature mismatch: model expects {expected} columns, input has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },
}

impl Error {
    pub(crate) fn fit(kind: ClassifierKind, reason: impl Into<String>) -> Self {
        Error::ClassifierFit {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn untrainable(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UntrainableTopic {
            topic: topic.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
