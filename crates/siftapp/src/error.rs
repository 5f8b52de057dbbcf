use thiserror::Error;

/// Boxed error returned by before/after pass callbacks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which lifecycle callback failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Before,
    After,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::Before => write!(f, "before"),
            HookStage::After => write!(f, "after"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Missing element selector: an engine needs a non-empty items selector")]
    MissingItemsSelector,

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("The {stage} pass callback failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: HookError,
    },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document error: {0}")]
    Document(String),
}

pub type Result<T> = std::result::Result<T, SiftError>;
