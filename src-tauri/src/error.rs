use thiserror::Error;

use crate::state::TabId;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("navigation input is empty")]
    EmptyInput,

    #[error("cannot navigate to {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create browser view for {tab}: {reason}")]
    EngineCreate { tab: TabId, reason: String },

    #[error("{label} may not call {command}")]
    Forbidden { command: &'static str, label: String },

    #[error("engine command failed: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;
