use shared::{domain::TemplateId, error::ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no data for export")]
    NothingToExport,
    #[error("no file selected for import")]
    NoFileSelected,
    #[error("error file version is {0}")]
    UnsupportedVersion(String),
    #[error("import file is not a valid export bundle: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode export bundle: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("template {0} is not loaded")]
    NotCached(TemplateId),
    #[error("template {0} has no supported kind")]
    MissingKind(TemplateId),
    #[error("server rejected request with status {status}: {detail}")]
    Api {
        status: u16,
        code: ErrorCode,
        detail: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("navigation failed: {0}")]
    Navigation(anyhow::Error),
    #[error("rendering failed: {0}")]
    Render(anyhow::Error),
    #[error("download failed: {0}")]
    Download(anyhow::Error),
}

impl TemplateError {
    /// True when the failure happened before anything was sent to the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NothingToExport
                | Self::NoFileSelected
                | Self::UnsupportedVersion(_)
                | Self::Parse(_)
                | Self::NotCached(_)
                | Self::MissingKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
