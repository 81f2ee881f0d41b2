use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::domain::Template;
use tracing::{error, info};

pub mod api;
mod controller;
pub mod error;
pub mod search;
pub mod store;

pub use api::{ApiClient, ApiOptions};
pub use controller::{
    export_file_name, ExportOutcome, FileSelection, ResourceModel, TemplateController,
};
pub use error::TemplateError;
pub use search::{MenuInfo, RouteMatch, SearchRoute};
pub use store::ItemStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Error,
}

/// Transient toast-style messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotifyLevel);
}

/// Detailed error display, the counterpart of the notification toast.
pub trait ErrorReporter: Send + Sync {
    fn show_errors(&self, error: &TemplateError);
}

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Switches to the view registered under `menu_id`.
    async fn open(&self, menu_id: &str) -> Result<()>;
    async fn open_url(&self, url: &str) -> Result<()>;
    fn current_url(&self) -> String;
}

/// Context handed to the list template.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub template: String,
    pub query: String,
    pub items: Vec<Template>,
}

#[async_trait]
pub trait ListRenderer: Send + Sync {
    async fn render(&self, holder: &str, view: ListView) -> Result<()>;
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, filename: &str, contents: Vec<u8>) -> Result<()>;
}

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Success => info!("notification: {message}"),
            NotifyLevel::Error => error!("notification: {message}"),
        }
    }
}

pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn show_errors(&self, err: &TemplateError) {
        error!("{err}");
    }
}

pub struct MissingNavigator;

#[async_trait]
impl Navigator for MissingNavigator {
    async fn open(&self, menu_id: &str) -> Result<()> {
        Err(anyhow!("no navigator available to open {menu_id}"))
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        Err(anyhow!("no navigator available to open {url}"))
    }

    fn current_url(&self) -> String {
        String::new()
    }
}

pub struct MissingListRenderer;

#[async_trait]
impl ListRenderer for MissingListRenderer {
    async fn render(&self, holder: &str, view: ListView) -> Result<()> {
        Err(anyhow!(
            "no renderer available for {} into {holder}",
            view.template
        ))
    }
}

/// Replaces characters that are not allowed in file names on common
/// filesystems, e.g. the `:` of the time in export names.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// Saves downloads as files under one directory, with names passed
/// through [`safe_file_name`].
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloads {
    async fn deliver(&self, filename: &str, contents: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create '{}'", self.dir.display()))?;
        let path = self.dir.join(safe_file_name(filename));
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        info!(path = %path.display(), "download saved");
        Ok(())
    }
}

/// UI collaborators the controller reports through.
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub errors: Arc<dyn ErrorReporter>,
    pub navigator: Arc<dyn Navigator>,
    pub renderer: Arc<dyn ListRenderer>,
    pub downloads: Arc<dyn DownloadSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            notifier: Arc::new(TracingNotifier),
            errors: Arc::new(TracingErrorReporter),
            navigator: Arc::new(MissingNavigator),
            renderer: Arc::new(MissingListRenderer),
            downloads: Arc::new(DirectoryDownloads::new(".")),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
