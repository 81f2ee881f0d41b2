//! Terminal stand-ins for the browser collaborators.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use client_core::{
    ErrorReporter, ListRenderer, ListView, Navigator, Notifier, NotifyLevel, TemplateError,
};
use shared::domain::TemplateKind;

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, level: NotifyLevel) {
        if message.is_empty() {
            return;
        }
        match level {
            NotifyLevel::Success => println!("{message}"),
            NotifyLevel::Error => eprintln!("{message}"),
        }
    }
}

pub struct ConsoleErrorReporter;

impl ErrorReporter for ConsoleErrorReporter {
    fn show_errors(&self, err: &TemplateError) {
        eprintln!("error: {err}");
    }
}

/// Keeps the last opened location instead of switching views.
pub struct ConsoleNavigator {
    location: Mutex<String>,
}

impl ConsoleNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(location.into()),
        }
    }

    fn set_location(&self, location: &str) {
        if let Ok(mut guard) = self.location.lock() {
            *guard = location.to_string();
        }
    }
}

#[async_trait]
impl Navigator for ConsoleNavigator {
    async fn open(&self, menu_id: &str) -> Result<()> {
        self.set_location(menu_id);
        println!("open {menu_id}");
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<()> {
        self.set_location(url);
        tracing::debug!(url, "reloaded");
        Ok(())
    }

    fn current_url(&self) -> String {
        self.location
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub struct TableRenderer;

#[async_trait]
impl ListRenderer for TableRenderer {
    async fn render(&self, _holder: &str, view: ListView) -> Result<()> {
        print!("{}", render_table(&view));
        Ok(())
    }
}

pub fn render_table(view: &ListView) -> String {
    let mut out = format!("search: {:?} ({} found)\n", view.query, view.items.len());
    for item in &view.items {
        out.push_str(&format!(
            "{:>6}  {:<7} {}\n",
            item.id.0,
            item.kind().map_or("-", TemplateKind::as_str),
            item.name().unwrap_or_default()
        ));
    }
    out
}
