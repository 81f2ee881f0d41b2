use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    safe_file_name, ApiClient, Collaborators, DirectoryDownloads, FileSelection, ItemStore, MenuInfo,
    SearchRoute, TemplateController,
};
use shared::domain::TemplateId;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::load_settings;
use console::{ConsoleErrorReporter, ConsoleNavigator, ConsoleNotifier, TableRenderer};

#[derive(Parser, Debug)]
#[command(about = "Export, import, duplicate and search task/module templates")]
struct Cli {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    download_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the given templates to `<download-dir>/templates-<date>.json`.
    Export { ids: Vec<i64> },
    /// Create templates from an exported file. Only the first file is read.
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Duplicate a template and open the copy.
    Duplicate { id: i64 },
    Search { query: String },
    Show { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(v) = cli.api_url {
        settings.api_url = v;
    }
    if let Some(v) = cli.username {
        settings.username = Some(v);
    }
    if let Some(v) = cli.password {
        settings.password = Some(v);
    }
    if let Some(v) = cli.download_dir {
        settings.download_dir = v;
    }

    let api = ApiClient::with_options(&settings.api_url, settings.api_options())
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?;
    let controller = TemplateController::new_with_dependencies(
        Arc::new(api),
        ItemStore::new(),
        Collaborators {
            notifier: Arc::new(ConsoleNotifier),
            errors: Arc::new(ConsoleErrorReporter),
            navigator: Arc::new(ConsoleNavigator::new(settings.page_name.clone())),
            renderer: Arc::new(TableRenderer),
            downloads: Arc::new(DirectoryDownloads::new(settings.download_dir.clone())),
        },
    )
    .with_page_name(settings.page_name.clone());

    match cli.command {
        Command::Export { ids } => {
            let ids: Vec<TemplateId> = ids.into_iter().map(TemplateId).collect();
            let outcome = controller
                .export_to_file(Some(&ids))
                .await
                .context("export failed")?;
            println!(
                "exported {} templates to {}",
                outcome.bundle.count,
                settings
                    .download_dir
                    .join(safe_file_name(&outcome.filename))
                    .display()
            );
        }
        Command::Import { files } => {
            let sent = controller
                .import_from_file(&FileSelection::new(files))
                .await
                .context("import failed")?;
            println!("imported {sent} templates");
        }
        Command::Duplicate { id } => {
            let id = TemplateId(id);
            controller
                .load_item(id)
                .await
                .with_context(|| format!("failed to load template {id}"))?;
            let new_id = controller
                .copy_and_edit(id)
                .await
                .context("duplicate failed")?;
            println!("created template {new_id}");
        }
        Command::Search { query } => {
            let page = controller.model().page_name.clone();
            let route = SearchRoute::for_page(&page).context("invalid page name")?;
            let path = SearchRoute::path_for(&page, &query);
            let matched = route
                .matches(&path)
                .with_context(|| format!("search path '{path}' did not match"))?;
            controller
                .show_search_results("stdout", &MenuInfo { id: path.clone() }, &matched)
                .await
                .context("search failed")?;
        }
        Command::Show { id } => {
            let item = controller
                .load_item(TemplateId(id))
                .await
                .with_context(|| format!("failed to load template {id}"))?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
    }

    Ok(())
}
