use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Local, TimeZone};
use shared::{
    domain::{Template, TemplateId, TemplateKind, SUPPORTED_KINDS},
    protocol::{ExportBundle, SearchFilter},
};
use tracing::{debug, info, warn};

use crate::{
    api::ApiClient,
    error::{Result, TemplateError},
    search::{decode_query, search_string_to_object, MenuInfo, RouteMatch},
    store::ItemStore,
    Collaborators, ListView, NotifyLevel,
};

const RESOURCE_NAME: &str = "templates";
const COPY_NAME_PREFIX: &str = "copy from ";

/// Names and kinds identifying the resource a controller works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceModel {
    /// API collection name, also used for export file names.
    pub name: String,
    /// Router page prefix, also the `item` tag of exported entries.
    pub page_name: String,
    pub kinds: Vec<TemplateKind>,
}

impl Default for ResourceModel {
    fn default() -> Self {
        Self {
            name: RESOURCE_NAME.to_string(),
            page_name: RESOURCE_NAME.to_string(),
            kinds: SUPPORTED_KINDS.to_vec(),
        }
    }
}

impl ResourceModel {
    pub fn list_template(&self) -> String {
        format!("{}_list", self.name)
    }

    pub fn kind_filter(&self) -> String {
        TemplateKind::filter_value(&self.kinds)
    }
}

/// Files picked for import. Only the first one is ever read; importing
/// several files at once is not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    pub files: Vec<PathBuf>,
}

impl FileSelection {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub filename: String,
    pub bundle: ExportBundle,
}

/// `<resource>-<date>.json`, the date rendered the way browsers print
/// `Date()`.
pub fn export_file_name<Tz>(resource: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{resource}-{}.json",
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}

pub struct TemplateController {
    api: Arc<ApiClient>,
    store: ItemStore,
    model: ResourceModel,
    deps: Collaborators,
}

impl TemplateController {
    pub fn new(api: Arc<ApiClient>, store: ItemStore) -> Self {
        Self::new_with_dependencies(api, store, Collaborators::default())
    }

    pub fn new_with_dependencies(
        api: Arc<ApiClient>,
        store: ItemStore,
        deps: Collaborators,
    ) -> Self {
        Self {
            api,
            store,
            model: ResourceModel::default(),
            deps,
        }
    }

    pub fn with_page_name(mut self, page_name: impl Into<String>) -> Self {
        self.model.page_name = page_name.into();
        self
    }

    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    fn report(&self, err: TemplateError) -> TemplateError {
        warn!(error = ?err, "templates operation failed");
        self.deps.errors.show_errors(&err);
        err
    }

    /// Server round trips that fail are also raised as an error toast.
    fn fail_request(&self, err: TemplateError) -> TemplateError {
        self.deps
            .notifier
            .notify(&err.to_string(), NotifyLevel::Error);
        self.report(err)
    }

    /// Fetches one item and caches it.
    pub async fn load_item(&self, id: TemplateId) -> Result<Template> {
        let item = self.api.get_item(&self.model.name, id).await?;
        self.store.insert(item.clone()).await;
        Ok(item)
    }

    /// Creates a server-side duplicate of `id` named `copy from <name>`.
    pub async fn copy_item(&self, id: TemplateId) -> Result<TemplateId> {
        let source = self.api.get_item(&self.model.name, id).await?;
        let mut attributes = source.into_attributes();
        let name = format!("{COPY_NAME_PREFIX}{}", attributes.name().unwrap_or_default());
        attributes.set_name(name);

        let created = self.api.create_item(&self.model.name, &attributes).await?;
        let new_id = created.id;
        self.store.insert(created).await;
        info!(source = %id, copy = %new_id, "item duplicated");
        Ok(new_id)
    }

    pub fn search_string_to_object(&self, query: &str) -> SearchFilter {
        search_string_to_object(query)
    }

    /// Runs a list query and caches every result, keeping server order.
    pub async fn send_search_query(&self, filter: SearchFilter) -> Result<Vec<Template>> {
        let page = self.api.list_items(&self.model.name, &filter).await?;
        self.store.extend(page.results.iter().cloned()).await;
        Ok(page.results)
    }

    /// Duplicates a cached item, then opens the copy's edit view. Nothing
    /// is opened unless the copy was created.
    pub async fn copy_and_edit(&self, id: TemplateId) -> Result<TemplateId> {
        let Some(source) = self.store.get(id).await else {
            return Err(self.fail_duplicate(TemplateError::NotCached(id)));
        };
        let Some(kind) = source.kind() else {
            return Err(self.fail_duplicate(TemplateError::MissingKind(id)));
        };

        let new_id = match self.copy_item(id).await {
            Ok(new_id) => new_id,
            Err(err) => return Err(self.fail_duplicate(err)),
        };

        let menu_id = format!("{}/{kind}/{new_id}", self.model.page_name);
        if let Err(err) = self.deps.navigator.open(&menu_id).await {
            return Err(self.fail_duplicate(TemplateError::Navigation(err)));
        }

        self.deps
            .notifier
            .notify("Item was duplicate", NotifyLevel::Success);
        Ok(new_id)
    }

    fn fail_duplicate(&self, err: TemplateError) -> TemplateError {
        self.deps
            .notifier
            .notify("Error in duplicate item", NotifyLevel::Error);
        self.report(err)
    }

    pub async fn show_search_results(
        &self,
        holder: &str,
        menu_info: &MenuInfo,
        route: &RouteMatch,
    ) -> Result<()> {
        let query = decode_query(route.group(1).unwrap_or_default());
        debug!(menu = %menu_info.id, %query, "showing search results");

        let mut filter = self.search_string_to_object(&query);
        filter.insert("kind".to_string(), self.model.kind_filter());

        let items = match self.send_search_query(filter).await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = ?err, "search failed");
                self.deps.notifier.notify("", NotifyLevel::Error);
                return Err(err);
            }
        };

        let view = ListView {
            template: self.model.list_template(),
            query,
            items,
        };
        self.deps
            .renderer
            .render(holder, view)
            .await
            .map_err(|err| self.report(TemplateError::Render(err)))
    }

    pub async fn export_to_file(&self, item_ids: Option<&[TemplateId]>) -> Result<ExportOutcome> {
        self.export_to_file_at(item_ids, &Local::now()).await
    }

    /// [`Self::export_to_file`] with an explicit timestamp for the file name.
    pub async fn export_to_file_at<Tz>(
        &self,
        item_ids: Option<&[TemplateId]>,
        now: &DateTime<Tz>,
    ) -> Result<ExportOutcome>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let item_ids = match item_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                self.deps
                    .notifier
                    .notify("No data for export", NotifyLevel::Error);
                return Err(TemplateError::NothingToExport);
            }
        };

        let page = self
            .api
            .filter_detail(&self.model.name, item_ids)
            .await
            .map_err(|err| self.fail_request(err))?;

        let bundle = ExportBundle::from_templates(&self.model.page_name, page.results);
        let contents = serde_json::to_vec(&bundle)
            .map_err(|err| self.report(TemplateError::Encode(err)))?;
        let filename = export_file_name(&self.model.name, now);

        self.deps
            .downloads
            .deliver(&filename, contents)
            .await
            .map_err(|err| self.report(TemplateError::Download(err)))?;

        info!(%filename, count = bundle.count, "templates exported");
        Ok(ExportOutcome { filename, bundle })
    }

    /// Imports the first selected file through the bulk endpoint and
    /// returns the number of records sent.
    pub async fn import_from_file(&self, selection: &FileSelection) -> Result<usize> {
        let Some(path) = selection.files.first() else {
            return Err(self.report(TemplateError::NoFileSelected));
        };
        if selection.files.len() > 1 {
            debug!(
                ignored = selection.files.len() - 1,
                "only the first selected file is imported"
            );
        }

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| self.report(TemplateError::Io(err)))?;
        let bundle: ExportBundle = serde_json::from_str(&raw)
            .map_err(|err| self.report(TemplateError::Parse(err)))?;

        if !bundle.version.is_supported() {
            return Err(self.report(TemplateError::UnsupportedVersion(
                bundle.version.to_string(),
            )));
        }

        let records = bundle.into_bulk_records();
        let results = self
            .api
            .bulk(&records)
            .await
            .map_err(|err| self.fail_request(err))?;
        info!(
            sent = records.len(),
            answered = results.len(),
            "templates imported"
        );

        let location = self.deps.navigator.current_url();
        if let Err(err) = self.deps.navigator.open_url(&location).await {
            self.report(TemplateError::Navigation(err));
        }
        Ok(records.len())
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
