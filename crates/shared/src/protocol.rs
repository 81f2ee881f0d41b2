use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::domain::{Template, TemplateAttributes, TemplateId};

/// Version written into every export bundle.
pub const EXPORT_FORMAT_VERSION: &str = "1";
/// Highest bundle version the importer understands.
pub const MAX_IMPORT_VERSION: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdFilter {
    #[serde(rename = "id__in")]
    pub id_in: Vec<TemplateId>,
}

/// Body of `POST /api/v1/<resource>/filter/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub filter: IdFilter,
}

impl FilterRequest {
    pub fn by_ids(ids: &[TemplateId]) -> Self {
        Self {
            filter: IdFilter { id_in: ids.to_vec() },
        }
    }
}

/// Paginated list envelope returned by list and filter endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Structured search filter sent as list-endpoint query parameters.
pub type SearchFilter = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub item: String,
    pub data: TemplateAttributes,
}

/// Bundle versions appear both as `"1"` and as `1` in the wild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleVersion {
    Number(f64),
    Text(String),
}

impl BundleVersion {
    pub fn current() -> Self {
        Self::Text(EXPORT_FORMAT_VERSION.to_string())
    }

    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(raw) => raw.trim().parse::<f64>().ok(),
        }
    }

    /// Non-numeric versions are never supported.
    pub fn is_supported(&self) -> bool {
        matches!(self.numeric(), Some(v) if v <= MAX_IMPORT_VERSION)
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(raw) => f.write_str(raw),
        }
    }
}

/// Versioned document used to move templates between installations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub data: Vec<ExportEntry>,
    /// Informational; importers go by `data`.
    #[serde(default)]
    pub count: usize,
    pub version: BundleVersion,
}

impl ExportBundle {
    /// Builds a bundle from server items. Identity fields are dropped so
    /// that importing the bundle always creates new items.
    pub fn from_templates(resource: &str, templates: Vec<Template>) -> Self {
        let data: Vec<ExportEntry> = templates
            .into_iter()
            .map(|template| ExportEntry {
                item: resource.to_string(),
                data: template.into_attributes(),
            })
            .collect();
        Self {
            count: data.len(),
            data,
            version: BundleVersion::current(),
        }
    }

    pub fn into_bulk_records(self) -> Vec<BulkRecord> {
        self.data.into_iter().map(BulkRecord::add).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    Add,
}

/// One directive for `POST /api/v1/_bulk/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRecord {
    #[serde(rename = "type")]
    pub operation: BulkOperation,
    pub item: String,
    pub data: TemplateAttributes,
}

impl BulkRecord {
    pub fn add(entry: ExportEntry) -> Self {
        Self {
            operation: BulkOperation::Add,
            item: entry.item,
            data: entry.data,
        }
    }
}
