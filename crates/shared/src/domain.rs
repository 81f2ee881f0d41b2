use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TemplateId);

/// Template kinds the templates endpoint accepts. Mirrors
/// `/api/v1/templates/supported-kinds/`.
pub const SUPPORTED_KINDS: [TemplateKind; 2] = [TemplateKind::Task, TemplateKind::Module];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKind {
    Task,
    Module,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Module => "Module",
        }
    }

    /// Comma-joined kind list as the list endpoint expects it in `kind=`.
    pub fn filter_value(kinds: &[TemplateKind]) -> String {
        kinds
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported template kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for TemplateKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("task") {
            Ok(Self::Task)
        } else if s.eq_ignore_ascii_case("module") {
            Ok(Self::Module)
        } else {
            Err(UnknownKind(s.to_string()))
        }
    }
}

/// Everything a template carries apart from its server identity, kept
/// as the raw attribute map so that an export/import cycle passes every
/// field through untouched, explicit nulls included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateAttributes(pub Map<String, Value>);

impl TemplateAttributes {
    pub fn new(name: impl Into<String>, kind: TemplateKind) -> Self {
        let mut attrs = Map::new();
        attrs.insert("name".into(), Value::String(name.into()));
        attrs.insert("kind".into(), Value::String(kind.as_str().into()));
        Self(attrs)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.0.insert("data".into(), data);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.0.insert("name".into(), Value::String(name.into()));
    }

    /// `None` when the attribute is absent or not a supported kind.
    pub fn kind(&self) -> Option<TemplateKind> {
        self.0
            .get("kind")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// A template as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub attributes: TemplateAttributes,
}

impl Template {
    pub fn kind(&self) -> Option<TemplateKind> {
        self.attributes.kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.name()
    }

    /// Drops `id` and `url`, leaving a payload that creates a new item.
    pub fn into_attributes(self) -> TemplateAttributes {
        self.attributes
    }
}
