// ── Service catalog ──
//
// `services.yaml` is hand-edited, so parsing is lenient: anything that isn't
// a usable service entry is skipped rather than failing the whole file. Only
// a document with no usable entries at all is an error.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::target::{ProbeTarget, ServiceKind};

/// The parsed catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub categories: Vec<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_monitor: Option<String>,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
}

impl Service {
    /// `siteMonitor` when set, `href` otherwise.
    pub fn monitor_url(&self) -> &str {
        self.site_monitor.as_deref().unwrap_or(&self.href)
    }

    /// The validated URL to check. `None` when it isn't probeable, e.g. a
    /// relative link.
    pub fn monitor_target(&self) -> Option<ProbeTarget> {
        ProbeTarget::parse(self.monitor_url().trim()).ok()
    }
}

impl Catalog {
    pub fn from_yaml(source: &str) -> Result<Self, CoreError> {
        let doc: Value = serde_yaml::from_str(source)?;
        let Value::Sequence(entries) = doc else {
            return Err(CoreError::Catalog {
                message: "expected a list of categories at the top level".into(),
            });
        };

        let categories: Vec<Category> = entries.iter().flat_map(parse_categories).collect();
        if categories.is_empty() {
            return Err(CoreError::Catalog {
                message: "no services with an href were found".into(),
            });
        }

        debug!(categories = categories.len(), "service catalog parsed");
        Ok(Self {
            categories,
            updated_at: None,
        })
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Every service paired with its category name, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Service)> {
        self.categories
            .iter()
            .flat_map(|c| c.services.iter().map(move |s| (c.name.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.services.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `{ <name>: [ {<service>: {...}}, ... ], <name>: [...] }`
///
/// One list item may group several categories; every key is a category.
fn parse_categories(value: &Value) -> Vec<Category> {
    let Some(map) = value.as_mapping() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, body)| {
            let name = key.as_str()?.trim().to_owned();
            let services: Vec<Service> = body
                .as_sequence()?
                .iter()
                .filter_map(parse_service)
                .collect();
            (!services.is_empty()).then_some(Category { name, services })
        })
        .collect()
}

/// `{ <name>: { href, siteMonitor?, type?, description?, icon? } }`
///
/// Only the first key counts; any others are ignored.
fn parse_service(value: &Value) -> Option<Service> {
    let (key, body) = value.as_mapping()?.iter().next()?;
    let name = key.as_str()?.trim().to_owned();
    let fields = body.as_mapping()?;

    Some(Service {
        name,
        href: string_field(fields, "href")?,
        description: string_field(fields, "description"),
        icon: string_field(fields, "icon"),
        site_monitor: string_field(fields, "siteMonitor"),
        kind: string_field(fields, "type")
            .map(|label| ServiceKind::from_label(&label))
            .unwrap_or_default(),
    })
}

fn string_field(fields: &Mapping, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
