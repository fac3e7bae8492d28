use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use kube::api::ObjectList;

/// Exact-match label filter. Keys are kept sorted so the rendered selector
/// is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelFilter(BTreeMap<String, String>);

impl LabelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selector string in the `k1=v1,k2=v2` form the API server expects.
    pub fn to_selector(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// True when `labels` carries every key of the filter with the same value.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|actual| actual == v))
    }
}

impl From<BTreeMap<String, String>> for LabelFilter {
    fn from(labels: BTreeMap<String, String>) -> Self {
        Self(labels)
    }
}

impl FromIterator<(String, String)> for LabelFilter {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_selector())
    }
}

/// A single `key=value` pair as given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPair {
    pub key: String,
    pub value: String,
}

impl FromStr for LabelPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <key>=<value>, got '{s}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty label key in '{s}'"));
        }
        Ok(Self {
            key: key.to_owned(),
            value: value.trim().to_owned(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsistencyMode {
    NotOlderThan,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// `None` lists across all namespaces.
    pub namespace: Option<String>,
    pub labels: LabelFilter,
    pub limit: u32,
    /// Empty on the first page.
    pub continue_token: String,
    pub resource_version: String,
    pub consistency: Option<ConsistencyMode>,
}

impl PageRequest {
    pub fn first(namespace: Option<String>, labels: LabelFilter, limit: u32) -> Self {
        Self {
            namespace,
            labels,
            limit,
            continue_token: String::new(),
            resource_version: String::new(),
            consistency: Some(ConsistencyMode::NotOlderThan),
        }
    }

    pub fn at_version(mut self, resource_version: impl Into<String>) -> Self {
        self.resource_version = resource_version.into();
        self
    }

    pub fn is_first(&self) -> bool {
        self.continue_token.is_empty()
    }

    /// Request for the page after `page`, carrying its token and snapshot
    /// verbatim. `None` once the server signals the final page.
    pub fn next_page<T>(&self, page: &PageResponse<T>) -> Option<Self> {
        if page.is_last() {
            return None;
        }
        Some(Self {
            continue_token: page.continue_token.clone(),
            resource_version: page.resource_version.clone(),
            ..self.clone()
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    /// Empty on the final page.
    pub continue_token: String,
    pub resource_version: String,
    pub remaining_item_count: Option<i64>,
}

impl<T> PageResponse<T> {
    pub fn is_last(&self) -> bool {
        self.continue_token.is_empty()
    }
}

impl<T: Clone> From<ObjectList<T>> for PageResponse<T> {
    fn from(list: ObjectList<T>) -> Self {
        Self {
            items: list.items,
            continue_token: list.metadata.continue_.unwrap_or_default(),
            resource_version: list.metadata.resource_version.unwrap_or_default(),
            remaining_item_count: list.metadata.remaining_item_count,
        }
    }
}
