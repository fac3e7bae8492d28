//! Command line definition

use clap::Parser;

use crate::page::{LabelFilter, LabelPair, PageRequest};
use crate::source::ResourceKind;

#[derive(Parser, Debug)]
#[command(
    name = "kubepage",
    version,
    about = "List Secrets, Deployments and Pods of a namespace page by page",
    long_about = None,
)]
pub struct Cli {
    /// Namespace to query, empty for all namespaces
    #[arg(short = 'n', long, default_value = "")]
    pub namespace: String,

    /// Items requested per page
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Resource kinds to list, in order
    #[arg(long = "kind", value_enum, default_values_t = ResourceKind::ALL)]
    pub kinds: Vec<ResourceKind>,

    /// Only list pods carrying this label
    #[arg(short = 'l', long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<LabelPair>,

    /// Pod to look up by name
    #[arg(long)]
    pub pod: Option<String>,

    /// Deployment to look up by name
    #[arg(long)]
    pub deployment: Option<String>,

    /// Start listings at this resource version (not older than)
    #[arg(long)]
    pub resource_version: Option<String>,

    /// After a found deployment, list the pods matched by its selector
    #[arg(long, requires = "deployment")]
    pub follow_selector: bool,

    /// Print found objects as JSON
    #[arg(long)]
    pub show_json: bool,
}

impl Cli {
    pub fn namespace(&self) -> Option<&str> {
        Some(self.namespace.trim()).filter(|ns| !ns.is_empty())
    }

    pub fn label_filter(&self) -> LabelFilter {
        self.labels
            .iter()
            .map(|pair| (pair.key.clone(), pair.value.clone()))
            .collect()
    }

    /// First page request of a listing filtered by `labels`.
    pub fn first_request(&self, labels: LabelFilter) -> PageRequest {
        let request = PageRequest::first(self.namespace().map(str::to_owned), labels, self.page_size);
        match &self.resource_version {
            Some(rv) => request.at_version(rv.as_str()),
            None => request,
        }
    }
}
