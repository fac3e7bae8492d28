use std::collections::BTreeMap;
use std::io::{self, Write};

use kube::ResourceExt;
use serde::Serialize;

use crate::error::{KubePageError, QueryError};
use crate::page::{LabelFilter, PageResponse};
use crate::source::ResourceKind;

/// Renders labels as `map[k1:v1 k2:v2]`.
pub fn format_labels(labels: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = labels.iter().map(|(k, v)| format!("{k}:{v}")).collect();
    format!("map[{}]", pairs.join(" "))
}

fn scope(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("in the namespace {ns}"),
        None => String::from("in all namespaces"),
    }
}

/// Line-oriented report written to `out`.
pub struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn label_selector(&mut self, labels: &LabelFilter) -> io::Result<()> {
        writeln!(self.out, "using label selector {labels}")
    }

    pub fn page<K: ResourceExt>(
        &mut self,
        kind: ResourceKind,
        namespace: Option<&str>,
        index: usize,
        page: &PageResponse<K>,
    ) -> io::Result<()> {
        let more = if index == 0 { "" } else { " more" };
        writeln!(
            self.out,
            "There are {}{more} {} {} with remaining: {}",
            page.items.len(),
            kind.plural(),
            scope(namespace),
            page.remaining_item_count.unwrap_or(0)
        )?;
        for item in &page.items {
            if kind.shows_labels() {
                writeln!(self.out, "[{}] labels={}", item.name_any(), format_labels(item.labels()))?;
            } else {
                writeln!(self.out, "{}", item.name_any())?;
            }
        }
        writeln!(
            self.out,
            "continueToken: {} | resourceVersion: {}",
            page.continue_token, page.resource_version
        )
    }

    pub fn found<K: ResourceExt>(
        &mut self,
        kind: ResourceKind,
        namespace: &str,
        obj: &K,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "Found {} {} in {namespace} namespace",
            obj.name_any(),
            kind.singular()
        )?;
        writeln!(self.out, "{kind} Labels: {}", format_labels(obj.labels()))
    }

    pub fn lookup_failed(&mut self, kind: ResourceKind, err: &QueryError) -> io::Result<()> {
        match err {
            QueryError::NotFound { namespace, name, .. } => {
                writeln!(self.out, "{kind} {name} not found in namespace {namespace}")
            }
            QueryError::Api { message, .. } => {
                writeln!(self.out, "Error getting {} {message}", kind.singular())
            }
            other => writeln!(self.out, "Error getting {} {other}", kind.singular()),
        }
    }

    pub fn listing_failed(&mut self, kind: ResourceKind, err: &QueryError) -> io::Result<()> {
        match err {
            QueryError::Api { message, .. } => {
                writeln!(self.out, "Error listing {} {message}", kind.plural())
            }
            other => writeln!(self.out, "Error listing {} {other}", kind.plural()),
        }
    }

    pub fn json<T: Serialize>(&mut self, obj: &T) -> Result<(), KubePageError> {
        serde_json::to_writer_pretty(&mut self.out, obj)?;
        writeln!(self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockCluster;
    use k8s_openapi::api::core::v1::Pod;

    fn output(report: Report<Vec<u8>>) -> String {
        String::from_utf8(report.into_inner()).unwrap()
    }

    fn pods() -> Vec<Pod> {
        MockCluster::from_pods(&[("web-1", "tier=web,app=shop"), ("db-0", "")])
            .objects()
            .to_vec()
    }

    #[test]
    fn test_format_labels_is_sorted() {
        let mut labels = BTreeMap::new();
        labels.insert("tier".to_string(), "web".to_string());
        labels.insert("app".to_string(), "shop".to_string());
        assert_eq!(format_labels(&labels), "map[app:shop tier:web]");
        assert_eq!(format_labels(&BTreeMap::new()), "map[]");
    }

    #[test]
    fn test_first_and_follow_up_pages() -> io::Result<()> {
        let mut report = Report::new(Vec::new());
        let page = PageResponse {
            items: pods(),
            continue_token: "offset-2".to_string(),
            resource_version: "1000".to_string(),
            remaining_item_count: Some(3),
        };
        report.page(ResourceKind::Pods, Some("demo"), 0, &page)?;
        let last = PageResponse {
            continue_token: String::new(),
            remaining_item_count: None,
            ..page
        };
        report.page(ResourceKind::Pods, Some("demo"), 1, &last)?;

        let expected = "\
There are 2 pods in the namespace demo with remaining: 3
[web-1] labels=map[app:shop tier:web]
[db-0] labels=map[]
continueToken: offset-2 | resourceVersion: 1000
There are 2 more pods in the namespace demo with remaining: 0
[web-1] labels=map[app:shop tier:web]
[db-0] labels=map[]
continueToken:  | resourceVersion: 1000
";
        assert_eq!(output(report), expected);
        Ok(())
    }

    #[test]
    fn test_names_only_for_other_kinds() -> io::Result<()> {
        let mut report = Report::new(Vec::new());
        let page = PageResponse {
            items: pods(),
            continue_token: String::new(),
            resource_version: "7".to_string(),
            remaining_item_count: None,
        };
        report.page(ResourceKind::Secrets, None, 0, &page)?;
        let text = output(report);
        assert!(text.starts_with("There are 2 secrets in all namespaces with remaining: 0\nweb-1\ndb-0\n"));
        Ok(())
    }

    #[test]
    fn test_get_lines() -> io::Result<()> {
        let mut report = Report::new(Vec::new());
        report.found(ResourceKind::Pods, "demo", &pods()[0])?;
        report.lookup_failed(
            ResourceKind::Deployments,
            &QueryError::NotFound {
                kind: "deployment",
                namespace: "demo".into(),
                name: "auditlog-deployment".into(),
            },
        )?;
        report.lookup_failed(
            ResourceKind::Pods,
            &QueryError::Api {
                code: 500,
                reason: "InternalError".into(),
                message: "etcdserver: request timed out".into(),
            },
        )?;

        let expected = "\
Found web-1 pod in demo namespace
Pod Labels: map[app:shop tier:web]
Deployment auditlog-deployment not found in namespace demo
Error getting pod etcdserver: request timed out
";
        assert_eq!(output(report), expected);
        Ok(())
    }

    #[test]
    fn test_listing_failure_line() -> io::Result<()> {
        let mut report = Report::new(Vec::new());
        report.listing_failed(
            ResourceKind::Secrets,
            &QueryError::Api {
                code: 403,
                reason: "Forbidden".into(),
                message: "secrets is forbidden".into(),
            },
        )?;
        assert_eq!(output(report), "Error listing secrets secrets is forbidden\n");
        Ok(())
    }

    #[test]
    fn test_json_is_indented() -> Result<(), KubePageError> {
        let mut report = Report::new(Vec::new());
        report.json(&pods()[0])?;
        let text = output(report);
        assert!(text.contains("\n  \"metadata\": {"));
        assert!(text.ends_with("}\n"));
        Ok(())
    }
}
