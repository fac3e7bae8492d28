use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Resource, ResourceExt};

use crate::error::QueryError;
use crate::page::{LabelPair, PageRequest, PageResponse};

use super::{ObjectSource, PageSource, ResourceKind};

/// In-memory stand-in for one resource collection of the API server.
///
/// Continuation tokens encode the offset into the filtered item set and are
/// only honoured together with [`MockCluster::RESOURCE_VERSION`].
pub struct MockCluster<K> {
    kind: ResourceKind,
    namespace: String,
    objects: Vec<K>,
    requests: Arc<Mutex<Vec<PageRequest>>>,
    stall_from: Option<usize>,
    fail_from: Option<(usize, String)>,
    get_failure: Option<String>,
}

impl MockCluster<Pod> {
    pub const NAMESPACE: &'static str = "demo";

    /// Pods in the `demo` namespace. Labels are given as `k=v,k2=v2`.
    pub fn from_pods(pods: &[(&str, &str)]) -> Self {
        let objects = pods
            .iter()
            .map(|(name, labels)| Pod {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(Self::NAMESPACE.to_string()),
                    labels: Some(parse_labels(labels)),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect();
        Self::new(ResourceKind::Pods, Self::NAMESPACE, objects)
    }
}

fn parse_labels(labels: &str) -> BTreeMap<String, String> {
    labels
        .split(',')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let pair: LabelPair = pair.parse().expect("invalid label in fixture");
            (pair.key, pair.value)
        })
        .collect()
}

impl<K> MockCluster<K>
where
    K: Resource + Clone,
{
    pub const RESOURCE_VERSION: &'static str = "1000";

    pub fn new(kind: ResourceKind, namespace: &str, objects: Vec<K>) -> Self {
        Self {
            kind,
            namespace: namespace.to_owned(),
            objects,
            requests: Arc::new(Mutex::new(Vec::new())),
            stall_from: None,
            fail_from: None,
            get_failure: None,
        }
    }

    /// List requests from index `index` on never complete.
    pub fn stall_from_request(mut self, index: usize) -> Self {
        self.stall_from = Some(index);
        self
    }

    /// List requests from index `index` on fail with a 500 carrying `message`.
    pub fn fail_from_request(mut self, index: usize, message: &str) -> Self {
        self.fail_from = Some((index, message.to_owned()));
        self
    }

    /// Every get fails with a 500 carrying `message`.
    pub fn fail_gets(mut self, message: &str) -> Self {
        self.get_failure = Some(message.to_owned());
        self
    }

    pub fn objects(&self) -> &[K] {
        &self.objects
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: &PageRequest) -> usize {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        requests.len() - 1
    }

    fn serve(&self, request: &PageRequest) -> Result<PageResponse<K>, QueryError> {
        let offset = if request.is_first() {
            0
        } else {
            if request.resource_version != Self::RESOURCE_VERSION {
                return Err(QueryError::Api {
                    code: 410,
                    reason: "Expired".to_string(),
                    message: "continue token does not match the snapshot".to_string(),
                });
            }
            request
                .continue_token
                .strip_prefix("offset-")
                .and_then(|offset| offset.parse::<usize>().ok())
                .ok_or_else(|| QueryError::Api {
                    code: 400,
                    reason: "BadRequest".to_string(),
                    message: format!("invalid continue token {}", request.continue_token),
                })?
        };

        let matching: Vec<&K> = self
            .objects
            .iter()
            .filter(|obj| match &request.namespace {
                Some(ns) => obj.namespace().as_deref() == Some(ns.as_str()),
                None => true,
            })
            .filter(|obj| request.labels.matches(obj.labels()))
            .collect();

        let end = match request.limit {
            0 => matching.len(),
            limit => (offset + limit as usize).min(matching.len()),
        };
        let items = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|obj| (*obj).clone())
            .collect();
        let remaining = matching.len() - end;

        Ok(PageResponse {
            items,
            continue_token: if remaining > 0 {
                format!("offset-{end}")
            } else {
                String::new()
            },
            resource_version: Self::RESOURCE_VERSION.to_string(),
            remaining_item_count: (remaining > 0).then_some(remaining as i64),
        })
    }
}

impl<K> PageSource for MockCluster<K>
where
    K: Resource + Clone + Send + 'static,
{
    type Item = K;

    fn list_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageResponse<K>, QueryError>> + Send {
        let index = self.record(&request);
        let stall = self.stall_from.is_some_and(|from| index >= from);
        let result = match &self.fail_from {
            Some((from, message)) if index >= *from => Err(QueryError::Api {
                code: 500,
                reason: "InternalError".to_string(),
                message: message.clone(),
            }),
            _ => self.serve(&request),
        };
        async move {
            if stall {
                std::future::pending::<()>().await;
            }
            result
        }
    }
}

impl<K> ObjectSource for MockCluster<K>
where
    K: Resource + Clone + Send + 'static,
{
    type Object = K;

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get_object(&self, name: &str) -> impl Future<Output = Result<K, QueryError>> + Send {
        let result = match &self.get_failure {
            Some(message) => Err(QueryError::Api {
                code: 500,
                reason: "InternalError".to_string(),
                message: message.clone(),
            }),
            None => self
                .objects
                .iter()
                .find(|obj| obj.name_any() == name)
                .cloned()
                .ok_or_else(|| QueryError::NotFound {
                    kind: self.kind.singular(),
                    namespace: self.namespace.clone(),
                    name: name.to_owned(),
                }),
        };
        async move { result }
    }
}
