use std::fmt::{self, Debug};
use std::future::Future;
use std::marker::PhantomData;

use k8s_openapi::NamespaceResourceScope;
use kube::api::{ListParams, VersionMatch};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::QueryError;
use crate::page::{ConsistencyMode, PageRequest, PageResponse};

use super::{ObjectSource, PageSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ResourceKind {
    Secrets,
    Deployments,
    Pods,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Secrets => "Secret",
            Self::Deployments => "Deployment",
            Self::Pods => "Pod",
        };
        write!(f, "{}", name)
    }
}

impl ResourceKind {
    pub const ALL: [Self; 3] = [Self::Secrets, Self::Deployments, Self::Pods];

    pub const fn singular(&self) -> &'static str {
        match self {
            Self::Secrets => "secret",
            Self::Deployments => "deployment",
            Self::Pods => "pod",
        }
    }

    pub const fn plural(&self) -> &'static str {
        match self {
            Self::Secrets => "secrets",
            Self::Deployments => "deployments",
            Self::Pods => "pods",
        }
    }

    /// Whether listings print each item's labels next to its name.
    pub const fn shows_labels(&self) -> bool {
        matches!(self, Self::Pods)
    }
}

/// Translates a page request into list parameters for the API server.
pub fn list_params(request: &PageRequest) -> ListParams {
    let mut params = ListParams::default().limit(request.limit);
    if !request.labels.is_empty() {
        params = params.labels(&request.labels.to_selector());
    }

    // The token pins the snapshot. The server rejects resourceVersion and
    // resourceVersionMatch next to it.
    if !request.is_first() {
        return params.continue_token(&request.continue_token);
    }

    if !request.resource_version.is_empty() {
        params = params.at(&request.resource_version);
        if let Some(ConsistencyMode::NotOlderThan) = request.consistency {
            params = params.matching(VersionMatch::NotOlderThan);
        }
    }
    params
}

/// Typed access to one namespaced resource kind.
///
/// Listings follow the namespace of each [`PageRequest`]. Gets always use the
/// namespace fixed at construction, which falls back to the client's default
/// namespace when none is given.
#[derive(Clone)]
pub struct KubeResourceApi<K> {
    client: Client,
    kind: ResourceKind,
    namespace: String,
    _resource: PhantomData<fn() -> K>,
}

impl<K> KubeResourceApi<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    K::DynamicType: Default,
{
    pub fn new(client: Client, kind: ResourceKind, namespace: Option<&str>) -> Self {
        let namespace = namespace
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| client.default_namespace())
            .to_owned();
        Self {
            client,
            kind,
            namespace,
            _resource: PhantomData,
        }
    }

    fn api(&self, namespace: Option<&str>) -> Api<K> {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

impl<K> PageSource for KubeResourceApi<K>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    K: Send + Sync + 'static,
    K::DynamicType: Default,
{
    type Item = K;

    fn list_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<PageResponse<K>, QueryError>> + Send {
        let api = self.api(request.namespace.as_deref());
        let params = list_params(&request);
        let kind = self.kind;
        async move {
            debug!(
                %kind,
                namespace = ?request.namespace,
                continue_token = %request.continue_token,
                limit = request.limit,
                "Listing page"
            );
            let list = api.list(&params).await.map_err(QueryError::from)?;
            Ok::<_, QueryError>(PageResponse::from(list))
        }
    }
}

impl<K> ObjectSource for KubeResourceApi<K>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    K: Send + Sync + 'static,
    K::DynamicType: Default,
{
    type Object = K;

    fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get_object(&self, name: &str) -> impl Future<Output = Result<K, QueryError>> + Send {
        let api = self.api(Some(self.namespace.as_str()));
        let kind = self.kind;
        let namespace = self.namespace.clone();
        let name = name.to_owned();
        async move {
            debug!(%kind, %namespace, object = %name, "Getting object");
            api.get(&name)
                .await
                .map_err(|err| QueryError::from_get(kind.singular(), &namespace, &name, err))
        }
    }
}
