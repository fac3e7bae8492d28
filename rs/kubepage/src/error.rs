use shared::{env::EnvError, tracing::TracingSetupError};
use thiserror::Error;

/// Failure of a single list or get call against the API server.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{kind} {name} not found in namespace {namespace}")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },
    #[error("API error ({code} {reason}): {message}")]
    Api {
        code: u16,
        reason: String,
        message: String,
    },
    #[error("Kubernetes client error: {0}")]
    Transport(#[source] kube::Error),
    #[error("Operation cancelled")]
    Cancelled,
}

impl QueryError {
    /// Classifies the error of a get call for `name`. A 404 answer becomes
    /// `NotFound`, any other server answer `Api`.
    pub fn from_get(kind: &'static str, namespace: &str, name: &str, err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 404 => Self::NotFound {
                kind,
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            },
            err => err.into(),
        }
    }

    /// NotFound and Api are reported at the call site, everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { .. })
    }
}

impl From<kube::Error> for QueryError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => Self::Api {
                code: response.code,
                reason: response.reason,
                message: response.message,
            },
            err => Self::Transport(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvError(#[from] EnvError),
    #[error("Kubeconfig error: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error("Kubernetes client error: {0}")]
    Client(#[from] kube::Error),
}

#[derive(Debug, Error)]
pub enum KubePageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
    #[error("Tracing setup error: {0}")]
    TracingSetup(#[from] TracingSetupError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
