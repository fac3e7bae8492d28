use std::path::{Path, PathBuf};

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use shared::env::get_env_path;
use tracing::info;

use crate::error::ConfigError;

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

pub fn kubeconfig_path() -> Result<PathBuf, ConfigError> {
    Ok(get_env_path(KUBECONFIG_ENV)?)
}

/// Builds a client for the current context of the kubeconfig at `path`.
pub async fn client_from_kubeconfig(path: &Path) -> Result<Client, ConfigError> {
    let kubeconfig = Kubeconfig::read_from(path)?;
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
    info!(
        kubeconfig = %path.display(),
        cluster_url = %config.cluster_url,
        namespace = %config.default_namespace,
        "Loaded cluster configuration"
    );
    Ok(Client::try_from(config)?)
}

pub async fn client_from_env() -> Result<Client, ConfigError> {
    let path = kubeconfig_path()?;
    client_from_kubeconfig(&path).await
}
