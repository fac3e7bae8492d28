mod kubeapi;
#[cfg(test)]
mod mock;
mod r#trait;

pub use kubeapi::{list_params, KubeResourceApi, ResourceKind};
#[cfg(test)]
pub use mock::MockCluster;
pub use r#trait::{ObjectSource, PageSource};
