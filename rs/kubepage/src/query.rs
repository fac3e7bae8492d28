use tracing::{info, warn};

use crate::context::WorkContext;
use crate::error::QueryError;
use crate::source::ObjectSource;

/// Result of a single-object lookup once fatal errors are split off.
#[derive(Debug)]
pub enum QueryOutcome<K> {
    Found(K),
    /// Not found or rejected by the server. The run carries on.
    Failed(QueryError),
}

impl<K> QueryOutcome<K> {
    pub fn found(self) -> Option<K> {
        match self {
            Self::Found(obj) => Some(obj),
            Self::Failed(_) => None,
        }
    }
}

/// Splits a get result into an outcome the caller reports, or an error that
/// ends the run.
pub fn classify<K>(result: Result<K, QueryError>) -> Result<QueryOutcome<K>, QueryError> {
    match result {
        Ok(obj) => Ok(QueryOutcome::Found(obj)),
        Err(err) if err.is_recoverable() => Ok(QueryOutcome::Failed(err)),
        Err(err) => Err(err),
    }
}

/// Looks up `name` in the namespace of `source`.
pub async fn get_object<S: ObjectSource>(
    ctx: &WorkContext,
    source: &S,
    name: &str,
) -> Result<QueryOutcome<S::Object>, QueryError> {
    let kind = source.kind();
    let result = ctx.run(source.get_object(name)).await;
    match &result {
        Ok(_) => info!(%kind, namespace = source.namespace(), object = name, "Found object"),
        Err(err) if err.is_recoverable() => warn!(%kind, object = name, "{err}"),
        Err(_) => {}
    }
    classify(result)
}
