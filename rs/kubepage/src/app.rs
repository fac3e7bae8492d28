use std::io::Write;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Secret};
use kube::{Client, Resource};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::context::WorkContext;
use crate::error::{KubePageError, QueryError};
use crate::page::{LabelFilter, PageRequest};
use crate::paginate::{paginate, PageSummary};
use crate::query::{get_object, QueryOutcome};
use crate::report::Report;
use crate::source::{KubeResourceApi, ObjectSource, PageSource, ResourceKind};

/// Lists every page of `source` into `report`. Any failed page ends the
/// listing with an error.
pub async fn list_and_report<S, W>(
    ctx: &WorkContext,
    source: &S,
    kind: ResourceKind,
    first: PageRequest,
    report: &mut Report<W>,
) -> Result<PageSummary, KubePageError>
where
    S: PageSource,
    S::Item: Resource,
    W: Write,
{
    if !first.labels.is_empty() {
        report.label_selector(&first.labels)?;
    }
    let namespace = first.namespace.clone();
    let summary = paginate(
        ctx,
        first,
        |request| source.list_page(request),
        |index, page| Ok::<(), KubePageError>(report.page(kind, namespace.as_deref(), index, &page)?),
    )
    .await?;
    info!(%kind, pages = summary.pages, items = summary.items, "Listing complete");
    Ok(summary)
}

/// Looks up `name` and reports the outcome. Not-found and server rejections
/// are reported and yield `None`.
pub async fn lookup_and_report<S, W>(
    ctx: &WorkContext,
    source: &S,
    name: &str,
    show_json: bool,
    report: &mut Report<W>,
) -> Result<Option<S::Object>, KubePageError>
where
    S: ObjectSource,
    S::Object: Resource + Serialize,
    W: Write,
{
    match get_object(ctx, source, name).await? {
        QueryOutcome::Found(obj) => {
            report.found(source.kind(), source.namespace(), &obj)?;
            if show_json {
                report.json(&obj)?;
            }
            Ok(Some(obj))
        }
        QueryOutcome::Failed(err) => {
            report.lookup_failed(source.kind(), &err)?;
            Ok(None)
        }
    }
}

async fn list_kind<W: Write>(
    client: &Client,
    ctx: &WorkContext,
    kind: ResourceKind,
    first: PageRequest,
    report: &mut Report<W>,
) -> Result<PageSummary, KubePageError> {
    let namespace = first.namespace.clone();
    let namespace = namespace.as_deref();
    match kind {
        ResourceKind::Secrets => {
            let api = KubeResourceApi::<Secret>::new(client.clone(), kind, namespace);
            list_and_report(ctx, &api, kind, first, report).await
        }
        ResourceKind::Deployments => {
            let api = KubeResourceApi::<Deployment>::new(client.clone(), kind, namespace);
            list_and_report(ctx, &api, kind, first, report).await
        }
        ResourceKind::Pods => {
            let api = KubeResourceApi::<Pod>::new(client.clone(), kind, namespace);
            list_and_report(ctx, &api, kind, first, report).await
        }
    }
}

/// Runs one listing. A rejected listing is reported and the run moves on,
/// transport failures and cancellation end it.
async fn list_or_report<W: Write>(
    client: &Client,
    ctx: &WorkContext,
    kind: ResourceKind,
    first: PageRequest,
    report: &mut Report<W>,
) -> Result<(), KubePageError> {
    match list_kind(client, ctx, kind, first, report).await {
        Ok(_) => Ok(()),
        Err(KubePageError::Query(err)) if err.is_recoverable() => {
            warn!(%kind, "Listing failed: {err}");
            report.listing_failed(kind, &err)?;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Label filter of the pods a deployment manages, from `spec.selector.matchLabels`.
pub fn deployment_selector(deployment: &Deployment) -> LabelFilter {
    deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.selector.match_labels.clone())
        .map(LabelFilter::from)
        .unwrap_or_default()
}

/// One invocation: the requested listings, then the single-object lookups.
pub async fn run<W: Write>(
    cli: &Cli,
    client: &Client,
    ctx: &WorkContext,
    report: &mut Report<W>,
) -> Result<(), KubePageError> {
    let namespace = cli.namespace();

    for &kind in &cli.kinds {
        let labels = match kind {
            ResourceKind::Pods => cli.label_filter(),
            _ => LabelFilter::new(),
        };
        list_or_report(client, ctx, kind, cli.first_request(labels), report).await?;
    }

    if let Some(name) = &cli.deployment {
        let api = KubeResourceApi::<Deployment>::new(
            client.clone(),
            ResourceKind::Deployments,
            namespace,
        );
        let deployment = lookup_and_report(ctx, &api, name, cli.show_json, report).await?;
        if let (Some(deployment), true) = (deployment, cli.follow_selector) {
            let selector = deployment_selector(&deployment);
            if selector.is_empty() {
                warn!(deployment = %name, "Deployment has no matchLabels selector, skipping its pods");
            } else {
                // the pods live next to their deployment
                let request = PageRequest {
                    namespace: Some(api.namespace().to_owned()),
                    ..cli.first_request(selector)
                };
                list_or_report(client, ctx, ResourceKind::Pods, request, report).await?;
            }
        }
    }

    if let Some(name) = &cli.pod {
        let api = KubeResourceApi::<Pod>::new(client.clone(), ResourceKind::Pods, namespace);
        lookup_and_report(ctx, &api, name, cli.show_json, report).await?;
    }

    Ok(())
}
