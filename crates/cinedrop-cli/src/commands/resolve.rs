use std::future::Future;

use cinedrop_core::{PipelineResult, Quality, TorrentCandidate, cancel_pair};
use cinedrop_pipeline::{Pipeline, ResolveOutcome};
use tracing::warn;

use crate::cli::{OutputFormat, ResolveArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_account, render_resolution};

const MANUAL_TITLE: &str = "manual submission";

pub(crate) async fn handle_resolve(
    ctx: &AppContext,
    args: ResolveArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let candidate = candidate_from_args(&args)?;
    let outcome = resolve_until(&ctx.pipeline, &candidate, interrupted()).await?;
    render_resolution(&outcome, output)
}

pub(crate) async fn handle_ping(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let account = ctx.pipeline.verify_credential().await?;
    render_account(&account, output)
}

fn candidate_from_args(args: &ResolveArgs) -> CliResult<TorrentCandidate> {
    let magnet = args.magnet.trim();
    if magnet.is_empty() {
        return Err(CliError::validation("magnet must not be empty"));
    }
    let title = args
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(MANUAL_TITLE);
    Ok(TorrentCandidate::new(
        title,
        magnet,
        Quality::detect(title),
        None,
    )?)
}

/// Resolve `candidate`, cancelling at the next poll boundary once `interrupt` completes.
pub(crate) async fn resolve_until<F>(
    pipeline: &Pipeline,
    candidate: &TorrentCandidate,
    interrupt: F,
) -> PipelineResult<ResolveOutcome>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (cancel, signal) = cancel_pair();
    let watcher = tokio::spawn(async move {
        interrupt.await;
        warn!("interrupt received; stopping after the current poll");
        cancel.cancel();
    });
    let outcome = pipeline.resolve(candidate, signal).await;
    watcher.abort();
    outcome
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
