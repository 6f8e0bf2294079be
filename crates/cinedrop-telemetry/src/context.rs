//! Correlation context for pipeline requests.
//!
//! # Design
//! - Keeps the request identifier and operation name in task-local storage so adapters
//!   deep in the call stack can tag their logs without threading ids through signatures.
//! - Provides an application-level span guard carrying mode/build info.

use std::future::Future;
use std::sync::Arc;

use tracing::{Span, span::Entered};
use uuid::Uuid;

use crate::init::build_sha;

/// Guard that keeps the application-level span entered for the lifetime of the process.
pub struct GlobalContextGuard {
    _guard: Entered<'static>,
}

impl GlobalContextGuard {
    #[must_use]
    /// Enter the application-level tracing span for the lifetime of the guard.
    pub fn new(mode: impl Into<String>) -> Self {
        let mode = mode.into();
        let span: &'static Span = Box::leak(Box::new(
            tracing::info_span!("app", mode = %mode, build_sha = %build_sha()),
        ));
        let guard = span.enter();
        Self { _guard: guard }
    }
}

/// Generate a fresh correlation identifier.
#[must_use]
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Retrieve the correlation identifier of the running request, if one is set.
#[must_use]
pub fn current_request_id() -> Option<String> {
    ACTIVE_REQUEST_CONTEXT
        .try_with(|ctx| ctx.request_id.as_ref().to_string())
        .ok()
}

/// Retrieve the pipeline operation of the running request, if one is set.
#[must_use]
pub fn current_operation() -> Option<&'static str> {
    ACTIVE_REQUEST_CONTEXT.try_with(|ctx| ctx.operation).ok()
}

/// Execute the provided future with the supplied correlation context available to
/// everything it awaits.
pub async fn with_request_context<Fut, T>(
    request_id: impl Into<String>,
    operation: &'static str,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = RequestContext {
        request_id: Arc::from(request_id.into()),
        operation,
    };
    ACTIVE_REQUEST_CONTEXT.scope(context, fut).await
}

#[derive(Clone)]
struct RequestContext {
    request_id: Arc<str>,
    operation: &'static str,
}

tokio::task_local! {
    static ACTIVE_REQUEST_CONTEXT: RequestContext;
}
