//! Notify-and-continue wrapper around [`QueryClient`]

use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::client::{Auth, QueryClient, QueryOptions};
use crate::error::{QueryError, Result};

/// Receives query failures that [`ReportingClient`] swallows
pub trait ErrorReporter: Send + Sync {
    fn report(&self, sql: &str, error: &QueryError);
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for Arc<R> {
    fn report(&self, sql: &str, error: &QueryError) {
        (**self).report(sql, error)
    }
}

/// Logs failures through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, sql: &str, error: &QueryError) {
        error!(status = ?error.status(), "Query failed: {} ({})", error, sql);
    }
}

/// Reports failures and returns `None` in their place
///
/// Missing credentials or tokens are still returned as errors, since no
/// request was made and retrying cannot help.
#[derive(Clone)]
pub struct ReportingClient<R = TracingReporter> {
    inner: QueryClient,
    reporter: R,
}

impl ReportingClient<TracingReporter> {
    pub fn new(inner: QueryClient) -> Self {
        Self::with_reporter(inner, TracingReporter)
    }
}

impl<R: ErrorReporter> ReportingClient<R> {
    pub fn with_reporter(inner: QueryClient, reporter: R) -> Self {
        Self { inner, reporter }
    }

    pub fn inner(&self) -> &QueryClient {
        &self.inner
    }

    pub async fn query(
        &self,
        sql: &str,
        options: QueryOptions,
        auth: Auth<'_>,
    ) -> Result<Option<Value>> {
        match self.inner.query(sql, options, auth).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_precondition() => Err(e),
            Err(e) => {
                self.reporter.report(sql.trim(), &e);
                Ok(None)
            }
        }
    }
}
