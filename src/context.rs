// Serving context handed to the router by its host
//
// Carries the logging sink (a tracing span every router log line is
// recorded under) and the collaborators the router needs at request time.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::{HttpFetcher, NoFetch, ResourceFetcher};

#[derive(Clone)]
pub struct ServingContext {
    /// Name of the serving function hosting the router
    pub name: String,
    /// Logging sink
    pub span: tracing::Span,
    /// Used to resolve data_url bodies
    pub fetcher: Arc<dyn ResourceFetcher>,
}

impl ServingContext {
    /// Context with an HTTP fetcher bounded by `fetch_timeout`
    pub fn new(name: impl Into<String>, fetch_timeout: Duration) -> Result<Self> {
        let fetcher = HttpFetcher::with_timeout(fetch_timeout)?;
        Ok(Self::with_fetcher(name, Arc::new(fetcher)))
    }

    pub fn with_fetcher(name: impl Into<String>, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        let name = name.into();
        let span = tracing::info_span!("serving", function = %name);
        Self {
            name,
            span,
            fetcher,
        }
    }

    /// Context that never fetches remote resources
    pub fn offline(name: impl Into<String>) -> Self {
        Self::with_fetcher(name, Arc::new(NoFetch))
    }
}

impl std::fmt::Debug for ServingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServingContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
