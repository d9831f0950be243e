use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::api::{PointSource, parse_points};
use crate::domain::Point;
use crate::error::LoadError;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

type LoadResult = Result<Arc<[Point]>, LoadError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

enum LoadState {
    Empty,
    Loading(PendingLoad),
    Loaded(Arc<[Point]>),
}

/// Load-once cache in front of a [`PointSource`].
///
/// The first call to [`PointCache::get`] starts a fetch; calls arriving
/// while it is in flight await the same fetch and receive the same result.
/// A successful load is kept for the life of the cache. A failed load is
/// handed to every waiter and then forgotten so the next call fetches again.
pub struct PointCache {
    source: Arc<dyn PointSource>,
    timeout: Duration,
    state: Mutex<LoadState>,
}

impl PointCache {
    pub fn new(source: Arc<dyn PointSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_LOAD_TIMEOUT,
            state: Mutex::new(LoadState::Empty),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source_id(&self) -> &str {
        self.source.id()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Points already loaded, without triggering a fetch.
    pub fn cached(&self) -> Option<Arc<[Point]>> {
        match &*self.lock_state() {
            LoadState::Loaded(points) => Some(Arc::clone(points)),
            _ => None,
        }
    }

    pub async fn get(&self) -> LoadResult {
        let pending = {
            let mut state = self.lock_state();
            let in_flight = match &*state {
                LoadState::Loaded(points) => return Ok(Arc::clone(points)),
                LoadState::Loading(pending) => Some(pending.clone()),
                LoadState::Empty => None,
            };

            match in_flight {
                Some(pending) => {
                    tracing::debug!(source = %self.source_id(), "joining in-flight point load");
                    pending
                }
                None => {
                    let pending = self.start_load().shared();
                    *state = LoadState::Loading(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut state = self.lock_state();
        let current = matches!(&*state, LoadState::Loading(p) if p.ptr_eq(&pending));
        if current {
            match &result {
                Ok(points) => *state = LoadState::Loaded(Arc::clone(points)),
                Err(e) => {
                    tracing::warn!(
                        source = %self.source_id(),
                        error = %e,
                        retryable = e.is_retryable(),
                        "point load failed"
                    );
                    *state = LoadState::Empty;
                }
            }
        }

        result
    }

    fn start_load(&self) -> BoxFuture<'static, LoadResult> {
        let source_id = self.source.id().to_string();
        let timeout = self.timeout;
        let fetch = self.source.fetch();

        async move {
            tracing::info!(source = %source_id, "loading points");
            let body = tokio::time::timeout(timeout, fetch)
                .await
                .map_err(|_| LoadError::Timeout {
                    source_id: source_id.clone(),
                    timeout,
                })??;

            let points = parse_points(&source_id, &body)?;
            tracing::info!(source = %source_id, count = points.len(), "points loaded");

            Ok(Arc::from(points))
        }
        .boxed()
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
