//! Time-bounded cache for the waypoint graph.
//!
//! The cache keeps at most one graph together with the instant it was built.
//! A lookup older than the TTL, or any lookup after [`GraphCache::invalidate`],
//! fetches the full connection list and rebuilds the graph from scratch.
//!
//! No lock is held while fetching or building. Two callers racing on an
//! expired entry may both rebuild; each builds an equivalent graph from the
//! same connection list and the last one stored wins. A rebuild that was
//! started before a call to [`GraphCache::invalidate`] is handed to its
//! caller but never stored.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{build_graph, Graph};
use crate::repository::{bounded, WaypointRepository};

/// Default lifetime of a cached graph.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current instant, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + offset
    }
}

#[derive(Clone)]
struct CachedGraph {
    graph: Arc<Graph>,
    built_at: Instant,
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub graph: Arc<Graph>,
    /// `true` when served from a fresh entry, `false` when rebuilt.
    pub hit: bool,
}

/// Holds the last built graph for at most `ttl`.
pub struct GraphCache {
    repository: Arc<dyn WaypointRepository>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fetch_timeout: Option<Duration>,
    slot: RwLock<Option<CachedGraph>>,
    /// Bumped by every invalidation.
    generation: AtomicU64,
}

impl GraphCache {
    /// Create a cache using the system clock and no fetch timeout.
    pub fn new(repository: Arc<dyn WaypointRepository>, ttl: Duration) -> Self {
        Self::with_clock(repository, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(
        repository: Arc<dyn WaypointRepository>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            clock,
            ttl,
            fetch_timeout: None,
            slot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Bound the connection fetch performed on rebuild.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Return the cached graph, rebuilding it when missing or expired.
    pub async fn get(&self) -> Result<Arc<Graph>> {
        Ok(self.lookup().await?.graph)
    }

    /// Like [`get`](Self::get) but reports whether the cache was hit.
    pub async fn lookup(&self) -> Result<CacheLookup> {
        if let Some(graph) = self.fresh() {
            debug!("using cached waypoint graph");
            return Ok(CacheLookup { graph, hit: true });
        }

        debug!("building waypoint graph");
        let generation = self.generation.load(Ordering::Acquire);
        let connections = bounded(
            "get_all_connections",
            self.fetch_timeout,
            self.repository.get_all_connections(),
        )
        .await?;

        let graph = Arc::new(build_graph(&connections));
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "waypoint graph built"
        );

        self.store(Arc::clone(&graph), generation);
        Ok(CacheLookup { graph, hit: false })
    }

    /// The cached graph if one exists and has not expired.
    pub fn fresh(&self) -> Option<Arc<Graph>> {
        let now = self.clock.now();
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|cached| now.saturating_duration_since(cached.built_at) < self.ttl)
            .map(|cached| Arc::clone(&cached.graph))
    }

    /// Drop the cached graph; the next lookup rebuilds it.
    ///
    /// Must be called whenever waypoints or connections change.
    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        *slot = None;
        info!("waypoint graph cache cleared");
    }

    /// Whether a graph is held, regardless of age.
    pub fn is_populated(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn store(&self, graph: Arc<Graph>, generation: u64) {
        let built_at = self.clock.now();
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("cache invalidated during rebuild; not storing graph");
            return;
        }
        *slot = Some(CachedGraph { graph, built_at });
    }
}

impl fmt::Debug for GraphCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCache")
            .field("ttl", &self.ttl)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("populated", &self.is_populated())
            .finish()
    }
}
