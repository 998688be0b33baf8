//! TTL cache with change listeners
//!
//! A single-slot cache sitting between the derivation layer and the store
//! so hot reads (categories, mainly) skip repeated cold loads. A fetch
//! failure falls back to the stale value when one is present. Every write
//! path that touches the cached collection calls `invalidate()`; listeners
//! are notified synchronously on set and invalidate and must not write
//! back into the cache during notification.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::error::DigibookResult;
use crate::models::Category;

/// Default freshness window for the category cache
pub const DEFAULT_CATEGORY_TTL: Duration = Duration::from_secs(30);

/// What changed in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fresh value was stored
    Updated,
    /// The cached value was discarded
    Invalidated,
}

type Listener = Box<dyn Fn(CacheEvent) + Send + Sync>;

struct Slot<T> {
    value: T,
    fetched_at: Instant,
}

/// A bounded, TTL-based cache holding one value
pub struct TtlCache<T: Clone> {
    ttl: Duration,
    slot: RwLock<Option<Slot<T>>>,
    listeners: RwLock<Vec<Listener>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create a cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Return the cached value when fresh, otherwise fetch and store
    ///
    /// When the fetch fails and a stale value is present, the stale value
    /// is returned and the error swallowed; with no fallback the error
    /// propagates.
    pub fn get(&self, fetch: impl FnOnce() -> DigibookResult<T>) -> DigibookResult<T> {
        if let Some(value) = self.fresh_value() {
            return Ok(value);
        }

        match fetch() {
            Ok(value) => {
                self.set(value.clone());
                Ok(value)
            }
            Err(e) => match self.stale_value() {
                Some(stale) => Ok(stale),
                None => Err(e),
            },
        }
    }

    /// Store a value directly
    pub fn set(&self, value: T) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(Slot {
                value,
                fetched_at: Instant::now(),
            });
        }
        self.notify(CacheEvent::Updated);
    }

    /// Discard the cached value
    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
        self.notify(CacheEvent::Invalidated);
    }

    /// Register a change listener
    pub fn subscribe(&self, listener: impl Fn(CacheEvent) + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Box::new(listener));
        }
    }

    fn fresh_value(&self) -> Option<T> {
        let slot = self.slot.read().ok()?;
        slot.as_ref().and_then(|s| {
            if s.fetched_at.elapsed() < self.ttl {
                Some(s.value.clone())
            } else {
                None
            }
        })
    }

    fn stale_value(&self) -> Option<T> {
        let slot = self.slot.read().ok()?;
        slot.as_ref().map(|s| s.value.clone())
    }

    fn notify(&self, event: CacheEvent) {
        if let Ok(listeners) = self.listeners.read() {
            for listener in listeners.iter() {
                listener(event);
            }
        }
    }
}

/// The category cache used by derivations
pub type CategoryCache = TtlCache<Vec<Category>>;

impl CategoryCache {
    /// Category cache with the default 30-second window
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_CATEGORY_TTL)
    }
}
