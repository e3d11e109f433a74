//! # Producer Registry
//!
//! Shared lookup table from shard id to the live queue handle for that
//! shard. The supervisor registers a fresh handle on every (re)start and
//! deregisters on teardown; consumers and external subscribers resolve
//! through it so they always reach the current incarnation.

use std::collections::HashMap;

use parking_lot::RwLock;

use prism_types::ShardId;

use crate::queue::ShardQueueHandle;

/// Registry of live shard queues.
#[derive(Default)]
pub struct ProducerRegistry {
    inner: RwLock<HashMap<ShardId, ShardQueueHandle>>,
}

impl ProducerRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shard's queue handle, replacing any previous incarnation.
    pub fn register(&self, handle: ShardQueueHandle) {
        self.inner.write().insert(handle.shard_id(), handle);
    }

    /// Remove a shard's queue handle.
    pub fn deregister(&self, shard_id: ShardId) -> Option<ShardQueueHandle> {
        self.inner.write().remove(&shard_id)
    }

    /// The live queue handle for a shard, if one is registered.
    #[must_use]
    pub fn get(&self, shard_id: ShardId) -> Option<ShardQueueHandle> {
        self.inner.read().get(&shard_id).cloned()
    }

    /// Snapshot of all live queue handles.
    #[must_use]
    pub fn producers(&self) -> HashMap<ShardId, ShardQueueHandle> {
        self.inner.read().clone()
    }

    /// Number of registered shards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no shard is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
