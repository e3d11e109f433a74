//! # Prism Pipeline
//!
//! The shard-partitioned gateway event pipeline: per-shard consumers pull
//! raw events from a [`RawEventSource`], the [`EventProcessor`] normalizes
//! them against the entity cache, and per-shard [`ShardQueue`]s republish
//! the results to demand-driven subscribers. The [`ShardSupervisor`] keeps
//! each shard's queue/consumer pair alive independently of its siblings.

pub mod consumer;
pub mod error;
pub mod processor;
pub mod queue;
pub mod registry;
pub mod source;
pub mod supervisor;

pub use consumer::ShardConsumer;
pub use error::{ProcessError, QueueClosed, SourceError};
pub use processor::EventProcessor;
pub use queue::{EventStream, EventSubscription, QueueStats, ShardQueue, ShardQueueHandle};
pub use registry::ProducerRegistry;
pub use source::RawEventSource;
pub use supervisor::ShardSupervisor;
