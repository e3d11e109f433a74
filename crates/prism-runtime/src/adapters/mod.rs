//! Port implementations connecting the pipeline to the outside world.

pub mod loopback;

pub use loopback::LoopbackSource;
