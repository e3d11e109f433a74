//! # Prism Test Suite
//!
//! Unified integration test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/         # Cross-crate pipeline scenarios
//!     ├── pipeline_flow.rs     # Raw-to-normalized end to end
//!     ├── demand_control.rs    # Pull-based release semantics
//!     └── restart_isolation.rs # Per-shard supervision
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p prism-tests
//! cargo test -p prism-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
