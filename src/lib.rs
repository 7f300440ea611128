// Rust Lazy Data Engine
// Author: Gabriel Demetrios Lafis

//! # Rust Lazy Data Engine
//!
//! A single-node, out-of-core tabular data engine built on lazily
//! evaluated pipelines.
//!
//! ## Features
//!
//! - Lazy sources: text file lines, integer ranges, in-memory rows
//! - Schema-driven decoding of delimited lines into typed records
//! - Streaming transformations: map, filter, take, drop, unique, sample
//! - One-shot in-memory caching of a pipeline
//! - Actions: count, collect, reduce, fold, min, max, sum, mean, show
//!
//! Nothing runs until an action is called, and every action re-runs the
//! chain from its root unless that root is a cache.
//!
//! ## Example
//!
//! ```rust
//! use rust_lazy_data_engine::from_range;
//!
//! let evens = from_range(0, 10).filter(|x| x % 2 == 0);
//!
//! assert_eq!(evens.collect().unwrap(), vec![0, 2, 4, 6, 8]);
//! assert_eq!(evens.take(2).count().unwrap(), 2);
//! assert_eq!(evens.sum().unwrap(), 20);
//! ```

pub mod data;
pub mod display;
pub mod processing;
pub mod utils;

// Re-export main types
pub use data::{
    from_delimited, from_file, from_range, from_vec, DataType, DecodeFailure, DecodeReason, Field,
    Record, RecordDecoder, Schema, SchemaBuilder, Value,
};
pub use display::{ShowOptions, TableFormatter, Tabular};
pub use processing::{CachedDataset, ErrorKind, Numeric, Pipeline, PipelineError, StageKind};
pub use utils::{init_logging, Config};
