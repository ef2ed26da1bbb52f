//! paperlens-core
//!
//! Metadata loading, date resolution, interval partitioning and the run
//! context shared by the text and report crates.

pub mod args;
pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod intervals;
pub mod logging;
pub mod metadata;
pub mod progress;
pub mod stopwords;
pub mod traits;
pub mod types;

pub use context::ProcessingContext;
pub use dates::resolve_date;
pub use error::{Error, Result};
pub use intervals::{Interval, IntervalPartitioner, LabelStyle, Partition, UNBUCKETED};
pub use metadata::{DuplicatePolicy, MetadataStore};
