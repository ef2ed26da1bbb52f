//! paperlens-report
//!
//! Turns a partitioned corpus into the timeline payload and writes it out as
//! an HTML page plus a `var data=...;` script next to it.

pub mod error;
pub mod html;
pub mod timeline;

pub use error::ReportError;
pub use html::HtmlReport;
pub use timeline::{build_timeline, timeline_payload, NgramCount, TimelineBucket, TIMELINE_KEY};
