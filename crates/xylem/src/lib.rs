//! Xylem: route search over a graph of typed converters
//!
//! Given the data types you have and the types you want, xylem walks a
//! [`ConversionGraph`] to find a sequence of conversions covering the
//! targets, and can drive the converters to actually produce the values.
//!
//! The graph is supplied fully built by a collaborator; xylem treats it as
//! read-only and treats every converter as an opaque callable.

mod apply;
mod converter;
mod graph;
mod search;

pub use apply::{ApplyResult, ApplyStats, apply, apply_with_stats};
pub use converter::{ConvertError, Converter};
pub use graph::{ConversionGraph, Edge, TypeSet};
pub use search::{Search, SearchError};
