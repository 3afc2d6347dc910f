#![doc = include_str!("../README.md")]

mod error;
pub mod geometry;
pub mod rtree;
mod r#type;

pub use error::{BoxError, Result, SegmentIndexError};
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
