//! Geometry shared by the meshpath crates.
//!
//! [`Point`] is the default position type carried by mesh nodes, and
//! [`Range`] describes the rectangles that grid bakes cover.

pub mod geom;

pub use geom::{Point, Range, RangeIter};
