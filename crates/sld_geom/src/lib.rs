//! Plane geometry primitives for single-line diagram routing.
//!
//! This crate provides the value types shared by every routing stage: real-valued
//! [`Point`]s, axis-aligned [`Rect`]s, and the segment tests the collision
//! detector is built from (segment/segment intersection, segment/rectangle
//! intersection, collinear overlap, and turn angles).

#![warn(missing_docs)]

pub mod point;
pub mod rect;
pub mod segment;

pub use point::{Point, EPSILON};
pub use rect::Rect;
pub use segment::{
    collinear_overlap, heading_degrees, is_axis_aligned, segment_intersection,
    segment_intersects_rect, segment_rect_entry, segments_intersect, turn_angle,
};
