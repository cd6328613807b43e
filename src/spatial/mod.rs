//! Spatial containers for labeled 3D points
//!
//! Marker detection produces many candidate points per frame, most of which
//! are irrelevant to any given query. [`PointCloud`] keeps the full set
//! intact while queries narrow and order a lightweight view of it.

mod cloud;

pub use cloud::*;
