//! Model traits for marker state estimation
//!
//! This module defines the strategy traits a filter is wired with: how a
//! tracked state evolves between frames and how a sensor observes it. Stock
//! implementations cover the common constant-velocity and direct-position
//! cases; anything nonlinear is expressed by implementing the traits.

mod process;
mod observation;

pub use process::*;
pub use observation::*;
