//! rheostat is the numeric core of a dual-handle range selection control.
//!
//! It turns pointer drags into domain values and back, without drawing
//! anything. A renderer reads handle offsets and track fills from a
//! [`RangeController`]; a gesture source feeds it `begin`, `change` and
//! `finalize` events, one independent stream per handle.
//!
//! # Pieces
//!
//! - [`scale`]: transforms between domain values and track percentages
//!   (linear, logarithmic, quadratic, or supplied by the host).
//! - [`geometry`]: percentages, track positions and handle offsets.
//! - [`snap`]: snap points and the searches over them.
//! - [`drag`]: resolution of a single drag step, free or snapping.
//! - [`controller`]: handle state, gestures, controlled values and the read
//!   model.
//!
//! # Example
//!
//! ```
//! use rheostat::{Algorithm, Handle, RangeController, RheostatArgsBuilder};
//!
//! let args = RheostatArgsBuilder::default()
//!     .min_range(0.0)
//!     .max_range(800.0)
//!     .top_value(0.0)
//!     .bottom_value(800.0)
//!     .algorithm(Algorithm::Linear)
//!     .should_snap(false)
//!     .rheostat_height(430.0)
//!     .handle_size(30.0)
//!     .handle_delta(5.0)
//!     .build()
//!     .unwrap();
//! let controller = RangeController::new(args).unwrap();
//! controller.subscribe(|change: rheostat::RangeChange| {
//!     println!("{} - {}", change.top_value, change.bottom_value);
//! });
//!
//! controller.begin(Handle::Bottom);
//! controller.change(Handle::Bottom, 100.0);
//! controller.finalize(Handle::Bottom);
//!
//! assert_eq!(controller.selection().bottom_value, 600.0);
//! ```

pub mod args;
pub mod controller;
pub mod drag;
mod error;
pub mod geometry;
pub mod handle;
pub mod notify;
pub mod scale;
pub mod snap;

pub use crate::{
    args::{Axis, RheostatArgs, RheostatArgsBuilder, RheostatArgsBuilderError},
    controller::{DragGesture, RangeController, RangeSelection, SnapMark, TrackFill},
    drag::{DragStep, Resolution},
    error::{ConfigError, UnknownAlgorithm},
    geometry::TrackGeometry,
    handle::{Handle, HandleState},
    notify::{ChangeCallback, RangeChange},
    scale::{Algorithm, ScaleTransform},
};
