//! Errors surfaced while configuring a rheostat.
//!
//! Configuration problems are reported when a [`RangeController`] is created or
//! reconfigured. Nothing in the drag path returns an error: out-of-range
//! offsets and overlapping handles are resolved by clamping.
//!
//! [`RangeController`]: crate::RangeController

use thiserror::Error;

/// A configuration that cannot produce a valid, ordered pair of handles.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("range bounds must be finite (min: {min}, max: {max})")]
    NonFiniteRange { min: f64, max: f64 },
    #[error("degenerate range: min ({min}) must be less than max ({max})")]
    DegenerateRange { min: f64, max: f64 },
    #[error("track length {length} leaves no room for a handle of size {handle_size}")]
    TrackTooShort { length: f64, handle_size: f64 },
    #[error("handle delta must be a non-negative length, got {0}")]
    NegativeHandleDelta(f64),
    #[error("handle delta {delta} exceeds the track size {track_size}")]
    HandleDeltaExceedsTrack { delta: f64, track_size: f64 },
    #[error("snap mode requires at least one snapping point")]
    EmptySnapPoints,
    #[error("snapping point at index {index} is not finite ({value})")]
    NonFiniteSnapPoint { index: usize, value: f64 },
    #[error("top value {top} lies above bottom value {bottom}")]
    CrossedValues { top: f64, bottom: f64 },
    #[error("value precision {0} exceeds the maximum of {max} digits", max = crate::args::MAX_VALUE_PRECISION)]
    PrecisionTooLarge(u32),
}

/// Returned when a scale algorithm name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scale algorithm `{0}`")]
pub struct UnknownAlgorithm(pub String);
