//! # Scale transforms
//!
//! A scale transform maps a domain value in `[min, max]` to a track
//! percentage in `0..=100` and back. The rheostat never reasons about domain
//! values directly while a handle moves: it works in track space and uses the
//! transform to translate at the edges.
//!
//! ## Contract
//!
//! For every `min < max`, a transform must be pure and strictly increasing in
//! its first argument, and [`ScaleTransform::value_at`] must invert
//! [`ScaleTransform::position_of`] within floating point tolerance. The
//! built-in algorithms honor this. A custom transform that breaks it is not
//! detected at runtime; snapping on top of such a transform may pick the wrong
//! snap point or let handles settle out of order.
//!
//! `min == max` is rejected by configuration validation before any transform
//! is evaluated.
//!
//! ## Built-in algorithms
//!
//! | Name        | Position of `v`                                 |
//! |-------------|-------------------------------------------------|
//! | `linear`    | `(v - min) / (max - min)`                       |
//! | `quadratic` | `sqrt((v - min) / (max - min))`                 |
//! | `log`       | `(ln(v + 1) - ln(min + 1)) / (ln(max + 1) - ln(min + 1))` |
//! | `log10`     | same as `log`, in base 10                       |
//! | `timesFour` | `(v - min) / (4 * (max - min))`                 |
//!
//! All positions are scaled by 100. The logarithmic variants offset by one so
//! that a zero bound never evaluates `log(0)`.

use std::{fmt, str::FromStr, sync::Arc};

use crate::error::UnknownAlgorithm;

/// Monotonic bijection between domain values and track percentages.
pub trait ScaleTransform: Send + Sync {
    /// Domain value shown at `percentage` of the track.
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64;

    /// Track percentage at which `value` is shown.
    fn position_of(&self, value: f64, min: f64, max: f64) -> f64;
}

/// Evenly spaced values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl ScaleTransform for Linear {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        min + (percentage / 100.0) * (max - min)
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        (value - min) / (max - min) * 100.0
    }
}

/// Finer resolution near the minimum, coarser near the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quadratic;

impl ScaleTransform for Quadratic {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        let normalized = percentage / 100.0;
        min + normalized.powi(2) * (max - min)
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        let normalized = (value - min) / (max - min);
        normalized.sqrt() * 100.0
    }
}

/// Natural logarithm over `value + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalLog;

impl ScaleTransform for NaturalLog {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        let log_min = (min + 1.0).ln();
        let log_max = (max + 1.0).ln();
        let log_value = log_min + (percentage / 100.0) * (log_max - log_min);
        log_value.exp() - 1.0
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        let log_min = (min + 1.0).ln();
        let log_max = (max + 1.0).ln();
        ((value + 1.0).ln() - log_min) / (log_max - log_min) * 100.0
    }
}

/// Base-10 logarithm over `value + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Log10;

impl ScaleTransform for Log10 {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        let log_min = (min + 1.0).log10();
        let log_max = (max + 1.0).log10();
        let log_value = log_min + (percentage / 100.0) * (log_max - log_min);
        10f64.powf(log_value) - 1.0
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        let log_min = (min + 1.0).log10();
        let log_max = (max + 1.0).log10();
        ((value + 1.0).log10() - log_min) / (log_max - log_min) * 100.0
    }
}

/// Linear over four times the domain width.
///
/// The whole domain fits in the first quarter of the track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimesFour;

impl ScaleTransform for TimesFour {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        min + (percentage / 100.0) * 4.0 * (max - min)
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        (value - min) / (4.0 * (max - min)) * 100.0
    }
}

/// A scale transform selected by name, or supplied by the host.
///
/// Custom transforms compare by identity, so two `Algorithm::Custom` values
/// are equal only when they share the same allocation.
#[derive(Clone, Default)]
pub enum Algorithm {
    #[default]
    Linear,
    Quadratic,
    Log,
    Log10,
    TimesFour,
    Custom(Arc<dyn ScaleTransform>),
}

impl Algorithm {
    /// Wraps a host-provided transform.
    pub fn custom(transform: impl ScaleTransform + 'static) -> Self {
        Self::Custom(Arc::new(transform))
    }

    /// Registry name of a built-in algorithm, `None` for custom transforms.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Linear => Some("linear"),
            Self::Quadratic => Some("quadratic"),
            Self::Log => Some("log"),
            Self::Log10 => Some("log10"),
            Self::TimesFour => Some("timesFour"),
            Self::Custom(_) => None,
        }
    }

    fn transform(&self) -> &dyn ScaleTransform {
        match self {
            Self::Linear => &Linear,
            Self::Quadratic => &Quadratic,
            Self::Log => &NaturalLog,
            Self::Log10 => &Log10,
            Self::TimesFour => &TimesFour,
            Self::Custom(transform) => transform.as_ref(),
        }
    }
}

impl ScaleTransform for Algorithm {
    fn value_at(&self, percentage: f64, min: f64, max: f64) -> f64 {
        self.transform().value_at(percentage, min, max)
    }

    fn position_of(&self, value: f64, min: f64, max: f64) -> f64 {
        self.transform().position_of(value, min, max)
    }
}

impl PartialEq for Algorithm {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str("custom"),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            "log" => Ok(Self::Log),
            "log10" => Ok(Self::Log10),
            "timesFour" | "times_four" => Ok(Self::TimesFour),
            other => Err(UnknownAlgorithm(other.to_owned())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Algorithm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => Err(serde::ser::Error::custom(
                "custom scale transforms cannot be serialized",
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Algorithm {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
