//! Configuration of a rheostat.
//!
//! [`RheostatArgs`] lists every option the control recognizes. Build it with
//! [`RheostatArgsBuilder`]; options left unset keep the defaults documented on
//! each field.
//!
//! ```
//! use rheostat::{Algorithm, RheostatArgsBuilder};
//!
//! let args = RheostatArgsBuilder::default()
//!     .max_range(800.0)
//!     .bottom_value(800.0)
//!     .snapping_points(vec![0.0, 50.0, 100.0, 200.0, 300.0, 400.0, 800.0])
//!     .algorithm(Algorithm::Linear)
//!     .rheostat_height(400.0)
//!     .handle_size(30.0)
//!     .handle_delta(5.0)
//!     .build()
//!     .unwrap();
//! assert!(args.validate().is_ok());
//! ```

use derive_builder::Builder;

use crate::{error::ConfigError, geometry::TrackGeometry, scale::Algorithm};

/// Largest `value_precision` accepted; `f64` carries no more decimal digits.
pub const MAX_VALUE_PRECISION: u32 = 15;

/// Direction the track runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// The track runs along `rheostat_height`.
    #[default]
    Vertical,
    /// The track runs along `rheostat_width`.
    Horizontal,
}

/// Arguments for a [`RangeController`](crate::RangeController).
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(pattern = "owned", default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RheostatArgs {
    /// Lower domain bound. Defaults to `0`.
    pub min_range: f64,
    /// Upper domain bound. Defaults to `1000`.
    pub max_range: f64,
    /// Value of the top handle at mount. Defaults to `0`.
    pub top_value: f64,
    /// Value of the bottom handle at mount. Defaults to `100`.
    pub bottom_value: f64,
    /// Transform between domain values and track percentages. Defaults to
    /// linear.
    pub algorithm: Algorithm,
    /// Whether handles settle on snapping points. Defaults to `true`.
    pub should_snap: bool,
    /// Ascending domain values handles may settle on. Defaults to `[0, 100]`.
    #[builder(setter(into))]
    pub snapping_points: Vec<f64>,
    /// Handle extent along the track. Defaults to `20`.
    pub handle_size: f64,
    /// Minimum gap kept between the handles in free mode. Defaults to `25`.
    pub handle_delta: f64,
    /// Height of the control. Defaults to `600`.
    pub rheostat_height: f64,
    /// Width of the control. Defaults to `200`.
    pub rheostat_width: f64,
    /// Which dimension the track runs along. Defaults to vertical.
    pub axis: Axis,
    /// Puts the domain minimum at the leading edge. Defaults to `false`.
    pub flipped: bool,
    /// Decimal digits kept in emitted values, at most
    /// [`MAX_VALUE_PRECISION`]. Defaults to `0`.
    pub value_precision: u32,
}

impl Default for RheostatArgs {
    fn default() -> Self {
        Self {
            min_range: 0.0,
            max_range: 1000.0,
            top_value: 0.0,
            bottom_value: 100.0,
            algorithm: Algorithm::Linear,
            should_snap: true,
            snapping_points: vec![0.0, 100.0],
            handle_size: 20.0,
            handle_delta: 25.0,
            rheostat_height: 600.0,
            rheostat_width: 200.0,
            axis: Axis::Vertical,
            flipped: false,
            value_precision: 0,
        }
    }
}

impl RheostatArgs {
    /// Length of the control along its axis.
    pub fn track_length(&self) -> f64 {
        match self.axis {
            Axis::Vertical => self.rheostat_height,
            Axis::Horizontal => self.rheostat_width,
        }
    }

    /// Checks every option and returns the resulting track geometry.
    ///
    /// The initial values are checked for order only. Values outside the
    /// domain are clamped at mount rather than rejected.
    pub fn validate(&self) -> Result<TrackGeometry, ConfigError> {
        let (min, max) = (self.min_range, self.max_range);
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteRange { min, max });
        }
        if min >= max {
            return Err(ConfigError::DegenerateRange { min, max });
        }

        let geometry = TrackGeometry::new(self.track_length(), self.handle_size)?;
        // `!(x >= 0)` also rejects NaN.
        if !(self.handle_delta >= 0.0) {
            return Err(ConfigError::NegativeHandleDelta(self.handle_delta));
        }
        if self.handle_delta > geometry.track_size() {
            return Err(ConfigError::HandleDeltaExceedsTrack {
                delta: self.handle_delta,
                track_size: geometry.track_size(),
            });
        }

        if self.should_snap && self.snapping_points.is_empty() {
            return Err(ConfigError::EmptySnapPoints);
        }
        if let Some((index, &value)) = self
            .snapping_points
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ConfigError::NonFiniteSnapPoint { index, value });
        }

        if self.top_value > self.bottom_value {
            return Err(ConfigError::CrossedValues {
                top: self.top_value,
                bottom: self.bottom_value,
            });
        }
        if self.value_precision > MAX_VALUE_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(self.value_precision));
        }

        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let args = RheostatArgs::default();
        let geometry = args.validate().unwrap();
        assert_eq!(geometry.track_size(), 580.0);
    }

    #[test]
    fn builder_keeps_defaults_for_unset_fields() {
        let args = RheostatArgsBuilder::default()
            .max_range(800.0)
            .flipped(true)
            .build()
            .unwrap();
        assert_eq!(args.max_range, 800.0);
        assert!(args.flipped);
        assert_eq!(args.snapping_points, vec![0.0, 100.0]);
        assert_eq!(args.handle_delta, 25.0);
    }

    #[test]
    fn horizontal_axis_uses_width() {
        let args = RheostatArgsBuilder::default()
            .axis(Axis::Horizontal)
            .rheostat_width(250.0)
            .build()
            .unwrap();
        assert_eq!(args.validate().unwrap().track_size(), 230.0);
    }

    #[test]
    fn rejects_degenerate_ranges() {
        let args = RheostatArgs {
            min_range: 5.0,
            max_range: 5.0,
            ..Default::default()
        };
        assert_eq!(
            args.validate(),
            Err(ConfigError::DegenerateRange { min: 5.0, max: 5.0 })
        );

        let args = RheostatArgs {
            max_range: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::NonFiniteRange { .. })
        ));
    }

    #[test]
    fn rejects_empty_snap_points_only_in_snap_mode() {
        let snapping = RheostatArgs {
            snapping_points: Vec::new(),
            ..Default::default()
        };
        assert_eq!(snapping.validate(), Err(ConfigError::EmptySnapPoints));

        let free = RheostatArgs {
            should_snap: false,
            ..snapping
        };
        assert!(free.validate().is_ok());
    }

    #[test]
    fn rejects_handle_delta_beyond_track() {
        let args = RheostatArgs {
            handle_delta: 581.0,
            ..Default::default()
        };
        assert_eq!(
            args.validate(),
            Err(ConfigError::HandleDeltaExceedsTrack {
                delta: 581.0,
                track_size: 580.0,
            })
        );

        let args = RheostatArgs {
            handle_delta: -1.0,
            ..Default::default()
        };
        assert_eq!(args.validate(), Err(ConfigError::NegativeHandleDelta(-1.0)));
    }

    #[test]
    fn rejects_non_finite_snap_points() {
        let args = RheostatArgs {
            snapping_points: vec![0.0, f64::NAN],
            ..Default::default()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::NonFiniteSnapPoint { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_crossed_initial_values() {
        let args = RheostatArgs {
            top_value: 600.0,
            bottom_value: 200.0,
            ..Default::default()
        };
        assert_eq!(
            args.validate(),
            Err(ConfigError::CrossedValues {
                top: 600.0,
                bottom: 200.0,
            })
        );

        let touching = RheostatArgs {
            top_value: 200.0,
            bottom_value: 200.0,
            ..Default::default()
        };
        assert!(touching.validate().is_ok());
    }

    #[test]
    fn caps_value_precision() {
        let args = RheostatArgs {
            value_precision: MAX_VALUE_PRECISION,
            ..Default::default()
        };
        assert!(args.validate().is_ok());

        let args = RheostatArgs {
            value_precision: 309,
            ..Default::default()
        };
        assert_eq!(args.validate(), Err(ConfigError::PrecisionTooLarge(309)));
    }

    #[test]
    fn rejects_track_shorter_than_handle() {
        let args = RheostatArgs {
            rheostat_height: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            args.validate(),
            Err(ConfigError::TrackTooShort { .. })
        ));
    }
}
