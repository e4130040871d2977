//! Track geometry: conversions between percentages, track positions and
//! handle offsets.
//!
//! Three coordinate spaces are involved:
//!
//! - **percentage**: `0..=100`, measured from the end of the track that shows
//!   the domain minimum;
//! - **position**: the same quantity in track units (`0..=track_size`);
//! - **offset**: what a renderer translates each handle by. The top handle
//!   rests at the leading edge and moves in `[0, track_size]`; the bottom
//!   handle rests at the trailing edge and moves in `[-track_size, 0]`.
//!
//! Which edge shows the domain minimum depends on the `flipped` flag. When
//! not flipped the minimum sits at the trailing edge, so a top handle at
//! offset `0` shows the maximum.

use crate::{error::ConfigError, handle::Handle};

/// Length of the usable track and the size of the handles riding on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    track_size: f64,
    handle_size: f64,
}

impl TrackGeometry {
    /// `track_size = track_length - handle_size`, which must be positive.
    pub fn new(track_length: f64, handle_size: f64) -> Result<Self, ConfigError> {
        let fits = track_length.is_finite() && handle_size >= 0.0 && track_length > handle_size;
        if !fits {
            return Err(ConfigError::TrackTooShort {
                length: track_length,
                handle_size,
            });
        }
        Ok(Self {
            track_size: track_length - handle_size,
            handle_size,
        })
    }

    pub fn track_size(&self) -> f64 {
        self.track_size
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Converts a percentage to track units.
    pub fn to_offset(&self, percentage: f64) -> f64 {
        percentage * self.track_size / 100.0
    }

    /// Converts track units to a percentage.
    pub fn to_percentage(&self, distance: f64) -> f64 {
        distance / self.track_size * 100.0
    }

    /// Clamps an offset into the range the handle may occupy.
    pub fn clamp(&self, handle: Handle, offset: f64) -> f64 {
        match handle {
            Handle::Top => offset.clamp(0.0, self.track_size),
            Handle::Bottom => offset.clamp(-self.track_size, 0.0),
        }
    }

    /// Distance of a handle from the domain-minimum end, in track units.
    pub fn position(&self, handle: Handle, offset: f64, flipped: bool) -> f64 {
        let travelled = offset.abs();
        match (handle, flipped) {
            (Handle::Top, true) | (Handle::Bottom, false) => travelled,
            (Handle::Top, false) | (Handle::Bottom, true) => self.track_size - travelled,
        }
    }

    /// Inverse of [`TrackGeometry::position`].
    pub fn offset_at(&self, handle: Handle, position: f64, flipped: bool) -> f64 {
        match (handle, flipped) {
            (Handle::Top, true) => position,
            (Handle::Top, false) => self.track_size - position,
            (Handle::Bottom, true) => -(self.track_size - position),
            (Handle::Bottom, false) => -position,
        }
    }

    /// Percentage a handle offset represents.
    pub fn percentage(&self, handle: Handle, offset: f64, flipped: bool) -> f64 {
        self.to_percentage(self.position(handle, offset, flipped))
    }

    /// Offset that places a handle at `percentage`.
    pub fn offset_for_percentage(&self, handle: Handle, percentage: f64, flipped: bool) -> f64 {
        self.offset_at(handle, self.to_offset(percentage), flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> TrackGeometry {
        TrackGeometry::new(600.0, 20.0).unwrap()
    }

    #[test]
    fn track_size_excludes_handle() {
        let geometry = TrackGeometry::new(400.0, 30.0).unwrap();
        assert_eq!(geometry.track_size(), 370.0);
        assert_eq!(geometry.handle_size(), 30.0);
    }

    #[test]
    fn rejects_handles_that_fill_the_track() {
        assert_eq!(
            TrackGeometry::new(20.0, 20.0),
            Err(ConfigError::TrackTooShort {
                length: 20.0,
                handle_size: 20.0,
            })
        );
        assert!(TrackGeometry::new(f64::NAN, 20.0).is_err());
        assert!(TrackGeometry::new(100.0, -1.0).is_err());
    }

    #[test]
    fn percentage_and_offset_are_inverse() {
        let geometry = geometry();
        assert_eq!(geometry.to_offset(50.0), 290.0);
        assert_eq!(geometry.to_percentage(290.0), 50.0);
    }

    #[test]
    fn clamps_each_handle_into_its_domain() {
        let geometry = geometry();
        assert_eq!(geometry.clamp(Handle::Top, -5.0), 0.0);
        assert_eq!(geometry.clamp(Handle::Top, 900.0), 580.0);
        assert_eq!(geometry.clamp(Handle::Bottom, 5.0), 0.0);
        assert_eq!(geometry.clamp(Handle::Bottom, -900.0), -580.0);
    }

    #[test]
    fn unflipped_minimum_sits_at_trailing_edge() {
        let geometry = geometry();
        assert_eq!(geometry.offset_for_percentage(Handle::Top, 0.0, false), 580.0);
        assert_eq!(geometry.offset_for_percentage(Handle::Bottom, 100.0, false), -580.0);
        assert_eq!(geometry.percentage(Handle::Top, 580.0, false), 0.0);
        assert_eq!(geometry.percentage(Handle::Bottom, -580.0, false), 100.0);
    }

    #[test]
    fn flipped_minimum_sits_at_leading_edge() {
        let geometry = geometry();
        assert_eq!(geometry.offset_for_percentage(Handle::Top, 0.0, true), 0.0);
        assert_eq!(geometry.offset_for_percentage(Handle::Bottom, 100.0, true), 0.0);
        assert_eq!(geometry.percentage(Handle::Bottom, -580.0, true), 0.0);
    }

    #[test]
    fn position_round_trips_for_every_orientation() {
        let geometry = geometry();
        for handle in Handle::ALL {
            for flipped in [false, true] {
                let offset = geometry.offset_at(handle, 145.0, flipped);
                assert_eq!(geometry.clamp(handle, offset), offset);
                assert_eq!(geometry.position(handle, offset, flipped), 145.0);
            }
        }
    }
}
