//! Drag resolution.
//!
//! [`DragResolver`] turns the translation of one gesture step into a new
//! offset and domain value for the dragged handle. It never mutates state:
//! the caller decides where the returned [`DragStep`] is stored.
//!
//! ## Steps
//!
//! 1. The raw offset is the handle's committed offset plus the gesture
//!    translation, clamped to the handle's domain.
//! 2. In **free** mode the handles keep at least `handle_delta` track units
//!    apart. If the raw offset would close that gap the handle is placed
//!    exactly `handle_delta` away from the other one.
//! 3. In **snap** mode each handle is matched to its nearest snap point. The
//!    dragged handle settles on its nearest point, but never past the snap
//!    point just inside the other handle's nearest point.
//!
//! The other handle is always read at its committed offset, so a gesture on
//! one handle never observes a half-finished step of the other.
//!
//! Whatever the policy, the result never crosses the other handle: if it
//! would, the dragged handle is pinned onto the other handle's committed
//! position and takes the value shown there.

use tracing::trace;

use crate::{
    geometry::TrackGeometry,
    handle::{Handle, HandleState},
    scale::ScaleTransform,
    snap::SnapIndex,
};

/// Domain bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Per-step policy flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPolicy {
    pub should_snap: bool,
    pub flipped: bool,
    /// Minimum gap between the handles in free mode, in track units.
    pub handle_delta: f64,
}

/// How a step was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The raw offset was accepted.
    Free,
    /// The raw offset would have closed the minimum gap.
    Overlap,
    /// The handle settled on the snap point at this index.
    Snapped(usize),
    /// The handle would have crossed the other one and was pinned onto it.
    Pinned,
}

/// Outcome of one drag step for the dragged handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub handle: Handle,
    pub offset: f64,
    pub value: f64,
    pub resolution: Resolution,
}

/// Read-only view of everything a drag step depends on.
pub struct DragResolver<'a> {
    geometry: &'a TrackGeometry,
    scale: &'a dyn ScaleTransform,
    snap: &'a SnapIndex,
    range: Range,
    policy: DragPolicy,
}

impl<'a> DragResolver<'a> {
    pub fn new(
        geometry: &'a TrackGeometry,
        scale: &'a dyn ScaleTransform,
        snap: &'a SnapIndex,
        range: Range,
        policy: DragPolicy,
    ) -> Self {
        Self {
            geometry,
            scale,
            snap,
            range,
            policy,
        }
    }

    /// Resolves one step of a gesture on `handle`.
    ///
    /// `translation` is the displacement since the gesture began, not since
    /// the previous step.
    #[tracing::instrument(level = "trace", skip(self, moving, other))]
    pub fn resolve(
        &self,
        handle: Handle,
        translation: f64,
        moving: &HandleState,
        other: &HandleState,
    ) -> DragStep {
        // A non-finite translation would survive clamping and get committed.
        let translation = if translation.is_finite() {
            translation
        } else {
            trace!(?handle, translation, "ignoring non-finite translation");
            0.0
        };
        let raw = self
            .geometry
            .clamp(handle, moving.last_offset + translation);
        let step = if self.policy.should_snap && !self.snap.is_empty() {
            self.resolve_snapped(handle, raw, other)
        } else {
            self.resolve_free(handle, raw, other)
        };
        self.keep_order(step, other)
    }

    fn value_at_offset(&self, handle: Handle, offset: f64) -> f64 {
        let percentage = self
            .geometry
            .percentage(handle, offset, self.policy.flipped);
        self.scale.value_at(percentage, self.range.min, self.range.max)
    }

    fn resolve_free(&self, handle: Handle, raw: f64, other: &HandleState) -> DragStep {
        let flipped = self.policy.flipped;
        let delta = self.policy.handle_delta;
        let track_size = self.geometry.track_size();
        let moving_position = self.geometry.position(handle, raw, flipped);
        let other_position = self
            .geometry
            .position(handle.opposite(), other.last_offset, flipped);
        let (top_position, bottom_position) = match handle {
            Handle::Top => (moving_position, other_position),
            Handle::Bottom => (other_position, moving_position),
        };

        // Distances of each handle from the end it rests against.
        let distance_top = top_position;
        let distance_bottom = track_size - bottom_position;
        let overlapping = distance_top + delta + distance_bottom > track_size;

        let (offset, resolution) = if overlapping {
            let target = match handle {
                Handle::Top => bottom_position - delta,
                Handle::Bottom => top_position + delta,
            };
            let offset = self
                .geometry
                .clamp(handle, self.geometry.offset_at(handle, target, flipped));
            trace!(?handle, raw, offset, "free drag would close the handle gap");
            (offset, Resolution::Overlap)
        } else {
            (raw, Resolution::Free)
        };

        DragStep {
            handle,
            offset,
            value: self.value_at_offset(handle, offset),
            resolution,
        }
    }

    fn resolve_snapped(&self, handle: Handle, raw: f64, other: &HandleState) -> DragStep {
        let flipped = self.policy.flipped;
        let moving_percentage = self.geometry.percentage(handle, raw, flipped);
        let other_percentage = self
            .geometry
            .percentage(handle.opposite(), other.last_offset, flipped);
        let (Some(moving_nearest), Some(other_nearest)) = (
            self.snap.nearest_index(moving_percentage),
            self.snap.nearest_index(other_percentage),
        ) else {
            return self.resolve_free(handle, raw, other);
        };

        let nearest_point = self.snap.point(moving_nearest);
        let other_point = self.snap.point(other_nearest);
        let (index, target) = match handle {
            Handle::Top => {
                let bound = self.snap.last_index_below(other_point).unwrap_or(0);
                pick(bound, self.snap.point(bound), moving_nearest, nearest_point, f64::min)
            }
            Handle::Bottom => {
                let bound = self
                    .snap
                    .first_index_above(other_point)
                    .unwrap_or(moving_nearest);
                pick(bound, self.snap.point(bound), moving_nearest, nearest_point, f64::max)
            }
        };
        // Snap points outside the domain still settle on its bounds.
        let target = self.range.clamp(target);

        let percentage = self
            .scale
            .position_of(target, self.range.min, self.range.max);
        let offset = self.geometry.clamp(
            handle,
            self.geometry
                .offset_for_percentage(handle, percentage, flipped),
        );
        trace!(?handle, moving_percentage, target, index, "snapped drag step");

        DragStep {
            handle,
            offset,
            value: target,
            resolution: Resolution::Snapped(index),
        }
    }

    fn keep_order(&self, step: DragStep, other: &HandleState) -> DragStep {
        let flipped = self.policy.flipped;
        let position = self.geometry.position(step.handle, step.offset, flipped);
        let other_position = self
            .geometry
            .position(step.handle.opposite(), other.last_offset, flipped);
        let crossed = match step.handle {
            Handle::Top => position > other_position,
            Handle::Bottom => position < other_position,
        };
        if !crossed {
            return step;
        }

        trace!(handle = ?step.handle, position, other_position, "pinning handle onto its neighbour");
        let offset = self.geometry.clamp(
            step.handle,
            self.geometry.offset_at(step.handle, other_position, flipped),
        );
        DragStep {
            offset,
            value: self.value_at_offset(step.handle, offset),
            resolution: Resolution::Pinned,
            ..step
        }
    }
}

/// Chooses between the bound and the nearest snap point with `select`
/// (`min` or `max`), keeping the index that belongs to the chosen value.
fn pick(
    bound_index: usize,
    bound: f64,
    nearest_index: usize,
    nearest: f64,
    select: fn(f64, f64) -> f64,
) -> (usize, f64) {
    let target = select(bound, nearest);
    if target.to_bits() == nearest.to_bits() {
        (nearest_index, target)
    } else {
        (bound_index, target)
    }
}
