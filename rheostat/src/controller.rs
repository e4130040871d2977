//! # Range controller
//!
//! [`RangeController`] owns the two handle cells of a rheostat and keeps them
//! consistent with its [`RheostatArgs`]. It is the read model a renderer
//! positions handles from, and the entry point for every state change:
//!
//! - **gestures** ([`DragGesture`]): `begin`, any number of `change`s, then
//!   `finalize` (commit) or `cancel`. Each handle has an independent stream;
//!   two gestures may run on different threads at once.
//! - **controlled values** ([`RangeController::set_top_value`] and
//!   [`RangeController::set_bottom_value`]): re-derive one handle's offset
//!   from an externally supplied value. The value passed at mount counts as
//!   the first observation and is never re-applied.
//! - **orientation** ([`RangeController::set_flipped`]): swaps the end that
//!   shows the domain minimum while keeping both values.
//! - **reconfiguration** ([`RangeController::reconfigure`]): validates new
//!   arguments and re-derives both offsets from the current values.
//!
//! Whenever the derived value of a handle changes, listeners registered with
//! [`RangeController::subscribe`] and the frame mailbox returned by
//! [`RangeController::changes`] receive both values rounded to
//! `value_precision` decimal digits.
//!
//! ## Example
//!
//! ```
//! use rheostat::{Handle, RangeController, RheostatArgsBuilder};
//!
//! let args = RheostatArgsBuilder::default()
//!     .max_range(800.0)
//!     .bottom_value(800.0)
//!     .snapping_points(vec![0.0, 50.0, 100.0, 200.0, 300.0, 400.0, 800.0])
//!     .rheostat_height(430.0)
//!     .handle_size(30.0)
//!     .build()
//!     .unwrap();
//! let controller = RangeController::new(args).unwrap();
//!
//! let gesture = controller.gesture(Handle::Top);
//! gesture.begin();
//! gesture.change(-148.0);
//! gesture.finalize();
//!
//! assert_eq!(controller.selection().top_value, 300.0);
//! ```

use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    args::RheostatArgs,
    drag::{DragPolicy, DragResolver, DragStep, Range},
    error::ConfigError,
    geometry::TrackGeometry,
    handle::{Handle, HandleCell, HandleState},
    notify::{ChangeCallback, ChangeNotifier, Coalescer, RangeChange},
    scale::ScaleTransform,
    snap::SnapIndex,
};

/// Both domain values plus the policy flags they were produced under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelection {
    pub top_value: f64,
    pub bottom_value: f64,
    pub flipped: bool,
    pub should_snap: bool,
}

/// Lengths of the track segments outside the selection.
///
/// `leading` is measured from the edge the top handle rests against,
/// `trailing` from the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFill {
    pub leading: f64,
    pub trailing: f64,
    pub selected: f64,
}

/// A snap point as a renderer draws it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMark {
    pub value: f64,
    pub percentage: f64,
    /// Distance from the leading edge, in track units.
    pub offset: f64,
}

/// Validated arguments and everything derived from them.
struct Layout {
    args: RheostatArgs,
    geometry: TrackGeometry,
    snap: SnapIndex,
}

impl Layout {
    fn new(args: RheostatArgs) -> Result<Self, ConfigError> {
        let geometry = args.validate()?;
        let snap = SnapIndex::new(
            &args.snapping_points,
            &args.algorithm,
            args.min_range,
            args.max_range,
        );
        Ok(Self {
            args,
            geometry,
            snap,
        })
    }

    fn range(&self) -> Range {
        Range {
            min: self.args.min_range,
            max: self.args.max_range,
        }
    }

    fn resolver(&self) -> DragResolver<'_> {
        DragResolver::new(
            &self.geometry,
            &self.args.algorithm,
            &self.snap,
            self.range(),
            DragPolicy {
                should_snap: self.args.should_snap,
                flipped: self.args.flipped,
                handle_delta: self.args.handle_delta,
            },
        )
    }

    /// Clamps an externally supplied value into the domain.
    fn clamp_value(&self, handle: Handle, value: f64) -> f64 {
        let range = self.range();
        let clamped = if value.is_nan() {
            range.min
        } else {
            range.clamp(value)
        };
        if clamped.to_bits() != value.to_bits() {
            warn!(?handle, value, clamped, "value outside the domain was clamped");
        }
        clamped
    }

    fn offset_for_value(&self, handle: Handle, value: f64) -> f64 {
        let percentage = self
            .args
            .algorithm
            .position_of(value, self.args.min_range, self.args.max_range);
        self.geometry.clamp(
            handle,
            self.geometry
                .offset_for_percentage(handle, percentage, self.args.flipped),
        )
    }
}

struct Shared {
    layout: RwLock<Layout>,
    top: HandleCell,
    bottom: HandleCell,
    notifier: ChangeNotifier,
}

impl Shared {
    fn cell(&self, handle: Handle) -> &HandleCell {
        match handle {
            Handle::Top => &self.top,
            Handle::Bottom => &self.bottom,
        }
    }

    /// Must be called without holding the layout lock, so listeners may call
    /// back into the controller. Both values are read under the mailbox lock.
    fn emit(&self, precision: u32) {
        self.notifier.emit(|| RangeChange {
            top_value: round_to(self.top.value(), precision),
            bottom_value: round_to(self.bottom.value(), precision),
        });
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Tracks the last externally supplied value of one handle.
#[derive(Debug, Default)]
struct ControlledValue {
    observed: Option<f64>,
}

impl ControlledValue {
    /// Records `value` and reports whether the handle needs a re-sync. The
    /// first observation never does.
    fn observe(&mut self, value: f64) -> bool {
        match self.observed.replace(value) {
            None => false,
            Some(previous) => previous.to_bits() != value.to_bits(),
        }
    }
}

/// Gesture stream for one handle.
///
/// Cheap to clone and `Send`, so it can be handed to whatever thread
/// delivers pointer events. A gesture only writes its own handle's cell.
#[derive(Clone)]
pub struct DragGesture {
    shared: Arc<Shared>,
    handle: Handle,
}

impl DragGesture {
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Starts a gesture from the committed offset, discarding any movement
    /// left over from a gesture that never finished.
    pub fn begin(&self) {
        let precision = self.shared.layout.read().args.value_precision;
        if self.shared.cell(self.handle).revert() {
            self.shared.emit(precision);
        }
    }

    /// Applies the translation accumulated since [`DragGesture::begin`].
    pub fn change(&self, translation: f64) -> DragStep {
        let layout = self.shared.layout.read();
        let cell = self.shared.cell(self.handle);
        let moving = cell.snapshot();
        let other = self.shared.cell(self.handle.opposite()).snapshot();
        let step = layout
            .resolver()
            .resolve(self.handle, translation, &moving, &other);
        let changed = cell.update(step.offset, step.value);
        let precision = layout.args.value_precision;
        drop(layout);

        if changed {
            self.shared.emit(precision);
        }
        step
    }

    /// Commits the current offset. Finalizing twice commits the same offset.
    pub fn finalize(&self) -> f64 {
        let offset = self.shared.cell(self.handle).commit();
        debug!(handle = ?self.handle, offset, "gesture committed");
        offset
    }

    /// Abandons the gesture; the handle returns to its committed offset.
    pub fn cancel(&self) {
        let precision = self.shared.layout.read().args.value_precision;
        debug!(handle = ?self.handle, "gesture cancelled");
        if self.shared.cell(self.handle).revert() {
            self.shared.emit(precision);
        }
    }
}

impl fmt::Debug for DragGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragGesture")
            .field("handle", &self.handle)
            .field("state", &self.shared.cell(self.handle).snapshot())
            .finish()
    }
}

/// Owner of both handles of a rheostat.
pub struct RangeController {
    shared: Arc<Shared>,
    controlled_top: ControlledValue,
    controlled_bottom: ControlledValue,
}

impl RangeController {
    /// Validates `args` and places both handles at their initial values.
    pub fn new(args: RheostatArgs) -> Result<Self, ConfigError> {
        let layout = Layout::new(args)?;
        let top_value = layout.clamp_value(Handle::Top, layout.args.top_value);
        let bottom_value = layout.clamp_value(Handle::Bottom, layout.args.bottom_value);
        let top = HandleCell::new(layout.offset_for_value(Handle::Top, top_value), top_value);
        let bottom = HandleCell::new(
            layout.offset_for_value(Handle::Bottom, bottom_value),
            bottom_value,
        );
        debug!(
            top_value,
            bottom_value,
            track_size = layout.geometry.track_size(),
            flipped = layout.args.flipped,
            should_snap = layout.args.should_snap,
            "rheostat mounted"
        );

        let mut controlled_top = ControlledValue::default();
        let mut controlled_bottom = ControlledValue::default();
        controlled_top.observe(layout.args.top_value);
        controlled_bottom.observe(layout.args.bottom_value);

        Ok(Self {
            shared: Arc::new(Shared {
                layout: RwLock::new(layout),
                top,
                bottom,
                notifier: ChangeNotifier::default(),
            }),
            controlled_top,
            controlled_bottom,
        })
    }

    /// Arguments currently in effect, including the current orientation.
    pub fn args(&self) -> RheostatArgs {
        self.shared.layout.read().args.clone()
    }

    pub fn geometry(&self) -> TrackGeometry {
        self.shared.layout.read().geometry
    }

    pub fn gesture(&self, handle: Handle) -> DragGesture {
        DragGesture {
            shared: Arc::clone(&self.shared),
            handle,
        }
    }

    pub fn begin(&self, handle: Handle) {
        self.gesture(handle).begin();
    }

    pub fn change(&self, handle: Handle, translation: f64) -> DragStep {
        self.gesture(handle).change(translation)
    }

    pub fn finalize(&self, handle: Handle) -> f64 {
        self.gesture(handle).finalize()
    }

    pub fn cancel(&self, handle: Handle) {
        self.gesture(handle).cancel();
    }

    /// Observes the externally controlled top value.
    ///
    /// The value is clamped into the domain and to at most the bottom
    /// handle's committed value.
    ///
    /// Returns `true` if the handle was re-synchronized.
    pub fn set_top_value(&mut self, value: f64) -> bool {
        if !self.controlled_top.observe(value) {
            debug!(value, "top value unchanged, skipping re-sync");
            return false;
        }
        self.sync_value(Handle::Top, value);
        true
    }

    /// Observes the externally controlled bottom value.
    ///
    /// The value is clamped into the domain and to at least the top handle's
    /// committed value.
    ///
    /// Returns `true` if the handle was re-synchronized.
    pub fn set_bottom_value(&mut self, value: f64) -> bool {
        if !self.controlled_bottom.observe(value) {
            debug!(value, "bottom value unchanged, skipping re-sync");
            return false;
        }
        self.sync_value(Handle::Bottom, value);
        true
    }

    fn sync_value(&self, handle: Handle, value: f64) {
        let layout = self.shared.layout.read();
        let value = layout.clamp_value(handle, value);
        let other = self.shared.cell(handle.opposite()).committed_value();
        let ordered = match handle {
            Handle::Top => value.min(other),
            Handle::Bottom => value.max(other),
        };
        if ordered.to_bits() != value.to_bits() {
            warn!(?handle, value, ordered, "value crossing the other handle was clamped");
        }
        let value = ordered;
        let offset = layout.offset_for_value(handle, value);
        let changed = self.shared.cell(handle).reset(offset, value);
        let precision = layout.args.value_precision;
        drop(layout);

        debug!(?handle, value, offset, "controlled value re-synced");
        if changed {
            self.shared.emit(precision);
        }
    }

    /// Changes the orientation, keeping both handles at their current
    /// percentages. A gesture in flight stays uncommitted: its baseline moves
    /// with it and `cancel` still restores the pre-gesture value.
    pub fn set_flipped(&mut self, flipped: bool) {
        let mut layout = self.shared.layout.write();
        let previous = layout.args.flipped;
        if previous == flipped {
            return;
        }
        let geometry = layout.geometry;
        let reorient = |handle: Handle, offset: f64| {
            geometry.offset_at(handle, geometry.position(handle, offset, previous), flipped)
        };
        for handle in Handle::ALL {
            let cell = self.shared.cell(handle);
            cell.relocate(
                reorient(handle, cell.offset()),
                reorient(handle, cell.last_offset()),
            );
        }
        layout.args.flipped = flipped;
        debug!(flipped, "orientation changed");
    }

    /// Replaces the arguments. Current values are kept (clamped into the new
    /// domain); the arguments' initial values are ignored.
    ///
    /// On error the controller is left untouched.
    pub fn reconfigure(&mut self, args: RheostatArgs) -> Result<(), ConfigError> {
        let next = Layout::new(args)?;
        let mut layout = self.shared.layout.write();
        let mut changed = false;
        for handle in Handle::ALL {
            let cell = self.shared.cell(handle);
            let value = next.clamp_value(handle, cell.value());
            changed |= cell.reset(next.offset_for_value(handle, value), value);
        }
        *layout = next;
        let precision = layout.args.value_precision;
        debug!(
            track_size = layout.geometry.track_size(),
            snap_points = layout.snap.len(),
            "rheostat reconfigured"
        );
        drop(layout);

        if changed {
            self.shared.emit(precision);
        }
        Ok(())
    }

    pub fn subscribe(&self, callback: impl Into<ChangeCallback>) -> ChangeCallback {
        let callback = callback.into();
        self.shared.notifier.subscribe(callback.clone());
        callback
    }

    pub fn unsubscribe(&self, callback: &ChangeCallback) -> bool {
        self.shared.notifier.unsubscribe(callback)
    }

    /// Mailbox holding the newest unread change.
    pub fn changes(&self) -> Arc<Coalescer<RangeChange>> {
        self.shared.notifier.mailbox()
    }

    pub fn handle_state(&self, handle: Handle) -> HandleState {
        self.shared.cell(handle).snapshot()
    }

    pub fn selection(&self) -> RangeSelection {
        let layout = self.shared.layout.read();
        RangeSelection {
            top_value: self.shared.top.value(),
            bottom_value: self.shared.bottom.value(),
            flipped: layout.args.flipped,
            should_snap: layout.args.should_snap,
        }
    }

    pub fn fill(&self) -> TrackFill {
        let layout = self.shared.layout.read();
        let track_size = layout.geometry.track_size();
        let top = self.shared.top.offset().abs();
        let bottom = self.shared.bottom.offset().abs();
        let (leading, trailing) = if layout.args.flipped {
            (top, bottom)
        } else {
            (track_size - bottom, track_size - top)
        };
        TrackFill {
            leading,
            trailing,
            selected: (track_size - leading - trailing).max(0.0),
        }
    }

    /// Snap points that fall on the track.
    pub fn snap_marks(&self) -> Vec<SnapMark> {
        let layout = self.shared.layout.read();
        layout
            .snap
            .points()
            .iter()
            .zip(layout.snap.percentages())
            .filter(|(_, percentage)| (0.0..=100.0).contains(*percentage))
            .map(|(&value, &percentage)| SnapMark {
                value,
                percentage,
                offset: layout.geometry.offset_for_percentage(
                    Handle::Top,
                    percentage,
                    layout.args.flipped,
                ),
            })
            .collect()
    }
}

impl fmt::Debug for RangeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeController")
            .field("top", &self.shared.top.snapshot())
            .field("bottom", &self.shared.bottom.snapshot())
            .field("args", &self.shared.layout.read().args)
            .finish()
    }
}
