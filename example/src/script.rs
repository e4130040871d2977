//! Scripted gesture streams replayed against a [`RangeController`].

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rheostat::{Algorithm, Handle, RangeController, RheostatArgs, RheostatArgsBuilder};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub args: RheostatArgs,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// One gesture: `begin`, a `change` per translation, then `finalize`
    /// (or `cancel`).
    Drag {
        handle: Handle,
        translations: Vec<f64>,
        #[serde(default)]
        cancel: bool,
    },
    /// Externally controlled values, as a host would pass them down.
    SetValues {
        top: Option<f64>,
        bottom: Option<f64>,
    },
    Flip,
    Report,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&source).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// The demo app: snap points up to 800, an "update values" toggle and a
    /// "flip" toggle.
    pub fn demo() -> Result<Self> {
        let args = RheostatArgsBuilder::default()
            .min_range(0.0)
            .max_range(800.0)
            .top_value(0.0)
            .bottom_value(800.0)
            .rheostat_height(400.0)
            .rheostat_width(200.0)
            .handle_size(30.0)
            .handle_delta(5.0)
            .should_snap(true)
            .snapping_points(vec![0.0, 50.0, 100.0, 200.0, 300.0, 400.0, 800.0])
            .algorithm(Algorithm::Linear)
            .flipped(true)
            .build()?;
        let drag = |handle, translations: &[f64]| Step::Drag {
            handle,
            translations: translations.to_vec(),
            cancel: false,
        };

        Ok(Self {
            args,
            steps: vec![
                Step::Report,
                drag(Handle::Top, &[20.0, 60.0, 137.0]),
                drag(Handle::Bottom, &[-40.0, -120.0, -300.0]),
                Step::Report,
                Step::SetValues {
                    top: Some(200.0),
                    bottom: Some(300.0),
                },
                Step::Report,
                Step::Flip,
                drag(Handle::Bottom, &[-15.0, -90.0]),
                Step::Drag {
                    handle: Handle::Top,
                    translations: vec![-50.0],
                    cancel: true,
                },
                Step::Report,
                Step::SetValues {
                    top: Some(0.0),
                    bottom: Some(800.0),
                },
                Step::Flip,
                Step::Report,
            ],
        })
    }
}

pub fn run(controller: &mut RangeController, steps: &[Step]) {
    for step in steps {
        match step {
            Step::Drag {
                handle,
                translations,
                cancel,
            } => {
                let gesture = controller.gesture(*handle);
                gesture.begin();
                for &translation in translations {
                    let resolved = gesture.change(translation);
                    info!(
                        ?handle,
                        translation,
                        offset = resolved.offset,
                        value = resolved.value,
                        resolution = ?resolved.resolution,
                        "drag step"
                    );
                }
                if *cancel {
                    gesture.cancel();
                } else {
                    gesture.finalize();
                }
            }
            Step::SetValues { top, bottom } => {
                if let Some(top) = top {
                    controller.set_top_value(*top);
                }
                if let Some(bottom) = bottom {
                    controller.set_bottom_value(*bottom);
                }
            }
            Step::Flip => {
                let flipped = !controller.selection().flipped;
                controller.set_flipped(flipped);
            }
            Step::Report => report(controller),
        }
    }
}

fn report(controller: &RangeController) {
    let selection = controller.selection();
    let fill = controller.fill();
    let top = controller.handle_state(Handle::Top);
    let bottom = controller.handle_state(Handle::Bottom);
    info!(
        top_value = selection.top_value,
        bottom_value = selection.bottom_value,
        top_offset = top.offset,
        bottom_offset = bottom.offset,
        flipped = selection.flipped,
        "selection"
    );
    info!(
        leading = fill.leading,
        selected = fill.selected,
        trailing = fill.trailing,
        "track fill"
    );
    let marks: Vec<String> = controller
        .snap_marks()
        .iter()
        .map(|mark| format!("{}@{:.1}", mark.value, mark.offset))
        .collect();
    info!(marks = %marks.join(" "), "snap marks");
}
