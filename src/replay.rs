//! Scripted hotkey/mouse gestures, run headless against a [`Scene`].

use crate::push_pull::activation::PushPullTool;
use crate::push_pull::host::SceneHost;
use crate::push_pull::settings::Modifiers;
use crate::scene::Scene;
use bevy::prelude::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GestureError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GestureStep {
    HotkeyPress,
    HotkeyRelease,
    Press {
        x: f32,
        y: f32,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
    },
    Drag {
        x: f32,
        y: f32,
    },
    Release,
    Undo,
    /// Switches the host tool directly, as a user clicking a toolbar would.
    SetTool(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gesture {
    pub steps: Vec<GestureStep>,
}

impl Gesture {
    pub fn load(path: &Path) -> Result<Self, GestureError> {
        let text = fs::read_to_string(path).map_err(|source| GestureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::de::from_str::<Self>(&text).map_err(|source| GestureError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Done,
    Moved(f32),
    Ignored,
    Failed(String),
}

pub fn run_gesture(
    scene: &mut Scene,
    tool: &mut PushPullTool,
    gesture: &Gesture,
) -> Vec<StepOutcome> {
    gesture
        .steps
        .iter()
        .map(|step| run_step(scene, tool, step))
        .collect()
}

fn run_step(scene: &mut Scene, tool: &mut PushPullTool, step: &GestureStep) -> StepOutcome {
    match step {
        GestureStep::HotkeyPress => {
            tool.activate(scene);
            StepOutcome::Done
        }
        GestureStep::HotkeyRelease => {
            tool.deactivate(scene);
            StepOutcome::Done
        }
        GestureStep::Press {
            x,
            y,
            ctrl,
            shift,
            alt,
        } => {
            if !tool.is_active() {
                return StepOutcome::Ignored;
            }
            let modifiers = Modifiers {
                ctrl: *ctrl,
                shift: *shift,
                alt: *alt,
            };
            match tool.press(scene, Vec2::new(*x, *y), modifiers) {
                Ok(()) => StepOutcome::Done,
                Err(err) => StepOutcome::Failed(err.to_string()),
            }
        }
        GestureStep::Drag { x, y } => match tool.drag(scene, Vec2::new(*x, *y)) {
            Ok(Some(change)) => StepOutcome::Moved(change),
            Ok(None) => StepOutcome::Ignored,
            Err(err) => StepOutcome::Failed(err.to_string()),
        },
        GestureStep::Release => {
            tool.release(scene);
            StepOutcome::Done
        }
        GestureStep::Undo => {
            if scene.undo() {
                StepOutcome::Done
            } else {
                StepOutcome::Ignored
            }
        }
        GestureStep::SetTool(name) => {
            scene.set_tool(name);
            StepOutcome::Done
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push_pull::TOOL_NAME;
    use crate::scene::file::demo_scene_file;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    const GESTURE: &str = r#"(
        steps: [
            Drag(x: 10.0, y: 0.0),
            HotkeyPress,
            Press(x: 100.0, y: 0.0, ctrl: true),
            Drag(x: 300.0, y: 0.0),
            Release,
            HotkeyRelease,
        ],
    )"#;

    #[test]
    fn gesture_file_runs_against_the_demo_scene() {
        let gesture: Gesture = ron::de::from_str(GESTURE).unwrap();
        let mut scene = demo_scene_file().into_scene().unwrap();
        let before = scene.object("crate_a").unwrap().transform;
        let mut tool = PushPullTool::default();

        let outcomes = run_gesture(&mut scene, &mut tool, &gesture);

        assert_eq!(outcomes[0], StepOutcome::Ignored);
        assert!(matches!(outcomes[3], StepOutcome::Moved(change) if (change - 1.0).abs() < 1e-5));
        assert_eq!(scene.tool(), "select");
        assert_eq!(scene.undo_depth(), 1);

        let after = scene.object("crate_a").unwrap().transform;
        assert_relative_eq!(after.scale.x, before.scale.x * 2.0, epsilon = 1e-4);
        assert!(after.translation.distance(before.translation) > 1.0);
    }

    #[test]
    fn press_outside_the_tool_is_ignored_and_undo_reports_emptiness() {
        let gesture = Gesture {
            steps: vec![
                GestureStep::Press {
                    x: 0.0,
                    y: 0.0,
                    ctrl: false,
                    shift: false,
                    alt: false,
                },
                GestureStep::Undo,
                GestureStep::SetTool("scale".into()),
                GestureStep::HotkeyPress,
            ],
        };
        let mut scene = demo_scene_file().into_scene().unwrap();
        let mut tool = PushPullTool::default();

        let outcomes = run_gesture(&mut scene, &mut tool, &gesture);

        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Ignored,
                StepOutcome::Ignored,
                StepOutcome::Done,
                StepOutcome::Done,
            ]
        );
        assert_eq!(scene.tool(), TOOL_NAME);
        assert_eq!(tool.former_tool(), Some("scale"));
    }

    #[test]
    fn failures_are_reported_per_step() {
        let gesture = Gesture {
            steps: vec![
                GestureStep::HotkeyPress,
                GestureStep::Press {
                    x: 0.0,
                    y: 0.0,
                    ctrl: false,
                    shift: false,
                    alt: false,
                },
            ],
        };
        let mut scene = demo_scene_file().into_scene().unwrap();
        scene.clear_selection();
        let mut tool = PushPullTool::default();

        let outcomes = run_gesture(&mut scene, &mut tool, &gesture);
        assert_eq!(
            outcomes[1],
            StepOutcome::Failed("nothing is selected".to_string())
        );
    }

    #[test]
    fn missing_gesture_file_names_the_path() {
        let err = Gesture::load(Path::new("no/such/gesture.ron")).unwrap_err();
        assert!(err.to_string().contains("no/such/gesture.ron"));
    }
}
