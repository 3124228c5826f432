use crate::push_pull::activation::PushPullTool;
use crate::push_pull::settings::PushPullSettings;
use crate::scene::Scene;
use crate::viewport::camera::UiInteractionState;
use crate::viewport::keys::{held_modifiers, keycode_from_name};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

#[derive(Resource, Debug, Clone, Copy)]
pub struct PushPullBindings {
    pub hotkey: KeyCode,
}

impl PushPullBindings {
    pub fn from_settings(settings: &PushPullSettings) -> Self {
        let hotkey = keycode_from_name(&settings.hotkey).unwrap_or_else(|| {
            warn!(
                "Unknown push/pull hotkey '{}', using KeyB",
                settings.hotkey
            );
            KeyCode::KeyB
        });
        Self { hotkey }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ToolStatus {
    pub message: String,
}

impl Default for ToolStatus {
    fn default() -> Self {
        Self {
            message: "Ready".to_string(),
        }
    }
}

/// Hotkey hold arms the tool; left mouse drives the drag while armed.
pub fn push_pull_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    bindings: Res<PushPullBindings>,
    mut tool: ResMut<PushPullTool>,
    mut scene: ResMut<Scene>,
    mut status: ResMut<ToolStatus>,
) {
    if keys.just_pressed(bindings.hotkey) && !ui_state.wants_keyboard_input {
        tool.activate(&mut *scene);
        status.message = "Push/pull: drag left/right to pull/push".to_string();
    }

    if keys.just_released(bindings.hotkey) && tool.is_active() {
        tool.deactivate(&mut *scene);
        status.message = format!("Tool: {}", scene.tool());
        return;
    }

    if !tool.is_active() {
        let ctrl = held_modifiers(&keys).ctrl;
        if ctrl && keys.just_pressed(KeyCode::KeyZ) && !ui_state.wants_keyboard_input {
            status.message = if scene.undo() {
                "Undo".to_string()
            } else {
                "Nothing to undo".to_string()
            };
        }
        return;
    }

    let Some(pointer) = windows.single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };

    if mouse_buttons.just_pressed(MouseButton::Left) && !ui_state.wants_pointer_input {
        let modifiers = held_modifiers(&keys);
        status.message = match tool.press(&mut *scene, pointer, modifiers) {
            Ok(()) => match tool.session() {
                Some(session) => format!(
                    "Push/pull {} {} element(s){}",
                    session.view().label().to_lowercase(),
                    session.elements().len(),
                    if session.compensating() {
                        ", keeping size"
                    } else {
                        ""
                    }
                ),
                None => "Push/pull armed".to_string(),
            },
            Err(err) => format!("Push/pull: {err}"),
        };
    }

    if mouse_buttons.pressed(MouseButton::Left) {
        if let Err(err) = tool.drag(&mut *scene, pointer) {
            warn!("push/pull drag failed: {err}");
            status.message = format!("Push/pull: {err}");
            tool.release(&mut *scene);
        }
    }

    if mouse_buttons.just_released(MouseButton::Left) {
        tool.release(&mut *scene);
    }
}
