use crate::push_pull::SETTINGS_PATH;
use crate::push_pull::activation::PushPullTool;
use crate::push_pull::selection::SelectionItem;
use crate::scene::Scene;
use crate::viewport::camera::{OrbitCameraState, UiInteractionState};
use crate::viewport::input::{PushPullBindings, ToolStatus};
use crate::viewport::keys::keycode_to_label;
use bevy::prelude::{Res, ResMut};
use bevy_egui::{EguiContexts, egui};
use std::path::Path;

pub fn ui_system(
    mut contexts: EguiContexts,
    mut scene: ResMut<Scene>,
    mut tool: ResMut<PushPullTool>,
    mut status: ResMut<ToolStatus>,
    mut ui_state: ResMut<UiInteractionState>,
    orbit: Res<OrbitCameraState>,
    bindings: Res<PushPullBindings>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("pushpull_top_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.heading("Push/Pull");
            ui.separator();
            ui.label(format!("Status: {}", status.message));
            ui.separator();
            ui.label(format!(
                "Tool: {} ({})",
                scene.tool(),
                tool.phase().label()
            ));
            ui.separator();
            ui.label(orbit.view.label());
            ui.separator();
            ui.small(format!(
                "Hold {} + LMB drag: push/pull, Ctrl: keep size, O: ortho, Ctrl+Z: undo. RMB rotate, MMB pan, wheel zoom.",
                keycode_to_label(bindings.hotkey)
            ));
        });
    });

    let side_panel_response = egui::SidePanel::left("pushpull_controls")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Selection");
            ui.horizontal(|ui| {
                if ui.button("Clear").clicked() {
                    scene.clear_selection();
                }
                if ui
                    .add_enabled(scene.undo_depth() > 0, egui::Button::new("Undo"))
                    .clicked()
                {
                    scene.undo();
                    status.message = "Undo".to_string();
                }
            });

            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| draw_outliner(ui, &mut scene));

            ui.separator();
            ui.heading("Settings");
            let mut settings = tool.settings().clone();
            let mut changed = false;
            changed |= ui
                .add(
                    egui::Slider::new(&mut settings.sensitivity, 0.0005..=0.05)
                        .logarithmic(true)
                        .text("Sensitivity"),
                )
                .changed();
            changed |= ui
                .add(egui::Slider::new(&mut settings.ortho_speed, 0.1..=10.0).text("Ortho speed"))
                .changed();
            ui.label(format!(
                "Keep-size modifier: {}",
                settings.compensate_modifier.label()
            ));
            if changed {
                tool.set_settings(settings);
            }

            if ui.button("Save Settings").clicked() {
                status.message = match tool.settings().save(Path::new(SETTINGS_PATH)) {
                    Ok(()) => format!("Settings saved to {SETTINGS_PATH}"),
                    Err(err) => format!("Save failed: {err}"),
                };
            }
        });

    ui_state.wants_pointer_input = ctx.wants_pointer_input();
    ui_state.wants_keyboard_input = ctx.wants_keyboard_input();
    ui_state.side_panel_width = side_panel_response.response.rect.width();
}

fn draw_outliner(ui: &mut egui::Ui, scene: &mut Scene) {
    let mut toggles = Vec::new();

    for object in scene.objects() {
        let item = SelectionItem::Object(object.name.clone());
        let mut selected = scene.is_selected(&item);
        let label = if object.is_transform {
            object.name.clone()
        } else {
            format!("{} (not movable)", object.name)
        };
        if ui.checkbox(&mut selected, label).changed() {
            toggles.push(item);
        }

        let Some(mesh) = &object.mesh else {
            continue;
        };
        ui.indent(format!("{}_components", object.name), |ui| {
            ui.collapsing(format!("Faces ({})", mesh.faces.len()), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for index in 0..mesh.faces.len() as u32 {
                        let item = SelectionItem::Face {
                            object: object.name.clone(),
                            index,
                        };
                        let mut on = scene.is_selected(&item);
                        if ui.toggle_value(&mut on, index.to_string()).changed() {
                            toggles.push(item);
                        }
                    }
                });
            });
            ui.collapsing(format!("Edges ({})", mesh.edges.len()), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for index in 0..mesh.edges.len() as u32 {
                        let item = SelectionItem::Edge {
                            object: object.name.clone(),
                            index,
                        };
                        let mut on = scene.is_selected(&item);
                        if ui.toggle_value(&mut on, index.to_string()).changed() {
                            toggles.push(item);
                        }
                    }
                });
            });
            ui.collapsing(format!("Vertices ({})", mesh.vertex_count()), |ui| {
                ui.horizontal_wrapped(|ui| {
                    for index in 0..mesh.vertex_count() as u32 {
                        let item = SelectionItem::Vertex {
                            object: object.name.clone(),
                            index,
                        };
                        let mut on = scene.is_selected(&item);
                        if ui.toggle_value(&mut on, index.to_string()).changed() {
                            toggles.push(item);
                        }
                    }
                });
            });
        });
    }

    for item in toggles {
        scene.toggle_selected(item);
    }
}
