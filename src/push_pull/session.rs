use crate::push_pull::error::PushPullError;
use crate::push_pull::host::SceneHost;
use crate::push_pull::mover::{MovePlan, depth_change};
use crate::push_pull::scale::ScaleCompensator;
use crate::push_pull::selection::{Element, SelectionMode, normalize};
use crate::push_pull::settings::PushPullSettings;
use crate::push_pull::view::{CameraState, ViewKind};
use bevy::prelude::{Vec2, Vec3};
use tracing::debug;

/// State of one mouse press-to-release inside a hotkey hold.
#[derive(Debug, Clone)]
pub struct DragSession {
    anchor: Vec2,
    camera: CameraState,
    mode: SelectionMode,
    elements: Vec<Element>,
    initial_positions: Vec<Vec3>,
    plan: MovePlan,
    compensate: bool,
    scales: ScaleCompensator,
    sensitivity: f32,
    last_change: f32,
}

impl DragSession {
    /// Snapshots everything a drag needs. Nothing in the host is modified.
    pub fn begin<H: SceneHost + ?Sized>(
        host: &H,
        settings: &PushPullSettings,
        anchor: Vec2,
        compensate: bool,
    ) -> Result<Self, PushPullError> {
        let camera = host.viewport_camera().ok_or(PushPullError::NoViewport)?;
        let view = ViewKind::classify(&camera);

        let selection = normalize(host, &host.selection())?;

        let mut initial_positions = Vec::with_capacity(selection.elements.len());
        for element in &selection.elements {
            let position = host
                .world_position(element)
                .ok_or_else(|| PushPullError::MissingPosition(element.clone()))?;
            initial_positions.push(position);
        }

        let plan = match view {
            ViewKind::Orthographic => MovePlan::orthographic(
                camera.view_direction(),
                settings.ortho_speed,
                initial_positions.clone(),
            ),
            ViewKind::Perspective => {
                let bounds = host
                    .world_bounds(&selection.elements)
                    .ok_or(PushPullError::NoBounds)?;
                MovePlan::perspective(
                    camera.position(),
                    bounds.center(),
                    &initial_positions,
                    settings.min_depth_factor,
                )
            }
        };

        let scales = if compensate {
            ScaleCompensator::capture(host, selection.mode, view, &selection.elements)?
        } else {
            ScaleCompensator::default()
        };

        debug!(
            elements = selection.elements.len(),
            view = view.label(),
            compensate,
            "push/pull drag started"
        );

        Ok(Self {
            anchor,
            camera,
            mode: selection.mode,
            elements: selection.elements,
            initial_positions,
            plan,
            compensate,
            scales,
            sensitivity: settings.sensitivity,
            last_change: 0.0,
        })
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn view(&self) -> ViewKind {
        self.plan.view_kind()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn initial_positions(&self) -> &[Vec3] {
        &self.initial_positions
    }

    pub fn compensating(&self) -> bool {
        self.compensate
    }

    /// Depth change applied by the most recent [`DragSession::update`].
    pub fn last_change(&self) -> f32 {
        self.last_change
    }

    /// Moves (and rescales) the selection for the current pointer position.
    pub fn update<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer: Vec2,
    ) -> Result<f32, PushPullError> {
        let change = depth_change(self.anchor, pointer, self.sensitivity);
        let compensate = self.compensate && self.plan.view_kind() == ViewKind::Perspective;
        let targets = self.plan.targets(change, compensate);

        for (element, target) in self.elements.iter().zip(targets) {
            host.set_world_position(element, target)?;
        }
        if compensate {
            self.scales.apply(host, self.plan.depth_factor(change))?;
        }
        host.refresh();

        self.last_change = change;
        Ok(change)
    }
}
