use crate::push_pull::error::PushPullError;
use crate::push_pull::host::SceneHost;
use crate::push_pull::selection::{Element, SelectionMode};
use crate::push_pull::settings::{Modifiers, PushPullSettings};
use crate::push_pull::view::ViewKind;
use bevy::prelude::Vec3;

/// Whether a drag should keep the apparent size of what it moves.
pub fn compensation_requested(
    settings: &PushPullSettings,
    modifiers: Modifiers,
    former_tool: Option<&str>,
) -> bool {
    settings.compensate_modifier.is_held(modifiers)
        || former_tool.is_some_and(|tool| settings.is_scale_tool(tool))
}

/// Press-time scales of the objects being pushed, rescaled by the depth
/// factor each frame so they keep their size on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleCompensator {
    initial: Vec<(String, Vec3)>,
}

impl ScaleCompensator {
    /// Captures object scales. Component selections and orthographic views
    /// never rescale anything.
    pub fn capture<H: SceneHost + ?Sized>(
        host: &H,
        mode: SelectionMode,
        view: ViewKind,
        elements: &[Element],
    ) -> Result<Self, PushPullError> {
        if mode != SelectionMode::Object || view != ViewKind::Perspective {
            return Ok(Self::default());
        }

        let mut initial = Vec::with_capacity(elements.len());
        for element in elements {
            if let Element::Object(name) = element {
                let scale = host
                    .local_scale(name)
                    .ok_or_else(|| PushPullError::MissingScale(name.clone()))?;
                initial.push((name.clone(), scale));
            }
        }
        Ok(Self { initial })
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    pub fn scales(&self, factor: f32) -> impl Iterator<Item = (&str, Vec3)> + '_ {
        self.initial
            .iter()
            .map(move |(name, scale)| (name.as_str(), *scale * factor))
    }

    pub fn apply<H: SceneHost + ?Sized>(
        &self,
        host: &mut H,
        factor: f32,
    ) -> Result<(), PushPullError> {
        for (name, scale) in self.scales(factor) {
            host.set_local_scale(name, scale)?;
        }
        Ok(())
    }
}
