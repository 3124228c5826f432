//! Per-frame target positions for a push/pull drag.
//!
//! Every frame is computed from the press-time snapshot, so repeated drags
//! over the same pixel land on the same positions.

use crate::push_pull::view::ViewKind;
use bevy::prelude::{Vec2, Vec3};

/// Depth change for a pointer position, relative to the press anchor.
pub fn depth_change(anchor: Vec2, pointer: Vec2, sensitivity: f32) -> f32 {
    (pointer.x - anchor.x) * sensitivity
}

#[derive(Debug, Clone, PartialEq)]
pub enum MovePlan {
    /// Everything slides by the same vector along the view direction.
    Orthographic {
        view_direction: Vec3,
        speed: f32,
        initial: Vec<Vec3>,
    },
    /// The pivot slides along the camera ray through it; elements keep their
    /// offsets from the pivot, optionally scaled with the depth factor.
    Perspective {
        camera_position: Vec3,
        camera_to_pivot: Vec3,
        offsets: Vec<Vec3>,
        min_depth_factor: Option<f32>,
    },
}

impl MovePlan {
    pub fn orthographic(view_direction: Vec3, speed: f32, initial: Vec<Vec3>) -> Self {
        Self::Orthographic {
            view_direction,
            speed,
            initial,
        }
    }

    pub fn perspective(
        camera_position: Vec3,
        pivot: Vec3,
        initial: &[Vec3],
        min_depth_factor: Option<f32>,
    ) -> Self {
        Self::Perspective {
            camera_position,
            camera_to_pivot: pivot - camera_position,
            offsets: initial.iter().map(|p| *p - pivot).collect(),
            min_depth_factor,
        }
    }

    pub fn view_kind(&self) -> ViewKind {
        match self {
            Self::Orthographic { .. } => ViewKind::Orthographic,
            Self::Perspective { .. } => ViewKind::Perspective,
        }
    }

    /// Multiplier applied to the camera-to-pivot vector. Always 1 for
    /// orthographic plans.
    pub fn depth_factor(&self, change: f32) -> f32 {
        match self {
            Self::Orthographic { .. } => 1.0,
            Self::Perspective {
                min_depth_factor, ..
            } => {
                let depth = 1.0 + change;
                match min_depth_factor {
                    Some(min) => depth.max(*min),
                    None => depth,
                }
            }
        }
    }

    /// Absolute world positions for a depth change.
    pub fn targets(&self, change: f32, compensate: bool) -> Vec<Vec3> {
        match self {
            Self::Orthographic {
                view_direction,
                speed,
                initial,
            } => {
                let delta = *view_direction * change * *speed;
                initial.iter().map(|p| *p + delta).collect()
            }
            Self::Perspective {
                camera_position,
                camera_to_pivot,
                offsets,
                ..
            } => {
                let depth = self.depth_factor(change);
                let pivot = *camera_position + *camera_to_pivot * depth;
                let spread = if compensate { depth } else { 1.0 };
                offsets.iter().map(|offset| pivot + *offset * spread).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert_relative_eq!(actual.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(actual.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(actual.z, expected.z, epsilon = 1e-4);
    }

    #[rstest]
    #[case(Vec2::new(100.0, 50.0), Vec2::new(300.0, 10.0), 1.0)]
    #[case(Vec2::new(100.0, 50.0), Vec2::new(-100.0, 90.0), -1.0)]
    #[case(Vec2::new(100.0, 50.0), Vec2::new(100.0, 400.0), 0.0)]
    fn change_only_follows_horizontal_motion(
        #[case] anchor: Vec2,
        #[case] pointer: Vec2,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(depth_change(anchor, pointer, 0.005), expected);
    }

    #[test]
    fn orthographic_moves_everything_by_one_vector() {
        let plan = MovePlan::orthographic(Vec3::Y, 2.0, vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)]);
        let targets = plan.targets(0.5, true);
        assert_vec_eq(targets[0], Vec3::new(0.0, 1.0, 0.0));
        assert_vec_eq(targets[1], Vec3::new(1.0, 3.0, 3.0));
        assert_relative_eq!(plan.depth_factor(0.5), 1.0);
    }

    #[test]
    fn perspective_pushes_pivot_along_camera_ray() {
        let camera = Vec3::new(0.0, -10.0, 0.0);
        let initial = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let plan = MovePlan::perspective(camera, Vec3::ZERO, &initial, None);

        let pushed = plan.targets(1.0, false);
        assert_vec_eq(pushed[0], Vec3::new(-1.0, 10.0, 0.0));
        assert_vec_eq(pushed[1], Vec3::new(1.0, 10.0, 0.0));

        let compensated = plan.targets(1.0, true);
        assert_vec_eq(compensated[0], Vec3::new(-2.0, 10.0, 0.0));
        assert_vec_eq(compensated[1], Vec3::new(2.0, 10.0, 0.0));
    }

    #[test]
    fn pulling_past_the_camera_is_unclamped_by_default() {
        let plan = MovePlan::perspective(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), &[Vec3::new(0.0, 0.0, -4.0)], None);
        assert_relative_eq!(plan.depth_factor(-1.5), -0.5);
        assert_vec_eq(plan.targets(-1.5, false)[0], Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn min_depth_factor_stops_at_the_limit() {
        let plan = MovePlan::perspective(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -4.0),
            &[Vec3::new(0.0, 0.0, -4.0)],
            Some(0.25),
        );
        assert_relative_eq!(plan.depth_factor(-3.0), 0.25);
        assert_vec_eq(plan.targets(-3.0, false)[0], Vec3::new(0.0, 0.0, -1.0));
    }

    proptest! {
        #[test]
        fn zero_change_is_identity(
            points in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0), 1..8),
            cam in (-20.0f32..20.0, -20.0f32..20.0, -20.0f32..20.0),
            compensate in any::<bool>(),
        ) {
            let initial: Vec<Vec3> = points.iter().map(|(x, y, z)| Vec3::new(*x, *y, *z)).collect();
            let pivot = initial.iter().copied().sum::<Vec3>() / initial.len() as f32;
            let plan = MovePlan::perspective(Vec3::new(cam.0, cam.1, cam.2), pivot, &initial, None);
            for (target, start) in plan.targets(0.0, compensate).iter().zip(&initial) {
                prop_assert!(target.distance(*start) < 1e-3);
            }
        }

        #[test]
        fn orthographic_displacement_is_parallel_to_view(
            change in -5.0f32..5.0,
            dir in (-1.0f32..1.0, -1.0f32..1.0, 0.1f32..1.0),
        ) {
            let view = Vec3::new(dir.0, dir.1, dir.2).normalize();
            let plan = MovePlan::orthographic(view, 2.0, vec![Vec3::ONE]);
            let moved = plan.targets(change, false)[0] - Vec3::ONE;
            prop_assert!(moved.cross(view).length() < 1e-3);
            prop_assert!((moved.length() - change.abs() * 2.0).abs() < 1e-3);
        }

        #[test]
        fn compensated_pivot_stays_on_the_camera_ray(change in -0.9f32..4.0) {
            let camera = Vec3::new(1.0, -6.0, 2.0);
            let pivot = Vec3::new(0.5, 1.0, 0.0);
            let plan = MovePlan::perspective(camera, pivot, &[pivot + Vec3::X, pivot - Vec3::X], None);
            let targets = plan.targets(change, true);
            let mid = (targets[0] + targets[1]) * 0.5;
            let ray = (pivot - camera).normalize();
            prop_assert!((mid - camera).cross(ray).length() < 1e-3);
        }
    }
}
