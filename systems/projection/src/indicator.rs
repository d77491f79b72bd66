//! Projection of a world target onto the attitude instrument.

use glam::{DVec3, Quat, Vec3};
use navsurvey_core::BodyId;

/// Default distance of the marker from the instrument center.
pub const DEFAULT_MARKER_RADIUS: f32 = 0.4;

/// Local transform of the marker for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorFrame {
    /// Marker position in the instrument's local frame.
    pub local_position: Vec3,
    /// Whether the marker should be drawn.
    pub visible: bool,
}

impl IndicatorFrame {
    /// Frame used when nothing should be shown.
    pub const HIDDEN: Self = Self {
        local_position: Vec3::ZERO,
        visible: false,
    };
}

/// Per-tick observer data supplied by the flight host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverContext {
    /// Body the observer is currently orbiting or landed on.
    pub body: BodyId,
    /// Observer position in world space.
    pub position: DVec3,
    /// Rotation from world space into the instrument's local frame.
    pub attitude: Quat,
}

/// Maps world-space targets onto the spherical instrument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorProjector {
    marker_radius: f32,
}

impl Default for IndicatorProjector {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_RADIUS)
    }
}

impl IndicatorProjector {
    /// Creates a projector placing markers `marker_radius` units from the
    /// instrument center.
    #[must_use]
    pub const fn new(marker_radius: f32) -> Self {
        Self { marker_radius }
    }

    /// Distance of projected markers from the instrument center.
    #[must_use]
    pub const fn marker_radius(&self) -> f32 {
        self.marker_radius
    }

    /// Projects `target` as seen from `observer` under `attitude`.
    ///
    /// The marker is visible only when the indicator is active, the observer
    /// shares the target's body and the projected point lies strictly on the
    /// instrument's front hemisphere. Coincident positions produce a hidden
    /// marker at the instrument center.
    #[must_use]
    pub fn project(
        &self,
        target: DVec3,
        observer: DVec3,
        attitude: Quat,
        shares_body: bool,
        active: bool,
    ) -> IndicatorFrame {
        let direction = (target - observer).normalize_or_zero().as_vec3();
        let local_position = attitude * direction * self.marker_radius;

        IndicatorFrame {
            local_position,
            visible: active && shares_body && local_position.z > 0.0,
        }
    }

    /// Projects `target` on `target_body` for an observer context.
    #[must_use]
    pub fn project_for(
        &self,
        target: DVec3,
        target_body: BodyId,
        observer: &ObserverContext,
        active: bool,
    ) -> IndicatorFrame {
        self.project(
            target,
            observer.position,
            observer.attitude,
            observer.body == target_body,
            active,
        )
    }
}
