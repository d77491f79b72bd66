//! Surface coordinate to world position resolution.

use glam::DVec3;
use navsurvey_core::{BodyFrame, BodyId, CelestialBody, SurfaceCoordinate, SurfaceResolver};

/// A surface coordinate with its terrain height resolved once.
///
/// Terrain queries can be expensive, so the height is captured when the point
/// is created and reused for every subsequent world-position lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    body: BodyId,
    coordinate: SurfaceCoordinate,
    direction: DVec3,
    reference_radius: f64,
    terrain_height: f64,
}

impl SurfacePoint {
    /// Resolves `coordinate` on `body`, querying the terrain model once.
    ///
    /// Heights below the reference radius (oceans) clamp to zero, as does a
    /// missing surface model.
    #[must_use]
    pub fn resolve(
        body: &CelestialBody,
        coordinate: SurfaceCoordinate,
        surface: Option<&dyn SurfaceResolver>,
    ) -> Self {
        let direction = coordinate.body_fixed_direction();
        let terrain_height = surface
            .map(|surface| clamp_height(surface.height_at(body.id, direction)))
            .unwrap_or(0.0);

        Self {
            body: body.id,
            coordinate,
            direction,
            reference_radius: body.radius,
            terrain_height,
        }
    }

    /// Body the point lies on.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Surface coordinate the point was resolved from.
    #[must_use]
    pub const fn coordinate(&self) -> SurfaceCoordinate {
        self.coordinate
    }

    /// Body-fixed unit direction from the body center.
    #[must_use]
    pub const fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Cached terrain height above the reference radius, never negative.
    #[must_use]
    pub const fn terrain_height(&self) -> f64 {
        self.terrain_height
    }

    /// Distance from the body center at `altitude` meters above terrain.
    #[must_use]
    pub fn radial_distance(&self, altitude: f64) -> f64 {
        self.reference_radius + self.terrain_height + altitude
    }

    /// Position relative to the body center in body-fixed axes.
    #[must_use]
    pub fn body_fixed_position(&self, altitude: f64) -> DVec3 {
        self.direction * self.radial_distance(altitude)
    }

    /// World position at `altitude` meters above terrain for the body's
    /// current placement.
    #[must_use]
    pub fn world_position(&self, frame: &BodyFrame, altitude: f64) -> DVec3 {
        frame.to_world(self.body_fixed_position(altitude))
    }
}

/// Resolves the world position of a surface coordinate in one step.
///
/// Prefer caching a [`SurfacePoint`] when the same coordinate is resolved
/// every tick.
#[must_use]
pub fn resolve_world_position(
    body: &CelestialBody,
    frame: &BodyFrame,
    coordinate: SurfaceCoordinate,
    altitude: f64,
    surface: Option<&dyn SurfaceResolver>,
) -> DVec3 {
    SurfacePoint::resolve(body, coordinate, surface).world_position(frame, altitude)
}

fn clamp_height(height: f64) -> f64 {
    if height.is_finite() {
        height.max(0.0)
    } else {
        0.0
    }
}
