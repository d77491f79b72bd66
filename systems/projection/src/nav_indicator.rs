//! Waypoint marker drawn on the attitude instrument.

use glam::{DVec3, EulerRot, Quat, Vec3};
use navsurvey_core::{BodyFrame, BodyId, CelestialBody, SurfaceCoordinate, SurfaceResolver};

use crate::{
    coordinates::SurfacePoint,
    indicator::{IndicatorFrame, IndicatorProjector, ObserverContext},
    marker::{Color, MarkerBackend, MarkerTexture, MarkerTextures},
};

/// Coordinate the indicator points at before any survey sets it up.
pub const LAUNCH_SITE: SurfaceCoordinate = SurfaceCoordinate::LAUNCH_SITE;

/// Altitude in meters above terrain of the launch-site marker.
pub const LAUNCH_SITE_ALTITUDE: f64 = 1.0;

/// Fixed orientation of the marker quad relative to the instrument.
#[must_use]
pub fn marker_facing() -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        180f32.to_radians(),
        90f32.to_radians(),
        180f32.to_radians(),
    )
}

/// Orientation the marker quad is created with, before the first frame
/// replaces it with [`marker_facing`].
#[must_use]
pub fn marker_rest_orientation() -> Quat {
    Quat::from_euler(EulerRot::YXZ, 180f32.to_radians(), 90f32.to_radians(), 0.0)
}

/// Snapshot of what the indicator currently points at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorState {
    /// Body hosting the target.
    pub body: BodyId,
    /// Target coordinate on the body.
    pub coordinate: SurfaceCoordinate,
    /// Terrain height captured at setup.
    pub terrain_height: f64,
    /// Altitude above terrain in meters.
    pub altitude: f64,
    /// Texture variant shown by the marker.
    pub texture: MarkerTexture,
    /// Tint applied to the marker.
    pub tint: Color,
    /// Whether the marker may be shown.
    pub active: bool,
}

/// Marker on the attitude instrument that tracks one surface target.
///
/// The indicator owns its host backend and borrows the shared texture table.
/// Call [`NavIndicator::tick`] once per frame to push the projected transform.
pub struct NavIndicator<'t, B: MarkerBackend> {
    backend: B,
    marker: B::Marker,
    textures: &'t MarkerTextures<B::Texture>,
    projector: IndicatorProjector,
    facing: Quat,
    point: SurfacePoint,
    altitude: f64,
    texture: MarkerTexture,
    tint: Color,
    active: bool,
}

impl<B> std::fmt::Debug for NavIndicator<'_, B>
where
    B: MarkerBackend,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavIndicator")
            .field("projector", &self.projector)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<'t, B: MarkerBackend> NavIndicator<'t, B> {
    /// Creates the marker and points it at the launch site on `home`.
    ///
    /// The marker starts with the default texture, a white tint and hidden.
    /// It is then set up on the launch site with the plane texture and a
    /// green tint, and left inactive.
    pub fn new(
        mut backend: B,
        textures: &'t MarkerTextures<B::Texture>,
        projector: IndicatorProjector,
        home: &CelestialBody,
        surface: Option<&dyn SurfaceResolver>,
    ) -> Self {
        let marker = backend.create_marker();
        backend.set_texture(&marker, textures.get(MarkerTexture::Default));
        backend.set_tint(&marker, Color::WHITE);
        backend.set_local_position(&marker, Vec3::ZERO);
        backend.set_local_rotation(&marker, marker_rest_orientation());
        backend.set_visible(&marker, false);

        let mut indicator = Self {
            backend,
            marker,
            textures,
            projector,
            facing: marker_facing(),
            point: SurfacePoint::resolve(home, LAUNCH_SITE, None),
            altitude: LAUNCH_SITE_ALTITUDE,
            texture: MarkerTexture::Default,
            tint: Color::WHITE,
            active: false,
        };
        indicator.setup(
            home,
            LAUNCH_SITE,
            LAUNCH_SITE_ALTITUDE,
            MarkerTexture::Plane,
            Color::GREEN,
            surface,
        );
        indicator.deactivate();
        indicator
    }

    /// Points the indicator at `coordinate` on `body`.
    ///
    /// The terrain height is queried once here and reused by every tick.
    /// Activation is left unchanged.
    pub fn setup(
        &mut self,
        body: &CelestialBody,
        coordinate: SurfaceCoordinate,
        altitude: f64,
        texture: MarkerTexture,
        tint: Color,
        surface: Option<&dyn SurfaceResolver>,
    ) {
        self.point = SurfacePoint::resolve(body, coordinate, surface);
        self.altitude = altitude;
        self.texture = texture;
        self.tint = tint;
        self.backend
            .set_texture(&self.marker, self.textures.get(texture));
        self.backend.set_tint(&self.marker, tint);

        tracing::debug!(
            body = %body.name,
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            terrain_height = self.point.terrain_height(),
            altitude,
            texture = texture.name(),
            "indicator set up"
        );
    }

    /// Allows the marker to be shown on subsequent ticks.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Hides the marker immediately and keeps it hidden until reactivated.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.backend.set_visible(&self.marker, false);
    }

    /// Whether the marker may be shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Current target and presentation.
    #[must_use]
    pub fn state(&self) -> IndicatorState {
        IndicatorState {
            body: self.point.body(),
            coordinate: self.point.coordinate(),
            terrain_height: self.point.terrain_height(),
            altitude: self.altitude,
            texture: self.texture,
            tint: self.tint,
            active: self.active,
        }
    }

    /// World position of the target for the body's current placement.
    #[must_use]
    pub fn target_position(&self, frame: &BodyFrame) -> DVec3 {
        self.point.world_position(frame, self.altitude)
    }

    /// Projects the target for this frame and pushes the result to the host.
    ///
    /// `target_frame` is the current placement of the target's body. Without
    /// an observer the marker is hidden and its transform is left untouched.
    pub fn tick(
        &mut self,
        observer: Option<&ObserverContext>,
        target_frame: &BodyFrame,
    ) -> IndicatorFrame {
        let Some(observer) = observer else {
            self.backend.set_visible(&self.marker, false);
            return IndicatorFrame::HIDDEN;
        };

        let frame = self.projector.project_for(
            self.target_position(target_frame),
            self.point.body(),
            observer,
            self.active,
        );
        self.backend
            .set_local_position(&self.marker, frame.local_position);
        self.backend.set_local_rotation(&self.marker, self.facing);
        self.backend.set_visible(&self.marker, frame.visible);
        frame
    }

    /// Host backend driving the marker.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the indicator and returns its backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}
