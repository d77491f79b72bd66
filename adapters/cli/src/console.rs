//! Marker backend that keeps the last pushed state for printing.

use std::path::Path;

use glam::{Quat, Vec3};
use navsurvey_system_projection::{Color, MarkerBackend, MarkerTexture};

/// Last state pushed to the console marker.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MarkerSnapshot {
    pub(crate) texture: String,
    pub(crate) tint: Color,
    pub(crate) local_position: Vec3,
    pub(crate) local_rotation: Quat,
    pub(crate) visible: bool,
}

/// Single-marker backend standing in for the attitude instrument.
#[derive(Debug)]
pub(crate) struct ConsoleBackend {
    created: u32,
    snapshot: MarkerSnapshot,
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self {
            created: 0,
            snapshot: MarkerSnapshot {
                texture: String::new(),
                tint: Color::WHITE,
                local_position: Vec3::ZERO,
                local_rotation: Quat::IDENTITY,
                visible: false,
            },
        }
    }
}

impl ConsoleBackend {
    pub(crate) fn snapshot(&self) -> &MarkerSnapshot {
        &self.snapshot
    }
}

impl MarkerBackend for ConsoleBackend {
    type Texture = String;
    type Marker = u32;

    fn create_marker(&mut self) -> u32 {
        self.created += 1;
        tracing::trace!(marker = self.created, "created console marker");
        self.created
    }

    fn set_texture(&mut self, _: &u32, texture: &String) {
        self.snapshot.texture.clone_from(texture);
    }

    fn set_tint(&mut self, _: &u32, tint: Color) {
        self.snapshot.tint = tint;
    }

    fn set_local_position(&mut self, _: &u32, position: Vec3) {
        self.snapshot.local_position = position;
    }

    fn set_local_rotation(&mut self, _: &u32, rotation: Quat) {
        self.snapshot.local_rotation = rotation;
    }

    fn set_visible(&mut self, _: &u32, visible: bool) {
        self.snapshot.visible = visible;
    }
}

/// Resolves a marker texture to a file under `root`.
///
/// Without a root the built-in asset path is used as the texture name.
pub(crate) fn texture_path(root: Option<&Path>, variant: MarkerTexture) -> Option<String> {
    let Some(root) = root else {
        return Some(variant.asset_path().to_owned());
    };

    let path = root.join(variant.asset_path());
    path.is_file().then(|| path.display().to_string())
}

/// Names the placeholder texture substituted for missing assets.
pub(crate) fn placeholder_texture(size: u32, _: Color) -> String {
    format!("placeholder {size}x{size}")
}
