//! Marker visuals and the host capability that draws them.

use glam::{Quat, Vec3};

/// Edge length in pixels of the texture substituted for missing assets.
pub const PLACEHOLDER_SIZE: u32 = 16;

/// RGBA color used to tint markers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the untinted marker color.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque green used for the launch-site marker.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque magenta filling placeholder textures.
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Visual variants a marker can display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MarkerTexture {
    /// Generic waypoint glyph.
    #[default]
    Default,
    /// Aircraft glyph.
    Plane,
    /// Ground vehicle glyph.
    Rover,
}

impl MarkerTexture {
    /// Every variant in loading order.
    pub const ALL: [Self; 3] = [Self::Default, Self::Plane, Self::Rover];

    /// Resolves a variant by name, falling back to [`MarkerTexture::Default`]
    /// for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Canonical lowercase name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Plane => "plane",
            Self::Rover => "rover",
        }
    }

    /// Asset path the texture is loaded from, relative to the asset root.
    #[must_use]
    pub const fn asset_path(self) -> &'static str {
        match self {
            Self::Default => "markers/default.png",
            Self::Plane => "markers/plane.png",
            Self::Rover => "markers/rover.png",
        }
    }
}

/// Capability the host provides for drawing a marker on the attitude
/// instrument.
///
/// Markers are created as children of the instrument so that local
/// transforms are expressed in the instrument's frame.
pub trait MarkerBackend {
    /// Host texture handle.
    type Texture: Clone;
    /// Host marker handle.
    type Marker;

    /// Creates a marker parented to the instrument.
    fn create_marker(&mut self) -> Self::Marker;

    /// Replaces the marker's texture.
    fn set_texture(&mut self, marker: &Self::Marker, texture: &Self::Texture);

    /// Replaces the marker's tint.
    fn set_tint(&mut self, marker: &Self::Marker, tint: Color);

    /// Moves the marker within the instrument's local frame.
    fn set_local_position(&mut self, marker: &Self::Marker, position: Vec3);

    /// Orients the marker within the instrument's local frame.
    fn set_local_rotation(&mut self, marker: &Self::Marker, rotation: Quat);

    /// Shows or hides the marker.
    fn set_visible(&mut self, marker: &Self::Marker, visible: bool);
}

/// Owned table of the textures for every [`MarkerTexture`] variant.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerTextures<T> {
    default: T,
    plane: T,
    rover: T,
}

impl<T: Clone> MarkerTextures<T> {
    /// Builds the table from one texture per variant.
    #[must_use]
    pub const fn new(default: T, plane: T, rover: T) -> Self {
        Self {
            default,
            plane,
            rover,
        }
    }

    /// Loads every variant through `loader`.
    ///
    /// Variants the loader cannot provide are replaced by a magenta
    /// [`PLACEHOLDER_SIZE`] square built once through `placeholder`.
    pub fn load(
        mut loader: impl FnMut(MarkerTexture) -> Option<T>,
        mut placeholder: impl FnMut(u32, Color) -> T,
    ) -> Self {
        let mut fallback: Option<T> = None;
        let mut resolve = |variant: MarkerTexture| -> T {
            if let Some(texture) = loader(variant) {
                return texture;
            }
            tracing::warn!(
                texture = variant.name(),
                path = variant.asset_path(),
                "marker texture missing; using placeholder"
            );
            fallback
                .get_or_insert_with(|| placeholder(PLACEHOLDER_SIZE, Color::MAGENTA))
                .clone()
        };

        let default = resolve(MarkerTexture::Default);
        let plane = resolve(MarkerTexture::Plane);
        let rover = resolve(MarkerTexture::Rover);
        Self::new(default, plane, rover)
    }

    /// Texture for `variant`.
    #[must_use]
    pub fn get(&self, variant: MarkerTexture) -> &T {
        match variant {
            MarkerTexture::Default => &self.default,
            MarkerTexture::Plane => &self.plane,
            MarkerTexture::Rover => &self.rover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Fake {
        Loaded(&'static str),
        Placeholder(u32, Color),
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(MarkerTexture::from_name("rover"), MarkerTexture::Rover);
        assert_eq!(MarkerTexture::from_name(" Plane "), MarkerTexture::Plane);
        assert_eq!(MarkerTexture::from_name("submarine"), MarkerTexture::Default);
        assert_eq!(MarkerTexture::from_name(""), MarkerTexture::Default);
    }

    #[test]
    fn loaded_textures_are_kept_per_variant() {
        let textures = MarkerTextures::load(
            |variant| Some(Fake::Loaded(variant.name())),
            |size, color| Fake::Placeholder(size, color),
        );
        assert_eq!(textures.get(MarkerTexture::Default), &Fake::Loaded("default"));
        assert_eq!(textures.get(MarkerTexture::Plane), &Fake::Loaded("plane"));
        assert_eq!(textures.get(MarkerTexture::Rover), &Fake::Loaded("rover"));
    }

    #[test]
    fn missing_textures_share_one_placeholder() {
        let mut built = 0;
        let textures = MarkerTextures::load(
            |variant| (variant == MarkerTexture::Plane).then_some(Fake::Loaded("plane")),
            |size, color| {
                built += 1;
                Fake::Placeholder(size, color)
            },
        );

        let placeholder = Fake::Placeholder(16, Color::MAGENTA);
        assert_eq!(textures.get(MarkerTexture::Default), &placeholder);
        assert_eq!(textures.get(MarkerTexture::Rover), &placeholder);
        assert_eq!(textures.get(MarkerTexture::Plane), &Fake::Loaded("plane"));
        assert_eq!(built, 1);
    }

    #[test]
    fn byte_colors_normalise_channels() {
        assert_eq!(Color::from_rgb_u8(0, 255, 0), Color::GREEN);
    }
}
