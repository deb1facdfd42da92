//! Theme settings and presets.
//!
//! # Responsibility
//! - Hold the flat theme record that drives card and background styling.
//! - Publish the editor range limits and the preset bundles.
//!
//! # Invariants
//! - The model stores values as given; range limits are applied by editing
//!   surfaces through `ThemePatch::clamped`.
//! - Setting `preset` alone only changes the tag; `apply_preset` also resets
//!   the block-styling values to the preset bundle.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const BORDER_RADIUS_RANGE: RangeInclusive<u32> = 0..=30;
pub const SHADOW_OPACITY_RANGE: RangeInclusive<f64> = 0.0..=0.2;
pub const SHADOW_BLUR_RANGE: RangeInclusive<u32> = 0..=60;
pub const BUTTON_TRANSPARENCY_RANGE: RangeInclusive<f64> = 0.1..=1.0;
pub const BACKGROUND_BLUR_RANGE: RangeInclusive<u32> = 0..=20;
pub const BACKGROUND_OVERLAY_RANGE: RangeInclusive<f64> = 0.0..=0.9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Classic,
    Soft,
    Glass,
}

/// Block-styling values carried by a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetStyle {
    pub border_radius: u32,
    pub shadow_opacity: f64,
    pub shadow_blur: u32,
    pub button_transparency: f64,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [ThemePreset::Classic, ThemePreset::Soft, ThemePreset::Glass];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Soft => "soft",
            Self::Glass => "glass",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == normalized)
    }

    pub fn style(self) -> PresetStyle {
        match self {
            Self::Classic => PresetStyle {
                border_radius: 16,
                shadow_opacity: 0.05,
                shadow_blur: 20,
                button_transparency: 1.0,
            },
            Self::Soft => PresetStyle {
                border_radius: 24,
                shadow_opacity: 0.08,
                shadow_blur: 30,
                button_transparency: 1.0,
            },
            Self::Glass => PresetStyle {
                border_radius: 20,
                shadow_opacity: 0.1,
                shadow_blur: 40,
                button_transparency: 0.6,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Color,
    Image,
    Video,
    Gradient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTexture {
    #[default]
    None,
    Noise,
    Dots,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// Utility class used by the preview markup.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Sans => "font-sans",
            Self::Serif => "font-serif",
            Self::Mono => "font-mono",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub preset: ThemePreset,
    /// Card corner radius in px.
    pub border_radius: u32,
    pub shadow_opacity: f64,
    /// Shadow blur in px; `0` renders with the 20px fallback.
    pub shadow_blur: u32,
    /// Card background alpha; `1.0` is opaque.
    pub button_transparency: f64,
    pub font_header: FontFamily,
    pub font_body: FontFamily,
    pub background_type: BackgroundType,
    /// Hex color, media URL or CSS gradient depending on `background_type`.
    pub background_value: String,
    pub background_blur: u32,
    /// Dimmer alpha over image/video/gradient backgrounds.
    pub background_overlay_opacity: f64,
    pub background_texture: BackgroundTexture,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        let style = ThemePreset::Classic.style();
        Self {
            preset: ThemePreset::Classic,
            border_radius: style.border_radius,
            shadow_opacity: style.shadow_opacity,
            shadow_blur: style.shadow_blur,
            button_transparency: style.button_transparency,
            font_header: FontFamily::Sans,
            font_body: FontFamily::Sans,
            background_type: BackgroundType::Color,
            background_value: "#FFFFFF".to_string(),
            background_blur: 0,
            background_overlay_opacity: 0.0,
            background_texture: BackgroundTexture::None,
        }
    }
}

impl ThemeSettings {
    /// Switches to `preset` and resets block styling to its bundle.
    pub fn apply_preset(&mut self, preset: ThemePreset) {
        let style = preset.style();
        self.preset = preset;
        self.border_radius = style.border_radius;
        self.shadow_opacity = style.shadow_opacity;
        self.shadow_blur = style.shadow_blur;
        self.button_transparency = style.button_transparency;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePatch {
    pub preset: Option<ThemePreset>,
    pub border_radius: Option<u32>,
    pub shadow_opacity: Option<f64>,
    pub shadow_blur: Option<u32>,
    pub button_transparency: Option<f64>,
    pub font_header: Option<FontFamily>,
    pub font_body: Option<FontFamily>,
    pub background_type: Option<BackgroundType>,
    pub background_value: Option<String>,
    pub background_blur: Option<u32>,
    pub background_overlay_opacity: Option<f64>,
    pub background_texture: Option<BackgroundTexture>,
}

impl ThemePatch {
    pub fn apply_to(&self, theme: &mut ThemeSettings) {
        if let Some(preset) = self.preset {
            theme.preset = preset;
        }
        if let Some(value) = self.border_radius {
            theme.border_radius = value;
        }
        if let Some(value) = self.shadow_opacity {
            theme.shadow_opacity = value;
        }
        if let Some(value) = self.shadow_blur {
            theme.shadow_blur = value;
        }
        if let Some(value) = self.button_transparency {
            theme.button_transparency = value;
        }
        if let Some(value) = self.font_header {
            theme.font_header = value;
        }
        if let Some(value) = self.font_body {
            theme.font_body = value;
        }
        if let Some(value) = self.background_type {
            theme.background_type = value;
        }
        if let Some(value) = &self.background_value {
            theme.background_value.clone_from(value);
        }
        if let Some(value) = self.background_blur {
            theme.background_blur = value;
        }
        if let Some(value) = self.background_overlay_opacity {
            theme.background_overlay_opacity = value;
        }
        if let Some(value) = self.background_texture {
            theme.background_texture = value;
        }
    }

    /// Returns a copy with numeric values pinned to the editor ranges.
    pub fn clamped(&self) -> Self {
        Self {
            border_radius: self.border_radius.map(|v| clamp(v, &BORDER_RADIUS_RANGE)),
            shadow_opacity: self
                .shadow_opacity
                .map(|v| clamp_f64(v, &SHADOW_OPACITY_RANGE)),
            shadow_blur: self.shadow_blur.map(|v| clamp(v, &SHADOW_BLUR_RANGE)),
            button_transparency: self
                .button_transparency
                .map(|v| clamp_f64(v, &BUTTON_TRANSPARENCY_RANGE)),
            background_blur: self
                .background_blur
                .map(|v| clamp(v, &BACKGROUND_BLUR_RANGE)),
            background_overlay_opacity: self
                .background_overlay_opacity
                .map(|v| clamp_f64(v, &BACKGROUND_OVERLAY_RANGE)),
            ..self.clone()
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
