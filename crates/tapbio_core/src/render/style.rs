//! Theme-derived styling rules for the preview.

use crate::model::block::Animation;
use crate::model::theme::{BackgroundTexture, BackgroundType, ThemePreset, ThemeSettings};

/// Blur used when `shadow_blur` is zero.
pub const FALLBACK_SHADOW_BLUR: u32 = 20;

const CLASSIC_BORDER: &str = "1px solid #e5e5e5";
const DARK_CARD_BACKGROUND: &str = "#1A1A1A";
const TIP_CARD_BACKGROUND: &str = "#f0fdf4";
const TIP_CARD_BORDER: &str = "1px solid #dcfce7";

/// Color scheme variant of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTone {
    /// Theme-tinted translucent white card.
    Surface,
    /// Dark, high-contrast card (countdown, contact card).
    Dark,
    /// Green tip-jar card.
    Tip,
}

/// Computed card style for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub tone: CardTone,
    pub radius_px: u32,
    pub shadow_blur_px: u32,
    pub shadow_opacity: f64,
    pub transparency: f64,
    /// `Some` only for the classic preset on surface cards.
    pub border: Option<&'static str>,
    /// Backdrop blur applied behind translucent cards.
    pub backdrop_blur: bool,
    /// Edge-to-edge media cards drop the inner padding.
    pub flush: bool,
}

impl CardStyle {
    pub fn for_theme(theme: &ThemeSettings, tone: CardTone) -> Self {
        let shadow_blur_px = if theme.shadow_blur == 0 {
            FALLBACK_SHADOW_BLUR
        } else {
            theme.shadow_blur
        };
        let border = match tone {
            CardTone::Tip => Some(TIP_CARD_BORDER),
            _ if theme.preset == ThemePreset::Classic => Some(CLASSIC_BORDER),
            _ => None,
        };
        Self {
            tone,
            radius_px: theme.border_radius,
            shadow_blur_px,
            shadow_opacity: theme.shadow_opacity,
            transparency: theme.button_transparency,
            border,
            backdrop_blur: theme.button_transparency < 1.0,
            flush: false,
        }
    }

    pub fn flush(mut self) -> Self {
        self.flush = true;
        self
    }

    pub fn background(&self) -> String {
        match self.tone {
            CardTone::Surface => format!("rgba(255, 255, 255, {})", self.transparency),
            CardTone::Dark => DARK_CARD_BACKGROUND.to_string(),
            CardTone::Tip => TIP_CARD_BACKGROUND.to_string(),
        }
    }

    /// Inline CSS declarations for the card element.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "border-radius:{}px;box-shadow:0 4px {}px rgba(0,0,0,{});background-color:{};",
            self.radius_px,
            self.shadow_blur_px,
            self.shadow_opacity,
            self.background()
        );
        css.push_str(&format!("border:{};", self.border.unwrap_or("none")));
        if self.backdrop_blur {
            css.push_str("backdrop-filter:blur(10px);-webkit-backdrop-filter:blur(10px);");
        }
        if self.tone == CardTone::Dark {
            css.push_str("color:white;");
        }
        if self.flush {
            css.push_str("padding:0;");
        }
        css
    }
}

/// Utility class for an emphasis animation.
pub fn animation_class(animation: Animation) -> Option<&'static str> {
    match animation {
        Animation::None => None,
        Animation::Pulse => Some("animate-pulse-slow"),
        Animation::Shake => Some("animate-shake-slow"),
        Animation::Glow => Some("animate-glow"),
    }
}

/// Blur and dimmer drawn over media/gradient backgrounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub blur_px: u32,
    pub dim_opacity: f64,
}

/// Page background layer.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundView {
    Color {
        color: String,
        texture: BackgroundTexture,
    },
    Image {
        src: String,
        overlay: Overlay,
    },
    Video {
        src: String,
        overlay: Overlay,
    },
    Gradient {
        css: String,
        overlay: Overlay,
    },
}

impl BackgroundView {
    pub fn for_theme(theme: &ThemeSettings) -> Self {
        let overlay = Overlay {
            blur_px: theme.background_blur,
            dim_opacity: theme.background_overlay_opacity,
        };
        let value = theme.background_value.clone();
        match theme.background_type {
            BackgroundType::Color => Self::Color {
                color: value,
                texture: theme.background_texture,
            },
            BackgroundType::Image => Self::Image {
                src: value,
                overlay,
            },
            BackgroundType::Video => Self::Video {
                src: value,
                overlay,
            },
            BackgroundType::Gradient => Self::Gradient {
                css: value,
                overlay,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackgroundView, CardStyle, CardTone, Overlay};
    use crate::model::theme::{BackgroundTexture, BackgroundType, ThemePreset, ThemeSettings};

    #[test]
    fn classic_surface_card_has_border_and_opaque_background() {
        let style = CardStyle::for_theme(&ThemeSettings::default(), CardTone::Surface);
        let css = style.to_css();

        assert!(css.contains("border-radius:16px;"));
        assert!(css.contains("box-shadow:0 4px 20px rgba(0,0,0,0.05);"));
        assert!(css.contains("background-color:rgba(255, 255, 255, 1);"));
        assert!(css.contains("border:1px solid #e5e5e5;"));
        assert!(!css.contains("backdrop-filter"));
    }

    #[test]
    fn translucent_soft_card_blurs_backdrop_without_border() {
        let theme = ThemeSettings {
            preset: ThemePreset::Soft,
            button_transparency: 0.5,
            shadow_blur: 0,
            ..ThemeSettings::default()
        };
        let style = CardStyle::for_theme(&theme, CardTone::Surface);

        assert_eq!(style.border, None);
        assert_eq!(style.shadow_blur_px, 20);
        assert!(style.to_css().contains("backdrop-filter:blur(10px);"));
    }

    #[test]
    fn background_overlay_only_for_media_and_gradients() {
        let mut theme = ThemeSettings {
            background_texture: BackgroundTexture::Dots,
            background_blur: 6,
            background_overlay_opacity: 0.4,
            ..ThemeSettings::default()
        };
        assert_eq!(
            BackgroundView::for_theme(&theme),
            BackgroundView::Color {
                color: "#FFFFFF".to_string(),
                texture: BackgroundTexture::Dots,
            }
        );

        theme.background_type = BackgroundType::Video;
        theme.background_value = "https://cdn.test/loop.mp4".to_string();
        assert_eq!(
            BackgroundView::for_theme(&theme),
            BackgroundView::Video {
                src: "https://cdn.test/loop.mp4".to_string(),
                overlay: Overlay {
                    blur_px: 6,
                    dim_opacity: 0.4,
                },
            }
        );
    }
}
