use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub accent: ColorSpec,
    pub banner: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
}

/// Serializable RGB color.
///
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
    ColorSpec { r, g, b }
}

impl ColorSpec {
    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl Theme {
    /// Get the default theme (Dawn).
    ///
    pub fn default() -> Self {
        Self::dawn()
    }

    /// Light sand palette with a green primary.
    ///
    pub fn dawn() -> Self {
        Theme {
            name: "dawn".to_string(),
            primary: rgb(0, 122, 94),
            accent: rgb(193, 39, 45),
            banner: rgb(0, 122, 94),
            text: rgb(60, 56, 54),
            text_muted: rgb(146, 131, 116),
            success: rgb(40, 140, 80),
            warning: rgb(215, 153, 33),
            error: rgb(204, 36, 29),
            border_active: rgb(0, 122, 94),
            border_normal: rgb(189, 174, 147),
            highlight_bg: rgb(235, 219, 178),
            highlight_fg: rgb(40, 40, 40),
        }
    }

    /// Muted purple palette for dark terminals.
    ///
    pub fn dusk() -> Self {
        Theme {
            name: "dusk".to_string(),
            primary: rgb(196, 167, 231),
            accent: rgb(235, 188, 186),
            banner: rgb(235, 111, 146),
            text: rgb(224, 222, 244),
            text_muted: rgb(110, 106, 134),
            success: rgb(156, 207, 216),
            warning: rgb(246, 193, 119),
            error: rgb(235, 111, 146),
            border_active: rgb(196, 167, 231),
            border_normal: rgb(82, 79, 103),
            highlight_bg: rgb(57, 53, 82),
            highlight_fg: rgb(224, 222, 244),
        }
    }

    /// High contrast blue palette for dark terminals.
    ///
    pub fn night() -> Self {
        Theme {
            name: "night".to_string(),
            primary: rgb(122, 162, 247),
            accent: rgb(187, 154, 247),
            banner: rgb(125, 207, 255),
            text: rgb(192, 202, 245),
            text_muted: rgb(86, 95, 137),
            success: rgb(158, 206, 106),
            warning: rgb(224, 175, 104),
            error: rgb(247, 118, 142),
            border_active: rgb(122, 162, 247),
            border_normal: rgb(59, 66, 97),
            highlight_bg: rgb(41, 46, 66),
            highlight_fg: rgb(192, 202, 245),
        }
    }

    /// Get theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dawn" => Some(Self::dawn()),
            "dusk" => Some(Self::dusk()),
            "night" => Some(Self::night()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        vec!["dawn".to_string(), "dusk".to_string(), "night".to_string()]
    }
}
