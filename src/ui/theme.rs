use serde::{Deserialize, Serialize};

/// Centralized visual and interaction constants.
///
/// One theme per `Screen`. Widgets read colors from it at construction
/// time; scrolling and handle behavior read the interaction constants on
/// every event. Loadable from RON (see `loading::load_theme`); missing
/// fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // -- Color palette (sRGB RGBA) --
    /// Panel background: #C6C6C6 (vanilla inventory grey)
    pub panel_bg: [f32; 4],
    /// Dark text: #404040
    pub text_dark: [f32; 4],
    /// Light text: #E0E0E0
    pub text_light: [f32; 4],
    /// Button background: #6F6F6F
    pub button_bg: [f32; 4],
    /// Slot background: #8B8B8B
    pub slot_bg: [f32; 4],
    /// Scrollbar track: #373737 at 60% alpha
    pub scrollbar_track: [f32; 4],
    /// Scrollbar thumb: #FFFFFF at 80% alpha
    pub scrollbar_thumb: [f32; 4],
    /// Close/move/resize handle color: #555555
    pub handle_color: [f32; 4],

    // -- Spacing defaults --
    /// Default panel padding in pixels.
    pub panel_padding: i32,
    /// Close/move/resize handle edge length in pixels.
    pub handle_size: i32,

    // -- Scrolling --
    /// Scrollbar thickness in pixels. Reserved from the container's inner
    /// size while the scrollbar is visible.
    pub scrollbar_thickness: i32,
    /// Minimum thumb length in pixels.
    pub min_thumb_length: i32,
    /// Pixels scrolled per wheel notch.
    pub scroll_step: i32,
    /// Multiplier applied to `scroll_step` while shift or ctrl is held.
    pub coarse_scroll_multiplier: i32,

    // -- Input --
    /// Frames within which a second click on the same widget is a double click.
    pub double_click_frames: u64,
}

/// Convert a hex color (#RRGGBB) to sRGB [f32; 4] with alpha 1.0.
pub const fn hex(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Convert a hex color with custom alpha.
pub const fn hex_a(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_bg: hex(0xC6, 0xC6, 0xC6),
            text_dark: hex(0x40, 0x40, 0x40),
            text_light: hex(0xE0, 0xE0, 0xE0),
            button_bg: hex(0x6F, 0x6F, 0x6F),
            slot_bg: hex(0x8B, 0x8B, 0x8B),
            scrollbar_track: hex_a(0x37, 0x37, 0x37, 0.6),
            scrollbar_thumb: hex_a(0xFF, 0xFF, 0xFF, 0.8),
            handle_color: hex(0x55, 0x55, 0x55),

            panel_padding: 4,
            handle_size: 5,

            scrollbar_thickness: 6,
            min_thumb_length: 8,
            scroll_step: 10,
            coarse_scroll_multiplier: 5,

            double_click_frames: 10,
        }
    }
}
