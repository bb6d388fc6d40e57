use ratatui::style::Color;

/// Gruvbox Material dark palette used by the demo
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey: Color,

    // Semantic colors
    pub banner: Color,
    pub banner_art: Color,
    pub indicator: Color,
    pub success: Color,
    pub warning: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey: Color::Rgb(0xa8, 0x99, 0x84),
            banner: Color::Rgb(0x1d, 0x20, 0x21),
            banner_art: Color::Rgb(0xd8, 0xa6, 0x57),
            indicator: Color::Rgb(0xd3, 0x86, 0x9b),
            success: Color::Rgb(0xa9, 0xb6, 0x65),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}
