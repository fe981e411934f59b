use ratatui::style::Color;

/// Nord palette, reduced to the shades the form uses.
pub struct NordTheme {
    // Polar Night
    pub nord0: Color,
    pub nord1: Color,
    pub nord3: Color,

    // Snow Storm
    pub nord4: Color,
    pub nord5: Color,

    // Frost
    pub nord8: Color,
    pub nord10: Color,

    // Aurora
    pub nord11: Color,
    pub nord13: Color,
    pub nord14: Color,
}

impl Default for NordTheme {
    fn default() -> Self {
        Self {
            nord0: Color::Rgb(46, 52, 64),
            nord1: Color::Rgb(59, 66, 82),
            nord3: Color::Rgb(97, 110, 136),
            nord4: Color::Rgb(216, 222, 233),
            nord5: Color::Rgb(229, 233, 240),
            nord8: Color::Rgb(136, 192, 208),
            nord10: Color::Rgb(94, 129, 172),
            nord11: Color::Rgb(191, 97, 106),
            nord13: Color::Rgb(235, 203, 139),
            nord14: Color::Rgb(163, 190, 140),
        }
    }
}

impl NordTheme {
    // Semantic aliases
    pub fn bg(&self) -> Color {
        self.nord0
    }
    pub fn bg_secondary(&self) -> Color {
        self.nord1
    }
    pub fn muted(&self) -> Color {
        self.nord3
    }

    pub fn fg(&self) -> Color {
        self.nord4
    }
    pub fn fg_bright(&self) -> Color {
        self.nord5
    }

    pub fn frost_ice(&self) -> Color {
        self.nord8
    }
    pub fn frost_dark(&self) -> Color {
        self.nord10
    }

    pub fn red(&self) -> Color {
        self.nord11
    }
    pub fn yellow(&self) -> Color {
        self.nord13
    }
    pub fn green(&self) -> Color {
        self.nord14
    }
}
