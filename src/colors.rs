use crossterm::event::KeyCode;
use crossterm::style::Color;

// HUD palette
pub const PRIMARY: Color = Color::Rgb { r: 0, g: 242, b: 255 };
pub const SECONDARY: Color = Color::Rgb { r: 112, g: 0, b: 255 };
pub const DANGER: Color = Color::Rgb { r: 255, g: 0, b: 85 };
pub const WARNING: Color = Color::Rgb { r: 255, g: 170, b: 0 };
pub const ACCENT: Color = Color::Rgb { r: 251, g: 146, b: 60 };  // orange badges
pub const NODE: Color = Color::Rgb { r: 59, g: 130, b: 246 };
pub const TEXT: Color = Color::Rgb { r: 210, g: 225, b: 235 };
pub const MUTED: Color = Color::Rgb { r: 70, g: 90, b: 110 };
/// Flat globe color when no texture is available
pub const GLOBE_FALLBACK: Color = Color::Rgb { r: 40, g: 70, b: 110 };

/// Shared color scheme state
#[derive(Clone, Copy, Debug)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme }
    }

    /// Handle color scheme key input. Returns true if key was handled.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: pink
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: gold
            KeyCode::Char('%') => self.scheme = 5,  // Shift+5: matrix
            KeyCode::Char('&') => self.scheme = 7,  // Shift+7: mono
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: HUD cyan
            _ => return false,
        }
        true
    }

    /// Mono mode keeps semantic status colors
    pub fn is_mono(&self) -> bool {
        self.scheme == 7
    }
}

/// Get color from scheme based on intensity (0-3)
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        1 => match intensity {  // Red/Yellow (fire)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, bold),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {  // Blue/Cyan (ice)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, bold),
            _ => (Color::AnsiValue(14), true),
        },
        3 => match intensity {  // Magenta (pink)
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),
        },
        4 => match intensity {  // Gold
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, bold),
            _ => (Color::AnsiValue(11), true),
        },
        5 => match intensity {  // Green (matrix)
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),
        },
        7 => match intensity {  // White/Grey (mono)
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, bold),
            _ => (Color::White, true),
        },
        _ => match intensity {  // HUD cyan
            0 => (Color::Rgb { r: 10, g: 60, b: 90 }, false),
            1 => (Color::Rgb { r: 30, g: 120, b: 170 }, false),
            2 => (PRIMARY, bold),
            _ => (Color::Rgb { r: 200, g: 255, b: 255 }, true),
        },
    }
}

/// Map semantic status color to scheme color
pub fn status_to_scheme(scheme: u8, status: StatusColor) -> Color {
    if scheme == 7 || scheme == 0 {
        // HUD and mono keep the semantic palette
        match status {
            StatusColor::Good => Color::Rgb { r: 52, g: 211, b: 153 },
            StatusColor::Warning => WARNING,
            StatusColor::Critical => DANGER,
            StatusColor::Info => PRIMARY,
            StatusColor::Muted => MUTED,
        }
    } else {
        let intensity = match status {
            StatusColor::Muted => 0,
            StatusColor::Info => 1,
            StatusColor::Good => 2,
            StatusColor::Warning => 2,
            StatusColor::Critical => 3,
        };
        scheme_color(scheme, intensity, false).0
    }
}

/// Scale an RGB color toward black; named colors pass through
pub fn shade(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb { r, g, b } => {
            let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
            Color::Rgb { r: scale(r), g: scale(g), b: scale(b) }
        }
        other => other,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Good,
    Warning,
    Critical,
    Info,
    Muted,
}
