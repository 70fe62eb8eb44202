use crate::colors::{scheme_color, ColorState, MUTED, PRIMARY, TEXT};
use crate::terminal::Terminal;
use crossterm::style::Color;

// Box drawing characters (HUD corners)
pub const BOX_TL: char = '┏';
pub const BOX_TR: char = '┓';
pub const BOX_BL: char = '┗';
pub const BOX_BR: char = '┛';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';

// Partial block characters for smooth meters (1/8 increments)
pub const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Cell rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Shrink by `n` cells on every side
    pub fn inset(&self, n: u16) -> Self {
        Self {
            x: self.x + n as i32,
            y: self.y + n as i32,
            width: self.width.saturating_sub(n * 2),
            height: self.height.saturating_sub(n * 2),
        }
    }

    /// Shrink by `n` cells on the left and right only
    pub fn inset_x(&self, n: u16) -> Self {
        Self {
            x: self.x + n as i32,
            width: self.width.saturating_sub(n * 2),
            ..*self
        }
    }

    /// Split into consecutive row bands of the given heights; the last band
    /// takes whatever is left
    pub fn split_rows(&self, heights: &[u16]) -> Vec<Rect> {
        let mut out = Vec::with_capacity(heights.len());
        let mut y = self.y;
        let mut remaining = self.height;
        for (i, &h) in heights.iter().enumerate() {
            let h = if i + 1 == heights.len() { remaining } else { h.min(remaining) };
            out.push(Rect::new(self.x, y, self.width, h));
            y += h as i32;
            remaining -= h;
        }
        out
    }
}

/// Section frame: open corners with the title set into the top edge
pub struct Panel {
    pub rect: Rect,
    pub title: String,
    pub title_color: Color,
    pub border_color: Color,
}

impl Panel {
    pub fn new(rect: Rect, title: &str) -> Self {
        Self {
            rect,
            title: title.to_string(),
            title_color: TEXT,
            border_color: MUTED,
        }
    }

    pub fn inner(&self) -> Rect {
        self.rect.inset(1)
    }

    pub fn draw(&self, term: &mut Terminal) {
        let r = self.rect;
        if r.width < 2 || r.height < 2 {
            return;
        }
        let bc = Some(self.border_color);
        let right = r.right() - 1;
        let bottom = r.bottom() - 1;

        term.set(r.x, r.y, BOX_TL, bc, false);
        term.set(right, r.y, BOX_TR, bc, false);
        term.set(r.x, bottom, BOX_BL, bc, false);
        term.set(right, bottom, BOX_BR, bc, false);

        for x in (r.x + 1)..right {
            term.set(x, r.y, BOX_H, bc, false);
            term.set(x, bottom, BOX_H, bc, false);
        }
        for y in (r.y + 1)..bottom {
            term.set(r.x, y, BOX_V, bc, false);
            term.set(right, y, BOX_V, bc, false);
        }

        if !self.title.is_empty() {
            let max = (r.width as usize).saturating_sub(6);
            let title: String = self.title.chars().take(max).collect();
            term.set(r.x + 1, r.y, '▌', Some(PRIMARY), false);
            term.set_str(r.x + 3, r.y, &title, Some(self.title_color), true);
        }
    }
}

/// Draw a smooth meter using partial block characters
pub fn draw_meter_smooth(term: &mut Terminal, x: i32, y: i32, width: usize, percent: f32, color: Color) {
    if width == 0 {
        return;
    }

    let fill = (percent.clamp(0.0, 100.0) / 100.0) * width as f32;
    let full_blocks = fill as usize;
    let partial = ((fill - full_blocks as f32) * 8.0) as usize;

    for i in 0..width {
        let (ch, c) = if i < full_blocks {
            ('█', color)
        } else if i == full_blocks && partial > 0 {
            (BLOCKS[partial], color)
        } else {
            ('░', MUTED)
        };
        term.set(x + i as i32, y, ch, Some(c), false);
    }
}

/// Text color with scheme support
pub fn text_color_scheme(colors: &ColorState) -> Color {
    if colors.is_mono() || colors.scheme == 0 {
        TEXT
    } else {
        scheme_color(colors.scheme, 2, false).0
    }
}

/// Muted color with scheme support
pub fn muted_color_scheme(colors: &ColorState) -> Color {
    if colors.is_mono() || colors.scheme == 0 {
        MUTED
    } else {
        scheme_color(colors.scheme, 0, false).0
    }
}

/// Accent color with scheme support
pub fn header_color_scheme(colors: &ColorState) -> Color {
    scheme_color(colors.scheme, 2, true).0
}

/// Truncate or right-pad to exactly `width` characters
pub fn fit(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count > width {
        if width == 0 {
            return String::new();
        }
        let mut out: String = s.chars().take(width - 1).collect();
        out.push('…');
        out
    } else {
        format!("{}{}", s, " ".repeat(width - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rows_gives_remainder_to_last() {
        let r = Rect::new(0, 2, 10, 20);
        let parts = r.split_rows(&[5, 5, 0]);
        assert_eq!(parts[0], Rect::new(0, 2, 10, 5));
        assert_eq!(parts[1], Rect::new(0, 7, 10, 5));
        assert_eq!(parts[2], Rect::new(0, 12, 10, 10));
    }

    #[test]
    fn split_rows_clamps_when_short() {
        let parts = Rect::new(0, 0, 4, 6).split_rows(&[4, 4, 4]);
        assert_eq!(parts[1].height, 2);
        assert_eq!(parts[2].height, 0);
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("ab", 0), "");
    }

    #[test]
    fn meter_fills_proportionally() {
        let mut term = Terminal::offscreen(10, 1);
        draw_meter_smooth(&mut term, 0, 0, 10, 50.0, PRIMARY);
        assert_eq!(term.row_text(0), "█████░░░░░");
    }

    #[test]
    fn panel_draws_title_into_border() {
        let mut term = Terminal::offscreen(20, 3);
        Panel::new(Rect::new(0, 0, 20, 3), "ALERTS").draw(&mut term);
        assert!(term.row_text(0).contains("ALERTS"));
        assert!(term.row_text(2).starts_with(BOX_BL));
    }
}
