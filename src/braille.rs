//! Braille dot canvas: 2x4 dots per terminal cell

use crate::terminal::Terminal;
use crossterm::style::Color;

/// Bit for each dot position within a cell, indexed [row][column]
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

#[derive(Clone, Copy, Default)]
struct Dot {
    layer: u8,
    color: Option<Color>,
    bold: bool,
}

/// Dot buffer sized in cells; layer 0 means unlit
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    dots: Vec<Dot>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            dots: vec![Dot::default(); cols * 2 * rows * 4],
        }
    }

    /// Size in dots
    pub fn dot_size(&self) -> (usize, usize) {
        (self.cols * 2, self.rows * 4)
    }

    pub fn clear(&mut self) {
        self.dots.fill(Dot::default());
    }

    /// Light a dot. A dot already lit by a higher layer keeps its color.
    pub fn plot(&mut self, x: i32, y: i32, layer: u8, color: Color, bold: bool) {
        let (w, h) = self.dot_size();
        if x < 0 || y < 0 || x as usize >= w || y as usize >= h || layer == 0 {
            return;
        }
        let dot = &mut self.dots[y as usize * w + x as usize];
        if layer >= dot.layer {
            *dot = Dot { layer, color: Some(color), bold };
        }
    }

    /// Filled square of half-width `r` centred on (x, y)
    pub fn plot_square(&mut self, x: i32, y: i32, r: i32, layer: u8, color: Color, bold: bool) {
        for dy in -r..=r {
            for dx in -r..=r {
                self.plot(x + dx, y + dy, layer, color, bold);
            }
        }
    }

    /// Straight line between two dots
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, layer: u8, color: Color, bold: bool) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 as f32 + (x1 - x0) as f32 * t;
            let y = y0 as f32 + (y1 - y0) as f32 * t;
            self.plot(x.round() as i32, y.round() as i32, layer, color, bold);
        }
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        let (w, h) = self.dot_size();
        x < w && y < h && self.dots[y * w + x].layer > 0
    }

    /// Character and dominant color of one cell
    pub fn cell(&self, cx: usize, cy: usize) -> Option<(char, Color, bool)> {
        let w = self.cols * 2;
        let mut bits = 0u8;
        let mut top: Option<Dot> = None;
        for (row, row_bits) in DOT_BITS.iter().enumerate() {
            for (col, bit) in row_bits.iter().enumerate() {
                let dot = self.dots[(cy * 4 + row) * w + cx * 2 + col];
                if dot.layer == 0 {
                    continue;
                }
                bits |= bit;
                if top.map_or(true, |t| dot.layer > t.layer) {
                    top = Some(dot);
                }
            }
        }
        let top = top?;
        let ch = char::from_u32(0x2800 + bits as u32)?;
        Some((ch, top.color.unwrap_or(Color::White), top.bold))
    }

    /// Copy lit cells into the terminal with the canvas origin at (x, y)
    pub fn blit(&self, term: &mut Terminal, x: i32, y: i32) {
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                if let Some((ch, color, bold)) = self.cell(cx, cy) {
                    term.set(x + cx as i32, y + cy as i32, ch, Some(color), bold);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_map_to_braille_bits() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.plot(0, 0, 1, Color::White, false);
        assert_eq!(canvas.cell(0, 0).map(|c| c.0), Some('\u{2801}'));
        canvas.plot(1, 3, 1, Color::White, false);
        assert_eq!(canvas.cell(0, 0).map(|c| c.0), Some('\u{2881}'));
    }

    #[test]
    fn higher_layer_wins_color() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.plot(0, 0, 3, Color::Red, true);
        canvas.plot(0, 0, 1, Color::Blue, false);
        canvas.plot(1, 1, 2, Color::Green, false);
        let (_, color, bold) = canvas.cell(0, 0).unwrap();
        assert_eq!(color, Color::Red);
        assert!(bold);
    }

    #[test]
    fn plots_outside_are_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.plot(-1, 0, 1, Color::White, false);
        canvas.plot(4, 0, 1, Color::White, false);
        canvas.plot(0, 8, 1, Color::White, false);
        assert!((0..2).all(|x| (0..2).all(|y| canvas.cell(x, y).is_none())));
    }

    #[test]
    fn blit_writes_only_lit_cells() {
        let mut canvas = BrailleCanvas::new(3, 1);
        canvas.line(0, 0, 5, 0, 1, Color::Cyan, false);
        let mut term = Terminal::offscreen(5, 1);
        canvas.blit(&mut term, 1, 0);
        assert_eq!(term.row_text(0).chars().count(), 4);
        assert_eq!(term.cell(0, 0).map(|c| c.ch), Some(' '));
        assert!(canvas.is_lit(5, 0));
    }
}
