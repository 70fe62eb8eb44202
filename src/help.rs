use crate::colors::{PRIMARY, TEXT};
use crate::layout::{fit, Panel, Rect};
use crate::terminal::Terminal;

/// Render a centered help box over the current frame.
pub fn render_help_overlay(term: &mut Terminal, width: u16, height: u16, title: &str, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.chars().count() + 6);
    let box_width = (max_width + 4).min(width as usize) as u16; // 2 chars padding each side
    let box_height = (lines.len() + 2).min(height as usize) as u16;

    let x = (width.saturating_sub(box_width) / 2) as i32;
    let y = (height.saturating_sub(box_height) / 2) as i32;
    let rect = Rect::new(x, y, box_width, box_height);

    // Blank what the box covers so the frame underneath doesn't bleed through
    for row in rect.y..rect.bottom() {
        for col in rect.x..rect.right() {
            term.set(col, row, ' ', None, false);
        }
    }

    let mut panel = Panel::new(rect, title);
    panel.border_color = PRIMARY;
    panel.draw(term);

    let inner = rect.inset(1);
    let text_width = (inner.width as usize).saturating_sub(2);
    for (i, line) in lines.iter().enumerate() {
        let row = inner.y + i as i32;
        if row >= inner.bottom() {
            break;
        }
        let text = fit(line, text_width);
        term.set_str(inner.x + 1, row, text.trim_end(), Some(TEXT), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_centered_and_covers_frame() {
        let mut term = Terminal::offscreen(40, 10);
        for y in 0..10 {
            term.set_str(0, y, &"x".repeat(40), None, false);
        }
        render_help_overlay(&mut term, 40, 10, "HELP", "q  quit\n?  help");
        // 4 rows tall, 14 wide: rows 3..7, columns 13..27
        assert!(term.row_text(3).contains("HELP"));
        assert!(term.row_text(4).contains("q  quit"));
        assert_eq!(term.cell(14, 5).map(|c| c.ch), Some(' '));
        assert_eq!(term.cell(0, 5).map(|c| c.ch), Some('x'));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::offscreen(10, 4);
        render_help_overlay(&mut term, 10, 4, "HELP", "");
        assert!((0..4).all(|y| term.row_text(y).is_empty()));
    }
}
