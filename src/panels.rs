//! Dashboard widgets. Each one writes into a `Rect` of the back buffer and
//! clips to it.

use crate::braille::BrailleCanvas;
use crate::colors::{shade, status_to_scheme, ColorState, StatusColor, ACCENT, NODE, PRIMARY};
use crate::config::TimeRange;
use crate::layout::{fit, header_color_scheme, muted_color_scheme, text_color_scheme, Rect, BOX_H};
use crate::mock::{Asset, Stat, StatusRow, TopMetric, TrendPoint, Zone, SHIELD_SLOTS};
use crate::terminal::Terminal;
use crossterm::style::Color;

/// Vertical partial blocks (1/8 increments)
const VBLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const SHIELD_ON: char = '▮';
const SHIELD_OFF: char = '▯';

/// Compact count for axis labels: 70000 -> "70k", 1720000 -> "1.7M"
pub fn format_count(v: u32) -> String {
    if v >= 1_000_000 {
        format!("{:.1}M", v as f32 / 1_000_000.0)
    } else if v >= 1_000 {
        format!("{}k", v / 1_000)
    } else {
        v.to_string()
    }
}

fn set_right(term: &mut Terminal, right: i32, y: i32, s: &str, fg: Color, bold: bool) {
    let len = s.chars().count() as i32;
    term.set_str(right - len, y, s, Some(fg), bold);
}

fn set_centered(term: &mut Terminal, rect: Rect, y: i32, s: &str, fg: Color, bold: bool) {
    let len = s.chars().count() as i32;
    let x = rect.x + (rect.width as i32 - len).max(0) / 2;
    term.set_str(x, y, &fit(s, rect.width as usize).trim_end().to_string(), Some(fg), bold);
}

/// Sub-heading with a dotted rule filling the rest of the row
pub fn section_title(term: &mut Terminal, rect: Rect, title: &str, colors: &ColorState) {
    if rect.is_empty() {
        return;
    }
    let width = rect.width as usize;
    let title = fit(title, width.saturating_sub(2));
    let title = title.trim_end();
    term.set(rect.x, rect.y, '▌', Some(header_color_scheme(colors)), false);
    term.set_str(rect.x + 1, rect.y, title, Some(text_color_scheme(colors)), true);
    let start = rect.x + 2 + title.chars().count() as i32;
    for x in start..rect.right() {
        term.set(x, rect.y, '┄', Some(muted_color_scheme(colors)), false);
    }
}

/// `DAY WEEK MONTH` with the active range highlighted, right-aligned at `right`
pub fn range_selector(term: &mut Terminal, right: i32, y: i32, active: TimeRange, colors: &ColorState) {
    let total: i32 = TimeRange::ALL.iter().map(|r| r.label().len() as i32 + 1).sum::<i32>() - 1;
    let mut x = right - total;
    for range in TimeRange::ALL {
        let (fg, bold) = if range == active {
            (header_color_scheme(colors), true)
        } else {
            (muted_color_scheme(colors), false)
        };
        term.set_str(x, y, range.label(), Some(fg), bold);
        x += range.label().len() as i32 + 1;
    }
}

/// Labelled figures side by side: value above, label below
pub fn stat_grid(term: &mut Terminal, rect: Rect, stats: &[Stat], value_color: Color, colors: &ColorState) {
    if stats.is_empty() || rect.height < 2 {
        return;
    }
    let slot = rect.width as usize / stats.len();
    if slot == 0 {
        return;
    }
    for (i, stat) in stats.iter().enumerate() {
        let x = rect.x + (i * slot) as i32;
        let cell = Rect::new(x, rect.y, slot as u16, 2);
        set_centered(term, cell, rect.y, stat.value, value_color, true);
        set_centered(term, cell, rect.y + 1, stat.label, muted_color_scheme(colors), false);
    }
}

/// Headline posture metrics, as many per row as fit
pub fn top_metrics(term: &mut Terminal, rect: Rect, metrics: &[TopMetric], colors: &ColorState) {
    if metrics.is_empty() || rect.height < 2 {
        return;
    }
    let per_row = if rect.width as usize / metrics.len() >= 14 {
        metrics.len()
    } else {
        metrics.len().div_ceil(2)
    };
    let slot = rect.width as usize / per_row;
    for (i, metric) in metrics.iter().enumerate() {
        let row = (i / per_row) as i32;
        let y = rect.y + row * 2;
        if y + 1 >= rect.bottom() {
            break;
        }
        let x = rect.x + ((i % per_row) * slot) as i32;
        let cell = Rect::new(x, y, slot as u16, 2);
        set_centered(term, cell, y, metric.label, muted_color_scheme(colors), false);
        set_centered(term, cell, y + 1, metric.value, status_to_scheme(colors.scheme, metric.status), true);
    }
}

/// Handling stages: label, shield gauge, total
pub fn status_rows(term: &mut Terminal, rect: Rect, rows: &[StatusRow], colors: &ColorState) {
    let label_w = 15usize;
    let on = status_to_scheme(colors.scheme, StatusColor::Info);
    let off = muted_color_scheme(colors);
    for (i, row) in rows.iter().enumerate() {
        let y = rect.y + i as i32;
        if y >= rect.bottom() {
            break;
        }
        let label = fit(row.label, label_w.min(rect.width as usize));
        term.set_str(rect.x, y, &label, Some(text_color_scheme(colors)), false);
        let gauge_x = rect.x + label_w as i32;
        for s in 0..SHIELD_SLOTS {
            let x = gauge_x + s as i32;
            if x >= rect.right() {
                break;
            }
            if s < row.shields {
                term.set(x, y, SHIELD_ON, Some(on), false);
            } else {
                term.set(x, y, SHIELD_OFF, Some(off), false);
            }
        }
        let total_x = gauge_x + SHIELD_SLOTS as i32 + 1;
        if total_x + row.total.len() as i32 <= rect.right() {
            set_right(term, rect.right(), y, row.total, header_color_scheme(colors), true);
        }
    }
}

/// Two-series braille area chart: alerts and logs over the trend samples
pub fn area_chart(term: &mut Terminal, rect: Rect, points: &[TrendPoint], colors: &ColorState) {
    let axis_w: u16 = 6;
    if points.is_empty() || rect.width < axis_w + 4 || rect.height < 4 {
        return;
    }
    let alerts_color = status_to_scheme(colors.scheme, StatusColor::Warning);
    let logs_color = status_to_scheme(colors.scheme, StatusColor::Info);
    let muted = muted_color_scheme(colors);

    term.set_str(rect.x + axis_w as i32, rect.y, "■", Some(alerts_color), false);
    term.set_str(rect.x + axis_w as i32 + 2, rect.y, "Alerts", Some(muted), false);
    term.set_str(rect.x + axis_w as i32 + 10, rect.y, "■", Some(logs_color), false);
    term.set_str(rect.x + axis_w as i32 + 12, rect.y, "Logs", Some(muted), false);

    let plot = Rect::new(rect.x + axis_w as i32, rect.y + 1, rect.width - axis_w, rect.height - 2);
    let max = points.iter().map(|p| p.alerts.max(p.logs)).max().unwrap_or(0).max(1);

    set_right(term, plot.x - 1, plot.y, &format_count(max), muted, false);
    set_right(term, plot.x - 1, plot.bottom() - 1, "0", muted, false);
    for y in plot.y..plot.bottom() {
        term.set(plot.x - 1, y, '┤', Some(muted), false);
    }

    let mut canvas = BrailleCanvas::new(plot.width, plot.height);
    let (dot_w, dot_h) = canvas.dot_size();
    let n = points.len();
    let x_of = |i: usize| if n == 1 { 0 } else { (i * (dot_w - 1) / (n - 1)) as i32 };
    let y_of = |v: u32| ((dot_h - 1) as f32 * (1.0 - v as f32 / max as f32)).round() as i32;

    let series: [(fn(&TrendPoint) -> u32, Color, u8); 2] = [
        (|p: &TrendPoint| p.logs, logs_color, 1),
        (|p: &TrendPoint| p.alerts, alerts_color, 2),
    ];
    for (value, color, layer) in series {
        let fill = shade(color, 0.35);
        for i in 0..n.saturating_sub(1) {
            let (x0, x1) = (x_of(i), x_of(i + 1));
            let (y0, y1) = (y_of(value(&points[i])), y_of(value(&points[i + 1])));
            for x in x0..=x1 {
                let t = if x1 == x0 { 0.0 } else { (x - x0) as f32 / (x1 - x0) as f32 };
                let top = (y0 as f32 + (y1 - y0) as f32 * t).round() as i32;
                for y in (top + 1..dot_h as i32).step_by(2) {
                    canvas.plot(x, y, layer, fill, false);
                }
            }
            canvas.line(x0, y0, x1, y1, layer + 2, color, false);
        }
        if n == 1 {
            canvas.plot(0, y_of(value(&points[0])), layer + 2, color, false);
        }
    }
    canvas.blit(term, plot.x, plot.y);

    // X labels, skipping any that would overlap the previous one
    let label_y = rect.bottom() - 1;
    let mut next_free = plot.x;
    for (i, p) in points.iter().enumerate() {
        let len = p.label.chars().count() as i32;
        let center = plot.x + x_of(i) / 2;
        let x = (center - len / 2).min(plot.right() - len).max(plot.x);
        if x < next_free || x + len > rect.right() {
            continue;
        }
        term.set_str(x, label_y, p.label, Some(muted), false);
        next_free = x + len + 1;
    }
}

/// Vertical bars with the value on top and the category below
pub fn bar_chart(term: &mut Terminal, rect: Rect, bars: &[(&str, f32)], max: f32, colors: &ColorState) {
    if bars.is_empty() || rect.height < 3 || max <= 0.0 {
        return;
    }
    let slot = rect.width as usize / bars.len();
    if slot == 0 {
        return;
    }
    let bar_w = (slot * 2 / 3).max(1);
    let chart_h = rect.height as usize - 2;

    for (i, &(label, value)) in bars.iter().enumerate() {
        let ratio = (value / max).clamp(0.0, 1.0);
        let status = if ratio > 0.8 {
            StatusColor::Critical
        } else if ratio > 0.5 {
            StatusColor::Warning
        } else {
            StatusColor::Info
        };
        let color = status_to_scheme(colors.scheme, status);
        let slot_x = rect.x + (i * slot) as i32;
        let bar_x = slot_x + ((slot - bar_w) / 2) as i32;

        let eighths = (ratio * chart_h as f32 * 8.0).round() as usize;
        for row in 0..chart_h {
            let level = eighths.saturating_sub(row * 8).min(8);
            if level == 0 {
                break;
            }
            let y = rect.bottom() - 2 - row as i32;
            for dx in 0..bar_w {
                term.set(bar_x + dx as i32, y, VBLOCKS[level], Some(color), false);
            }
        }

        let cell = Rect::new(slot_x, rect.y, slot as u16, 1);
        set_centered(term, cell, rect.y, &format!("{:.1}", value), text_color_scheme(colors), false);
        set_centered(term, cell, rect.bottom() - 1, label, muted_color_scheme(colors), false);
    }
}

/// Ranked asset list: TOPn badge, address, location, hit count
pub fn asset_list(term: &mut Terminal, rect: Rect, assets: &[Asset], hot_ranks: usize, colors: &ColorState) {
    for (i, asset) in assets.iter().enumerate() {
        let y = rect.y + i as i32;
        if y >= rect.bottom() {
            break;
        }
        let badge_color = if i < hot_ranks { ACCENT } else { NODE };
        let badge = format!("TOP{}", i + 1);
        term.set_str(rect.x, y, &badge, Some(badge_color), true);
        let x = rect.x + badge.len() as i32 + 1;
        let room = (rect.right() - x - asset.hits.len() as i32 - 1).max(0) as usize;
        let who = fit(&format!("{} {}", asset.ip, asset.location), room);
        term.set_str(x, y, who.trim_end(), Some(text_color_scheme(colors)), false);
        set_right(term, rect.right(), y, asset.hits, header_color_scheme(colors), true);
    }
}

/// Zone name and value over a percentage meter, two rows per zone
pub fn zone_meters(term: &mut Terminal, rect: Rect, zones: &[Zone], colors: &ColorState) {
    for (i, zone) in zones.iter().enumerate() {
        let y = rect.y + (i * 2) as i32;
        if y + 1 >= rect.bottom() {
            break;
        }
        let room = (rect.width as usize).saturating_sub(zone.value.len() + 1);
        let name = fit(zone.name, room);
        term.set_str(rect.x, y, name.trim_end(), Some(text_color_scheme(colors)), false);
        set_right(term, rect.right(), y, zone.value, header_color_scheme(colors), true);
        let color = if i == 0 { ACCENT } else { status_to_scheme(colors.scheme, StatusColor::Info) };
        crate::layout::draw_meter_smooth(term, rect.x, y + 1, rect.width as usize, zone.percent, color);
    }
}

/// Kill-chain stages joined by arrows, label above value
pub fn tickers(term: &mut Terminal, rect: Rect, stages: &[Stat], colors: &ColorState) {
    if stages.is_empty() || rect.height < 2 {
        return;
    }
    let slot = rect.width as usize / stages.len();
    if slot < 3 {
        return;
    }
    let danger = status_to_scheme(colors.scheme, StatusColor::Critical);
    for (i, stage) in stages.iter().enumerate() {
        let x = rect.x + (i * slot) as i32;
        let cell = Rect::new(x, rect.y, (slot - 1) as u16, 2);
        set_centered(term, cell, rect.y, stage.label, muted_color_scheme(colors), false);
        set_centered(term, cell, rect.y + 1, stage.value, danger, true);
        if i + 1 < stages.len() {
            term.set(x + slot as i32 - 1, rect.y + 1, '›', Some(muted_color_scheme(colors)), false);
        }
    }
}

/// Three header rows: nav tabs around the title, the badge, a rule
pub fn header(
    term: &mut Terminal,
    rect: Rect,
    title: &str,
    badge: &str,
    tabs: (&[&str], &[&str]),
    colors: &ColorState,
) {
    if rect.height < 3 || rect.is_empty() {
        return;
    }
    let title = format!("═══  {}  ═══", title);
    let title_len = title.chars().count() as i32;
    let title_x = rect.x + (rect.width as i32 - title_len).max(0) / 2;
    set_centered(term, rect, rect.y, &title, header_color_scheme(colors), true);

    let (left, right) = tabs;
    let left_text = left.join("  ");
    let right_text = right.join("  ");
    let muted = muted_color_scheme(colors);
    if rect.x + 1 + left_text.chars().count() as i32 + 2 <= title_x {
        term.set_str(rect.x + 1, rect.y, &left_text, Some(muted), false);
    }
    if title_x + title_len + 2 + right_text.chars().count() as i32 <= rect.right() - 1 {
        set_right(term, rect.right() - 1, rect.y, &right_text, muted, false);
    }

    set_centered(term, rect, rect.y + 1, &format!("[ {} ]", badge), ACCENT, false);

    let rule_y = rect.y + 2;
    for x in rect.x..rect.right() {
        let highlighted = x >= title_x && x < title_x + title_len;
        let fg = if highlighted { PRIMARY } else { muted };
        term.set(x, rule_y, BOX_H, Some(fg), false);
    }
}

/// Bottom row: OS version left, optional status in the middle, timestamp right
pub fn footer(term: &mut Terminal, rect: Rect, version: &str, timestamp: &str, status: Option<&str>, colors: &ColorState) {
    if rect.is_empty() {
        return;
    }
    let muted = muted_color_scheme(colors);
    term.set_str(rect.x + 1, rect.y, version, Some(muted), false);
    if let Some(status) = status {
        set_centered(term, rect, rect.y, status, status_to_scheme(colors.scheme, StatusColor::Warning), true);
    }
    let stamp = format!("TIMESTAMP: {}", timestamp);
    set_right(term, rect.right() - 1, rect.y, &stamp, text_color_scheme(colors), false);
}
