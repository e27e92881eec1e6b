//! Braille output for the RGBA framebuffer. Each terminal cell holds a 2x4
//! block of dots, so a cell area of `w x h` shows `2w x 4h` pixels.

use ratatui::prelude::*;

use crate::game::image::Image;

/// Resampled pixels above this alpha light their dot.
pub const DOT_ALPHA: u8 = 96;

pub const BACKGROUND: Color = Color::Rgb(0, 0, 8);

pub fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// Largest sub-rectangle of `area` that shows a `field_w x field_h` pixel
/// field without stretching it, centred horizontally.
pub fn fit_field(area: Rect, field_w: f32, field_h: f32) -> Rect {
    let dots_w = area.width as f32 * 2.0;
    let dots_h = area.height as f32 * 4.0;
    let scale = (dots_w / field_w).min(dots_h / field_h);
    let cols = ((field_w * scale / 2.0).floor() as u16).clamp(1, area.width.max(1));
    let rows = ((field_h * scale / 4.0).floor() as u16).clamp(1, area.height.max(1));
    Rect::new(
        area.x + area.width.saturating_sub(cols) / 2,
        area.y + area.height.saturating_sub(rows) / 2,
        cols.min(area.width),
        rows.min(area.height),
    )
}

/// Resample `fb` to `cols x rows` cells of braille. Each cell is coloured
/// with the mean of its lit dots.
pub fn to_lines(fb: &Image, cols: usize, rows: usize) -> Vec<Line<'static>> {
    let scaled = fb.resize(cols * 2, rows * 4);
    let blank = Style::default().bg(BACKGROUND);

    (0..rows)
        .map(|cy| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|cx| {
                    let mut bits = 0u8;
                    let mut sum = [0u32; 3];
                    let mut lit = 0u32;
                    for sy in 0..4 {
                        for sx in 0..2 {
                            let p = scaled.get((cx * 2 + sx) as i32, (cy * 4 + sy) as i32);
                            if p.a > DOT_ALPHA {
                                bits |= braille_bit(sx, sy);
                                sum[0] += p.r as u32;
                                sum[1] += p.g as u32;
                                sum[2] += p.b as u32;
                                lit += 1;
                            }
                        }
                    }
                    if bits == 0 {
                        return Span::styled(" ", blank);
                    }
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    let fg = Color::Rgb(
                        (sum[0] / lit) as u8,
                        (sum[1] / lit) as u8,
                        (sum[2] / lit) as u8,
                    );
                    Span::styled(String::from(ch), blank.fg(fg))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
