//! RGBA raster used for sprites, the world framebuffer and post-processing.

use crate::error::SpriteError;
use crate::game::geometry::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear mix, `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    /// Build an image from ASCII art. `.` and space are transparent, every
    /// other glyph is looked up in `palette`. Blank lines around the art and
    /// the indent shared by all its rows are ignored, so spaces inside or at
    /// the end of a row are pixels.
    pub fn parse(art: &str, palette: &[(char, Rgba)]) -> Result<Image, SpriteError> {
        let is_blank = |line: &&str| line.trim().is_empty();
        let lines: Vec<&str> = art.lines().collect();
        let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
        let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |i| i + 1);
        let lines = &lines[start..end];
        let indent = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
            .min()
            .unwrap_or(0);
        let rows: Vec<String> = lines.iter().map(|l| l.chars().skip(indent).collect()).collect();
        let Some(first) = rows.first() else {
            return Err(SpriteError::Empty);
        };
        let width = first.chars().count();
        let mut img = Image::new(width, rows.len());

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(SpriteError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                if glyph == '.' || glyph == ' ' {
                    continue;
                }
                let color = palette
                    .iter()
                    .find(|(g, _)| *g == glyph)
                    .map(|(_, c)| *c)
                    .ok_or(SpriteError::UnknownGlyph { glyph, row, col })?;
                img.pixels[row * width + col] = color;
            }
        }
        Ok(img)
    }

    /// Test fixture helper: overwrite every pixel with `color`.
    #[cfg(test)]
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Rgba {
        self.index(x, y)
            .map(|i| self.pixels[i])
            .unwrap_or(Rgba::TRANSPARENT)
    }

    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        self.get(x, y).a
    }

    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over composite of a single pixel.
    pub fn blend(&mut self, x: i32, y: i32, src: Rgba) {
        let Some(i) = self.index(x, y) else { return };
        if src.a == 0 {
            return;
        }
        if src.a == 255 {
            self.pixels[i] = src;
            return;
        }
        let dst = self.pixels[i];
        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round() as u8
        };
        self.pixels[i] = Rgba::new(
            channel(src.r, dst.r),
            channel(src.g, dst.g),
            channel(src.b, dst.b),
            (out_a * 255.0).round() as u8,
        );
    }

    /// Composite `src` with its top-left corner at `(x, y)`, clipped to this image.
    pub fn draw(&mut self, src: &Image, x: f32, y: f32) {
        let ox = x.round() as i32;
        let oy = y.round() as i32;
        for sy in 0..src.height {
            for sx in 0..src.width {
                let px = src.pixels[sy * src.width + sx];
                self.blend(ox + sx as i32, oy + sy as i32, px);
            }
        }
    }

    /// Like `draw` but every visible pixel takes `color`, keeping the source alpha.
    pub fn draw_silhouette(&mut self, src: &Image, x: f32, y: f32, color: Rgba) {
        let ox = x.round() as i32;
        let oy = y.round() as i32;
        for sy in 0..src.height {
            for sx in 0..src.width {
                let a = src.pixels[sy * src.width + sx].a;
                if a > 0 {
                    self.blend(ox + sx as i32, oy + sy as i32, color.with_alpha(a));
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let r2 = radius * radius;
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// One-pixel outline of a circle.
    pub fn ring(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let x0 = (center.x - radius - 1.0).floor() as i32;
        let x1 = (center.x + radius + 1.0).ceil() as i32;
        let y0 = (center.y - radius - 1.0).floor() as i32;
        let y1 = (center.y + radius + 1.0).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if (d - radius).abs() < 0.75 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let (mut x0, mut y0) = (from.x.round() as i32, from.y.round() as i32);
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Bilinear sample at pixel-space coordinates, pixel centres sit at `i + 0.5`.
    /// Interpolation happens on premultiplied colour so transparent
    /// neighbours do not darken edges. Returns straight `[r, g, b, a]`.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> [f32; 4] {
        if self.is_empty() {
            return [0.0; 4];
        }
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let u = (fx - 0.5).clamp(0.0, max_x);
        let v = (fy - 0.5).clamp(0.0, max_y);
        let x0 = u.floor() as usize;
        let y0 = v.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = u - x0 as f32;
        let ty = v - y0 as f32;

        let taps = [
            (x0, y0, (1.0 - tx) * (1.0 - ty)),
            (x1, y0, tx * (1.0 - ty)),
            (x0, y1, (1.0 - tx) * ty),
            (x1, y1, tx * ty),
        ];
        let mut acc = [0.0f32; 4];
        for (x, y, w) in taps {
            let p = self.pixels[y * self.width + x];
            let a = p.a as f32 * w;
            acc[0] += p.r as f32 * a;
            acc[1] += p.g as f32 * a;
            acc[2] += p.b as f32 * a;
            acc[3] += a;
        }
        if acc[3] <= f32::EPSILON {
            return [0.0; 4];
        }
        [acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3], acc[3]]
    }

    pub fn resize(&self, width: usize, height: usize) -> Image {
        let mut out = Image::new(width, height);
        if width == 0 || height == 0 || self.is_empty() {
            return out;
        }
        let sx = self.width as f32 / width as f32;
        let sy = self.height as f32 / height as f32;
        for oy in 0..height {
            for ox in 0..width {
                let s = self.sample_bilinear((ox as f32 + 0.5) * sx, (oy as f32 + 0.5) * sy);
                out.put(ox as i32, oy as i32, to_rgba(s));
            }
        }
        out
    }

    /// Mean of the `(2r+1)²` neighbourhood around each pixel, with edge clamping.
    pub fn box_blur(&self, radius: usize) -> Image {
        if radius == 0 || self.is_empty() {
            return self.clone();
        }
        let r = radius as i32;
        let n = ((2 * r + 1) * (2 * r + 1)) as f32;
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        let mut out = Image::new(self.width, self.height);

        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let mut acc = [0.0f32; 4];
                for ky in -r..=r {
                    let sy = (y + ky).clamp(0, max_y) as usize;
                    for kx in -r..=r {
                        let sx = (x + kx).clamp(0, max_x) as usize;
                        let p = self.pixels[sy * self.width + sx];
                        let a = p.a as f32;
                        acc[0] += p.r as f32 * a;
                        acc[1] += p.g as f32 * a;
                        acc[2] += p.b as f32 * a;
                        acc[3] += a;
                    }
                }
                let px = if acc[3] <= f32::EPSILON {
                    Rgba::TRANSPARENT
                } else {
                    to_rgba([acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3], acc[3] / n])
                };
                out.put(x, y, px);
            }
        }
        out
    }

    /// Shrink by `factor` then scale back up, a wide but cheap blur.
    pub fn downsample_blur(&self, factor: usize) -> Image {
        if factor <= 1 || self.is_empty() {
            return self.clone();
        }
        let small = self.resize(
            (self.width / factor).max(1),
            (self.height / factor).max(1),
        );
        small.resize(self.width, self.height)
    }

    pub fn dim(&mut self, factor: f32) {
        let f = factor.clamp(0.0, 1.0);
        for p in &mut self.pixels {
            p.r = (p.r as f32 * f).round() as u8;
            p.g = (p.g as f32 * f).round() as u8;
            p.b = (p.b as f32 * f).round() as u8;
        }
    }
}

fn to_rgba(c: [f32; 4]) -> Rgba {
    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Rgba::new(q(c[0]), q(c[1]), q(c[2]), q(c[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    fn palette() -> Vec<(char, Rgba)> {
        vec![('r', RED), ('b', BLUE)]
    }

    #[test]
    fn test_parse_art() {
        let img = Image::parse(
            r#"
            .r.
            rbr
            "#,
            &palette(),
        )
        .unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.alpha_at(0, 0), 0);
        assert_eq!(img.get(1, 0), RED);
        assert_eq!(img.get(1, 1), BLUE);
    }

    #[test]
    fn test_parse_keeps_spaces_inside_rows() {
        let img = Image::parse("r \n r", &palette()).unwrap();
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.get(0, 0), RED);
        assert_eq!(img.alpha_at(1, 0), 0);
        assert_eq!(img.alpha_at(0, 1), 0);
        assert_eq!(img.get(1, 1), RED);

        // only the shared indent goes, the deeper row keeps its extra space
        let img = Image::parse("\n    b b\n     b \n", &palette()).unwrap();
        assert_eq!((img.width, img.height), (3, 2));
        assert_eq!(img.get(0, 0), BLUE);
        assert_eq!(img.alpha_at(1, 0), 0);
        assert_eq!(img.alpha_at(0, 1), 0);
        assert_eq!(img.get(1, 1), BLUE);
        assert_eq!(img.alpha_at(2, 1), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Image::parse("\n  \n", &palette()), Err(SpriteError::Empty));
        assert_eq!(
            Image::parse("rr\nr", &palette()),
            Err(SpriteError::Ragged { row: 1, expected: 2, found: 1 })
        );
        assert_eq!(
            Image::parse("rz", &palette()),
            Err(SpriteError::UnknownGlyph { glyph: 'z', row: 0, col: 1 })
        );
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut img = Image::new(2, 2);
        img.put(-1, 0, RED);
        img.put(2, 2, RED);
        assert_eq!(img.get(-1, 0), Rgba::TRANSPARENT);
        assert_eq!(img.alpha_at(5, 5), 0);
        assert!(img.pixels.iter().all(|p| p.a == 0));
    }

    #[test]
    fn test_blend_half_over_opaque() {
        let mut img = Image::new(1, 1);
        img.put(0, 0, BLUE);
        img.blend(0, 0, RED.with_alpha(128));
        let p = img.get(0, 0);
        assert_eq!(p.a, 255);
        assert!(p.r > 120 && p.r < 135);
        assert!(p.b > 120 && p.b < 135);
    }

    #[test]
    fn test_draw_clips() {
        let src = Image::parse("rr\nrr", &palette()).unwrap();
        let mut dst = Image::new(3, 3);
        dst.draw(&src, 2.0, 2.0);
        assert_eq!(dst.get(2, 2), RED);
        assert_eq!(dst.alpha_at(1, 1), 0);
    }

    #[test]
    fn test_resize_uniform_stays_uniform() {
        let mut img = Image::new(4, 4);
        img.pixels.fill(RED);
        let up = img.resize(9, 7);
        assert_eq!((up.width, up.height), (9, 7));
        assert!(up.pixels.iter().all(|p| *p == RED));
        assert!(img.resize(0, 3).is_empty());
    }

    #[test]
    fn test_sample_bilinear_midpoint() {
        let img = Image::parse("rb", &palette()).unwrap();
        let s = img.sample_bilinear(1.0, 0.5);
        assert!((s[0] - 127.5).abs() < 0.01);
        assert!((s[2] - 127.5).abs() < 0.01);
        assert!((s[3] - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_box_blur_spreads_single_pixel() {
        let mut img = Image::new(5, 5);
        img.put(2, 2, RED);
        let blurred = img.box_blur(1);
        // 1 of 9 samples opaque
        assert_eq!(blurred.alpha_at(2, 2), 28);
        assert_eq!(blurred.alpha_at(1, 1), 28);
        assert_eq!(blurred.alpha_at(0, 0), 0);
        // colour is not darkened by transparent neighbours
        assert_eq!(blurred.get(1, 2).r, 255);
    }

    #[test]
    fn test_box_blur_clamps_edges() {
        let mut img = Image::new(3, 1);
        img.pixels.fill(BLUE);
        let blurred = img.box_blur(2);
        assert!(blurred.pixels.iter().all(|p| *p == BLUE));
        assert_eq!(img.box_blur(0), img);
    }

    #[test]
    fn test_downsample_blur_keeps_size() {
        let mut img = Image::new(8, 6);
        img.put(0, 0, RED);
        let out = img.downsample_blur(4);
        assert_eq!((out.width, out.height), (8, 6));
    }

    #[test]
    fn test_dim() {
        let mut img = Image::new(1, 1);
        img.put(0, 0, Rgba::opaque(200, 100, 50));
        img.dim(0.5);
        assert_eq!(img.get(0, 0), Rgba::opaque(100, 50, 25));
    }
}
