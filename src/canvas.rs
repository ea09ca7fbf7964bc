//! Software drawing surface.
//!
//! A [`Canvas`] is a plain RGBA8 pixel buffer with the fill primitives the
//! confetti renderer needs: nonzero-winding polygon fill, rotated
//! ellipses, affine-transformed outlines, and inverse-mapped bitmap
//! patterns, all source-over blended. No GPU involved - the viewer just
//! uploads the finished buffer for presentation.
//!
//! Coordinates are pixels with y growing downward; a pixel is covered
//! when its center falls inside the filled region.

use glam::{Affine2, Vec2};
use std::path::Path as FsPath;

use crate::color::Color;
use crate::shape::BitmapShape;

/// An owned RGBA8 pixel surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw RGBA8 pixel data.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Source-over blend one pixel. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst_a = self.pixels[i + 3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        if out_a <= 0.0 {
            return;
        }
        let blend = |src: u8, dst: u8| {
            let c = (src as f32 * a + dst as f32 * dst_a * (1.0 - a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[i] = blend(color.r, self.pixels[i]);
        self.pixels[i + 1] = blend(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = blend(color.b, self.pixels[i + 2]);
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Fill a closed polygon (nonzero winding).
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        let edges: Vec<(Vec2, Vec2)> = closed_edges(points).collect();
        self.fill_edges(&edges, color, alpha);
    }

    /// Fill a set of closed outlines under one affine transform, as a
    /// single nonzero-winding region (holes stay holes).
    pub fn fill_path(
        &mut self,
        outlines: &[Vec<Vec2>],
        transform: Affine2,
        color: Color,
        alpha: f32,
    ) {
        let mut edges = Vec::new();
        for outline in outlines {
            if outline.len() < 2 {
                continue;
            }
            let transformed: Vec<Vec2> = outline
                .iter()
                .map(|p| transform.transform_point2(*p))
                .collect();
            edges.extend(closed_edges(&transformed));
        }
        self.fill_edges(&edges, color, alpha);
    }

    /// Fill a rotated ellipse centered at `center`.
    pub fn fill_ellipse(
        &mut self,
        center: Vec2,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
        color: Color,
        alpha: f32,
    ) {
        let longest = radius_x.abs().max(radius_y.abs());
        if !(longest > 0.0) {
            return;
        }
        // Segment count grows with radius so large ovals stay round.
        let segments = ((longest * 2.0) as usize).clamp(12, 64);
        let (rot_sin, rot_cos) = rotation.sin_cos();
        let points: Vec<Vec2> = (0..segments)
            .map(|i| {
                let t = i as f32 / segments as f32 * std::f32::consts::TAU;
                let local = Vec2::new(radius_x * t.cos(), radius_y * t.sin());
                center
                    + Vec2::new(
                        local.x * rot_cos - local.y * rot_sin,
                        local.x * rot_sin + local.y * rot_cos,
                    )
            })
            .collect();
        self.fill_polygon(&points, color, alpha);
    }

    /// Paint a bitmap through an affine pattern transform, clipped to the
    /// axis-aligned destination rectangle. `alpha` scales every texel's
    /// own alpha (the global-alpha of a pattern fill).
    pub fn blit_pattern(
        &mut self,
        bitmap: &BitmapShape,
        transform: Affine2,
        dest_min: Vec2,
        dest_size: Vec2,
        alpha: f32,
    ) {
        let inverse = transform.inverse();
        if !inverse.is_finite() {
            return;
        }
        let x0 = (dest_min.x.floor() as i32).max(0);
        let y0 = (dest_min.y.floor() as i32).max(0);
        let x1 = ((dest_min.x + dest_size.x).ceil() as i32).min(self.width as i32);
        let y1 = ((dest_min.y + dest_size.y).ceil() as i32).min(self.height as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                let point = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let local = inverse.transform_point2(point);
                let Some([r, g, b, a]) = bitmap.sample(local.x, local.y) else {
                    continue;
                };
                let texel_alpha = alpha * a as f32 / 255.0;
                self.blend_pixel(px, py, Color::rgb(r, g, b), texel_alpha);
            }
        }
    }

    /// Write the canvas to a PNG file.
    pub fn save_png<P: AsRef<FsPath>>(&self, path: P) -> Result<(), image::ImageError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
    }

    /// Scanline fill over an arbitrary edge soup, nonzero winding.
    fn fill_edges(&mut self, edges: &[(Vec2, Vec2)], color: Color, alpha: f32) {
        if edges.is_empty() {
            return;
        }
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (a, b) in edges {
            min_y = min_y.min(a.y).min(b.y);
            max_y = max_y.max(a.y).max(b.y);
        }
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y0 = (min_y.floor() as i32).max(0);
        let y1 = (max_y.ceil() as i32).min(self.height as i32);

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for py in y0..y1 {
            let yc = py as f32 + 0.5;
            crossings.clear();
            for (a, b) in edges {
                if a.y == b.y {
                    continue;
                }
                let (top, bottom, winding) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                if yc >= top.y && yc < bottom.y {
                    let t = (yc - top.y) / (bottom.y - top.y);
                    crossings.push((top.x + t * (bottom.x - top.x), winding));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut span_start = 0.0;
            for &(x, w) in &crossings {
                let was_inside = winding != 0;
                winding += w;
                if !was_inside && winding != 0 {
                    span_start = x;
                } else if was_inside && winding == 0 {
                    self.fill_span(py, span_start, x, color, alpha);
                }
            }
        }
    }

    /// Fill pixels on row `py` whose centers fall in `[x_start, x_end)`.
    fn fill_span(&mut self, py: i32, x_start: f32, x_end: f32, color: Color, alpha: f32) {
        let px0 = ((x_start - 0.5).ceil() as i32).max(0);
        let px1 = ((x_end - 0.5).ceil() as i32).min(self.width as i32);
        for px in px0..px1 {
            self.blend_pixel(px, py, color, alpha);
        }
    }
}

/// Edges of a closed ring, including the closing segment.
fn closed_edges(points: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(std::iter::once((points[points.len() - 1], points[0])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(canvas: &Canvas, x: u32, y: u32) -> u8 {
        canvas.pixels()[(y as usize * canvas.width() as usize + x as usize) * 4 + 3]
    }

    fn red_at(canvas: &Canvas, x: u32, y: u32) -> u8 {
        canvas.pixels()[(y as usize * canvas.width() as usize + x as usize) * 4]
    }

    #[test]
    fn test_new_is_transparent() {
        let canvas = Canvas::new(4, 4);
        assert_eq!(canvas.pixels().len(), 64);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_polygon_covers_interior_only() {
        let mut canvas = Canvas::new(20, 20);
        let square = [
            Vec2::new(5.0, 5.0),
            Vec2::new(15.0, 5.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(5.0, 15.0),
        ];
        canvas.fill_polygon(&square, Color::rgb(255, 0, 0), 1.0);
        assert_eq!(alpha_at(&canvas, 10, 10), 255);
        assert_eq!(red_at(&canvas, 10, 10), 255);
        assert_eq!(alpha_at(&canvas, 2, 10), 0);
        assert_eq!(alpha_at(&canvas, 10, 17), 0);
    }

    #[test]
    fn test_fill_polygon_winding_order_irrelevant() {
        let mut cw = Canvas::new(20, 20);
        let mut ccw = Canvas::new(20, 20);
        let points = [
            Vec2::new(5.0, 5.0),
            Vec2::new(15.0, 5.0),
            Vec2::new(15.0, 15.0),
            Vec2::new(5.0, 15.0),
        ];
        let reversed: Vec<Vec2> = points.iter().rev().copied().collect();
        cw.fill_polygon(&points, Color::rgb(9, 9, 9), 1.0);
        ccw.fill_polygon(&reversed, Color::rgb(9, 9, 9), 1.0);
        assert_eq!(cw.pixels(), ccw.pixels());
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let mut canvas = Canvas::new(10, 10);
        let huge = [
            Vec2::new(-100.0, -100.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(-100.0, 100.0),
        ];
        canvas.fill_polygon(&huge, Color::rgb(1, 2, 3), 1.0);
        assert!(canvas.pixels().chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_blend_half_alpha_over_transparent() {
        let mut canvas = Canvas::new(1, 1);
        canvas.blend_pixel(0, 0, Color::rgb(200, 100, 0), 0.5);
        // Over a transparent destination the color stays the source color
        assert_eq!(red_at(&canvas, 0, 0), 200);
        assert_eq!(alpha_at(&canvas, 0, 0), 128);
    }

    #[test]
    fn test_blend_out_of_bounds_dropped() {
        let mut canvas = Canvas::new(2, 2);
        canvas.blend_pixel(-1, 0, Color::rgb(255, 255, 255), 1.0);
        canvas.blend_pixel(0, 2, Color::rgb(255, 255, 255), 1.0);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_ellipse_roughly_round() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_ellipse(Vec2::new(20.0, 20.0), 10.0, 5.0, 0.0, Color::rgb(7, 7, 7), 1.0);
        assert_eq!(alpha_at(&canvas, 20, 20), 255);
        // Inside along the major axis, outside along the minor
        assert_eq!(alpha_at(&canvas, 28, 20), 255);
        assert_eq!(alpha_at(&canvas, 20, 28), 0);
    }

    #[test]
    fn test_fill_path_applies_transform() {
        let mut canvas = Canvas::new(20, 20);
        // Unit square scaled ×10, translated to (5, 5)
        let outlines = vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]];
        let transform = Affine2::from_cols_array(&[10.0, 0.0, 0.0, 10.0, 5.0, 5.0]);
        canvas.fill_path(&outlines, transform, Color::rgb(50, 60, 70), 1.0);
        assert_eq!(alpha_at(&canvas, 10, 10), 255);
        assert_eq!(alpha_at(&canvas, 2, 2), 0);
    }

    #[test]
    fn test_blit_pattern_identity() {
        let pixels = vec![
            255, 0, 0, 255, /**/ 0, 255, 0, 255, //
            0, 0, 255, 255, /**/ 255, 255, 255, 0,
        ];
        let crate::shape::Shape::Bitmap(bitmap) =
            crate::shape::Shape::from_rgba(pixels, 2, 2).unwrap()
        else {
            panic!("expected bitmap");
        };
        let mut canvas = Canvas::new(4, 4);
        // Identity placement at the top-left corner
        canvas.blit_pattern(
            &bitmap,
            Affine2::IDENTITY,
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            1.0,
        );
        assert_eq!(red_at(&canvas, 0, 0), 255);
        assert_eq!(alpha_at(&canvas, 1, 1), 0); // transparent texel stays empty
    }

    #[test]
    fn test_clear_resets() {
        let mut canvas = Canvas::new(4, 4);
        canvas.blend_pixel(1, 1, Color::rgb(255, 255, 255), 1.0);
        canvas.clear();
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }
}
