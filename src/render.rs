//! Per-frame particle rasterization.
//!
//! [`draw_particle`] dispatches on the particle's shape and fills the
//! silhouette into a [`Canvas`] at the particle's current opacity. The
//! dispatch is a pure function of the shape and a [`Capabilities`] value
//! computed once up front - there is no ambient feature probing in the
//! frame loop, and a disabled variant degrades to the default square
//! instead of failing mid-animation.

use glam::{Affine2, Vec2};
use std::f32::consts::PI;

use crate::canvas::Canvas;
use crate::particle::Particle;
use crate::shape::Shape;

/// Oval radii are this fraction of the jitter-corner distance.
const OVAL_SCALAR: f32 = 0.6;

/// Which shape variants the host surface can rasterize.
///
/// The software canvas supports everything, so [`Capabilities::all`] is
/// the default; hosts that forward drawing to a restricted surface can
/// switch individual variants off and get the square fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Custom path outlines can be filled.
    pub path_shapes: bool,
    /// Bitmap patterns can be painted.
    pub bitmap_shapes: bool,
}

impl Capabilities {
    /// Every variant supported.
    pub const fn all() -> Self {
        Self {
            path_shapes: true,
            bitmap_shapes: true,
        }
    }

    /// Built-in silhouettes only; path and bitmap shapes fall back to
    /// squares.
    pub const fn minimal() -> Self {
        Self {
            path_shapes: false,
            bitmap_shapes: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Rasterize one particle onto the canvas.
pub fn draw_particle(canvas: &mut Canvas, particle: &Particle, capabilities: &Capabilities) {
    let opacity = particle.opacity();
    let jitter = particle.random;

    // Two jitter-offset corner points shared by every silhouette.
    let x1 = particle.x + jitter * particle.tilt_cos;
    let y1 = particle.y + jitter * particle.tilt_sin;
    let x2 = particle.wobble_x + jitter * particle.tilt_cos;
    let y2 = particle.wobble_y + jitter * particle.tilt_sin;
    let rotation = PI / 10.0 * particle.wobble;

    match &particle.shape {
        Shape::Path(path) if capabilities.path_shapes => {
            let scale_x = (x2 - x1).abs() * 0.1;
            let scale_y = (y2 - y1).abs() * 0.1;
            let placement = rotate_scale_at(rotation, scale_x, scale_y, particle.x, particle.y);
            canvas.fill_path(
                &path.outlines,
                placement * path.matrix,
                particle.color,
                opacity,
            );
        }
        Shape::Bitmap(bitmap) if capabilities.bitmap_shapes => {
            let scale = 0.1 * particle.scalar;
            let width = bitmap.width as f32 * scale;
            let height = bitmap.height as f32 * scale;
            let placement = rotate_scale_at(rotation, scale, scale, particle.x, particle.y);
            canvas.blit_pattern(
                bitmap,
                placement * bitmap.matrix,
                Vec2::new(particle.x - width / 2.0, particle.y - height / 2.0),
                Vec2::new(width, height),
                opacity,
            );
        }
        Shape::Circle => {
            canvas.fill_ellipse(
                Vec2::new(particle.x, particle.y),
                (x2 - x1).abs() * OVAL_SCALAR,
                (y2 - y1).abs() * OVAL_SCALAR,
                rotation,
                particle.color,
                opacity,
            );
        }
        Shape::Star => {
            let outer_radius = 8.0 * particle.scalar;
            let inner_radius = 4.0 * particle.scalar;
            let step = PI / 5.0;
            let mut rot = 1.5 * PI;
            let mut points = Vec::with_capacity(10);
            for _ in 0..5 {
                points.push(Vec2::new(
                    particle.x + rot.cos() * outer_radius,
                    particle.y + rot.sin() * outer_radius,
                ));
                rot += step;
                points.push(Vec2::new(
                    particle.x + rot.cos() * inner_radius,
                    particle.y + rot.sin() * inner_radius,
                ));
                rot += step;
            }
            canvas.fill_polygon(&points, particle.color, opacity);
        }
        // Square, plus the fallback for variants the host can't rasterize.
        Shape::Square | Shape::Path(_) | Shape::Bitmap(_) => {
            let quad = [
                Vec2::new(particle.x.floor(), particle.y.floor()),
                Vec2::new(particle.wobble_x.floor(), y1.floor()),
                Vec2::new(x2.floor(), y2.floor()),
                Vec2::new(x1.floor(), particle.wobble_y.floor()),
            ];
            canvas.fill_polygon(&quad, particle.color, opacity);
        }
    }
}

/// Rotation-and-scale matrix anchored at `(x, y)`, column order
/// `[cos·sx, sin·sx, −sin·sy, cos·sy, x, y]`.
fn rotate_scale_at(rotation: f32, scale_x: f32, scale_y: f32, x: f32, y: f32) -> Affine2 {
    let (sin, cos) = rotation.sin_cos();
    Affine2::from_cols_array(&[
        cos * scale_x,
        sin * scale_x,
        -sin * scale_y,
        cos * scale_y,
        x,
        y,
    ])
}
