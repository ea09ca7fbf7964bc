//! Confetti shapes.
//!
//! A particle renders as one of a small, fixed set of silhouettes:
//!
//! | Shape | Description |
//! |-------|-------------|
//! | [`Shape::Square`] | Tilting quad, the classic confetti snippet (default) |
//! | [`Shape::Circle`] | Wobbling oval |
//! | [`Shape::Star`] | Five-pointed star |
//! | [`Shape::Path`] | Custom outline built from SVG path data |
//! | [`Shape::Bitmap`] | Pre-rendered RGBA image (emoji, logos, text) |
//!
//! Custom shapes are resolved entirely at construction time: path data is
//! parsed and flattened once, bitmaps are decoded once, and both carry a
//! 2D affine matrix that normalizes them to roughly the footprint of the
//! built-in shapes. The per-frame renderer only does matrix math.
//!
//! # Example
//!
//! ```ignore
//! use confetti::Shape;
//!
//! // A heart outline, auto-scaled to confetti size
//! let heart = Shape::from_path("M167 72c19,-38 37,-56 75,-56 42,0 76,33 76,75 0,76 -76,151 -151,227 -76,-76 -151,-151 -151,-227 0,-42 33,-75 75,-75 38,0 57,18 76,56Z")?;
//!
//! // An emoji pre-rendered to RGBA by the caller
//! let emoji = Shape::from_rgba(pixels, 32, 32)?;
//! ```

use std::path::Path as FsPath;
use std::sync::Arc;

use glam::{Affine2, Vec2};

use crate::error::ShapeError;

/// Segments used when flattening a bezier curve to a polyline.
const CURVE_SEGMENTS: usize = 16;

/// Custom path shapes are normalized so their longer side spans this many
/// pixels at `scalar = 1`.
const PATH_TARGET_SIZE: f32 = 10.0;

/// The silhouette a particle renders as.
///
/// A closed set: the renderer matches exhaustively and unsupported
/// variants degrade to [`Shape::Square`] rather than failing mid-frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Tilting quad (default).
    Square,
    /// Wobbling oval.
    Circle,
    /// Five-pointed star.
    Star,
    /// Custom outline from SVG path data.
    Path(Arc<PathShape>),
    /// Pre-rendered RGBA bitmap.
    Bitmap(Arc<BitmapShape>),
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Square
    }
}

impl Shape {
    /// Build a path shape from SVG path data, deriving the normalizing
    /// matrix from the path's bounding box.
    ///
    /// Supports the `M`/`L`/`H`/`V`/`C`/`Q`/`Z` commands in absolute and
    /// relative form. Curves are flattened once, here; the frame loop never
    /// re-parses.
    ///
    /// # Errors
    ///
    /// Fails fast on malformed data ([`ShapeError`]) - before any particle
    /// using the shape can be created.
    pub fn from_path(data: &str) -> Result<Self, ShapeError> {
        let outlines = parse_path_data(data)?;
        let matrix = normalizing_matrix(&outlines)?;
        Ok(Shape::Path(Arc::new(PathShape { outlines, matrix })))
    }

    /// Build a path shape with a caller-supplied matrix in
    /// `[a, b, c, d, tx, ty]` column order, skipping auto-normalization.
    pub fn from_path_with_matrix(data: &str, matrix: [f32; 6]) -> Result<Self, ShapeError> {
        let outlines = parse_path_data(data)?;
        Ok(Shape::Path(Arc::new(PathShape {
            outlines,
            matrix: Affine2::from_cols_array(&matrix),
        })))
    }

    /// Build a bitmap shape from raw RGBA8 pixels (4 bytes per pixel).
    ///
    /// The bitmap is centered on the particle position at its natural
    /// size scaled by `0.1 × scalar` per frame. Text or emoji confetti is
    /// produced by pre-rendering the glyphs to RGBA upstream and passing
    /// the pixels here (set the burst's `flat` flag to keep it upright).
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, ShapeError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected || expected == 0 {
            return Err(ShapeError::BitmapSize {
                got: pixels.len(),
                expected,
            });
        }
        let matrix = Affine2::from_cols_array(&[
            1.0,
            0.0,
            0.0,
            1.0,
            -(width as f32) / 2.0,
            -(height as f32) / 2.0,
        ]);
        Ok(Shape::Bitmap(Arc::new(BitmapShape {
            pixels,
            width,
            height,
            matrix,
        })))
    }

    /// Build a bitmap shape from an image file (PNG or JPEG).
    pub fn from_image<P: AsRef<FsPath>>(path: P) -> Result<Self, ShapeError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }
}

/// A flattened custom outline with its normalizing transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    /// Closed sub-outlines, flattened to polylines.
    pub outlines: Vec<Vec<Vec2>>,
    /// Normalizes the outline to confetti footprint, centered on origin.
    pub matrix: Affine2,
}

/// A decoded RGBA bitmap with its centering transform.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapShape {
    /// RGBA8 pixel data, row-major.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Centers the bitmap on the particle position.
    pub matrix: Affine2,
}

impl BitmapShape {
    /// Sample the texel containing `(x, y)`, or `None` outside the bitmap.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> Option<[u8; 4]> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (tx, ty) = (x as u32, y as u32);
        if tx >= self.width || ty >= self.height {
            return None;
        }
        let i = (ty * self.width + tx) as usize * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

// ============================================================================
// Path data parsing
// ============================================================================

/// Parse SVG path data into closed, flattened outlines.
fn parse_path_data(data: &str) -> Result<Vec<Vec<Vec2>>, ShapeError> {
    let mut tokens = PathTokens::new(data);
    let mut outlines: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    let mut pos = Vec2::ZERO;
    let mut start = Vec2::ZERO;
    // Last command, for implicit repetition of coordinate pairs.
    let mut last_cmd: Option<char> = None;

    while let Some(token) = tokens.next()? {
        let cmd = match token {
            Token::Command(c) => c,
            Token::Number(n) => {
                // A bare number repeats the previous command; after M/m the
                // repetition is an implicit L/l. Numbers can't follow Z or
                // start the data.
                tokens.push_back(n);
                match last_cmd {
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some(c) if c != 'Z' && c != 'z' => c,
                    _ => return Err(ShapeError::BadNumber(format!("{}", n))),
                }
            }
        };

        match cmd {
            'M' | 'm' => {
                if current.len() > 1 {
                    outlines.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                let p = tokens.point(cmd)?;
                pos = if cmd == 'm' { pos + p } else { p };
                start = pos;
                current.push(pos);
            }
            'L' | 'l' => {
                let p = tokens.point(cmd)?;
                pos = if cmd == 'l' { pos + p } else { p };
                current.push(pos);
            }
            'H' | 'h' => {
                let x = tokens.number(cmd)?;
                pos.x = if cmd == 'h' { pos.x + x } else { x };
                current.push(pos);
            }
            'V' | 'v' => {
                let y = tokens.number(cmd)?;
                pos.y = if cmd == 'v' { pos.y + y } else { y };
                current.push(pos);
            }
            'C' | 'c' => {
                let (mut c1, mut c2, mut end) =
                    (tokens.point(cmd)?, tokens.point(cmd)?, tokens.point(cmd)?);
                if cmd == 'c' {
                    c1 += pos;
                    c2 += pos;
                    end += pos;
                }
                flatten_cubic(&mut current, pos, c1, c2, end);
                pos = end;
            }
            'Q' | 'q' => {
                let (mut c1, mut end) = (tokens.point(cmd)?, tokens.point(cmd)?);
                if cmd == 'q' {
                    c1 += pos;
                    end += pos;
                }
                flatten_quadratic(&mut current, pos, c1, end);
                pos = end;
            }
            'Z' | 'z' => {
                pos = start;
                if current.len() > 1 {
                    outlines.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            other => return Err(ShapeError::BadCommand(other)),
        }
        last_cmd = Some(cmd);
    }

    // Unterminated trailing subpath still fills, like an implicit close.
    if current.len() > 1 {
        outlines.push(current);
    }

    if outlines.iter().map(Vec::len).sum::<usize>() < 3 {
        return Err(ShapeError::EmptyPath);
    }
    Ok(outlines)
}

/// Derive the matrix scaling an outline's longer side to
/// [`PATH_TARGET_SIZE`] and centering it on the origin.
fn normalizing_matrix(outlines: &[Vec<Vec2>]) -> Result<Affine2, ShapeError> {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for p in outlines.iter().flatten() {
        min = min.min(*p);
        max = max.max(*p);
    }

    let extent = max - min;
    let longest = extent.x.max(extent.y);
    if !(longest > 0.0) {
        return Err(ShapeError::EmptyPath);
    }

    let scale = PATH_TARGET_SIZE / longest;
    Ok(Affine2::from_cols_array(&[
        scale,
        0.0,
        0.0,
        scale,
        -(extent.x / 2.0 + min.x).round() * scale,
        -(extent.y / 2.0 + min.y).round() * scale,
    ]))
}

fn flatten_cubic(out: &mut Vec<Vec2>, p0: Vec2, c1: Vec2, c2: Vec2, p1: Vec2) {
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f32 / CURVE_SEGMENTS as f32;
        let u = 1.0 - t;
        let point = p0 * (u * u * u)
            + c1 * (3.0 * u * u * t)
            + c2 * (3.0 * u * t * t)
            + p1 * (t * t * t);
        out.push(point);
    }
}

fn flatten_quadratic(out: &mut Vec<Vec2>, p0: Vec2, c1: Vec2, p1: Vec2) {
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f32 / CURVE_SEGMENTS as f32;
        let u = 1.0 - t;
        out.push(p0 * (u * u) + c1 * (2.0 * u * t) + p1 * (t * t));
    }
}

enum Token {
    Command(char),
    Number(f32),
}

/// Lexer over path data: single-letter commands and float arguments
/// separated by whitespace or commas.
struct PathTokens<'a> {
    rest: std::iter::Peekable<std::str::Chars<'a>>,
    pushed: Option<f32>,
}

impl<'a> PathTokens<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            rest: data.chars().peekable(),
            pushed: None,
        }
    }

    fn push_back(&mut self, n: f32) {
        self.pushed = Some(n);
    }

    fn next(&mut self) -> Result<Option<Token>, ShapeError> {
        if let Some(n) = self.pushed.take() {
            return Ok(Some(Token::Number(n)));
        }
        while let Some(&c) = self.rest.peek() {
            if c.is_whitespace() || c == ',' {
                self.rest.next();
            } else {
                break;
            }
        }
        let Some(&c) = self.rest.peek() else {
            return Ok(None);
        };
        if c.is_ascii_alphabetic() {
            self.rest.next();
            return Ok(Some(Token::Command(c)));
        }

        let mut text = String::new();
        while let Some(&c) = self.rest.peek() {
            let continues = c.is_ascii_digit()
                || c == '.'
                || c == 'e'
                || c == 'E'
                || ((c == '-' || c == '+')
                    && (text.is_empty() || text.ends_with('e') || text.ends_with('E')));
            if continues {
                text.push(c);
                self.rest.next();
            } else {
                break;
            }
        }
        text.parse::<f32>()
            .map(|n| Some(Token::Number(n)))
            .map_err(|_| ShapeError::BadNumber(text))
    }

    fn number(&mut self, cmd: char) -> Result<f32, ShapeError> {
        match self.next()? {
            Some(Token::Number(n)) => Ok(n),
            _ => Err(ShapeError::MissingArgument(cmd)),
        }
    }

    fn point(&mut self, cmd: char) -> Result<Vec2, ShapeError> {
        Ok(Vec2::new(self.number(cmd)?, self.number(cmd)?))
    }
}
