//! Drawing surface abstraction plus two implementations:
//! [`RasterCanvas`] rasterizes into an `image::RgbImage`, [`RecordingCanvas`]
//! only records the calls it receives.
//!
//! Coordinates are in pixels with the origin at the top-left corner. Polygon
//! coverage is sampled at pixel centers with the even-odd rule, so
//! self-intersecting outlines fill like alternating bands.

use std::{fs, path::Path};

use image::RgbImage;
use smallvec::SmallVec;

use crate::core::error::{PatternError, Result};
use crate::rendering::color::{Rgb, Rgba};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Vertex list for one shape. Most motifs stay within eight vertices.
pub type Polygon = SmallVec<[Point; 8]>;

/// Minimal drawing capability the motif and overlay passes need.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill a closed outline. Fewer than 3 vertices is
    /// [`PatternError::DegenerateGeometry`] and draws nothing.
    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<()>;

    /// Fill the axis-aligned rectangle spanned by two corners (inclusive).
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba);

    /// Stroke a straight segment `width` pixels wide.
    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: u32);
}

fn check_vertices(points: &[Point]) -> Result<()> {
    if points.len() < 3 {
        return Err(PatternError::DegenerateGeometry(points.len()));
    }
    Ok(())
}

/// Quad covering a segment of the given width. A zero-length segment becomes
/// a square centered on the point.
fn line_quad(from: Point, to: Point, width: u32) -> [Point; 4] {
    let half = width.max(1) as f32 * 0.5;
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return [
            Point::new(from.x - half, from.y - half),
            Point::new(from.x + half, from.y - half),
            Point::new(from.x + half, from.y + half),
            Point::new(from.x - half, from.y + half),
        ];
    }
    let (nx, ny) = (-dy / len * half, dx / len * half);
    [
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
        Point::new(to.x - nx, to.y - ny),
        Point::new(from.x - nx, from.y - ny),
    ]
}

/// Canvas backed by an RGB8 image buffer.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, image::Rgb(background.channels())),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Raw interleaved RGB bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let p = self.image.get_pixel(x, y).0;
        Rgb::new(p[0], p[1], p[2])
    }

    /// Fraction of pixels that differ from `other`; 1.0 when dimensions differ.
    pub fn diff_ratio(&self, other: &RasterCanvas) -> f64 {
        if self.image.dimensions() != other.image.dimensions() {
            return 1.0;
        }
        let total = self.image.pixels().len();
        if total == 0 {
            return 0.0;
        }
        let differing = self
            .image
            .pixels()
            .zip(other.image.pixels())
            .filter(|(a, b)| a != b)
            .count();
        differing as f64 / total as f64
    }

    /// Encode as PNG (format picked from the extension), creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PatternError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.image.save(path).map_err(|source| PatternError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    #[inline]
    fn fill_span(&mut self, y: u32, x_start: u32, x_end: u32, color: Rgba) {
        for x in x_start..x_end {
            let px = self.image.get_pixel_mut(x, y);
            px.0 = color.blend_over(px.0);
        }
    }

    /// Even-odd scanline fill sampled at pixel centers.
    fn scan_fill(&mut self, points: &[Point], color: Rgba) {
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        if w == 0 || h == 0 || points.is_empty() {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y_first = ((min_y - 0.5).ceil() as i64).max(0);
        let y_last = ((max_y - 0.5).floor() as i64).min(h - 1);

        let mut crossings: SmallVec<[f32; 16]> = SmallVec::new();
        for y in y_first..=y_last {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y > sy) != (b.y > sy) {
                    crossings.push(a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let x_start = ((pair[0] - 0.5).ceil() as i64).clamp(0, w);
                let x_end = ((pair[1] - 0.5).ceil() as i64).clamp(0, w);
                if x_start < x_end {
                    self.fill_span(y as u32, x_start as u32, x_end as u32, color);
                }
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<()> {
        check_vertices(points)?;
        self.scan_fill(points, color);
        Ok(())
    }

    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        let xa = (x0.min(x1).round() as i64).max(0);
        let xb = (x0.max(x1).round() as i64).min(w - 1);
        let ya = (y0.min(y1).round() as i64).max(0);
        let yb = (y0.max(y1).round() as i64).min(h - 1);
        if xa > xb || ya > yb {
            return;
        }
        for y in ya..=yb {
            self.fill_span(y as u32, xa as u32, xb as u32 + 1, color);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: u32) {
        self.scan_fill(&line_quad(from, to, width), color);
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Polygon { points: Vec<Point>, color: Rgba },
    Rect { x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba },
    Line { from: Point, to: Point, color: Rgba, width: u32 },
}

impl DrawCall {
    pub fn color(&self) -> Rgba {
        match self {
            DrawCall::Polygon { color, .. } | DrawCall::Rect { color, .. } | DrawCall::Line { color, .. } => *color,
        }
    }
}

/// Canvas that keeps the call log instead of pixels. Degenerate polygons are
/// rejected exactly like [`RasterCanvas`] and counted separately.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
    rejected: usize,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) -> Result<()> {
        if let Err(e) = check_vertices(points) {
            self.rejected += 1;
            return Err(e);
        }
        self.calls.push(DrawCall::Polygon { points: points.to_vec(), color });
        Ok(())
    }

    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        self.calls.push(DrawCall::Rect { x0, y0, x1, y1, color });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: u32) {
        self.calls.push(DrawCall::Line { from, to, color, width });
    }
}
