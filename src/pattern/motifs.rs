//! The twelve base motif families.
//!
//! Each family scatters or tiles one kind of shape across the canvas, asking
//! the [`SelectorState`] for every fill. Iteration counts scale with the
//! layout's grid (`columns * rows`), grid-tiled families step by multiples
//! of the cell size.

use std::f32::consts::{FRAC_PI_3, PI, TAU};

use rand::Rng;
use smallvec::smallvec;
use tracing::debug;

use crate::core::config::CanvasConfig;
use crate::pattern::selector::SelectorState;
use crate::rendering::canvas::{Canvas, Point, Polygon};
use crate::rendering::color::Rgb;

/// Motif family, picked by `pattern_id % 12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motif {
    Triangles,
    DiagonalStripes,
    SkewedQuads,
    DirectionalTriangles,
    Pentagons,
    AngledBlocks,
    Stars,
    ParallelogramGrid,
    LBlocks,
    Trapezoids,
    Crosses,
    Hexagons,
}

/// Shape counts from one motif pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotifStats {
    pub shapes: usize,
    /// Shapes dropped as degenerate geometry.
    pub skipped: usize,
}

impl Motif {
    pub const ALL: [Motif; 12] = [
        Motif::Triangles,
        Motif::DiagonalStripes,
        Motif::SkewedQuads,
        Motif::DirectionalTriangles,
        Motif::Pentagons,
        Motif::AngledBlocks,
        Motif::Stars,
        Motif::ParallelogramGrid,
        Motif::LBlocks,
        Motif::Trapezoids,
        Motif::Crosses,
        Motif::Hexagons,
    ];

    #[inline]
    pub fn from_pattern_id(pattern_id: u32) -> Self {
        Self::ALL[(pattern_id % Self::ALL.len() as u32) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Motif::Triangles => "triangles",
            Motif::DiagonalStripes => "diagonal-stripes",
            Motif::SkewedQuads => "skewed-quads",
            Motif::DirectionalTriangles => "directional-triangles",
            Motif::Pentagons => "pentagons",
            Motif::AngledBlocks => "angled-blocks",
            Motif::Stars => "stars",
            Motif::ParallelogramGrid => "parallelogram-grid",
            Motif::LBlocks => "l-blocks",
            Motif::Trapezoids => "trapezoids",
            Motif::Crosses => "crosses",
            Motif::Hexagons => "hexagons",
        }
    }

    /// Run this family's pass over `canvas`.
    pub fn draw<C, R>(
        self,
        canvas: &mut C,
        layout: &CanvasConfig,
        selector: &mut SelectorState,
        accents: &[Rgb],
        rng: &mut R,
    ) -> MotifStats
    where
        C: Canvas + ?Sized,
        R: Rng + ?Sized,
    {
        let mut p = Painter { canvas, selector, accents, motif: self, stats: MotifStats::default() };
        match self {
            Motif::Triangles => triangles(&mut p, layout, rng),
            Motif::DiagonalStripes => diagonal_stripes(&mut p, layout, rng),
            Motif::SkewedQuads => skewed_quads(&mut p, layout, rng),
            Motif::DirectionalTriangles => directional_triangles(&mut p, layout, rng),
            Motif::Pentagons => pentagons(&mut p, layout, rng),
            Motif::AngledBlocks => angled_blocks(&mut p, layout, rng),
            Motif::Stars => stars(&mut p, layout, rng),
            Motif::ParallelogramGrid => parallelogram_grid(&mut p, layout, rng),
            Motif::LBlocks => l_blocks(&mut p, layout, rng),
            Motif::Trapezoids => trapezoids(&mut p, layout, rng),
            Motif::Crosses => crosses(&mut p, layout, rng),
            Motif::Hexagons => hexagons(&mut p, layout, rng),
        }
        p.stats
    }
}

/// Couples the canvas with the color policy so every shape pulls exactly one fill.
struct Painter<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    selector: &'a mut SelectorState,
    accents: &'a [Rgb],
    motif: Motif,
    stats: MotifStats,
}

impl<C: Canvas + ?Sized> Painter<'_, C> {
    fn polygon<R: Rng + ?Sized>(&mut self, points: &[Point], rng: &mut R) {
        let color = self.selector.next(self.accents, rng);
        match self.canvas.fill_polygon(points, color.opaque()) {
            Ok(()) => self.stats.shapes += 1,
            Err(e) => {
                debug!(motif = self.motif.name(), error = %e, "skipping shape");
                self.stats.skipped += 1;
            }
        }
    }

    fn rect<R: Rng + ?Sized>(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, rng: &mut R) {
        let color = self.selector.next(self.accents, rng);
        self.canvas.fill_rect(x0, y0, x1, y1, color.opaque());
        self.stats.shapes += 1;
    }
}

// Sampling helpers

/// Loop count for scattered families: `cells * tenths / 10`, truncated and saturating.
fn scaled(layout: &CanvasConfig, tenths: u32) -> usize {
    let count = layout.cells().saturating_mul(u64::from(tenths)) / 10;
    usize::try_from(count).unwrap_or(usize::MAX)
}

/// Integer coordinate in `0..=hi`; negative bounds collapse to 0.
fn coord<R: Rng + ?Sized>(rng: &mut R, hi: i64) -> f32 {
    rng.gen_range(0..=hi.max(0)) as f32
}

/// Integer offset in `-amount..=amount`.
fn spread<R: Rng + ?Sized>(rng: &mut R, amount: i32) -> f32 {
    rng.gen_range(-amount..=amount) as f32
}

/// Float in `lo..hi`, or `lo` when the range is empty.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Grid origins along one axis: `0, step, 2*step, .. < extent`, step truncated to whole pixels.
fn grid_steps(extent: u32, step: f32) -> impl Iterator<Item = f32> + Clone {
    (0..extent).step_by((step as usize).max(1)).map(|v| v as f32)
}

fn regular_polygon(cx: f32, cy: f32, radius: f32, sides: usize, rotation: f32) -> Polygon {
    (0..sides)
        .map(|i| {
            let angle = rotation + TAU * i as f32 / sides as f32;
            Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn pt(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

// Families

fn triangles<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 15) {
        let (x1, y1) = (coord(rng, l.width.into()), coord(rng, l.height.into()));
        let (x2, y2) = (x1 + spread(rng, 100), y1 + spread(rng, 100));
        let (x3, y3) = (x1 + spread(rng, 100), y1 + spread(rng, 100));
        p.polygon(&[pt(x1, y1), pt(x2, y2), pt(x3, y3)], rng);
    }
}

/// Bands running up-right at 45 degrees. The top edge is sampled every grid
/// column with a wobble; the bottom edge mirrors it `stripe` pixels lower.
fn diagonal_stripes<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    let stripe = rng.gen_range(30..=80u32);
    let column = (l.x_incr() as usize).max(1);
    let span = u64::from(l.width) + u64::from(l.height);
    for i in (0..span).step_by(stripe as usize) {
        let mut top: Polygon = Polygon::new();
        let mut bottom: Polygon = Polygon::new();
        for j in (0..=l.width).step_by(column) {
            let offset = spread(rng, 30);
            let y = i as f32 - j as f32 + offset;
            top.push(pt(j as f32, y));
            bottom.push(pt(j as f32, y + stripe as f32));
        }
        top.extend(bottom.into_iter().rev());
        p.polygon(&top, rng);
    }
}

fn skewed_quads<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 8) {
        let (x, y) = (coord(rng, i64::from(l.width) - 100), coord(rng, i64::from(l.height) - 100));
        let w = rng.gen_range(40..=150) as f32;
        let h = rng.gen_range(40..=150) as f32;
        let skew = spread(rng, 30);
        p.polygon(&[pt(x, y), pt(x + w + skew, y), pt(x + w, y + h), pt(x - skew, y + h)], rng);
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Isosceles triangle inside the `size` square at (x, y), apex pointing this way.
    fn triangle(self, x: f32, y: f32, size: f32) -> [Point; 3] {
        let half = size / 2.0;
        match self {
            Direction::Up => [pt(x + half, y), pt(x + size, y + size), pt(x, y + size)],
            Direction::Down => [pt(x, y), pt(x + size, y), pt(x + half, y + size)],
            Direction::Left => [pt(x + size, y), pt(x + size, y + size), pt(x, y + half)],
            Direction::Right => [pt(x, y), pt(x, y + size), pt(x + size, y + half)],
        }
    }
}

fn directional_triangles<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    let (dx, dy) = (l.x_incr(), l.y_incr());
    let rows = grid_steps(l.height, dy * 2.0);
    for x in grid_steps(l.width, dx * 2.0) {
        for y in rows.clone() {
            let direction = Direction::random(rng);
            let size = uniform(rng, dx, dx * 2.0);
            p.polygon(&direction.triangle(x, y, size), rng);
        }
    }
}

fn pentagons<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 6) {
        let (cx, cy) = (coord(rng, l.width.into()), coord(rng, l.height.into()));
        let radius = rng.gen_range(30..=80) as f32;
        let rotation = uniform(rng, 0.0, TAU);
        p.polygon(&regular_polygon(cx, cy, radius, 5, rotation), rng);
    }
}

/// Bars at 0/45/90/135 degrees. Axis-aligned bars go through the rectangle
/// primitive, rotated ones become parallelograms anchored at (x, y).
fn angled_blocks<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    const ANGLES: [u16; 4] = [0, 45, 90, 135];
    for _ in 0..scaled(l, 10) {
        let (x, y) = (coord(rng, l.width.into()), coord(rng, l.height.into()));
        let w = rng.gen_range(30..=120) as f32;
        let h = rng.gen_range(10..=60) as f32;
        let angle = ANGLES[rng.gen_range(0..ANGLES.len())];
        if angle == 0 {
            p.rect(x, y, x + w, y + h, rng);
        } else {
            let (sin, cos) = f32::from(angle).to_radians().sin_cos();
            p.polygon(
                &[
                    pt(x, y),
                    pt(x + w * cos, y + w * sin),
                    pt(x + w * cos - h * sin, y + w * sin + h * cos),
                    pt(x - h * sin, y + h * cos),
                ],
                rng,
            );
        }
    }
}

fn stars<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    let count = rng.gen_range(15..=30);
    for _ in 0..count {
        let (cx, cy) = (coord(rng, l.width.into()), coord(rng, l.height.into()));
        let tips = rng.gen_range(4..=8usize);
        let outer = rng.gen_range(20..=60) as f32;
        let inner = outer * uniform(rng, 0.3, 0.6);
        let outline: Polygon = (0..tips * 2)
            .map(|i| {
                let angle = PI * i as f32 / tips as f32;
                let r = if i % 2 == 0 { outer } else { inner };
                pt(cx + r * angle.cos(), cy + r * angle.sin())
            })
            .collect();
        p.polygon(&outline, rng);
    }
}

fn parallelogram_grid<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    let (dx, dy) = (l.x_incr(), l.y_incr());
    let (w, h) = (dx * 1.3, dy * 1.3);
    let rows = grid_steps(l.height, dy * 1.5);
    for x in grid_steps(l.width, dx * 1.5) {
        for y in rows.clone() {
            let skew = rng.gen_range(10..=40) as f32;
            p.polygon(&[pt(x, y), pt(x + w, y + skew), pt(x + w, y + h + skew), pt(x, y + h)], rng);
        }
    }
}

/// L-shaped block of outer `size` and arm `thickness`, one of four
/// orientations (corner bottom-left, top-left, top-right, bottom-right).
fn l_block(x: f32, y: f32, size: f32, t: f32, orientation: u8) -> Polygon {
    match orientation {
        0 => smallvec![
            pt(x, y),
            pt(x + t, y),
            pt(x + t, y + size - t),
            pt(x + size, y + size - t),
            pt(x + size, y + size),
            pt(x, y + size),
        ],
        1 => smallvec![
            pt(x, y),
            pt(x + size, y),
            pt(x + size, y + t),
            pt(x + t, y + t),
            pt(x + t, y + size),
            pt(x, y + size),
        ],
        2 => smallvec![
            pt(x, y),
            pt(x + size, y),
            pt(x + size, y + size),
            pt(x + size - t, y + size),
            pt(x + size - t, y + t),
            pt(x, y + t),
        ],
        _ => smallvec![
            pt(x, y + t),
            pt(x + size - t, y + t),
            pt(x + size - t, y),
            pt(x + size, y),
            pt(x + size, y + size),
            pt(x, y + size),
        ],
    }
}

fn l_blocks<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 7) {
        let (x, y) = (coord(rng, i64::from(l.width) - 100), coord(rng, i64::from(l.height) - 100));
        let size = rng.gen_range(40..=100) as f32;
        let thickness = rng.gen_range(15..=40) as f32;
        let orientation = rng.gen_range(0..=3u8);
        p.polygon(&l_block(x, y, size, thickness, orientation), rng);
    }
}

fn trapezoids<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 8) {
        let (x, y) = (coord(rng, i64::from(l.width) - 100), coord(rng, i64::from(l.height) - 100));
        let w1 = rng.gen_range(40..=120) as f32;
        let w2 = rng.gen_range(40..=120) as f32;
        let h = rng.gen_range(30..=100) as f32;
        p.polygon(&[pt(x, y), pt(x + w1, y), pt(x + w2, y + h), pt(x - (w1 - w2), y + h)], rng);
    }
}

/// Plus signs built from a horizontal and a vertical bar, each with its own fill.
fn crosses<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    let (dx, dy) = (l.x_incr(), l.y_incr());
    let rows = grid_steps(l.height, dy * 2.0);
    for x in grid_steps(l.width, dx * 2.0) {
        for y in rows.clone() {
            let size = uniform(rng, dx * 0.8, dx * 1.5);
            let thickness = size * uniform(rng, 0.2, 0.4);
            let (cx, cy) = (x + spread(rng, 20), y + spread(rng, 20));
            let (hs, ht) = (size / 2.0, thickness / 2.0);
            p.rect(cx - hs, cy - ht, cx + hs, cy + ht, rng);
            p.rect(cx - ht, cy - hs, cx + ht, cy + hs, rng);
        }
    }
}

fn hexagons<C: Canvas + ?Sized, R: Rng + ?Sized>(p: &mut Painter<'_, C>, l: &CanvasConfig, rng: &mut R) {
    for _ in 0..scaled(l, 5) {
        let (cx, cy) = (coord(rng, l.width.into()), coord(rng, l.height.into()));
        let radius = rng.gen_range(25..=70) as f32;
        let rotation = uniform(rng, 0.0, FRAC_PI_3);
        p.polygon(&regular_polygon(cx, cy, radius, 6, rotation), rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::canvas::{DrawCall, RecordingCanvas};
    use crate::rendering::palette::{expand, ACCENTS, BASE_PALETTES};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashMap;

    fn run(motif: Motif, seed: u64) -> (RecordingCanvas, MotifStats) {
        let layout = CanvasConfig::default();
        let palette = expand(&BASE_PALETTES[2].colors, 10, &mut StdRng::seed_from_u64(0));
        let mut selector = SelectorState::new(&palette).unwrap();
        let mut canvas = RecordingCanvas::new(layout.width, layout.height);
        let mut rng = StdRng::seed_from_u64(seed);
        let stats = motif.draw(&mut canvas, &layout, &mut selector, &ACCENTS, &mut rng);
        (canvas, stats)
    }

    fn vertex_counts(canvas: &RecordingCanvas) -> Vec<usize> {
        canvas
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Polygon { points, .. } => Some(points.len()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn pattern_ids_cover_every_variant() {
        let mut hits: HashMap<Motif, usize> = HashMap::new();
        for id in 0..50 {
            *hits.entry(Motif::from_pattern_id(id)).or_default() += 1;
        }
        assert_eq!(hits.len(), 12);
        assert!(hits.values().all(|&n| n >= 3), "{hits:?}");
        assert_eq!(Motif::from_pattern_id(11), Motif::Hexagons);
        assert_eq!(Motif::from_pattern_id(12), Motif::Triangles);
    }

    #[test]
    fn scattered_families_use_grid_scaled_counts() {
        assert_eq!(run(Motif::Triangles, 1).1.shapes, 450);
        assert_eq!(run(Motif::SkewedQuads, 1).1.shapes, 240);
        assert_eq!(run(Motif::Pentagons, 1).1.shapes, 180);
        assert_eq!(run(Motif::AngledBlocks, 1).1.shapes, 300);
        assert_eq!(run(Motif::LBlocks, 1).1.shapes, 210);
        assert_eq!(run(Motif::Trapezoids, 1).1.shapes, 240);
        assert_eq!(run(Motif::Hexagons, 1).1.shapes, 150);
    }

    #[test]
    fn tiled_families_follow_grid() {
        // 128px steps: 10 columns x 8 rows.
        assert_eq!(run(Motif::DirectionalTriangles, 3).1.shapes, 80);
        assert_eq!(run(Motif::Crosses, 3).1.shapes, 160);
        // 96px steps: 14 columns x 10 rows.
        assert_eq!(run(Motif::ParallelogramGrid, 3).1.shapes, 140);
    }

    #[test]
    fn vertex_counts_match_shape_family() {
        let (c, _) = run(Motif::Pentagons, 5);
        assert!(vertex_counts(&c).iter().all(|&n| n == 5));
        let (c, _) = run(Motif::Hexagons, 5);
        assert!(vertex_counts(&c).iter().all(|&n| n == 6));
        let (c, _) = run(Motif::LBlocks, 5);
        assert!(vertex_counts(&c).iter().all(|&n| n == 6));
        let (c, stats) = run(Motif::Stars, 5);
        assert!((15..=30).contains(&stats.shapes));
        assert!(vertex_counts(&c).iter().all(|n| (8..=16).contains(n) && n % 2 == 0));
    }

    #[test]
    fn stripes_are_closed_bands() {
        let (c, stats) = run(Motif::DiagonalStripes, 8);
        assert!(stats.shapes >= (1280 + 960) / 80);
        // 21 samples per edge at 64px columns, top + bottom.
        assert!(vertex_counts(&c).iter().all(|&n| n == 42));
    }

    #[test]
    fn angled_blocks_mix_rects_and_parallelograms() {
        let (c, _) = run(Motif::AngledBlocks, 13);
        let rects = c.calls().iter().filter(|d| matches!(d, DrawCall::Rect { .. })).count();
        assert!(rects > 0 && rects < c.len());
    }

    #[test]
    fn motif_fills_are_opaque_and_never_skipped() {
        for motif in Motif::ALL {
            let (c, stats) = run(motif, 77);
            assert_eq!(stats.skipped, 0, "{motif:?}");
            assert_eq!(c.len(), stats.shapes, "{motif:?}");
            assert!(c.calls().iter().all(|d| d.color().is_opaque()), "{motif:?}");
        }
    }

    #[test]
    fn degenerate_stripes_are_skipped_not_fatal() {
        // Zero width leaves one sample per edge, so every band has 2 vertices.
        let layout = CanvasConfig { width: 0, ..CanvasConfig::default() };
        let palette = expand(&BASE_PALETTES[0].colors, 10, &mut StdRng::seed_from_u64(0));
        let mut selector = SelectorState::new(&palette).unwrap();
        let mut canvas = RecordingCanvas::new(layout.width, layout.height);
        let stats =
            Motif::DiagonalStripes.draw(&mut canvas, &layout, &mut selector, &ACCENTS, &mut StdRng::seed_from_u64(6));
        assert_eq!(stats.shapes, 0);
        assert!(stats.skipped >= 960 / 80, "{stats:?}");
        assert_eq!(canvas.rejected(), stats.skipped);
        assert!(canvas.is_empty());
    }

    #[test]
    fn scaled_counts_saturate_on_huge_grids() {
        let layout = CanvasConfig { columns: u32::MAX, rows: u32::MAX, ..CanvasConfig::default() };
        let expected = (u64::from(u32::MAX) * u64::from(u32::MAX)).saturating_mul(15) / 10;
        assert_eq!(scaled(&layout, 15) as u64, expected.min(usize::MAX as u64));
        let layout = CanvasConfig { columns: 70_000, rows: 70_000, ..CanvasConfig::default() };
        assert_eq!(scaled(&layout, 5) as u64, 2_450_000_000u64.min(usize::MAX as u64));
    }

    #[test]
    fn empty_grid_draws_nothing_for_scaled_families() {
        let layout = CanvasConfig { columns: 0, ..CanvasConfig::default() };
        let palette = expand(&BASE_PALETTES[0].colors, 10, &mut StdRng::seed_from_u64(0));
        let mut selector = SelectorState::new(&palette).unwrap();
        let mut canvas = RecordingCanvas::new(layout.width, layout.height);
        let stats = Motif::Triangles.draw(&mut canvas, &layout, &mut selector, &ACCENTS, &mut StdRng::seed_from_u64(1));
        assert_eq!(stats.shapes, 0);
    }
}
