//! Translucent accent pass drawn over the base motif.

use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::core::error::{PatternError, Result};
use crate::rendering::canvas::{Canvas, Point};
use crate::rendering::color::Rgb;

pub const SHAPE_COUNT: RangeInclusive<u32> = 30..=60;
/// Applied after the uniform kind draw and wins over it.
pub const LINE_OVERRIDE_CHANCE: f64 = 0.10;
pub const ACCENT_CHANCE: f64 = 0.12;
pub const LINE_WIDTH: RangeInclusive<u32> = 3..=8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayShape {
    Triangle,
    Rect,
    Diamond,
    Line,
}

impl OverlayShape {
    pub const ALL: [OverlayShape; 4] = [
        OverlayShape::Triangle,
        OverlayShape::Rect,
        OverlayShape::Diamond,
        OverlayShape::Line,
    ];

    /// Fill alpha; lines are stroked opaque.
    pub const fn alpha(self) -> u8 {
        match self {
            OverlayShape::Triangle => 180,
            OverlayShape::Rect => 160,
            OverlayShape::Diamond => 170,
            OverlayShape::Line => 255,
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = Self::ALL[rng.gen_range(0..Self::ALL.len())];
        if rng.gen_bool(LINE_OVERRIDE_CHANCE) {
            OverlayShape::Line
        } else {
            kind
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayStats {
    pub triangles: usize,
    pub rects: usize,
    pub diamonds: usize,
    pub lines: usize,
    pub skipped: usize,
}

impl OverlayStats {
    pub fn drawn(&self) -> usize {
        self.triangles + self.rects + self.diamonds + self.lines
    }

    fn record(&mut self, shape: OverlayShape) {
        match shape {
            OverlayShape::Triangle => self.triangles += 1,
            OverlayShape::Rect => self.rects += 1,
            OverlayShape::Diamond => self.diamonds += 1,
            OverlayShape::Line => self.lines += 1,
        }
    }
}

fn upto<R: Rng + ?Sized>(rng: &mut R, hi: i64) -> f32 {
    rng.gen_range(0..=hi.max(0)) as f32
}

fn between<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64) -> f32 {
    rng.gen_range(lo..=hi.max(lo)) as f32
}

/// Scatter 30..=60 accent shapes over `canvas`.
///
/// Colors are drawn uniformly from `palette` (88%) or `accents` (12%), without
/// going through the selector's repetition policy.
pub fn overlay<C, R>(canvas: &mut C, palette: &[Rgb], accents: &[Rgb], rng: &mut R) -> Result<OverlayStats>
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    if palette.is_empty() {
        return Err(PatternError::EmptyPalette);
    }
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let mut stats = OverlayStats::default();
    let count = rng.gen_range(SHAPE_COUNT);
    for _ in 0..count {
        let shape = OverlayShape::random(rng);

        let mut color = palette[rng.gen_range(0..palette.len())];
        if rng.gen_bool(ACCENT_CHANCE) {
            if let Some(accent) = accents.choose(rng) {
                color = *accent;
            }
        }
        let fill = color.with_alpha(shape.alpha());

        let filled = match shape {
            OverlayShape::Triangle => {
                let (x1, y1) = (upto(rng, w), upto(rng, h));
                let mut near = |c: f32| c + rng.gen_range(-60..=60) as f32;
                let (x2, y2) = (near(x1), near(y1));
                let (x3, y3) = (near(x1), near(y1));
                canvas.fill_polygon(&[Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3)], fill)
            }
            OverlayShape::Rect => {
                let (x, y) = (upto(rng, w - 50), upto(rng, h - 50));
                let rw = rng.gen_range(20..=80) as f32;
                let rh = rng.gen_range(20..=80) as f32;
                canvas.fill_rect(x, y, x + rw, y + rh, fill);
                Ok(())
            }
            OverlayShape::Diamond => {
                let (cx, cy) = (between(rng, 30, w - 30), between(rng, 30, h - 30));
                let r = rng.gen_range(20..=50) as f32;
                canvas.fill_polygon(
                    &[
                        Point::new(cx, cy - r),
                        Point::new(cx + r, cy),
                        Point::new(cx, cy + r),
                        Point::new(cx - r, cy),
                    ],
                    fill,
                )
            }
            OverlayShape::Line => {
                let from = Point::new(upto(rng, w), upto(rng, h));
                let to = Point::new(upto(rng, w), upto(rng, h));
                let width = rng.gen_range(LINE_WIDTH);
                canvas.stroke_line(from, to, fill, width);
                Ok(())
            }
        };
        match filled {
            Ok(()) => stats.record(shape),
            Err(e) => {
                debug!(?shape, error = %e, "skipping overlay shape");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}
