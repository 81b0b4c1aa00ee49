//! Curated base palettes, the shared accent set, and tonal expansion into
//! working palettes.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::rendering::color::Rgb;

/// Default size a base palette is expanded to.
pub const DEFAULT_TARGET_LEN: usize = 10;

/// Blend / darken factor range used by tint and shade.
pub const TONE_FACTOR_MIN: f32 = 0.12;
pub const TONE_FACTOR_MAX: f32 = 0.45;

/// Per-channel jitter amplitude.
pub const JITTER_AMOUNT: i32 = 18;

/// Hand-authored five color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasePalette {
    pub name: &'static str,
    pub colors: [Rgb; 5],
}

/// Built-in catalogue. Order matters: the batch driver rotates through it by index.
pub const BASE_PALETTES: [BasePalette; 8] = [
    BasePalette {
        name: "earth-green",
        colors: [
            Rgb::new(80, 120, 20),
            Rgb::new(100, 140, 30),
            Rgb::new(60, 100, 15),
            Rgb::new(120, 160, 40),
            Rgb::new(90, 130, 25),
        ],
    },
    BasePalette {
        name: "amber",
        colors: [
            Rgb::new(150, 100, 20),
            Rgb::new(180, 120, 30),
            Rgb::new(120, 80, 15),
            Rgb::new(200, 140, 40),
            Rgb::new(160, 110, 25),
        ],
    },
    BasePalette {
        name: "cool-blue",
        colors: [
            Rgb::new(20, 60, 100),
            Rgb::new(40, 80, 140),
            Rgb::new(30, 77, 108),
            Rgb::new(43, 57, 75),
            Rgb::new(60, 100, 160),
        ],
    },
    BasePalette {
        name: "red-orange",
        colors: [
            Rgb::new(180, 40, 40),
            Rgb::new(200, 80, 20),
            Rgb::new(160, 60, 30),
            Rgb::new(200, 50, 50),
            Rgb::new(220, 100, 30),
        ],
    },
    BasePalette {
        name: "violet",
        colors: [
            Rgb::new(120, 40, 180),
            Rgb::new(100, 20, 140),
            Rgb::new(180, 40, 120),
            Rgb::new(140, 60, 160),
            Rgb::new(160, 80, 200),
        ],
    },
    BasePalette {
        name: "teal",
        colors: [
            Rgb::new(0, 120, 120),
            Rgb::new(20, 180, 180),
            Rgb::new(50, 150, 150),
            Rgb::new(40, 140, 160),
            Rgb::new(60, 140, 140),
        ],
    },
    BasePalette {
        name: "brown",
        colors: [
            Rgb::new(100, 60, 20),
            Rgb::new(120, 80, 40),
            Rgb::new(80, 50, 25),
            Rgb::new(140, 100, 60),
            Rgb::new(110, 70, 30),
        ],
    },
    BasePalette {
        name: "high-contrast",
        colors: [
            Rgb::new(180, 0, 180),
            Rgb::new(0, 160, 160),
            Rgb::new(200, 200, 0),
            Rgb::new(200, 0, 100),
            Rgb::new(100, 180, 0),
        ],
    },
];

/// High-saturation "pop" colors shared by every palette.
pub const ACCENTS: [Rgb; 6] = [
    Rgb::new(255, 255, 255), // white
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(255, 0, 255),   // magenta
    Rgb::new(255, 128, 0),   // orange
    Rgb::new(128, 255, 0),   // lime
];

/// Blend each channel toward white by `factor`.
pub fn tint(color: Rgb, factor: f32) -> Rgb {
    let up = |c: u8| f32::from(c) + (255.0 - f32::from(c)) * factor;
    Rgb::from_f32(up(color.r), up(color.g), up(color.b))
}

/// Darken each channel by `factor`.
pub fn shade(color: Rgb, factor: f32) -> Rgb {
    let down = |c: u8| f32::from(c) * (1.0 - factor);
    Rgb::from_f32(down(color.r), down(color.g), down(color.b))
}

/// Offset each channel independently by a random integer in `-amount..=amount`.
pub fn jitter<R: Rng + ?Sized>(color: Rgb, amount: i32, rng: &mut R) -> Rgb {
    let amount = amount.abs();
    let mut nudge = |c: u8| i32::from(c) + rng.gen_range(-amount..=amount);
    let r = nudge(color.r);
    let g = nudge(color.g);
    let b = nudge(color.b);
    Rgb::from_i32(r, g, b)
}

/// Tonal transform applied during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Tint,
    Shade,
    Jitter,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Tint, Tone::Shade, Tone::Jitter];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn apply<R: Rng + ?Sized>(self, color: Rgb, rng: &mut R) -> Rgb {
        match self {
            Tone::Tint => tint(color, rng.gen_range(TONE_FACTOR_MIN..=TONE_FACTOR_MAX)),
            Tone::Shade => shade(color, rng.gen_range(TONE_FACTOR_MIN..=TONE_FACTOR_MAX)),
            Tone::Jitter => jitter(color, JITTER_AMOUNT, rng),
        }
    }
}

/// Deduplicated, ordered set of fill colors for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkingPalette {
    colors: Vec<Rgb>,
}

impl WorkingPalette {
    /// Keeps the first occurrence of every exact triple, preserving order.
    pub fn from_colors(colors: impl IntoIterator<Item = Rgb>) -> Self {
        let mut seen = HashSet::new();
        let colors = colors.into_iter().filter(|c| seen.insert(*c)).collect();
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }
}

/// Grow `base` to `target_len` colors by tinting, shading or jittering base
/// entries in round-robin order, then drop exact duplicates.
///
/// Base colors always come first. An empty base yields an empty palette.
pub fn expand<R: Rng + ?Sized>(base: &[Rgb], target_len: usize, rng: &mut R) -> WorkingPalette {
    if base.is_empty() {
        return WorkingPalette::default();
    }
    let mut colors = base.to_vec();
    let mut i = 0usize;
    while colors.len() < target_len {
        let source = base[i % base.len()];
        colors.push(Tone::random(rng).apply(source, rng));
        i += 1;
    }
    WorkingPalette::from_colors(colors)
}
