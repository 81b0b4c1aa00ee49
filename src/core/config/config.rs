use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::rendering::color::Rgb;

/// Output surface and the logical grid motifs are spaced on.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
    pub background: Rgb,
}
impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            columns: 20,
            rows: 15,
            background: Rgb::WHITE,
        }
    }
}
impl CanvasConfig {
    /// Horizontal grid step in pixels.
    pub fn x_incr(&self) -> f32 {
        self.width as f32 / self.columns.max(1) as f32
    }
    /// Vertical grid step in pixels.
    pub fn y_incr(&self) -> f32 {
        self.height as f32 / self.rows.max(1) as f32
    }
    /// Number of logical grid cells; scales motif iteration counts.
    pub fn cells(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    pub count: u32,
    pub output_dir: PathBuf,
    /// seed(i) = i * seed_stride + seed_offset
    pub seed_stride: u64,
    pub seed_offset: u64,
    pub palette_target_len: usize,
    /// Seeds the one-off palette expansion so working palettes are stable across runs.
    pub palette_seed: u64,
    pub parallel: bool,
    pub write_manifest: bool,
}
impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 50,
            output_dir: PathBuf::from("generated_patterns"),
            seed_stride: 137,
            seed_offset: 42,
            palette_target_len: 10,
            palette_seed: 0,
            parallel: true,
            write_manifest: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub canvas: CanvasConfig,
    pub batch: BatchConfig,
    /// Custom base palettes. Empty = built-in catalogue.
    pub palettes: Vec<Vec<Rgb>>,
}

impl GeneratorConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load or fall back to defaults, returning the load error message if any.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Non-fatal warnings about suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let c = &self.canvas;
        if c.width == 0 || c.height == 0 {
            w.push(format!("canvas dimensions must be > 0 (got {}x{})", c.width, c.height));
        }
        if u64::from(c.width) * u64::from(c.height) > 64_000_000 {
            w.push(format!("very large canvas: {}x{}", c.width, c.height));
        }
        if c.columns == 0 || c.rows == 0 {
            w.push(format!(
                "canvas grid {}x{} has no cells; scattered motifs draw nothing",
                c.columns, c.rows
            ));
        }
        if c.columns > c.width || c.rows > c.height {
            w.push(format!(
                "canvas grid {}x{} finer than one pixel per cell",
                c.columns, c.rows
            ));
        }
        let b = &self.batch;
        if b.count == 0 {
            w.push("batch.count is 0; nothing will be generated".into());
        }
        if b.seed_stride == 0 {
            w.push("batch.seed_stride is 0; every image shares one seed".into());
        }
        if b.palette_target_len == 0 {
            w.push("batch.palette_target_len is 0; palettes stay at their base colors".into());
        }
        for (i, p) in self.palettes.iter().enumerate() {
            if p.is_empty() {
                w.push(format!("palettes[{i}] is empty; images using it will fail"));
            } else if b.palette_target_len < p.len() {
                w.push(format!(
                    "palettes[{i}] has {} colors, more than palette_target_len {}",
                    p.len(),
                    b.palette_target_len
                ));
            }
        }
        w
    }
}
