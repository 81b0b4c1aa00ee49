//! Batch driver: maps image indices to pattern specs, renders them and
//! writes PNGs plus a JSON manifest.
//!
//! Index `i` gets palette `i % palettes`, seed `i * seed_stride + seed_offset`
//! and file name `pattern_{i+1:02}.png`. Each image owns its random stream,
//! so rendering in parallel yields the same bytes as a serial run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::{BatchConfig, CanvasConfig, GeneratorConfig};
use crate::core::error::{PatternError, Result};
use crate::pattern::director::{generate_with, PatternSpec};
use crate::rendering::palette::{expand, WorkingPalette, BASE_PALETTES};

pub const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_VERSION: u32 = 1;

/// An expanded working palette with a label for logs and the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPalette {
    pub name: String,
    pub palette: WorkingPalette,
}

/// Expand every base palette once, from a stream seeded by `batch.palette_seed`.
/// Custom palettes in the config replace the built-in catalogue.
pub fn palette_catalogue(cfg: &GeneratorConfig) -> Vec<NamedPalette> {
    let target = cfg.batch.palette_target_len;
    let mut rng = StdRng::seed_from_u64(cfg.batch.palette_seed);
    if cfg.palettes.is_empty() {
        BASE_PALETTES
            .iter()
            .map(|base| NamedPalette {
                name: base.name.to_string(),
                palette: expand(&base.colors, target, &mut rng),
            })
            .collect()
    } else {
        cfg.palettes
            .iter()
            .enumerate()
            .map(|(i, colors)| NamedPalette {
                name: format!("custom-{i}"),
                palette: expand(colors, target, &mut rng),
            })
            .collect()
    }
}

#[inline]
pub fn seed_for_index(batch: &BatchConfig, index: u32) -> u64 {
    u64::from(index)
        .wrapping_mul(batch.seed_stride)
        .wrapping_add(batch.seed_offset)
}

#[inline]
pub fn file_name_for_index(index: u32) -> String {
    format!("pattern_{:02}.png", u64::from(index) + 1)
}

/// One planned image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub index: u32,
    pub file_name: String,
    pub palette_name: String,
    pub spec: PatternSpec,
}

/// Plan a single index. `None` when the catalogue is empty.
pub fn plan_item(batch: &BatchConfig, catalogue: &[NamedPalette], index: u32) -> Option<BatchItem> {
    if catalogue.is_empty() {
        return None;
    }
    let named = &catalogue[index as usize % catalogue.len()];
    Some(BatchItem {
        index,
        file_name: file_name_for_index(index),
        palette_name: named.name.clone(),
        spec: PatternSpec::new(index, named.palette.clone(), seed_for_index(batch, index)),
    })
}

pub fn plan(batch: &BatchConfig, catalogue: &[NamedPalette]) -> Vec<BatchItem> {
    (0..batch.count)
        .filter_map(|i| plan_item(batch, catalogue, i))
        .collect()
}

/// Manifest row for a written image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub index: u32,
    pub file: String,
    pub pattern_id: u32,
    pub motif: String,
    pub palette: String,
    pub seed: u64,
    pub shapes: usize,
    pub skipped: usize,
}

/// Manifest row for an image that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub index: u32,
    pub file: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub images: Vec<ManifestEntry>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub written: Vec<ManifestEntry>,
    pub failed: Vec<BatchFailure>,
    pub manifest_path: Option<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render and save one item into `out_dir`.
pub fn render_item(item: &BatchItem, layout: &CanvasConfig, out_dir: &Path) -> Result<ManifestEntry> {
    let (canvas, summary) = generate_with(&item.spec, layout)?;
    canvas.save(out_dir.join(&item.file_name))?;
    Ok(ManifestEntry {
        index: item.index,
        file: item.file_name.clone(),
        pattern_id: item.spec.pattern_id,
        motif: summary.motif.name().to_string(),
        palette: item.palette_name.clone(),
        seed: item.spec.seed,
        shapes: summary.shapes(),
        skipped: summary.skipped(),
    })
}

/// Render `items`, logging and collecting per-image failures instead of
/// stopping. Only directory creation and manifest writing abort the run.
pub fn run_items(items: &[BatchItem], cfg: &GeneratorConfig, out_dir: &Path) -> Result<BatchReport> {
    fs::create_dir_all(out_dir).map_err(|source| PatternError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let layout = &cfg.canvas;
    let render = |item: &BatchItem| render_item(item, layout, out_dir);
    let outcomes: Vec<Result<ManifestEntry>> = if cfg.batch.parallel {
        items.par_iter().map(render).collect()
    } else {
        items.iter().map(render).collect()
    };

    let mut report = BatchReport::default();
    for (item, outcome) in items.iter().zip(outcomes) {
        match outcome {
            Ok(entry) => {
                info!(file = %entry.file, motif = %entry.motif, palette = %entry.palette, seed = entry.seed, "created pattern");
                report.written.push(entry);
            }
            Err(e) => {
                warn!(index = item.index, file = %item.file_name, error = %e, "pattern failed");
                report.failed.push(BatchFailure {
                    index: item.index,
                    file: item.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if cfg.batch.write_manifest {
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            width: layout.width,
            height: layout.height,
            images: report.written.clone(),
            failures: report.failed.clone(),
        };
        let path = out_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json).map_err(|source| PatternError::Io {
            path: path.clone(),
            source,
        })?;
        report.manifest_path = Some(path);
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        dir = %out_dir.display(),
        "batch finished"
    );
    Ok(report)
}

/// Plan and render the whole configured batch.
pub fn run_batch(cfg: &GeneratorConfig, out_dir: &Path) -> Result<BatchReport> {
    let catalogue = palette_catalogue(cfg);
    let items = plan(&cfg.batch, &catalogue);
    run_items(&items, cfg, out_dir)
}
