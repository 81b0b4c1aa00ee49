//! Single-image orchestration: seed once, run one motif pass, then the overlay.

use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use crate::core::config::CanvasConfig;
use crate::core::error::Result;
use crate::pattern::motifs::{Motif, MotifStats};
use crate::pattern::overlay::{overlay, OverlayStats};
use crate::pattern::selector::SelectorState;
use crate::rendering::canvas::{Canvas, RasterCanvas};
use crate::rendering::palette::{WorkingPalette, ACCENTS};

/// Everything that determines one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub pattern_id: u32,
    pub palette: WorkingPalette,
    pub seed: u64,
}

impl PatternSpec {
    pub fn new(pattern_id: u32, palette: WorkingPalette, seed: u64) -> Self {
        Self { pattern_id, palette, seed }
    }

    pub fn motif(&self) -> Motif {
        Motif::from_pattern_id(self.pattern_id)
    }
}

/// What one render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub motif: Motif,
    pub motif_stats: MotifStats,
    pub overlay: OverlayStats,
    pub reshuffles: u32,
}

impl RenderSummary {
    pub fn shapes(&self) -> usize {
        self.motif_stats.shapes + self.overlay.drawn()
    }

    pub fn skipped(&self) -> usize {
        self.motif_stats.skipped + self.overlay.skipped
    }
}

/// Draw `spec` onto an existing canvas. The random stream is seeded from
/// `spec.seed` here and nowhere else.
pub fn render_into<C: Canvas + ?Sized>(
    spec: &PatternSpec,
    layout: &CanvasConfig,
    canvas: &mut C,
) -> Result<RenderSummary> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut selector = SelectorState::new(&spec.palette)?;
    let motif = spec.motif();

    let motif_stats = motif.draw(canvas, layout, &mut selector, &ACCENTS, &mut rng);
    let overlay = overlay(canvas, selector.palette(), &ACCENTS, &mut rng)?;

    let summary = RenderSummary {
        motif,
        motif_stats,
        overlay,
        reshuffles: selector.reshuffles(),
    };
    debug!(
        pattern_id = spec.pattern_id,
        seed = spec.seed,
        motif = motif.name(),
        shapes = summary.shapes(),
        skipped = summary.skipped(),
        reshuffles = summary.reshuffles,
        "rendered pattern"
    );
    Ok(summary)
}

/// Render onto a fresh canvas sized and colored by `layout`.
pub fn generate_with(spec: &PatternSpec, layout: &CanvasConfig) -> Result<(RasterCanvas, RenderSummary)> {
    let mut canvas = RasterCanvas::new(layout.width, layout.height, layout.background);
    let summary = render_into(spec, layout, &mut canvas)?;
    Ok((canvas, summary))
}

/// Render with the default 1280x960 white layout.
pub fn generate(spec: &PatternSpec) -> Result<RasterCanvas> {
    generate_with(spec, &CanvasConfig::default()).map(|(canvas, _)| canvas)
}
