pub mod core;
pub mod pattern;
pub mod rendering;

// Curated re-exports
pub use crate::core::config::{BatchConfig, CanvasConfig, GeneratorConfig};
pub use crate::core::error::{PatternError, Result};
pub use crate::pattern::director::{generate, generate_with, render_into, PatternSpec, RenderSummary};
pub use crate::pattern::motifs::Motif;
pub use crate::rendering::canvas::{Canvas, RasterCanvas, RecordingCanvas};
pub use crate::rendering::color::{Rgb, Rgba};
pub use crate::rendering::palette::{expand, WorkingPalette, ACCENTS, BASE_PALETTES};
