pub mod config;

pub use config::{BatchConfig, CanvasConfig, GeneratorConfig};
