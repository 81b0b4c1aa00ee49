pub mod batch;
pub mod director;
pub mod motifs;
pub mod overlay;
pub mod selector;
