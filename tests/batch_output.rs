use std::fs;

use polymotif::pattern::batch::{run_batch, Manifest, MANIFEST_FILE};
use polymotif::{CanvasConfig, GeneratorConfig, Rgb};

fn small_config(count: u32) -> GeneratorConfig {
    let mut cfg = GeneratorConfig::default();
    cfg.canvas = CanvasConfig { width: 256, height: 192, columns: 8, rows: 6, ..CanvasConfig::default() };
    cfg.batch.count = count;
    cfg
}

#[test]
fn writes_pngs_and_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = small_config(3);
    let report = run_batch(&cfg, tmp.path()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.written.len(), 3);

    for name in ["pattern_01.png", "pattern_02.png", "pattern_03.png"] {
        let img = image::open(tmp.path().join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (256, 192));
    }

    let manifest: Manifest =
        serde_json::from_str(&fs::read_to_string(tmp.path().join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest.images.len(), 3);
    assert_eq!(manifest.images[1].seed, 179);
    assert_eq!(manifest.images[1].palette, "amber");
    assert_eq!(manifest.images[2].motif, "skewed-quads");
    assert!(manifest.failures.is_empty());
}

#[test]
fn parallel_and_sequential_runs_match() {
    let par_dir = tempfile::tempdir().unwrap();
    let seq_dir = tempfile::tempdir().unwrap();
    let mut cfg = small_config(4);
    cfg.batch.write_manifest = false;
    run_batch(&cfg, par_dir.path()).unwrap();
    cfg.batch.parallel = false;
    run_batch(&cfg, seq_dir.path()).unwrap();
    for i in 1..=4 {
        let name = format!("pattern_{i:02}.png");
        let a = image::open(par_dir.path().join(&name)).unwrap().to_rgb8();
        let b = image::open(seq_dir.path().join(&name)).unwrap().to_rgb8();
        assert_eq!(a.as_raw(), b.as_raw(), "{name}");
    }
    assert!(!seq_dir.path().join(MANIFEST_FILE).exists());
}

#[test]
fn empty_palette_fails_one_image_not_the_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = small_config(4);
    cfg.palettes = vec![vec![Rgb::new(200, 30, 30), Rgb::new(30, 200, 30), Rgb::new(30, 30, 200)], vec![]];
    let report = run_batch(&cfg, tmp.path()).unwrap();
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].index, 1);
    assert!(report.failed[0].error.contains("empty"));
    assert!(tmp.path().join("pattern_01.png").exists());
    assert!(!tmp.path().join("pattern_02.png").exists());

    let manifest: Manifest =
        serde_json::from_str(&fs::read_to_string(tmp.path().join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest.failures.len(), 2);
}
