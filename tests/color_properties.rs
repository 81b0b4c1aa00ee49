//! Property tests for palette arithmetic.

use polymotif::rendering::palette::{expand, jitter, shade, tint, TONE_FACTOR_MAX, TONE_FACTOR_MIN};
use polymotif::Rgb;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn any_rgb() -> impl Strategy<Value = Rgb> {
    any::<(u8, u8, u8)>().prop_map(Rgb::from)
}

proptest! {
    // Channels are u8, so "in range" means the arithmetic saturates instead of wrapping.
    #[test]
    fn tint_never_darkens(c in any_rgb(), f in TONE_FACTOR_MIN..=TONE_FACTOR_MAX) {
        let t = tint(c, f);
        prop_assert!(t.r >= c.r && t.g >= c.g && t.b >= c.b);
    }

    #[test]
    fn shade_never_brightens(c in any_rgb(), f in TONE_FACTOR_MIN..=TONE_FACTOR_MAX) {
        let s = shade(c, f);
        prop_assert!(s.r <= c.r && s.g <= c.g && s.b <= c.b);
    }

    #[test]
    fn full_strength_factors_saturate(c in any_rgb(), f in 1.0f32..8.0) {
        prop_assert_eq!(tint(c, f), Rgb::WHITE);
        prop_assert_eq!(shade(c, f), Rgb::BLACK);
    }

    #[test]
    fn negative_factors_invert_direction(c in any_rgb(), f in -8.0f32..0.0) {
        let t = tint(c, f);
        prop_assert!(t.r <= c.r && t.g <= c.g && t.b <= c.b);
        let s = shade(c, f);
        prop_assert!(s.r >= c.r && s.g >= c.g && s.b >= c.b);
    }

    #[test]
    fn jitter_saturates_at_edges(c in any_rgb(), amount in 0i32..300, seed in any::<u64>()) {
        let j = jitter(c, amount, &mut StdRng::seed_from_u64(seed));
        for (out, src) in j.channels().into_iter().zip(c.channels()) {
            prop_assert!((i32::from(out) - i32::from(src)).abs() <= amount);
        }
    }

    #[test]
    fn expand_is_deduplicated_and_prefixed(
        base in prop::collection::vec(any_rgb(), 1..8),
        target in 0usize..24,
        seed in any::<u64>(),
    ) {
        let wp = expand(&base, target, &mut StdRng::seed_from_u64(seed));
        let colors = wp.colors();
        for (i, a) in colors.iter().enumerate() {
            prop_assert!(!colors[i + 1..].contains(a));
        }
        prop_assert!(colors.len() <= target.max(base.len()));
        let mut unique_base = Vec::new();
        for c in &base {
            if !unique_base.contains(c) {
                unique_base.push(*c);
            }
        }
        prop_assert_eq!(&colors[..unique_base.len()], &unique_base[..]);
    }
}
