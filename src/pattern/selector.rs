//! Per-image fill color policy: palette cycling, anti-repetition and
//! occasional accent injection.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};

use crate::core::error::{PatternError, Result};
use crate::rendering::color::Rgb;
use crate::rendering::palette::WorkingPalette;

/// Chance a selection is drawn from the accent set.
pub const ACCENT_CHANCE: f64 = 0.15;
/// Redraws allowed when an accent collides with recent history.
pub const ACCENT_RETRIES: usize = 3;
/// Colors remembered; the oldest is evicted first.
pub const HISTORY_LEN: usize = 3;
/// Trailing history entries a new pick must avoid.
pub const AVOID_WINDOW: usize = 2;
/// Selections per palette entry before the order is reshuffled.
pub const CYCLE_FACTOR: usize = 3;

/// How the last color was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Accent,
    Palette,
    /// Every palette color sat in the avoid window; drawn from the full palette.
    Fallback,
}

/// Mutable selection state for one image. Owns its own copy of the palette
/// order, so reshuffles never leak into other images.
#[derive(Debug, Clone)]
pub struct SelectorState {
    palette: Vec<Rgb>,
    counter: usize,
    history: VecDeque<Rgb>,
    reshuffles: u32,
    last_pick: Option<Pick>,
}

impl SelectorState {
    pub fn new(palette: &WorkingPalette) -> Result<Self> {
        if palette.is_empty() {
            return Err(PatternError::EmptyPalette);
        }
        Ok(Self {
            palette: palette.colors().to_vec(),
            counter: 0,
            history: VecDeque::with_capacity(HISTORY_LEN + 1),
            reshuffles: 0,
            last_pick: None,
        })
    }

    /// Current palette order (changes after each reshuffle).
    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Rgb> + ExactSizeIterator {
        self.history.iter()
    }

    pub fn last_pick(&self) -> Option<Pick> {
        self.last_pick
    }

    fn cycle_len(&self) -> usize {
        CYCLE_FACTOR * self.palette.len()
    }

    fn recently_used(&self, color: &Rgb) -> bool {
        self.history.iter().rev().take(AVOID_WINDOW).any(|c| c == color)
    }

    fn remember(&mut self, color: Rgb, pick: Pick) -> Rgb {
        self.history.push_back(color);
        while self.history.len() > HISTORY_LEN {
            self.history.pop_front();
        }
        self.counter += 1;
        self.last_pick = Some(pick);
        color
    }

    fn pick_accent<R: Rng + ?Sized>(&self, accents: &[Rgb], rng: &mut R) -> Option<Rgb> {
        let mut accent = *accents.choose(rng)?;
        if self.recently_used(&accent) {
            for _ in 0..ACCENT_RETRIES {
                accent = *accents.choose(rng)?;
                if !self.recently_used(&accent) {
                    break;
                }
            }
        }
        Some(accent)
    }

    /// Choose the next fill color.
    ///
    /// An empty accent slice turns the accent roll into a normal pick.
    pub fn next<R: Rng + ?Sized>(&mut self, accents: &[Rgb], rng: &mut R) -> Rgb {
        if self.counter >= self.cycle_len() {
            self.counter = 0;
            self.palette.shuffle(rng);
            self.reshuffles += 1;
        }

        if rng.gen_bool(ACCENT_CHANCE) {
            if let Some(accent) = self.pick_accent(accents, rng) {
                return self.remember(accent, Pick::Accent);
            }
        }

        let available: Vec<Rgb> = self
            .palette
            .iter()
            .copied()
            .filter(|c| !self.recently_used(c))
            .collect();
        let (pool, pick) = if available.is_empty() {
            (self.palette.as_slice(), Pick::Fallback)
        } else {
            (available.as_slice(), Pick::Palette)
        };
        // `new` rejects empty palettes, so the pool always has an entry.
        let color = pool[rng.gen_range(0..pool.len())];
        self.remember(color, pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::palette::{expand, ACCENTS, BASE_PALETTES};
    use rand::{rngs::StdRng, SeedableRng};

    fn earth() -> WorkingPalette {
        expand(&BASE_PALETTES[0].colors, 10, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn empty_palette_fails_fast() {
        let err = SelectorState::new(&WorkingPalette::default()).unwrap_err();
        assert!(matches!(err, PatternError::EmptyPalette));
    }

    #[test]
    fn history_is_capped() {
        let mut state = SelectorState::new(&earth()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            state.next(&ACCENTS, &mut rng);
            assert!(state.history().count() <= HISTORY_LEN);
        }
    }

    #[test]
    fn palette_picks_avoid_recent_window() {
        let palette = earth();
        let mut state = SelectorState::new(&palette).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..2_000 {
            let window: Vec<Rgb> = state.history().rev().take(AVOID_WINDOW).copied().collect();
            let c = state.next(&ACCENTS, &mut rng);
            if state.last_pick() == Some(Pick::Palette) {
                assert!(!window.contains(&c), "{c:?} repeated within {window:?}");
                assert!(palette.colors().contains(&c));
            }
        }
    }

    #[test]
    fn two_color_palette_falls_back() {
        let palette = WorkingPalette::from_colors([Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)]);
        let mut state = SelectorState::new(&palette).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut saw_fallback = false;
        for _ in 0..200 {
            let c = state.next(&[], &mut rng);
            assert!(palette.colors().contains(&c));
            saw_fallback |= state.last_pick() == Some(Pick::Fallback);
        }
        assert!(saw_fallback);
    }

    #[test]
    fn cycle_resets_and_reshuffles_once() {
        let palette = earth();
        let cycle = CYCLE_FACTOR * palette.len();
        let mut state = SelectorState::new(&palette).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..cycle {
            state.next(&ACCENTS, &mut rng);
        }
        assert_eq!(state.counter(), cycle);
        assert_eq!(state.reshuffles(), 0);
        state.next(&ACCENTS, &mut rng);
        assert_eq!(state.reshuffles(), 1);
        assert_eq!(state.counter(), 1);

        let mut sorted = state.palette().to_vec();
        let mut original = palette.colors().to_vec();
        sorted.sort_by_key(|c| c.channels());
        original.sort_by_key(|c| c.channels());
        assert_eq!(sorted, original);
    }

    #[test]
    fn accents_appear_at_roughly_expected_rate() {
        let mut state = SelectorState::new(&earth()).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 10_000;
        let accents = (0..n)
            .filter(|_| {
                state.next(&ACCENTS, &mut rng);
                state.last_pick() == Some(Pick::Accent)
            })
            .count();
        let rate = accents as f64 / n as f64;
        assert!((0.12..0.18).contains(&rate), "accent rate {rate}");
    }

    #[test]
    fn same_seed_same_sequence() {
        let palette = earth();
        let run = |seed| {
            let mut state = SelectorState::new(&palette).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..64).map(|_| state.next(&ACCENTS, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
