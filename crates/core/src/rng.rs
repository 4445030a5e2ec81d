//! RNG module - piece randomizer
//!
//! The default randomizer draws every piece independently and uniformly from
//! the seven kinds, so short runs of the same kind are possible. A seven-bag
//! shuffle is available as an opt-in, and a scripted sequence exists for
//! deterministic tests and replays.
//!
//! Randomness comes from a small LCG so a seed fully determines a game.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits cycle with short periods; use the high half.
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Which distribution a [`PieceQueue`] draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomizerKind {
    /// Independent uniform draws.
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds.
    SevenBag,
}

#[derive(Debug, Clone)]
enum Source {
    Uniform(SimpleRng),
    SevenBag {
        rng: SimpleRng,
        bag: [PieceKind; 7],
        index: usize,
    },
    Scripted {
        pieces: Vec<PieceKind>,
        index: usize,
    },
}

/// Endless supply of piece kinds.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    seed: u32,
    source: Source,
}

impl PieceQueue {
    pub fn new(kind: RandomizerKind, seed: u32) -> Self {
        let source = match kind {
            RandomizerKind::Uniform => Source::Uniform(SimpleRng::new(seed)),
            RandomizerKind::SevenBag => Source::SevenBag {
                rng: SimpleRng::new(seed),
                bag: PieceKind::ALL,
                // Forces a shuffle on first draw.
                index: PieceKind::ALL.len(),
            },
        };
        Self { seed, source }
    }

    pub fn uniform(seed: u32) -> Self {
        Self::new(RandomizerKind::Uniform, seed)
    }

    /// Replays `pieces` in order, cycling when exhausted.
    ///
    /// An empty script falls back to a uniform draw seeded with 1.
    pub fn scripted(pieces: Vec<PieceKind>) -> Self {
        if pieces.is_empty() {
            return Self::uniform(1);
        }
        Self {
            seed: 0,
            source: Source::Scripted { pieces, index: 0 },
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match &mut self.source {
            Source::Uniform(rng) => PieceKind::ALL[rng.next_range(7) as usize],
            Source::SevenBag { rng, bag, index } => {
                if *index >= bag.len() {
                    *bag = PieceKind::ALL;
                    rng.shuffle(bag);
                    *index = 0;
                }
                let kind = bag[*index];
                *index += 1;
                kind
            }
            Source::Scripted { pieces, index } => {
                let kind = pieces[*index % pieces.len()];
                *index += 1;
                kind
            }
        }
    }

    /// Seed this queue was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::uniform(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed_is_not_stuck() {
        let mut rng = SimpleRng::new(0);
        let a = rng.next_u32();
        let b = rng.next_u32();
        assert_ne!(a, b);
    }

    #[test]
    fn test_uniform_queue_is_deterministic_per_seed() {
        let mut a = PieceQueue::uniform(42);
        let mut b = PieceQueue::uniform(42);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_uniform_queue_reaches_every_kind() {
        let mut queue = PieceQueue::uniform(7);
        let mut seen = [false; 7];
        for _ in 0..500 {
            seen[(queue.draw().code() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_uniform_queue_allows_repeats() {
        // Independent draws must be able to repeat a kind back to back.
        let mut queue = PieceQueue::uniform(3);
        let mut prev = queue.draw();
        let mut repeated = false;
        for _ in 0..200 {
            let kind = queue.draw();
            if kind == prev {
                repeated = true;
                break;
            }
            prev = kind;
        }
        assert!(repeated);
    }

    #[test]
    fn test_seven_bag_draws_all_seven() {
        let mut queue = PieceQueue::new(RandomizerKind::SevenBag, 1);
        let mut drawn: Vec<PieceKind> = (0..7).map(|_| queue.draw()).collect();
        drawn.sort();
        assert_eq!(drawn, PieceKind::ALL.to_vec());
    }

    #[test]
    fn test_scripted_queue_cycles() {
        let mut queue = PieceQueue::scripted(vec![PieceKind::O, PieceKind::I]);
        assert_eq!(queue.draw(), PieceKind::O);
        assert_eq!(queue.draw(), PieceKind::I);
        assert_eq!(queue.draw(), PieceKind::O);
    }
}
