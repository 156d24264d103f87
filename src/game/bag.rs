//! Tile bag: a finite, shuffled multiset of letters drawn without replacement

use super::{fisher_yates_shuffle, is_consonant, is_vowel, SENTINEL};
use rand::Rng;

/// Standard tile counts per letter (100 tiles, no blanks).
pub const TILE_DISTRIBUTION: [(char, u32); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 5),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

/// The letters left to draw this game.
#[derive(Debug, Clone)]
pub struct Bag {
    tiles: Vec<char>,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// A full, shuffled bag.
    pub fn new() -> Self {
        Self::with_rng(&mut rand::rng())
    }

    /// A full bag shuffled with a specific RNG (for testing/seeding).
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::excluding_with_rng(&[], rng)
    }

    /// A shuffled bag without any copies of the `excluded` letters.
    pub fn excluding(excluded: &[char]) -> Self {
        Self::excluding_with_rng(excluded, &mut rand::rng())
    }

    pub fn excluding_with_rng<R: Rng + ?Sized>(excluded: &[char], rng: &mut R) -> Self {
        let excluded: Vec<char> = excluded.iter().map(|c| c.to_ascii_uppercase()).collect();
        let mut tiles: Vec<char> = TILE_DISTRIBUTION
            .iter()
            .filter(|(letter, _)| !excluded.contains(letter))
            .flat_map(|&(letter, count)| std::iter::repeat_n(letter, count as usize))
            .collect();
        fisher_yates_shuffle(&mut tiles, rng);
        Self { tiles }
    }

    /// Number of tiles left.
    pub fn remain(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take the next tile, or [`SENTINEL`] once the bag is empty.
    pub fn draw(&mut self) -> char {
        self.tiles.pop().unwrap_or(SENTINEL)
    }

    /// Take the next vowel, skipping over consonants without disturbing
    /// their order. [`SENTINEL`] if no vowels are left.
    pub fn draw_vowel(&mut self) -> char {
        self.draw_matching(is_vowel)
    }

    /// Take the next consonant. [`SENTINEL`] if none are left.
    pub fn draw_consonant(&mut self) -> char {
        self.draw_matching(is_consonant)
    }

    fn draw_matching(&mut self, wanted: impl Fn(char) -> bool) -> char {
        match self.tiles.iter().rposition(|&c| wanted(c)) {
            Some(index) => self.tiles.remove(index),
            None => SENTINEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn histogram(letters: impl IntoIterator<Item = char>) -> HashMap<char, u32> {
        let mut counts = HashMap::new();
        for c in letters {
            *counts.entry(c).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_full_bag_size() {
        let total: u32 = TILE_DISTRIBUTION.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 100);
        assert_eq!(Bag::new().remain(), 100);
    }

    #[test]
    fn test_drain_matches_distribution() {
        let mut bag = Bag::new();
        let mut drawn = Vec::new();
        while bag.remain() > 0 {
            drawn.push(bag.draw());
        }
        let expected: HashMap<char, u32> = TILE_DISTRIBUTION.iter().copied().collect();
        assert_eq!(histogram(drawn), expected);
    }

    #[test]
    fn test_empty_bag_returns_sentinel() {
        let mut bag = Bag::new();
        for _ in 0..100 {
            assert_ne!(bag.draw(), SENTINEL);
        }
        assert!(bag.is_empty());
        for _ in 0..5 {
            assert_eq!(bag.draw(), SENTINEL);
            assert_eq!(bag.draw_vowel(), SENTINEL);
            assert_eq!(bag.draw_consonant(), SENTINEL);
        }
        assert_eq!(bag.remain(), 0);
    }

    #[test]
    fn test_excluding_letters() {
        let mut bag = Bag::excluding(&['q', 'Z']);
        assert_eq!(bag.remain(), 98);
        let mut drawn = Vec::new();
        while !bag.is_empty() {
            drawn.push(bag.draw());
        }
        assert!(!drawn.contains(&'Q'));
        assert!(!drawn.contains(&'Z'));
    }

    #[test]
    fn test_vowel_and_consonant_draws() {
        let mut bag = Bag::with_rng(&mut StdRng::seed_from_u64(9));
        let vowels: u32 = ['A', 'E', 'I', 'O', 'U']
            .iter()
            .map(|v| TILE_DISTRIBUTION.iter().find(|(c, _)| c == v).unwrap().1)
            .sum();

        for _ in 0..vowels {
            assert!(is_vowel(bag.draw_vowel()));
        }
        assert_eq!(bag.draw_vowel(), SENTINEL);

        let consonants = bag.remain();
        for _ in 0..consonants {
            assert!(is_consonant(bag.draw_consonant()));
        }
        assert!(bag.is_empty());
    }

    #[test]
    fn test_vowel_draw_keeps_other_order() {
        let mut bag = Bag::with_rng(&mut StdRng::seed_from_u64(11));
        let before: Vec<char> = bag.tiles.iter().copied().filter(|&c| !is_vowel(c)).collect();
        bag.draw_vowel();
        bag.draw_vowel();
        let after: Vec<char> = bag.tiles.iter().copied().filter(|&c| !is_vowel(c)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_seeded_bags_are_deterministic() {
        let mut a = Bag::with_rng(&mut StdRng::seed_from_u64(42));
        let mut b = Bag::with_rng(&mut StdRng::seed_from_u64(42));
        let drawn_a: String = (0..20).map(|_| a.draw()).collect();
        let drawn_b: String = (0..20).map(|_| b.draw()).collect();
        assert_eq!(drawn_a, drawn_b);
    }
}
