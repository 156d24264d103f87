//! Game logic: board, word detection, tile bag, rack, dictionary, turns

pub mod bag;
pub mod board;
pub mod dictionary;
pub mod rack;
pub mod turn;

use rand::Rng;

pub use dictionary::WILDCARD;

/// Letter handed out by an exhausted bag.
pub const SENTINEL: char = '?';

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Whether `letter` is one of A, E, I, O, U (case-insensitive).
pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter.to_ascii_uppercase())
}

/// Whether `letter` is an A-Z letter that is not a vowel.
pub fn is_consonant(letter: char) -> bool {
    letter.is_ascii_alphabetic() && !is_vowel(letter)
}

/// Unbiased in-place permutation (Fisher-Yates). The swap partner for
/// position `i` is drawn from `[0, i]`, so an element may stay put.
pub fn fisher_yates_shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// Cyclic permutation (Sattolo). The swap partner for position `i` is drawn
/// from `[0, i)`, so no element keeps its index when the slice has more
/// than one element.
pub fn sattolo_shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..i);
        slice.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_vowels_and_consonants() {
        for c in ['A', 'e', 'I', 'o', 'U'] {
            assert!(is_vowel(c));
            assert!(!is_consonant(c));
        }
        for c in ['B', 'z', 'Y', 'Q'] {
            assert!(!is_vowel(c));
            assert!(is_consonant(c));
        }
        assert!(!is_consonant(WILDCARD));
        assert!(!is_consonant(SENTINEL));
    }

    #[test]
    fn test_sattolo_moves_every_element() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 2..12 {
            for _ in 0..50 {
                let mut items: Vec<usize> = (0..len).collect();
                sattolo_shuffle(&mut items, &mut rng);
                for (index, item) in items.iter().enumerate() {
                    assert_ne!(index, *item, "element stayed at {} in {:?}", index, items);
                }
            }
        }
    }

    #[test]
    fn test_sattolo_short_slices() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        sattolo_shuffle(&mut empty, &mut rng);
        let mut one = vec!['A'];
        sattolo_shuffle(&mut one, &mut rng);
        assert_eq!(one, vec!['A']);
    }

    #[test]
    fn test_fisher_yates_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items: Vec<u32> = (0..100).collect();
        fisher_yates_shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_fisher_yates_can_fix_points() {
        // With the inclusive range, the identity must be reachable: over many
        // shuffles of two elements both orders show up.
        let mut rng = StdRng::seed_from_u64(3);
        let mut kept = 0;
        let mut swapped = 0;
        for _ in 0..200 {
            let mut pair = [0, 1];
            fisher_yates_shuffle(&mut pair, &mut rng);
            if pair == [0, 1] {
                kept += 1;
            } else {
                swapped += 1;
            }
        }
        assert!(kept > 0 && swapped > 0);
    }
}
