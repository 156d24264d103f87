//! The player's rack: a fixed row of slots holding drawn letters

use super::bag::Bag;
use super::sattolo_shuffle;
use derive_more::{Display, Error};
use rand::Rng;

/// Default rack size
pub const DEFAULT_RACK_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RackError {
    /// Every slot already holds a letter
    #[display("rack is full")]
    Full,
    /// The slot index is past the end of the rack
    #[display("slot {slot} is outside a rack of {size}")]
    NoSuchSlot { slot: usize, size: usize },
    /// The slot holds no letter
    #[display("slot {slot} is empty")]
    EmptySlot { slot: usize },
}

/// A rack of letter slots. Empty slots stay in place so letters keep their
/// positions as tiles come and go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rack {
    slots: Vec<Option<char>>,
}

impl Default for Rack {
    fn default() -> Self {
        Self::new(DEFAULT_RACK_SIZE)
    }
}

impl Rack {
    /// An empty rack with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a letter.
    pub fn tile_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_full(&self) -> bool {
        self.tile_count() == self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// The letter in `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<char> {
        self.slots.get(slot).copied().flatten()
    }

    /// Slot contents left to right.
    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// The letters on the rack, left to right, skipping empty slots.
    pub fn letters(&self) -> Vec<char> {
        self.slots.iter().flatten().copied().collect()
    }

    /// Indices of the empty slots.
    pub fn unused_slots(&self) -> Vec<usize> {
        (0..self.size()).filter(|&i| self.slots[i].is_none()).collect()
    }

    /// Put a letter in the leftmost empty slot, returning that slot.
    pub fn put(&mut self, letter: char) -> Result<usize, RackError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(RackError::Full)?;
        self.slots[slot] = Some(letter);
        Ok(slot)
    }

    /// Remove and return the letter in `slot`.
    pub fn take(&mut self, slot: usize) -> Result<char, RackError> {
        let size = self.size();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(RackError::NoSuchSlot { slot, size })?;
        entry.take().ok_or(RackError::EmptySlot { slot })
    }

    /// Top up the empty slots from the bag, stopping early if the bag runs
    /// out. Returns how many letters were drawn.
    pub fn fill_from(&mut self, bag: &mut Bag) -> usize {
        let mut drawn = 0;
        for entry in self.slots.iter_mut().filter(|e| e.is_none()) {
            if bag.is_empty() {
                break;
            }
            *entry = Some(bag.draw());
            drawn += 1;
        }
        drawn
    }

    /// Rearrange the slots so that every slot moves to a new position (for
    /// racks of two or more slots). Empty slots move too, so with two or more
    /// holes a slot can end up holding what it held before: nothing.
    pub fn shuffle(&mut self) {
        self.shuffle_with_rng(&mut rand::rng());
    }

    pub fn shuffle_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        sattolo_shuffle(&mut self.slots, rng);
    }

    /// Display the rack as a string, `_` for empty slots.
    pub fn as_string(&self) -> String {
        self.slots.iter().map(|s| s.unwrap_or('_')).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fill_from_bag() {
        let mut bag = Bag::with_rng(&mut StdRng::seed_from_u64(1));
        let mut rack = Rack::new(7);
        assert_eq!(rack.fill_from(&mut bag), 7);
        assert!(rack.is_full());
        assert_eq!(bag.remain(), 93);
        for c in rack.letters() {
            assert!(c.is_ascii_uppercase(), "Found non-uppercase char: {}", c);
        }
        // Already full, nothing more to draw
        assert_eq!(rack.fill_from(&mut bag), 0);
    }

    #[test]
    fn test_fill_stops_when_bag_runs_out() {
        let mut bag = Bag::new();
        while bag.remain() > 3 {
            bag.draw();
        }
        let mut rack = Rack::new(7);
        assert_eq!(rack.fill_from(&mut bag), 3);
        assert_eq!(rack.tile_count(), 3);
        assert_eq!(rack.unused_slots(), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_take_and_put() {
        let mut rack = Rack::new(3);
        assert_eq!(rack.put('A'), Ok(0));
        assert_eq!(rack.put('B'), Ok(1));
        assert_eq!(rack.take(0), Ok('A'));
        assert_eq!(rack.as_string(), "_B_");
        assert_eq!(rack.put('C'), Ok(0));
        assert_eq!(rack.put('D'), Ok(2));
        assert_eq!(rack.put('E'), Err(RackError::Full));
        assert_eq!(rack.letters(), vec!['C', 'B', 'D']);
    }

    #[test]
    fn test_take_errors() {
        let mut rack = Rack::new(2);
        assert_eq!(rack.take(0), Err(RackError::EmptySlot { slot: 0 }));
        assert_eq!(rack.take(5), Err(RackError::NoSuchSlot { slot: 5, size: 2 }));
    }

    #[test]
    fn test_shuffle_with_holes_keeps_letters() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rack = Rack::new(7);
        for c in "ABC".chars() {
            rack.put(c).unwrap();
        }
        for _ in 0..20 {
            let before = rack.clone();
            rack.shuffle_with_rng(&mut rng);
            assert_eq!(rack.tile_count(), 3);
            assert_eq!(rack.unused_slots().len(), 4);
            for slot in 0..rack.size() {
                if let Some(letter) = before.get(slot) {
                    assert_ne!(rack.get(slot), Some(letter));
                }
            }
        }
    }

    #[test]
    fn test_shuffle_moves_every_slot() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut rack = Rack::new(7);
        for c in "ABCDEFG".chars() {
            rack.put(c).unwrap();
        }
        for _ in 0..20 {
            let before = rack.clone();
            rack.shuffle_with_rng(&mut rng);
            for slot in 0..rack.size() {
                assert_ne!(before.get(slot), rack.get(slot));
            }
            let mut letters = rack.letters();
            letters.sort();
            assert_eq!(letters, "ABCDEFG".chars().collect::<Vec<_>>());
        }
    }
}
