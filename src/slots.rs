//! Growable slot array
//!
//! Slot numbers are often chosen outside the program (a script asks for
//! translation 12 before 0..11 exist), so writes past the end grow the array
//! and leave the skipped slots empty.

/// A `Vec` of optional values that grows on write and never on read.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoGrowArray<T> {
    slots: Vec<Option<T>>,
}

impl<T> AutoGrowArray<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of slots, including empty ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Extend with empty slots until there are at least `len` of them.
    pub fn grow_to(&mut self, len: usize) {
        if len > self.slots.len() {
            self.slots.resize_with(len, || None);
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Put `value` at `index`, growing as needed. Returns the previous value.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        self.grow_to(index + 1);
        self.slots[index].replace(value)
    }

    /// Empty the slot at `index` without shrinking. Returns the previous value.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Append a possibly empty slot and return its index.
    pub fn push(&mut self, value: Option<T>) -> usize {
        self.slots.push(value);
        self.slots.len() - 1
    }

    /// Occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.as_mut().map(|v| (i, v)))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for AutoGrowArray<T> {
    fn default() -> Self {
        Self::new()
    }
}
