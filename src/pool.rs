//! Fixed-capacity slot arrays.
//!
//! A slot is either free (`None`) or holds an active entity.  Slots are
//! addressed by index only; the pool never grows or shrinks, so an index stays
//! valid for the lifetime of the pool.

#[derive(Clone, Debug)]
pub struct Pool<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> Pool<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Place `item` in the first free slot.  Returns `None` when every slot
    /// is taken, leaving the pool untouched.
    pub fn allocate(&mut self, item: T) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(item);
        Some(index)
    }

    /// Free a slot.  Releasing an already-free or out-of-range slot is a no-op.
    pub fn release(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.active_count() == N
    }

    /// Visit every active slot in index order.
    pub fn for_each_active(&self, mut f: impl FnMut(usize, &T)) {
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(item) = slot {
                f(i, item);
            }
        }
    }

    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(item) = slot {
                f(i, item);
            }
        }
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    /// Indices of the currently active slots, captured up front so callers
    /// can release or allocate while walking them.
    pub fn active_indices(&self) -> Vec<usize> {
        self.iter_active().map(|(i, _)| i).collect()
    }
}

impl<T, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
