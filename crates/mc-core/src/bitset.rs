//! State-set primitives (C1): a thin adapter onto `fixedbitset`.
//!
//! Every operation here either returns a freshly owned [`StateSet`] or
//! mutates its second argument in place (the `_into` variants) —
//! never both, matching the contract in `spec.md` §4.1 exactly.

use fixedbitset::FixedBitSet;

/// A fixed-length bitset of satisfying/observed states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet(FixedBitSet);

impl StateSet {
    /// An all-zeros bitset of length `n`.
    pub fn new_zero(n: usize) -> Self {
        StateSet(FixedBitSet::with_capacity(n))
    }

    /// An all-ones bitset of length `n`.
    pub fn new_one(n: usize) -> Self {
        let mut bits = FixedBitSet::with_capacity(n);
        bits.set_range(.., true);
        StateSet(bits)
    }

    /// A fresh copy of `src`.
    pub fn copy(src: &StateSet) -> Self {
        src.clone()
    }

    /// A fresh bitset with every bit of `b` flipped.
    pub fn not(b: &StateSet) -> Self {
        let mut out = b.0.clone();
        out.toggle_range(..);
        StateSet(out)
    }

    /// A fresh bitset holding `a AND b`.
    pub fn and(a: &StateSet, b: &StateSet) -> Self {
        StateSet(&a.0 & &b.0)
    }

    /// A fresh bitset holding `a OR b`.
    pub fn or(a: &StateSet, b: &StateSet) -> Self {
        StateSet(&a.0 | &b.0)
    }

    /// In place: `b := a AND b`.
    pub fn and_into(a: &StateSet, b: &mut StateSet) {
        b.0.intersect_with(&a.0);
    }

    /// In place: `b := a OR b`.
    pub fn or_into(a: &StateSet, b: &mut StateSet) {
        b.0.union_with(&a.0);
    }

    /// Sets bit `i`.
    pub fn set_bit(&mut self, i: usize) {
        self.0.insert(i);
    }

    /// Whether bit `i` is set.
    pub fn get_bit(&self, i: usize) -> bool {
        self.0.contains(i)
    }

    /// The declared length of this bitset.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// The number of set bits.
    pub fn count(&self) -> usize {
        self.0.count_ones(..)
    }

    /// Iterates the indices of set bits.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.ones()
    }

    /// Builds a `StateSet` of length `n` from an explicit list of
    /// set-bit indices (used throughout tests).
    pub fn from_indices(n: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut s = StateSet::new_zero(n);
        for i in indices {
            s.set_bit(i);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one() {
        let z = StateSet::new_zero(4);
        let o = StateSet::new_one(4);
        assert_eq!(z.count(), 0);
        assert_eq!(o.count(), 4);
        assert_eq!(z.size(), 4);
    }

    #[test]
    fn not_flips_every_bit() {
        let a = StateSet::from_indices(4, [0, 2]);
        let na = StateSet::not(&a);
        assert_eq!(na.ones().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn and_or() {
        let a = StateSet::from_indices(4, [0, 2]);
        let b = StateSet::from_indices(4, [2, 3]);
        assert_eq!(StateSet::and(&a, &b).ones().collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            StateSet::or(&a, &b).ones().collect::<Vec<_>>(),
            vec![0, 2, 3]
        );
    }

    #[test]
    fn and_into_and_or_into_mutate_second_argument() {
        let a = StateSet::from_indices(4, [0, 2]);
        let mut b = StateSet::from_indices(4, [2, 3]);
        StateSet::and_into(&a, &mut b);
        assert_eq!(b.ones().collect::<Vec<_>>(), vec![2]);

        let a = StateSet::from_indices(4, [0, 2]);
        let mut b = StateSet::from_indices(4, [2, 3]);
        StateSet::or_into(&a, &mut b);
        assert_eq!(b.ones().collect::<Vec<_>>(), vec![0, 2, 3]);
    }

    #[test]
    fn copy_is_independent() {
        let a = StateSet::from_indices(4, [0]);
        let mut b = StateSet::copy(&a);
        b.set_bit(1);
        assert_eq!(a.ones().collect::<Vec<_>>(), vec![0]);
        assert_eq!(b.ones().collect::<Vec<_>>(), vec![0, 1]);
    }
}
