//! Atomic evaluator (C5): `TT` / `FF` / `AP(label)` into a yes-set
//! (`spec.md` §4.2).

use crate::bitset::StateSet;
use crate::node::{Atomic, AtomicKind};
use crate::traits::Labeling;

/// Evaluates an atomic node's yes-set.
///
/// `AP(label)` looks the label up via `labeling` and returns an owned
/// copy, never a borrow of the labeling service's storage, so the
/// result can be freed on the normal post-order schedule. An unknown
/// label yields an empty set, silently (`spec.md` §4.2, §7.4).
pub fn evaluate(atomic: &Atomic, labeling: &dyn Labeling) -> StateSet {
    let n = labeling.n();
    match atomic {
        Atomic::Structural(node) => match node.kind {
            AtomicKind::Tt => StateSet::new_one(n),
            AtomicKind::Ff => StateSet::new_zero(n),
        },
        Atomic::Ap(node) => labeling
            .label_bitset(&node.label)
            .unwrap_or_else(|| StateSet::new_zero(n)),
    }
}
