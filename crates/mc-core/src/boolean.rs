//! Boolean combinator (C4): numerical and two-set evaluation of
//! `AND`/`OR`/`IMPLIES`/`NEG`/`PAREN` over sub-results (`spec.md` §4.3).

use crate::bitset::StateSet;
use crate::error::{EvalError, Result};
use crate::node::{BinaryBoolKind, EvalResult, UnaryBoolKind};

/// The yes/no pair and simulation status a Boolean combinator produces.
pub struct Combined {
    pub yes: StateSet,
    pub no: Option<StateSet>,
    pub sim_below: bool,
}

/// `NEG` / `PAREN`, one child.
///
/// Numerical mode (`child` not two-set): `NEG` is `not(child.yes)`,
/// `PAREN` is `copy(child.yes)`. Two-set mode: `NEG` swaps yes/no
/// (fresh copies); `PAREN` copies both.
pub fn evaluate_unary(kind: UnaryBoolKind, child: &EvalResult) -> Result<Combined> {
    let child_yes = child
        .yes_set
        .as_ref()
        .ok_or(EvalError::NullChild { node: "UnaryBool" })?;

    if !child.is_two_set() {
        let yes = match kind {
            UnaryBoolKind::Neg => StateSet::not(child_yes),
            UnaryBoolKind::Paren => StateSet::copy(child_yes),
        };
        return Ok(Combined {
            yes,
            no: None,
            sim_below: false,
        });
    }

    let child_no = child
        .no_set
        .as_ref()
        .ok_or(EvalError::NullChild { node: "UnaryBool" })?;

    let (yes, no) = match kind {
        UnaryBoolKind::Neg => (StateSet::copy(child_no), StateSet::copy(child_yes)),
        UnaryBoolKind::Paren => (StateSet::copy(child_yes), StateSet::copy(child_no)),
    };
    Ok(Combined {
        yes,
        no: Some(no),
        sim_below: true,
    })
}

/// `AND` / `OR`, two children, numerical mode: `OR → or(L,R)`,
/// `AND → and(L,R)`.
fn numerical_binary(kind: BinaryBoolKind, ly: &StateSet, ry: &StateSet) -> StateSet {
    match kind {
        BinaryBoolKind::And => StateSet::and(ly, ry),
        BinaryBoolKind::Or => StateSet::or(ly, ry),
        BinaryBoolKind::Implies => {
            let mut tmp = StateSet::not(ly);
            StateSet::or_into(ry, &mut tmp);
            tmp
        }
    }
}

/// The two-set `OR` rule (`spec.md` §4.3): `yes := or(LY, RY)`; the
/// `no`-set is the intersection of the children's no-sets, building a
/// missing no-set from the other child's complement when only one
/// child is simulated.
fn two_set_or(
    ly: &StateSet,
    ln: Option<&StateSet>,
    sim_l: bool,
    ry: &StateSet,
    rn: Option<&StateSet>,
    sim_r: bool,
) -> Result<(StateSet, StateSet)> {
    let yes = StateSet::or(ly, ry);
    let no = match (sim_l, sim_r) {
        (true, true) => StateSet::and(
            ln.ok_or(EvalError::NullChild { node: "BinaryBool" })?,
            rn.ok_or(EvalError::NullChild { node: "BinaryBool" })?,
        ),
        (true, false) => {
            let mut no = StateSet::not(ry);
            StateSet::and_into(ln.ok_or(EvalError::NullChild { node: "BinaryBool" })?, &mut no);
            no
        }
        (false, true) => {
            let mut no = StateSet::not(ly);
            StateSet::and_into(rn.ok_or(EvalError::NullChild { node: "BinaryBool" })?, &mut no);
            no
        }
        (false, false) => {
            return Err(EvalError::TwoSetNeitherChildSimulated { node: "BinaryBool" })
        }
    };
    Ok((yes, no))
}

/// The two-set `AND` rule: dual of [`two_set_or`] — intersect yes-sets,
/// union no-sets.
fn two_set_and(
    ly: &StateSet,
    ln: Option<&StateSet>,
    sim_l: bool,
    ry: &StateSet,
    rn: Option<&StateSet>,
    sim_r: bool,
) -> Result<(StateSet, StateSet)> {
    let yes = StateSet::and(ly, ry);
    let no = match (sim_l, sim_r) {
        (true, true) => StateSet::or(
            ln.ok_or(EvalError::NullChild { node: "BinaryBool" })?,
            rn.ok_or(EvalError::NullChild { node: "BinaryBool" })?,
        ),
        (true, false) => {
            let mut no = StateSet::not(ry);
            StateSet::or_into(ln.ok_or(EvalError::NullChild { node: "BinaryBool" })?, &mut no);
            no
        }
        (false, true) => {
            let mut no = StateSet::not(ly);
            StateSet::or_into(rn.ok_or(EvalError::NullChild { node: "BinaryBool" })?, &mut no);
            no
        }
        (false, false) => {
            return Err(EvalError::TwoSetNeitherChildSimulated { node: "BinaryBool" })
        }
    };
    Ok((yes, no))
}

/// `AND` / `OR` / `IMPLIES`, two children (`spec.md` §4.3).
///
/// Dispatches to the numerical path when neither child has
/// `sim_below`, otherwise to the two-set path. `IMPLIES` is computed
/// as `¬L ∨ R`: the unary negation rule builds `(¬L).yes`/`(¬L).no`,
/// then the two-set `OR` rule is applied to `(¬L, R)`.
pub fn evaluate_binary(kind: BinaryBoolKind, left: &EvalResult, right: &EvalResult) -> Result<Combined> {
    let ly = left
        .yes_set
        .as_ref()
        .ok_or(EvalError::NullChild { node: "BinaryBool" })?;
    let ry = right
        .yes_set
        .as_ref()
        .ok_or(EvalError::NullChild { node: "BinaryBool" })?;

    let sim_below = left.is_two_set() || right.is_two_set();

    if !sim_below {
        return Ok(Combined {
            yes: numerical_binary(kind, ly, ry),
            no: None,
            sim_below: false,
        });
    }

    let sim_l = left.is_two_set();
    let sim_r = right.is_two_set();

    let (yes, no) = match kind {
        BinaryBoolKind::Or => two_set_or(ly, left.no_set.as_ref(), sim_l, ry, right.no_set.as_ref(), sim_r)?,
        BinaryBoolKind::And => two_set_and(ly, left.no_set.as_ref(), sim_l, ry, right.no_set.as_ref(), sim_r)?,
        BinaryBoolKind::Implies => {
            // ¬L's yes/no only exist as a genuine pair when L itself was
            // simulated; otherwise only ¬L.yes is meaningful (the plain
            // complement) and two_set_or must derive the no-set from R
            // alone, exactly as it does for any other (false, true) child.
            let (neg_yes, neg_no) = if sim_l {
                let neg_yes = left
                    .no_set
                    .clone()
                    .ok_or(EvalError::NullChild { node: "BinaryBool" })?;
                let neg_no = StateSet::copy(ly);
                (neg_yes, Some(neg_no))
            } else {
                (StateSet::not(ly), None)
            };
            two_set_or(&neg_yes, neg_no.as_ref(), sim_l, ry, right.no_set.as_ref(), sim_r)?
        }
    };

    Ok(Combined {
        yes,
        no: Some(no),
        sim_below: true,
    })
}
