//! Neighborhood moves over a slot plan.
//!
//! A plan is a `Vec<usize>`: entry `i` is the slot index of request `i`.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which kind of neighbor a move produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// One request moves to a different slot.
    Reassign,
    /// Two requests exchange slots.
    Swap,
}

/// A concrete, reversible move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    Reassign { request: usize, from: usize, to: usize },
    Swap { a: usize, b: usize },
}

impl Move {
    pub(crate) fn kind(&self) -> MoveKind {
        match self {
            Self::Reassign { .. } => MoveKind::Reassign,
            Self::Swap { .. } => MoveKind::Swap,
        }
    }

    pub(crate) fn apply(&self, plan: &mut [usize]) {
        match *self {
            Self::Reassign { request, to, .. } => plan[request] = to,
            Self::Swap { a, b } => plan.swap(a, b),
        }
    }

    pub(crate) fn undo(&self, plan: &mut [usize]) {
        match *self {
            Self::Reassign { request, from, .. } => plan[request] = from,
            Self::Swap { a, b } => plan.swap(a, b),
        }
    }
}

/// Random valid plan: every request in some slot.
pub(crate) fn random_plan<R: Rng>(requests: usize, slots: usize, rng: &mut R) -> Vec<usize> {
    (0..requests).map(|_| rng.random_range(0..slots)).collect()
}

/// Proposes a move that changes the plan.
///
/// Tries a swap with probability `swap_probability`; a swap between two
/// requests already sharing a slot falls back to a reassignment. Returns
/// `None` when no move can change the plan (one slot, or a single request
/// with a single slot).
pub(crate) fn propose<R: Rng>(
    plan: &[usize],
    slot_count: usize,
    swap_probability: f64,
    rng: &mut R,
) -> Option<Move> {
    let n = plan.len();
    if n == 0 || slot_count == 0 {
        return None;
    }

    if n >= 2 && rng.random::<f64>() < swap_probability {
        let a = rng.random_range(0..n);
        let mut b = rng.random_range(0..n - 1);
        if b >= a {
            b += 1;
        }
        if plan[a] != plan[b] {
            return Some(Move::Swap { a, b });
        }
    }

    if slot_count < 2 {
        return None;
    }
    let request = rng.random_range(0..n);
    let from = plan[request];
    let mut to = rng.random_range(0..slot_count - 1);
    if to >= from {
        to += 1;
    }
    Some(Move::Reassign { request, from, to })
}
