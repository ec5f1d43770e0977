//! Guess evaluation.

use serde::Serialize;

use super::slot::SlotIndex;

/// Result of comparing a guess with the hidden target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The selected slot holds the target.
    Correct,
    /// The selected slot is empty.
    Incorrect,
}

impl Verdict {
    /// Whether the guess was right.
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Compares the selected slot against the tracked target.
#[must_use]
pub fn evaluate(selected: SlotIndex, target: SlotIndex) -> Verdict {
    if selected == target {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::slot::{SwapOp, track};
    use proptest::prelude::*;

    #[test]
    fn matching_slot_is_correct() {
        assert_eq!(evaluate(SlotIndex(2), SlotIndex(2)), Verdict::Correct);
        assert!(evaluate(SlotIndex(2), SlotIndex(2)).is_correct());
    }

    #[test]
    fn other_slot_is_incorrect() {
        assert_eq!(evaluate(SlotIndex(0), SlotIndex(2)), Verdict::Incorrect);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::Incorrect).unwrap(),
            "\"incorrect\""
        );
    }

    proptest! {
        #[test]
        fn correct_iff_selection_matches_folded_target(
            initial in 0usize..3,
            selected in 0usize..3,
            pairs in prop::collection::vec((0usize..3, 1usize..3), 0..10),
        ) {
            let swaps: Vec<SwapOp> = pairs
                .into_iter()
                .filter_map(|(a, off)| SwapOp::new(a, (a + off) % 3))
                .collect();
            let target = track(SlotIndex(initial), &swaps);
            let verdict = evaluate(SlotIndex(selected), target);
            prop_assert_eq!(verdict.is_correct(), selected == target.get());
        }
    }
}
