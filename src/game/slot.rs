//! Slots, swaps, and target tracking.
//!
//! A round hides one item under one of N slots. Every swap exchanges two
//! slots; the tracker follows the hidden item through those exchanges.

use serde::Serialize;

/// Index of one fixed slot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Returns the raw zero-based index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl From<usize> for SlotIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One exchange between two distinct slots.
///
/// The two indices are always distinct; construct through [`SwapOp::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SwapOp {
    a: SlotIndex,
    b: SlotIndex,
}

impl SwapOp {
    /// Creates a swap between `a` and `b`.
    ///
    /// Returns `None` when both indices name the same slot.
    #[must_use]
    pub fn new(a: impl Into<SlotIndex>, b: impl Into<SlotIndex>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        (a != b).then_some(Self { a, b })
    }

    /// First slot of the exchange.
    #[must_use]
    pub const fn first(self) -> SlotIndex {
        self.a
    }

    /// Second slot of the exchange.
    #[must_use]
    pub const fn second(self) -> SlotIndex {
        self.b
    }

    /// Whether the exchange moves `slot`.
    #[must_use]
    pub fn touches(self, slot: SlotIndex) -> bool {
        self.a == slot || self.b == slot
    }
}

impl std::fmt::Display for SwapOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

/// Follows the hidden target through one swap.
///
/// If `target` is one of the swapped slots the other slot is returned,
/// otherwise `target` is unchanged.
#[must_use]
pub fn apply_swap(target: SlotIndex, swap: SwapOp) -> SlotIndex {
    if target == swap.a {
        swap.b
    } else if target == swap.b {
        swap.a
    } else {
        target
    }
}

/// Folds [`apply_swap`] over a whole sequence, in order.
#[must_use]
pub fn track(initial: SlotIndex, swaps: &[SwapOp]) -> SlotIndex {
    swaps.iter().fold(initial, |target, &swap| apply_swap(target, swap))
}
