//! Configuration schema types
//!
//! Settings for all three games, deserialized from YAML. Every field has a
//! default so an empty document (or no file at all) yields the stock game.
//! Durations are human-readable strings such as `"800ms"` or `"2s"`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Root
// ============================================================================

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Shell-game settings.
    pub hat_trick: HatTrickConfig,

    /// Flip-puzzle settings.
    pub cup_flip: CupFlipConfig,

    /// Door-memory settings.
    pub find_character: FindCharacterConfig,
}

// ============================================================================
// Hat-trick
// ============================================================================

/// Settings for the hat-trick shell game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HatTrickConfig {
    /// Number of hats.
    pub slots: usize,

    /// Number of swaps played per round.
    pub swaps: usize,

    /// Delays between the timed steps of a round.
    pub timings: HatTrickTimings,
}

impl Default for HatTrickConfig {
    fn default() -> Self {
        Self {
            slots: 3,
            swaps: 4,
            timings: HatTrickTimings::default(),
        }
    }
}

/// Delays between the timed steps of a hat-trick round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HatTrickTimings {
    /// Pause before the first round starts.
    #[serde(with = "humantime_duration")]
    pub start_delay: Duration,

    /// How long the hidden character stays visible.
    #[serde(with = "humantime_duration")]
    pub reveal: Duration,

    /// Highlight shown on the two hats about to swap.
    #[serde(with = "humantime_duration")]
    pub highlight: Duration,

    /// Length of the swap animation.
    #[serde(with = "humantime_duration")]
    pub swap: Duration,

    /// Pause after each swap before the next one.
    #[serde(with = "humantime_duration")]
    pub pause: Duration,

    /// Pause between a reset and the next round.
    #[serde(with = "humantime_duration")]
    pub restart: Duration,
}

impl Default for HatTrickTimings {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(1),
            reveal: Duration::from_secs(2),
            highlight: Duration::from_millis(500),
            swap: Duration::from_millis(800),
            pause: Duration::from_millis(800),
            restart: Duration::from_millis(500),
        }
    }
}

impl HatTrickTimings {
    /// All delays set to zero; rounds play back immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            start_delay: Duration::ZERO,
            reveal: Duration::ZERO,
            highlight: Duration::ZERO,
            swap: Duration::ZERO,
            pause: Duration::ZERO,
            restart: Duration::ZERO,
        }
    }

    /// Time from entering the swapping phase to entering guessing.
    #[must_use]
    pub fn swapping_total(&self, swaps: usize) -> Duration {
        let per_swap = self.highlight + self.swap + self.pause;
        per_swap * u32::try_from(swaps).unwrap_or(u32::MAX)
    }
}

// ============================================================================
// Cup-flip
// ============================================================================

/// Settings for the cup-flip puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CupFlipConfig {
    /// Number of cups on the table.
    pub cups: usize,

    /// Cups that must be selected to make one move.
    pub flips_per_move: usize,
}

impl Default for CupFlipConfig {
    fn default() -> Self {
        Self {
            cups: 5,
            flips_per_move: 3,
        }
    }
}

// ============================================================================
// Find-character
// ============================================================================

/// Settings for the find-character door game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindCharacterConfig {
    /// Characters hidden behind the doors, one per door.
    pub characters: Vec<String>,

    /// How long the doors stay open for memorizing.
    #[serde(with = "humantime_duration")]
    pub countdown: Duration,

    /// How long a wrong door stays open before closing again.
    #[serde(with = "humantime_duration")]
    pub miss_delay: Duration,
}

impl Default for FindCharacterConfig {
    fn default() -> Self {
        Self {
            characters: ["SpongeBob", "Patrick", "Squidward", "Mr. Krabs"]
                .into_iter()
                .map(String::from)
                .collect(),
            countdown: Duration::from_secs(3),
            miss_delay: Duration::from_secs(1),
        }
    }
}

// ============================================================================
// Duration (de)serialization
// ============================================================================

/// Serde adapter for `"1s"` / `"250ms"` style durations.
pub mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes a duration in humantime notation.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    /// Parses a duration in humantime notation.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for malformed duration strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(|e| de::Error::custom(format!("invalid duration '{raw}': {e}")))
    }
}
