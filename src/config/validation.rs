//! Configuration validation
//!
//! Semantic checks on a deserialized [`GameConfig`]. All problems are
//! collected rather than stopping at the first one.

use std::collections::HashSet;
use std::time::Duration;

use crate::config::schema::{CupFlipConfig, FindCharacterConfig, GameConfig, HatTrickConfig};
use crate::error::{Severity, ValidationIssue};

/// Upper bound on swaps per round; longer rounds are almost certainly typos.
pub const MAX_SWAPS: usize = 1000;

/// Upper bound on slots, cups, or doors.
pub const MAX_SLOTS: usize = 64;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns the result.
    pub fn validate(&mut self, config: &GameConfig) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_hat_trick(&config.hat_trick);
        self.validate_cup_flip(config.cup_flip);
        self.validate_find_character(&config.find_character);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_hat_trick(&mut self, config: &HatTrickConfig) {
        if config.slots < 2 {
            self.add_error("hat_trick.slots", "at least 2 slots are required to swap");
        } else if config.slots > MAX_SLOTS {
            self.add_error(
                "hat_trick.slots",
                &format!("at most {MAX_SLOTS} slots are supported"),
            );
        }

        if config.swaps > MAX_SWAPS {
            self.add_error(
                "hat_trick.swaps",
                &format!("at most {MAX_SWAPS} swaps per round are supported"),
            );
        } else if config.swaps == 0 {
            self.add_warning(
                "hat_trick.swaps",
                "no swaps configured; the target never moves",
            );
        }

        if config.timings.reveal == Duration::ZERO {
            self.add_warning(
                "hat_trick.timings.reveal",
                "zero reveal time; the target is never visible",
            );
        }
        if config.timings.swap == Duration::ZERO {
            self.add_warning(
                "hat_trick.timings.swap",
                "zero swap time; swaps cannot be followed",
            );
        }
    }

    fn validate_cup_flip(&mut self, config: CupFlipConfig) {
        if config.cups == 0 {
            self.add_error("cup_flip.cups", "at least one cup is required");
        } else if config.cups > MAX_SLOTS {
            self.add_error(
                "cup_flip.cups",
                &format!("at most {MAX_SLOTS} cups are supported"),
            );
        }

        if config.flips_per_move == 0 {
            self.add_error("cup_flip.flips_per_move", "must flip at least one cup per move");
        } else if config.flips_per_move > config.cups {
            self.add_error(
                "cup_flip.flips_per_move",
                "cannot flip more cups than are on the table",
            );
        } else if config.flips_per_move % 2 == 0 && config.cups % 2 == 1 {
            // even flips keep the face-down count's parity; an odd table never completes
            self.add_error(
                "cup_flip.flips_per_move",
                "an even number of flips can never turn an odd number of cups",
            );
        } else if config.flips_per_move == config.cups && config.cups > 1 {
            self.add_warning(
                "cup_flip.flips_per_move",
                "every move flips every cup; the puzzle is solved in one move",
            );
        }
    }

    fn validate_find_character(&mut self, config: &FindCharacterConfig) {
        if config.characters.len() < 2 {
            self.add_error(
                "find_character.characters",
                "at least 2 characters are required",
            );
        } else if config.characters.len() > MAX_SLOTS {
            self.add_error(
                "find_character.characters",
                &format!("at most {MAX_SLOTS} characters are supported"),
            );
        }

        let mut seen = HashSet::new();
        for (i, name) in config.characters.iter().enumerate() {
            if name.trim().is_empty() {
                self.add_error(
                    &format!("find_character.characters[{i}]"),
                    "character name cannot be empty",
                );
            } else if !seen.insert(name.as_str()) {
                self.add_error(
                    &format!("find_character.characters[{i}]"),
                    &format!("duplicate character '{name}'"),
                );
            }
        }

        if config.countdown == Duration::ZERO {
            self.add_warning(
                "find_character.countdown",
                "zero countdown; doors close before they can be memorized",
            );
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: &GameConfig) -> ValidationResult {
        Validator::new().validate(config)
    }

    fn error_paths(result: &ValidationResult) -> Vec<&str> {
        result.errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn defaults_are_valid() {
        let result = validate(&GameConfig::default());
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn single_slot_is_rejected() {
        let mut config = GameConfig::default();
        config.hat_trick.slots = 1;
        let result = validate(&config);
        assert!(result.has_errors());
        assert_eq!(error_paths(&result), vec!["hat_trick.slots"]);
    }

    #[test]
    fn zero_swaps_warns() {
        let mut config = GameConfig::default();
        config.hat_trick.swaps = 0;
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Warning);
    }

    #[test]
    fn too_many_swaps_is_rejected() {
        let mut config = GameConfig::default();
        config.hat_trick.swaps = MAX_SWAPS + 1;
        assert_eq!(error_paths(&validate(&config)), vec!["hat_trick.swaps"]);
    }

    #[test]
    fn unsolvable_cup_parity_is_rejected() {
        let mut config = GameConfig::default();
        config.cup_flip.flips_per_move = 2;
        assert_eq!(
            error_paths(&validate(&config)),
            vec!["cup_flip.flips_per_move"]
        );
    }

    #[test]
    fn more_flips_than_cups_is_rejected() {
        let mut config = GameConfig::default();
        config.cup_flip.flips_per_move = 6;
        assert_eq!(
            error_paths(&validate(&config)),
            vec!["cup_flip.flips_per_move"]
        );
    }

    #[test]
    fn duplicate_and_empty_characters_are_rejected() {
        let mut config = GameConfig::default();
        config.find_character.characters = vec!["Gary".into(), " ".into(), "Gary".into()];
        let result = validate(&config);
        assert_eq!(
            error_paths(&result),
            vec!["find_character.characters[1]", "find_character.characters[2]"]
        );
    }

    #[test]
    fn collects_all_errors() {
        let mut config = GameConfig::default();
        config.hat_trick.slots = 0;
        config.cup_flip.cups = 0;
        config.find_character.characters.clear();
        let result = validate(&config);
        assert!(result.errors.len() >= 3, "{:?}", result.errors);
    }
}
