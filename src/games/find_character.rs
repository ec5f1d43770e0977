//! Find-character door game.
//!
//! Characters are shuffled behind doors that stay open while the player
//! memorizes them. Once the doors close a target character is announced and
//! the player opens doors until it is found. A wrong door stays open for a
//! moment, then closes again and can be tried later.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::schema::FindCharacterConfig;
use crate::game::{SlotIndex, Verdict, evaluate};
use crate::observability::metrics;

const GAME: &str = "find_character";

/// Stage of a find-character round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Doors open, countdown running; choices are ignored.
    Memorizing,
    /// Doors closed, target announced; choices are accepted.
    Searching,
    /// Target found; waiting for a replay.
    Found,
}

/// What was behind an opened door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoorOutcome {
    /// Door that was opened.
    pub door: usize,
    /// Index of the character behind it.
    pub character: usize,
    /// Whether that character is the target.
    pub verdict: Verdict,
}

/// State of one find-character round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindCharacter {
    characters: Vec<String>,
    /// Character index behind each door
    placement: Vec<usize>,
    target: usize,
    open: Vec<bool>,
    stage: Stage,
    remaining_doors: usize,
}

impl FindCharacter {
    /// Shuffles the characters behind the doors and picks a target.
    ///
    /// The round starts in [`Stage::Memorizing`] with every door open.
    /// `config.characters` must not be empty.
    pub fn new<R: Rng + ?Sized>(config: &FindCharacterConfig, rng: &mut R) -> Self {
        let characters = config.characters.clone();
        let doors = characters.len();
        let mut game = Self {
            characters,
            placement: (0..doors).collect(),
            target: 0,
            open: vec![true; doors],
            stage: Stage::Memorizing,
            remaining_doors: doors,
        };
        game.shuffle(rng);
        game
    }

    fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.placement.shuffle(rng);
        self.target = rng.random_range(0..self.characters.len());
        self.open.fill(true);
        self.stage = Stage::Memorizing;
        self.remaining_doors = self.placement.len();
        debug!(placement = ?self.placement, target = self.target, "doors shuffled");
        metrics::record_round_started(GAME);
    }

    /// Re-shuffles for a new round.
    pub fn replay<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shuffle(rng);
    }

    /// Number of doors.
    #[must_use]
    pub fn doors(&self) -> usize {
        self.placement.len()
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Name of a character by index.
    #[must_use]
    pub fn character_name(&self, character: usize) -> Option<&str> {
        self.characters.get(character).map(String::as_str)
    }

    /// Character index behind `door`.
    #[must_use]
    pub fn character_behind(&self, door: usize) -> Option<usize> {
        self.placement.get(door).copied()
    }

    /// The character being searched for.
    #[must_use]
    pub const fn target(&self) -> usize {
        self.target
    }

    /// Whether `door` is open.
    #[must_use]
    pub fn is_open(&self, door: usize) -> bool {
        self.open.get(door).copied().unwrap_or(false)
    }

    /// Doors left to try; drops by one per opened door.
    #[must_use]
    pub const fn remaining_doors(&self) -> usize {
        self.remaining_doors
    }

    /// Ends the memorizing countdown: closes every door and starts the
    /// search. Ignored outside [`Stage::Memorizing`].
    pub fn close_doors(&mut self) -> bool {
        if self.stage != Stage::Memorizing {
            return false;
        }
        self.open.fill(false);
        self.stage = Stage::Searching;
        debug!(target = self.target, "doors closed; search started");
        true
    }

    /// Opens `door`.
    ///
    /// Ignored (returns `None`) outside [`Stage::Searching`], for doors that
    /// are out of range, and for doors that are already open. Finding the
    /// target opens every door and ends the round.
    pub fn choose(&mut self, door: usize) -> Option<DoorOutcome> {
        if self.stage != Stage::Searching || door >= self.doors() || self.open[door] {
            debug!(door, stage = ?self.stage, "door choice ignored");
            return None;
        }

        let character = self.placement[door];
        let verdict = evaluate(SlotIndex(character), SlotIndex(self.target));
        self.open[door] = true;
        self.remaining_doors = self.remaining_doors.saturating_sub(1);

        if verdict.is_correct() {
            self.open.fill(true);
            self.stage = Stage::Found;
            info!(door, "target character found");
        }
        metrics::record_verdict(GAME, verdict);

        Some(DoorOutcome {
            door,
            character,
            verdict,
        })
    }

    /// Closes a door opened by a wrong choice so it can be tried again.
    ///
    /// Ignored unless searching and the door is open.
    pub fn close_door(&mut self, door: usize) -> bool {
        if self.stage != Stage::Searching || !self.is_open(door) {
            return false;
        }
        self.open[door] = false;
        true
    }
}
