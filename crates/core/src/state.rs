use crate::{
    ensure_unique, validate_deck, CardId, DeckError, GameConfig, HandOutcome, Loadout,
    LoadoutError, SlotId,
};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub type PlayerId = u64;
pub type DaimonId = u32;
pub type TokenId = u32;

/// Source of wall-clock time for generated names.
pub trait Clock {
    fn unix_seconds(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {aggregate}: {message}")]
pub struct InvariantViolation {
    pub aggregate: &'static str,
    pub message: String,
}

impl InvariantViolation {
    fn new(aggregate: &'static str, message: impl Into<String>) -> Self {
        Self {
            aggregate,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    #[serde(default)]
    pub is_guest: bool,
    pub blood_pool: i64,
    pub max_blood_pool: i64,
    #[serde(default)]
    pub story_progression: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub tutorial_finished: bool,
    #[serde(default)]
    pub max_round_reached: u32,
    #[serde(default)]
    pub max_daimon_health_reached: i64,
    /// Every card the player has discovered.
    pub cards: Vec<CardId>,
    /// Cards equipped into the playing deck.
    pub deck: Vec<CardId>,
    #[serde(default)]
    pub tokens: Vec<TokenId>,
    #[serde(default)]
    pub loadout: Loadout,
}

impl Player {
    /// A fresh player owning and playing the starter deck.
    pub fn new(id: PlayerId, username: impl Into<String>, starter_deck: Vec<CardId>, config: &GameConfig) -> Self {
        Self {
            id,
            username: username.into(),
            is_guest: false,
            blood_pool: config.base_player_health,
            max_blood_pool: config.base_player_health,
            story_progression: 0,
            games_played: 0,
            tutorial_finished: false,
            max_round_reached: 0,
            max_daimon_health_reached: 0,
            cards: starter_deck.clone(),
            deck: starter_deck,
            tokens: Vec::new(),
            loadout: Loadout::full(),
        }
    }

    pub fn guest(id: PlayerId, clock: &dyn Clock, starter_deck: Vec<CardId>, config: &GameConfig) -> Self {
        let mut player = Self::new(id, format!("Guest{}", clock.unix_seconds()), starter_deck, config);
        player.is_guest = true;
        player
    }

    pub fn owns_card(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn owns_token(&self, token: TokenId) -> bool {
        self.tokens.contains(&token)
    }

    pub fn grant_token(&mut self, token: TokenId) {
        if !self.owns_token(token) {
            self.tokens.push(token);
        }
    }

    /// Replaces the playing deck after checking size, uniqueness and ownership.
    pub fn assign_deck(&mut self, cards: Vec<CardId>, deck_size: usize) -> Result<(), DeckError> {
        validate_deck(&cards, deck_size, |card| self.owns_card(card))?;
        self.deck = cards;
        Ok(())
    }

    pub fn equip_token(&mut self, slot: SlotId, token: TokenId) -> Result<(), LoadoutError> {
        if !self.owns_token(token) {
            return Err(LoadoutError::TokenNotOwned(token));
        }
        self.loadout.equip(slot, token)
    }

    pub fn inscribed_token(&self) -> Option<TokenId> {
        self.loadout.inscribed().and_then(|slot| slot.token)
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        self.check_within(self.max_blood_pool)
    }

    /// Checks the blood pool against `ceiling`, the round's raised maximum
    /// while a round exists.
    pub fn check_within(&self, ceiling: i64) -> Result<(), InvariantViolation> {
        if self.blood_pool < 0 {
            return Err(InvariantViolation::new("player", "blood_pool below zero"));
        }
        if self.max_blood_pool < 0 {
            return Err(InvariantViolation::new("player", "max_blood_pool below zero"));
        }
        if self.blood_pool > ceiling {
            return Err(InvariantViolation::new(
                "player",
                format!("blood_pool {} above max {ceiling}", self.blood_pool),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    /// Story sequence of the last story daimon faced; -1 before the first.
    pub daimon_progress: i32,
    pub rounds_played: u32,
    pub status: GameStatus,
    pub total_hands_won: u32,
    pub total_hands_lost: u32,
    pub win_streak: u32,
    pub longest_win_streak: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self {
            daimon_progress: -1,
            rounds_played: 0,
            status: GameStatus::InProgress,
            total_hands_won: 0,
            total_hands_lost: 0,
            win_streak: 0,
            longest_win_streak: 0,
        }
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn record_hand_win(&mut self) {
        self.total_hands_won += 1;
        self.win_streak += 1;
        self.longest_win_streak = self.longest_win_streak.max(self.win_streak);
    }

    pub fn record_hand_loss(&mut self) {
        self.total_hands_lost += 1;
        self.win_streak = 0;
    }

    pub fn mark_lost(&mut self) {
        self.status = GameStatus::Lost;
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        if self.daimon_progress < -1 {
            return Err(InvariantViolation::new("game", "daimon_progress below -1"));
        }
        if self.longest_win_streak < self.win_streak {
            return Err(InvariantViolation::new(
                "game",
                "longest_win_streak must be greater than or equal to win_streak",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Round {
    pub number: u32,
    pub daimon_id: DaimonId,
    pub daimon_blood_pool: i64,
    pub daimon_max_blood_pool: i64,
    /// Player's health ceiling for this round; effects may move it.
    pub player_max_blood_pool: i64,
    pub hands_played: u32,
    /// Front is the next card drawn.
    pub shuffled_deck: Vec<CardId>,
    pub discard_pile: Vec<CardId>,
    pub status: RoundStatus,
    #[serde(default)]
    pub reward_claimed: bool,
}

impl Round {
    pub fn is_in_progress(&self) -> bool {
        self.status == RoundStatus::InProgress
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_in_progress()
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        ensure_unique(&self.shuffled_deck)
            .map_err(|err| InvariantViolation::new("round", format!("shuffled_deck {err}")))?;
        if self.daimon_blood_pool < 0 || self.daimon_blood_pool > self.daimon_max_blood_pool {
            return Err(InvariantViolation::new(
                "round",
                "daimon_blood_pool outside [0, daimon_max_blood_pool]",
            ));
        }
        if self.player_max_blood_pool < 0 {
            return Err(InvariantViolation::new("round", "player_max_blood_pool below zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandStatus {
    InProgress,
    Won,
    Lost,
    Pushed,
}

impl From<HandOutcome> for HandStatus {
    fn from(outcome: HandOutcome) -> Self {
        match outcome {
            HandOutcome::Won => HandStatus::Won,
            HandOutcome::Lost => HandStatus::Lost,
            HandOutcome::Pushed => HandStatus::Pushed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hand {
    /// Whole pot; each side staked half.
    pub blood_wager: i64,
    pub player_hand: Vec<CardId>,
    /// The daimon's second card stays in the shoe until the hand resolves.
    pub daimon_hand: Vec<CardId>,
    pub status: HandStatus,
}

impl Hand {
    pub fn new(blood_wager: i64) -> Self {
        Self {
            blood_wager,
            player_hand: Vec::new(),
            daimon_hand: Vec::new(),
            status: HandStatus::InProgress,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == HandStatus::InProgress
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        if self.blood_wager < 0 {
            return Err(InvariantViolation::new("hand", "blood_wager below zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Draw,
    Stand,
    DoubleDown,
    Surrender,
}
