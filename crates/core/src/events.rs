use crate::{
    ActionKind, CardId, DaimonId, HandStatus, Phase, RoundStatus, TokenId,
};
use serde::{Deserialize, Serialize};

/// Entity whose effect bundle produced a log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EffectSource {
    Token(TokenId),
    Daimon(DaimonId),
    Card(CardId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EffectOutcome {
    PlayerHealth { amount: i64, blood_pool: i64 },
    DaimonHealth { amount: i64, blood_pool: i64 },
    BloodWager { amount: i64, blood_wager: i64 },
    PlayerMaxHealth { multiplier: f64, max_blood_pool: i64 },
    DaimonMaxHealth { multiplier: f64, max_blood_pool: i64 },
    CardCount { count: i32 },
    NextCardCount { count: i32 },
    NextCard { card: CardId },
    /// The action had nothing to act on (no round, no hand, empty shoe).
    Skipped,
}

/// Diagnostic record of one applied effect action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectLog {
    pub source: EffectSource,
    pub phase: Phase,
    pub action: ActionKind,
    pub outcome: EffectOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GameStarted { blood_pool: i64 },
    RoundStarted {
        number: u32,
        daimon: DaimonId,
        daimon_blood_pool: i64,
        tutorial: bool,
    },
    DeckShuffled { cards: usize },
    HandDealt {
        blood_wager: i64,
        player_hand: Vec<CardId>,
        daimon_hand: Vec<CardId>,
    },
    CardDrawn { card: CardId, total: u32 },
    EffectApplied(EffectLog),
    HandResolved {
        status: HandStatus,
        blood_wager: i64,
        player_total: u32,
        daimon_total: u32,
    },
    RoundEnded { number: u32, status: RoundStatus },
    GameLost { rounds_played: u32 },
    TokenClaimed { token: TokenId },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
