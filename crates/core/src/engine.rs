use crate::{
    Content, DaimonId, DeckError, Event, EventBus, Game, GameConfig, Hand, LoadoutError,
    PlayerAction, Player, RngState, Round, SampleError, SlotId, StoreError, Table, TokenId,
    UnknownCard,
};
use thiserror::Error;

mod actions;
mod effect;
mod hand;
mod manager;
mod progress;
mod round;

pub use manager::Target;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a game is already in progress")]
    GameInProgress,
    #[error("no game in progress")]
    NoGame,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no round in progress")]
    NoRound,
    #[error("the round is already over")]
    RoundOver,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("no hand in progress")]
    NoHand,
    #[error("no cards left to draw")]
    DeckExhausted,
    #[error("action {0:?} is not available")]
    ActionNotAvailable(PlayerAction),
    #[error("action {0:?} is not supported")]
    Unsupported(PlayerAction),
    #[error("no daimon unlocked at story progression {0}")]
    NoDaimon(u32),
    #[error("unknown daimon {0}")]
    UnknownDaimon(DaimonId),
    #[error("unknown token {0}")]
    UnknownToken(TokenId),
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),
    #[error("round has not been won")]
    RoundNotWon,
    #[error("round reward already claimed")]
    RewardClaimed,
    #[error("player lock poisoned")]
    Poisoned,
    #[error(transparent)]
    UnknownCard(#[from] UnknownCard),
    #[error("sample error: {0}")]
    Sample(#[from] SampleError),
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
    #[error("loadout error: {0}")]
    Loadout(#[from] LoadoutError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Dirty {
    player: bool,
    game: bool,
    round: bool,
    hand: bool,
}

/// Mutates one player's table for the duration of a single action.
///
/// All reads and writes go through the working copy; nothing reaches the
/// store until [`GameStateManager::persist_changes`].
#[derive(Debug)]
pub struct GameStateManager<'a> {
    content: &'a Content,
    config: &'a GameConfig,
    table: Table,
    rng: RngState,
    dirty: Dirty,
    events: EventBus,
}

impl<'a> GameStateManager<'a> {
    pub fn new(content: &'a Content, config: &'a GameConfig, table: Table, rng: RngState) -> Self {
        Self {
            content,
            config,
            table,
            rng,
            dirty: Dirty::default(),
            events: EventBus::default(),
        }
    }

    pub fn content(&self) -> &'a Content {
        self.content
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn player(&self) -> &Player {
        &self.table.player
    }

    pub fn game(&self) -> Option<&Game> {
        self.table.game.as_ref()
    }

    pub fn round(&self) -> Option<&Round> {
        self.table.round.as_ref()
    }

    pub fn hand(&self) -> Option<&Hand> {
        self.table.hand.as_ref()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.drain().collect()
    }

    fn round_in_progress(&self) -> bool {
        self.round().is_some_and(Round::is_in_progress)
    }

    fn round_terminal(&self) -> bool {
        self.round().is_some_and(Round::is_terminal)
    }

    fn hand_in_progress(&self) -> bool {
        self.hand().is_some_and(Hand::is_in_progress)
    }
}
