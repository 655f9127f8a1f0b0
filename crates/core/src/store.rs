use crate::{Game, Hand, InvariantViolation, Player, PlayerId, Round};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

/// Everything one player's actions read and write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub player: Player,
    #[serde(default)]
    pub game: Option<Game>,
    #[serde(default)]
    pub round: Option<Round>,
    #[serde(default)]
    pub hand: Option<Hand>,
}

impl Table {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            game: None,
            round: None,
            hand: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    Keep,
    Put(T),
    Remove,
}

impl<T> Default for Change<T> {
    fn default() -> Self {
        Change::Keep
    }
}

impl<T> Change<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Change::Keep)
    }
}

/// Dirty aggregates of one action, written all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    pub player: Option<Player>,
    pub game: Change<Game>,
    pub round: Change<Round>,
    pub hand: Change<Hand>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.player.is_none() && self.game.is_keep() && self.round.is_keep() && self.hand.is_keep()
    }

    /// Checks every aggregate the changeset would write.
    ///
    /// `stored_round` is the round already persisted; the player's blood pool
    /// is bounded by whichever round will be current after the write.
    pub fn validate(&self, stored_round: Option<&Round>) -> Result<(), InvariantViolation> {
        let round = match &self.round {
            Change::Keep => stored_round,
            Change::Put(round) => Some(round),
            Change::Remove => None,
        };
        if let Some(player) = &self.player {
            let ceiling = round.map_or(player.max_blood_pool, |round| round.player_max_blood_pool);
            player.check_within(ceiling)?;
        }
        if let Change::Put(game) = &self.game {
            game.check()?;
        }
        if let Change::Put(round) = &self.round {
            round.check()?;
        }
        if let Change::Put(hand) = &self.hand {
            hand.check()?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("player {0} already exists")]
    PlayerExists(PlayerId),
    #[error(transparent)]
    Invalid(#[from] InvariantViolation),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence seam for player tables.
pub trait GameStore {
    fn load(&self, player: PlayerId) -> Result<Table, StoreError>;
    fn insert_player(&self, player: &Player) -> Result<(), StoreError>;
    /// Writes every part of `changes` or none of it.
    fn commit(&self, player: PlayerId, changes: Changeset) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Rows {
    player: String,
    game: Option<String>,
    round: Option<String>,
    hand: Option<String>,
}

/// JSON rows kept in memory, the same layout a database would hold.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<PlayerId, Rows>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn decode<T: for<'de> Deserialize<'de>>(row: Option<&String>) -> Result<Option<T>, StoreError> {
    row.map(|json| serde_json::from_str(json))
        .transpose()
        .map_err(StoreError::from)
}

fn encode<T: Serialize>(change: &Change<T>) -> Result<Change<String>, StoreError> {
    Ok(match change {
        Change::Keep => Change::Keep,
        Change::Put(value) => Change::Put(serde_json::to_string(value)?),
        Change::Remove => Change::Remove,
    })
}

fn write(row: &mut Option<String>, change: Change<String>) {
    match change {
        Change::Keep => {}
        Change::Put(json) => *row = Some(json),
        Change::Remove => *row = None,
    }
}

impl GameStore for MemoryStore {
    fn load(&self, player: PlayerId) -> Result<Table, StoreError> {
        let rows = self.rows.lock().map_err(|_| StoreError::Poisoned)?;
        let row = rows.get(&player).ok_or(StoreError::PlayerNotFound(player))?;
        Ok(Table {
            player: serde_json::from_str(&row.player)?,
            game: decode(row.game.as_ref())?,
            round: decode(row.round.as_ref())?,
            hand: decode(row.hand.as_ref())?,
        })
    }

    fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        player.check()?;
        let json = serde_json::to_string(player)?;
        let mut rows = self.rows.lock().map_err(|_| StoreError::Poisoned)?;
        if rows.contains_key(&player.id) {
            return Err(StoreError::PlayerExists(player.id));
        }
        rows.insert(
            player.id,
            Rows {
                player: json,
                ..Rows::default()
            },
        );
        Ok(())
    }

    fn commit(&self, player: PlayerId, changes: Changeset) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().map_err(|_| StoreError::Poisoned)?;
        let row = rows.get_mut(&player).ok_or(StoreError::PlayerNotFound(player))?;
        let stored_round: Option<Round> = match changes.round {
            Change::Keep => decode(row.round.as_ref())?,
            _ => None,
        };
        if let Err(err) = changes.validate(stored_round.as_ref()) {
            warn!(player, %err, "rejected commit");
            return Err(err.into());
        }
        // Encode everything before touching a row.
        let player_json = changes.player.as_ref().map(serde_json::to_string).transpose()?;
        let game = encode(&changes.game)?;
        let round = encode(&changes.round)?;
        let hand = encode(&changes.hand)?;

        if let Some(json) = player_json {
            row.player = json;
        }
        write(&mut row.game, game);
        write(&mut row.round, round);
        write(&mut row.hand, hand);
        Ok(())
    }
}
