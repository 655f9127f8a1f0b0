use crate::{
    CardId, Clock, Content, EffectLog, EngineError, Event, GameConfig, GameStateManager, GameStore,
    HandStatus, Player, PlayerAction, PlayerId, RngState, SlotId, Table, TokenId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// One mutex per player; actions for the same player run one at a time.
///
/// Entries live only while some action holds or waits on them.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<PlayerId, Arc<Mutex<()>>>>,
}

impl PlayerLocks {
    pub fn lock_for(&self, player: PlayerId) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self.locks.lock().map_err(|_| EngineError::Poisoned)?;
        Ok(Arc::clone(locks.entry(player).or_default()))
    }

    /// Hands back a lock from [`PlayerLocks::lock_for`], dropping the entry
    /// once nobody else holds it.
    pub fn release(&self, player: PlayerId, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        drop(lock);
        if locks
            .get(&player)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&player);
        }
    }
}

/// Result of one committed action.
#[derive(Debug, Clone)]
pub struct ActionReport<T = ()> {
    pub value: T,
    pub table: Table,
    pub events: Vec<Event>,
}

impl<T> ActionReport<T> {
    pub fn effect_logs(&self) -> impl Iterator<Item = &EffectLog> {
        self.events.iter().filter_map(|event| match event {
            Event::EffectApplied(log) => Some(log),
            _ => None,
        })
    }
}

/// Serialised entry point: load, mutate a copy, commit once.
pub struct GameService<S: GameStore> {
    store: S,
    content: Content,
    config: GameConfig,
    locks: PlayerLocks,
    seed: u64,
    nonce: AtomicU64,
    next_player: AtomicU64,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S, content: Content, config: GameConfig, seed: u64) -> Self {
        Self {
            store,
            content,
            config,
            locks: PlayerLocks::default(),
            seed,
            nonce: AtomicU64::new(0),
            next_player: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn create_player(&self, username: &str) -> Result<Player, EngineError> {
        let id = self.next_player.fetch_add(1, Ordering::Relaxed);
        let player = Player::new(id, username, self.content.starter_deck(), &self.config);
        self.store.insert_player(&player)?;
        Ok(player)
    }

    pub fn create_guest(&self, clock: &dyn Clock) -> Result<Player, EngineError> {
        let id = self.next_player.fetch_add(1, Ordering::Relaxed);
        let player = Player::guest(id, clock, self.content.starter_deck(), &self.config);
        self.store.insert_player(&player)?;
        Ok(player)
    }

    pub fn table(&self, player: PlayerId) -> Result<Table, EngineError> {
        Ok(self.store.load(player)?)
    }

    pub fn available_actions(&self, player: PlayerId) -> Result<Vec<PlayerAction>, EngineError> {
        let table = self.store.load(player)?;
        let manager = GameStateManager::new(&self.content, &self.config, table, self.next_rng());
        Ok(manager.available_actions())
    }

    pub fn start_game(&self, player: PlayerId) -> Result<ActionReport, EngineError> {
        self.run(player, |manager| manager.start_game())
    }

    pub fn start_round(&self, player: PlayerId) -> Result<ActionReport, EngineError> {
        self.run(player, |manager| manager.start_round())
    }

    pub fn start_hand(&self, player: PlayerId) -> Result<ActionReport<HandStatus>, EngineError> {
        self.run(player, |manager| manager.start_hand())
    }

    pub fn draw(&self, player: PlayerId) -> Result<ActionReport<CardId>, EngineError> {
        self.run(player, |manager| manager.draw())
    }

    pub fn stand(&self, player: PlayerId) -> Result<ActionReport<HandStatus>, EngineError> {
        self.run(player, |manager| manager.stand())
    }

    pub fn surrender(&self, player: PlayerId) -> Result<ActionReport<HandStatus>, EngineError> {
        self.run(player, |manager| manager.surrender())
    }

    pub fn double_down(&self, player: PlayerId) -> Result<ActionReport<HandStatus>, EngineError> {
        self.run(player, |manager| manager.double_down())
    }

    pub fn equip_token(
        &self,
        player: PlayerId,
        slot: SlotId,
        token: TokenId,
    ) -> Result<ActionReport<Vec<EffectLog>>, EngineError> {
        self.run(player, |manager| manager.equip_token(slot, token))
    }

    pub fn assign_deck(&self, player: PlayerId, cards: Vec<CardId>) -> Result<ActionReport, EngineError> {
        self.run(player, |manager| manager.assign_deck(cards))
    }

    pub fn claim_story_token(&self, player: PlayerId) -> Result<ActionReport<Option<TokenId>>, EngineError> {
        self.run(player, |manager| manager.claim_story_token())
    }

    fn next_rng(&self) -> RngState {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        RngState::from_seed(mix(self.seed, nonce))
    }

    /// Runs `op` on a loaded copy of the player's table under the player's lock.
    ///
    /// The copy is committed as one changeset on success and dropped on error.
    fn run<T>(
        &self,
        player: PlayerId,
        op: impl FnOnce(&mut GameStateManager<'_>) -> Result<T, EngineError>,
    ) -> Result<ActionReport<T>, EngineError> {
        let lock = self.locks.lock_for(player)?;
        let report = match lock.lock() {
            Ok(_guard) => self.run_locked(player, op),
            Err(_) => Err(EngineError::Poisoned),
        };
        self.locks.release(player, lock);
        report
    }

    fn run_locked<T>(
        &self,
        player: PlayerId,
        op: impl FnOnce(&mut GameStateManager<'_>) -> Result<T, EngineError>,
    ) -> Result<ActionReport<T>, EngineError> {
        let table = self.store.load(player)?;
        let mut manager = GameStateManager::new(&self.content, &self.config, table, self.next_rng());
        let value = match op(&mut manager) {
            Ok(value) => value,
            Err(err) => {
                debug!(player, %err, "action rejected");
                return Err(err);
            }
        };
        if let Err(err) = manager.persist_changes(&self.store) {
            warn!(player, %err, "commit failed");
            return Err(err.into());
        }
        let events = manager.take_events();
        Ok(ActionReport {
            value,
            table: manager.into_table(),
            events,
        })
    }
}

/// SplitMix64 step, so consecutive nonces give unrelated seeds.
fn mix(seed: u64, nonce: u64) -> u64 {
    let mut z = seed ^ nonce.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
