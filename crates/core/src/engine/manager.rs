use super::{EngineError, GameStateManager};
use crate::{
    CardId, Change, Changeset, Event, GameStore, RoundStatus, StoreError,
};
use tracing::{debug, info};

/// Which side of the table an amount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Player,
    Daimon,
}

impl GameStateManager<'_> {
    /// The player's current health ceiling; the round's while one exists.
    pub fn player_max_health(&self) -> i64 {
        self.round()
            .map(|round| round.player_max_blood_pool)
            .unwrap_or(self.table.player.max_blood_pool)
    }

    /// Adds `delta` to the player's blood pool, clamped to `[0, max]`.
    pub fn set_player_health(&mut self, delta: i64) -> i64 {
        let max = self.player_max_health().max(0);
        let player = &mut self.table.player;
        player.blood_pool = player.blood_pool.saturating_add(delta).clamp(0, max);
        let value = player.blood_pool;
        self.dirty.player = true;
        self.round_over();
        value
    }

    /// Adds `delta` to the daimon's blood pool; `None` without a round.
    pub fn set_daimon_health(&mut self, delta: i64) -> Option<i64> {
        let round = self.table.round.as_mut()?;
        let max = round.daimon_max_blood_pool.max(0);
        round.daimon_blood_pool = round.daimon_blood_pool.saturating_add(delta).clamp(0, max);
        let value = round.daimon_blood_pool;
        self.dirty.round = true;
        self.round_over();
        Some(value)
    }

    /// Scales the player's ceiling by `multiplier` and re-clamps current health.
    pub fn set_player_max_health(&mut self, multiplier: f64) -> i64 {
        let new_max = scale(self.player_max_health(), multiplier);
        match self.table.round.as_mut() {
            Some(round) => {
                round.player_max_blood_pool = new_max;
                self.dirty.round = true;
            }
            None => self.table.player.max_blood_pool = new_max,
        }
        let player = &mut self.table.player;
        player.blood_pool = player.blood_pool.min(new_max);
        self.dirty.player = true;
        self.round_over();
        new_max
    }

    pub fn set_daimon_max_health(&mut self, multiplier: f64) -> Option<i64> {
        let round = self.table.round.as_mut()?;
        let new_max = scale(round.daimon_max_blood_pool, multiplier);
        round.daimon_max_blood_pool = new_max;
        round.daimon_blood_pool = round.daimon_blood_pool.min(new_max);
        self.dirty.round = true;
        self.round_over();
        Some(new_max)
    }

    /// Adds `delta` to the open hand's pot. The pot never drops below zero.
    pub fn set_blood_wager(&mut self, delta: i64) -> Option<i64> {
        let hand = self.table.hand.as_mut()?;
        hand.blood_wager = hand.blood_wager.saturating_add(delta).max(0);
        self.dirty.hand = true;
        Some(hand.blood_wager)
    }

    /// Moves up to `count` cards from the front of the shoe to the player's hand.
    pub fn set_player_hand(&mut self, count: usize) -> Result<Vec<CardId>, EngineError> {
        self.deal(Target::Player, count)
    }

    pub fn set_daimon_hand(&mut self, count: usize) -> Result<Vec<CardId>, EngineError> {
        self.deal(Target::Daimon, count)
    }

    pub(super) fn deal(&mut self, target: Target, count: usize) -> Result<Vec<CardId>, EngineError> {
        if self.table.hand.is_none() {
            return Err(EngineError::NoHand);
        }
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next_card()? {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        let hand = self.table.hand.as_mut().ok_or(EngineError::NoHand)?;
        match target {
            Target::Player => hand.player_hand.extend_from_slice(&drawn),
            Target::Daimon => hand.daimon_hand.extend_from_slice(&drawn),
        }
        self.dirty.hand = true;
        Ok(drawn)
    }

    fn next_card(&mut self) -> Result<Option<CardId>, EngineError> {
        self.reshuffle_if_empty()?;
        let round = self.table.round.as_mut().ok_or(EngineError::NoRound)?;
        if round.shuffled_deck.is_empty() {
            return Ok(None);
        }
        self.dirty.round = true;
        Ok(Some(round.shuffled_deck.remove(0)))
    }

    /// Ends the round once either blood pool is empty.
    ///
    /// Returns whether the round is over. A round that is already over is
    /// left untouched.
    pub fn round_over(&mut self) -> bool {
        let player_dead = self.table.player.blood_pool <= 0;
        let Some(round) = self.table.round.as_mut() else {
            return false;
        };
        if round.is_terminal() {
            return true;
        }
        let status = if player_dead {
            RoundStatus::Lost
        } else if round.daimon_blood_pool <= 0 {
            RoundStatus::Won
        } else {
            return false;
        };
        round.status = status;
        let number = round.number;
        self.dirty.round = true;
        info!(round = number, ?status, "round over");
        self.events.push(Event::RoundEnded { number, status });

        let player = &mut self.table.player;
        if !player.tutorial_finished {
            player.tutorial_finished = true;
            self.dirty.player = true;
        }
        if status == RoundStatus::Lost {
            if let Some(game) = self.table.game.as_mut() {
                game.mark_lost();
                let rounds_played = game.rounds_played;
                self.dirty.game = true;
                info!(rounds_played, "game lost");
                self.events.push(Event::GameLost { rounds_played });
            }
        }
        true
    }

    /// The aggregates touched since the last persist.
    pub fn changeset(&self) -> Changeset {
        fn change<T: Clone>(dirty: bool, value: &Option<T>) -> Change<T> {
            match (dirty, value) {
                (false, _) => Change::Keep,
                (true, Some(value)) => Change::Put(value.clone()),
                (true, None) => Change::Remove,
            }
        }
        Changeset {
            player: self.dirty.player.then(|| self.table.player.clone()),
            game: change(self.dirty.game, &self.table.game),
            round: change(self.dirty.round, &self.table.round),
            hand: change(self.dirty.hand, &self.table.hand),
        }
    }

    /// Commits every dirty aggregate in one write.
    pub fn persist_changes<S: GameStore + ?Sized>(&mut self, store: &S) -> Result<(), StoreError> {
        let changes = self.changeset();
        if changes.is_empty() {
            return Ok(());
        }
        store.commit(self.table.player.id, changes)?;
        debug!(player = self.table.player.id, dirty = ?self.dirty, "changes persisted");
        self.dirty = Default::default();
        Ok(())
    }
}

fn scale(value: i64, multiplier: f64) -> i64 {
    let scaled = (value as f64 * multiplier).floor();
    if scaled.is_finite() {
        (scaled as i64).max(0)
    } else {
        0
    }
}
