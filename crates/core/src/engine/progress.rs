use super::{EngineError, GameStateManager};
use crate::{CardId, EffectLog, Event, Phase, RoundStatus, SlotId, TokenId, UnknownCard};
use tracing::info;

impl GameStateManager<'_> {
    /// Equips an owned token; its slot effects fire on equip during a round.
    pub fn equip_token(&mut self, slot: SlotId, token: TokenId) -> Result<Vec<EffectLog>, EngineError> {
        if self.content.token(token).is_none() {
            return Err(EngineError::UnknownToken(token));
        }
        let slot_type = self
            .table
            .player
            .loadout
            .slot(slot)
            .map(|slot| slot.slot_type)
            .ok_or(EngineError::UnknownSlot(slot))?;
        self.table.player.equip_token(slot, token)?;
        self.dirty.player = true;
        if !self.round_in_progress() {
            return Ok(Vec::new());
        }
        let logs = self.apply_slot_effects(token, slot_type, Phase::OnEquip);
        if self.round_terminal() && self.hand_in_progress() {
            self.close_on_terminal()?;
        }
        Ok(logs)
    }

    /// Replaces the player's playing deck; it takes effect at the next shuffle.
    pub fn assign_deck(&mut self, cards: Vec<CardId>) -> Result<(), EngineError> {
        if let Some(card) = cards.iter().find(|card| self.content.card(**card).is_none()) {
            return Err(UnknownCard(*card).into());
        }
        self.table.player.assign_deck(cards, self.config.deck_size)?;
        self.dirty.player = true;
        Ok(())
    }

    /// Grants the next story token after a won round and advances the story.
    ///
    /// Returns `None` once the story has no tokens left; the reward still
    /// counts as claimed.
    pub fn claim_story_token(&mut self) -> Result<Option<TokenId>, EngineError> {
        let content = self.content;
        let round = self.table.round.as_mut().ok_or(EngineError::NoRound)?;
        if round.status != RoundStatus::Won {
            return Err(EngineError::RoundNotWon);
        }
        if round.reward_claimed {
            return Err(EngineError::RewardClaimed);
        }
        round.reward_claimed = true;
        self.dirty.round = true;

        let player = &mut self.table.player;
        let Some(token) = content.next_story_token(player.story_progression) else {
            return Ok(None);
        };
        player.grant_token(token.id);
        player.story_progression += 1;
        self.dirty.player = true;
        info!(token = token.id, story_progression = player.story_progression, "story token claimed");
        self.events.push(Event::TokenClaimed { token: token.id });
        Ok(Some(token.id))
    }
}
