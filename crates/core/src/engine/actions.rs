use super::{EngineError, GameStateManager};
use crate::{
    hand_total, is_bust, tutorial_actions, CardId, Event, HandStatus, Phase, PlayerAction,
    TUTORIAL_DECK,
};

impl GameStateManager<'_> {
    /// Actions the player may take on the open hand.
    ///
    /// Tutorial players follow the scripted step when one exists. Double down
    /// is never offered.
    pub fn available_actions(&self) -> Vec<PlayerAction> {
        let Some(hand) = self.hand().filter(|hand| hand.is_in_progress()) else {
            return Vec::new();
        };
        let Some(round) = self.round().filter(|round| round.is_in_progress()) else {
            return Vec::new();
        };
        if !self.table.player.tutorial_finished {
            let dealt = TUTORIAL_DECK.len().saturating_sub(round.shuffled_deck.len());
            if let Some(actions) = tutorial_actions(dealt) {
                return actions.to_vec();
            }
        }
        let bust = self
            .content
            .ranks(&hand.player_hand)
            .map_or(true, |ranks| is_bust(&ranks));
        let mut actions = Vec::new();
        if !bust {
            actions.push(PlayerAction::Draw);
            actions.push(PlayerAction::Stand);
        }
        if hand.player_hand.len() == 2 {
            actions.push(PlayerAction::Surrender);
        }
        actions
    }

    fn ensure_available(&self, action: PlayerAction) -> Result<(), EngineError> {
        if !self.hand_in_progress() {
            return Err(EngineError::NoHand);
        }
        if !self.available_actions().contains(&action) {
            return Err(EngineError::ActionNotAvailable(action));
        }
        Ok(())
    }

    /// Deals one card to the player. A bust settles the hand immediately.
    pub fn draw(&mut self) -> Result<CardId, EngineError> {
        self.ensure_available(PlayerAction::Draw)?;
        let card = self
            .set_player_hand(1)?
            .first()
            .copied()
            .ok_or(EngineError::DeckExhausted)?;
        let player_hand = self.hand().ok_or(EngineError::NoHand)?.player_hand.clone();
        let ranks = self.content.ranks(&player_hand)?;
        self.events.push(Event::CardDrawn {
            card,
            total: hand_total(&ranks),
        });

        self.apply_card_effects(&[card], Phase::HandStart);
        if self.round_terminal() {
            self.close_on_terminal()?;
        } else if is_bust(&ranks) {
            self.resolve_hand()?;
        }
        Ok(card)
    }

    /// The daimon draws to its stand total, then the hand is settled.
    pub fn stand(&mut self) -> Result<HandStatus, EngineError> {
        self.ensure_available(PlayerAction::Stand)?;
        let stand_total = self.config.daimon_stand_total;
        loop {
            let daimon_hand = &self.hand().ok_or(EngineError::NoHand)?.daimon_hand;
            if hand_total(&self.content.ranks(daimon_hand)?) >= stand_total {
                break;
            }
            if self.set_daimon_hand(1)?.is_empty() {
                break;
            }
        }
        self.resolve_hand()
    }

    /// Gives up the hand for a quarter of the pot back.
    pub fn surrender(&mut self) -> Result<HandStatus, EngineError> {
        self.ensure_available(PlayerAction::Surrender)?;
        self.apply_table_effects(Phase::OnLoss);
        if self.round_terminal() {
            return self.close_on_terminal();
        }
        let pot = self.hand().ok_or(EngineError::NoHand)?.blood_wager;
        let refund = pot / 4;
        self.set_player_health(refund);
        self.set_daimon_health(pot - refund);
        self.finish_hand(HandStatus::Lost)
    }

    pub fn double_down(&mut self) -> Result<HandStatus, EngineError> {
        if !self.hand_in_progress() {
            return Err(EngineError::NoHand);
        }
        Err(EngineError::Unsupported(PlayerAction::DoubleDown))
    }
}
