use super::{EngineError, GameStateManager};
use crate::{
    hand_result, hand_total, is_blackjack, Event, Hand, HandOutcome, HandStatus, Phase,
    RoundStatus,
};
use tracing::info;

impl GameStateManager<'_> {
    /// Per-side stake for the next hand of the current round.
    pub fn calculate_wager(&self) -> Result<i64, EngineError> {
        let round = self.round().ok_or(EngineError::NoRound)?;
        Ok(self
            .config
            .wager_for(round.hands_played, self.table.player.blood_pool))
    }

    /// Stakes, deals and applies hand-start effects.
    ///
    /// Returns the hand's status afterwards: a natural blackjack, a forfeit or
    /// a round ended by the stake or an effect all close the hand right away.
    pub fn start_hand(&mut self) -> Result<HandStatus, EngineError> {
        match self.round() {
            None => return Err(EngineError::NoRound),
            Some(round) if round.is_terminal() => return Err(EngineError::RoundOver),
            Some(_) => {}
        }
        if self.hand_in_progress() {
            return Err(EngineError::HandInProgress);
        }
        let wager = self.calculate_wager()?;
        if let Some(round) = self.table.round.as_mut() {
            round.hands_played += 1;
        }
        self.table.hand = Some(Hand::new(wager * 2));
        self.dirty.round = true;
        self.dirty.hand = true;

        if wager == 0 {
            let blood_pool = self.table.player.blood_pool;
            info!(blood_pool, "player cannot cover a stake, forfeiting");
            self.set_player_health(-blood_pool);
            return self.close_on_terminal();
        }

        self.set_daimon_health(-wager);
        self.set_player_health(-wager);
        if self.round_terminal() {
            return self.close_on_terminal();
        }

        self.set_player_hand(2)?;
        self.set_daimon_hand(1)?;
        let hand = self.hand().ok_or(EngineError::NoHand)?;
        let dealt = Event::HandDealt {
            blood_wager: hand.blood_wager,
            player_hand: hand.player_hand.clone(),
            daimon_hand: hand.daimon_hand.clone(),
        };
        info!(blood_wager = hand.blood_wager, "hand dealt");
        self.events.push(dealt);

        self.apply_table_effects(Phase::HandStart);
        if self.round_terminal() {
            return self.close_on_terminal();
        }

        let player_hand = self.hand().ok_or(EngineError::NoHand)?.player_hand.clone();
        if is_blackjack(&self.content.ranks(&player_hand)?) {
            self.set_daimon_hand(1)?;
            return self.resolve_hand();
        }
        Ok(HandStatus::InProgress)
    }

    /// Scores both hands and settles the outcome.
    pub fn resolve_hand(&mut self) -> Result<HandStatus, EngineError> {
        let hand = self.hand().ok_or(EngineError::NoHand)?;
        let player = self.content.ranks(&hand.player_hand)?;
        let daimon = self.content.ranks(&hand.daimon_hand)?;
        self.hand_resolution(hand_result(&player, &daimon))
    }

    /// Applies settlement effects, pays the pot and closes the hand.
    ///
    /// A push refunds half the pot to each side and still breaks the streak.
    pub fn hand_resolution(&mut self, outcome: HandOutcome) -> Result<HandStatus, EngineError> {
        if !self.hand_in_progress() {
            return Err(EngineError::NoHand);
        }
        let phase = match outcome {
            HandOutcome::Won => Phase::OnWin,
            HandOutcome::Lost => Phase::OnLoss,
            HandOutcome::Pushed => Phase::OnPush,
        };
        self.apply_table_effects(phase);
        if self.round_terminal() {
            return self.close_on_terminal();
        }

        let pot = self.hand().ok_or(EngineError::NoHand)?.blood_wager;
        match outcome {
            HandOutcome::Won => {
                self.set_player_health(pot);
            }
            HandOutcome::Lost => {
                self.set_daimon_health(pot);
            }
            HandOutcome::Pushed => {
                let refund = pot / 2;
                self.set_player_health(refund);
                self.set_daimon_health(refund);
            }
        }
        self.finish_hand(outcome.into())
    }

    /// Closes the open hand with the outcome of a round that already ended.
    pub(super) fn close_on_terminal(&mut self) -> Result<HandStatus, EngineError> {
        let status = match self.round().map(|round| round.status) {
            Some(RoundStatus::Won) => HandStatus::Won,
            _ => HandStatus::Lost,
        };
        self.finish_hand(status)
    }

    /// Records the result and moves both hands to the discard pile.
    pub(super) fn finish_hand(&mut self, status: HandStatus) -> Result<HandStatus, EngineError> {
        let content = self.content;
        let hand = self.table.hand.as_mut().ok_or(EngineError::NoHand)?;
        let player_total = hand_total(&content.ranks(&hand.player_hand)?);
        let daimon_total = hand_total(&content.ranks(&hand.daimon_hand)?);
        hand.status = status;
        let blood_wager = hand.blood_wager;
        let discarded = [hand.player_hand.as_slice(), hand.daimon_hand.as_slice()].concat();

        if let Some(round) = self.table.round.as_mut() {
            round.discard_pile.extend(discarded);
        }
        if let Some(game) = self.table.game.as_mut() {
            match status {
                HandStatus::Won => game.record_hand_win(),
                _ => game.record_hand_loss(),
            }
        }
        self.dirty.hand = true;
        self.dirty.round = true;
        self.dirty.game = true;

        info!(?status, blood_wager, player_total, daimon_total, "hand resolved");
        self.events.push(Event::HandResolved {
            status,
            blood_wager,
            player_total,
            daimon_total,
        });
        Ok(status)
    }
}
