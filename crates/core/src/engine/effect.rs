use super::{GameStateManager, Target};
use crate::{
    effect_actions, ActionKind, CardId, EffectBundle, EffectLog, EffectOutcome, EffectSource,
    Event, Phase, SlotType, TokenId,
};
use tracing::{debug, warn};

impl GameStateManager<'_> {
    /// Runs every action of `effect_type` whose bundle entry fires on `phase`.
    pub fn apply_effect(
        &mut self,
        source: EffectSource,
        effect_type: &str,
        bundle: &EffectBundle,
        phase: Phase,
    ) -> Vec<EffectLog> {
        let mut logs = Vec::new();
        for &action in effect_actions(effect_type) {
            let Some(value) = bundle.value_on(action, phase) else {
                continue;
            };
            let outcome = self.dispatch(action, value);
            debug!(?source, action = action.id(), phase = phase.id(), value, ?outcome, "effect applied");
            let log = EffectLog {
                source,
                phase,
                action,
                outcome,
            };
            self.events.push(Event::EffectApplied(log.clone()));
            logs.push(log);
        }
        logs
    }

    fn dispatch(&mut self, action: ActionKind, value: f64) -> EffectOutcome {
        match action {
            ActionKind::PlayerHealth => {
                let amount = self.multiplier_amount(Target::Player, value);
                let blood_pool = self.set_player_health(amount);
                EffectOutcome::PlayerHealth { amount, blood_pool }
            }
            ActionKind::DaimonHealth => {
                let amount = self.multiplier_amount(Target::Daimon, value);
                match self.set_daimon_health(amount) {
                    Some(blood_pool) => EffectOutcome::DaimonHealth { amount, blood_pool },
                    None => EffectOutcome::Skipped,
                }
            }
            ActionKind::BloodWager => {
                let amount = self.multiplier_amount(Target::Daimon, value);
                match self.set_blood_wager(amount) {
                    Some(blood_wager) => EffectOutcome::BloodWager { amount, blood_wager },
                    None => EffectOutcome::Skipped,
                }
            }
            ActionKind::PlayerMaxHealth => {
                if self.table.round.is_none() {
                    return EffectOutcome::Skipped;
                }
                let max_blood_pool = self.set_player_max_health(value);
                EffectOutcome::PlayerMaxHealth {
                    multiplier: value,
                    max_blood_pool,
                }
            }
            ActionKind::DaimonMaxHealth => match self.set_daimon_max_health(value) {
                Some(max_blood_pool) => EffectOutcome::DaimonMaxHealth {
                    multiplier: value,
                    max_blood_pool,
                },
                None => EffectOutcome::Skipped,
            },
            ActionKind::DamageDaimonWithDifference => {
                let Some(round) = self.round() else {
                    return EffectOutcome::Skipped;
                };
                let missing = round.daimon_max_blood_pool - round.daimon_blood_pool;
                let amount = (missing as f64 * value) as i64;
                match self.set_daimon_health(amount) {
                    Some(blood_pool) => EffectOutcome::DaimonHealth { amount, blood_pool },
                    None => EffectOutcome::Skipped,
                }
            }
            ActionKind::ShowCardCount => EffectOutcome::CardCount {
                count: self.running_count(),
            },
            ActionKind::ShowNextCardCount => match self.peek_card() {
                Some(card) => EffectOutcome::NextCardCount {
                    count: self.hi_lo(card),
                },
                None => EffectOutcome::Skipped,
            },
            ActionKind::ShowNextCard => match self.peek_card() {
                Some(card) => EffectOutcome::NextCard { card },
                None => EffectOutcome::Skipped,
            },
            ActionKind::NoEffect => EffectOutcome::Skipped,
        }
    }

    /// Converts an authored value into an amount of blood.
    ///
    /// Values in `[-1, 1]` are a fraction of the target's maximum; anything
    /// larger is a percentage of the current pot.
    pub fn multiplier_amount(&self, target: Target, value: f64) -> i64 {
        let base = if (-1.0..=1.0).contains(&value) {
            match target {
                Target::Player => self.player_max_health() as f64,
                Target::Daimon => self
                    .round()
                    .map_or(0.0, |round| round.daimon_max_blood_pool as f64),
            }
        } else {
            self.hand().map_or(0.0, |hand| hand.blood_wager as f64 / 100.0)
        };
        (base * value) as i64
    }

    fn peek_card(&self) -> Option<CardId> {
        self.round()
            .and_then(|round| round.shuffled_deck.first().copied())
    }

    fn hi_lo(&self, card: CardId) -> i32 {
        self.content.card(card).map_or(0, |def| def.rank.hi_lo())
    }

    /// Hi-Lo count of every card already out of the shoe.
    fn running_count(&self) -> i32 {
        let mut seen: Vec<CardId> = self
            .round()
            .map(|round| round.discard_pile.clone())
            .unwrap_or_default();
        if let Some(hand) = self.hand().filter(|hand| hand.is_in_progress()) {
            seen.extend_from_slice(&hand.player_hand);
            seen.extend_from_slice(&hand.daimon_hand);
        }
        seen.into_iter().map(|card| self.hi_lo(card)).sum()
    }

    /// Inscribed-slot effects of the equipped token.
    pub fn apply_token_effects(&mut self, phase: Phase) -> Vec<EffectLog> {
        match self.table.player.inscribed_token() {
            Some(token) => self.apply_slot_effects(token, SlotType::Inscribed, phase),
            None => Vec::new(),
        }
    }

    pub fn apply_slot_effects(&mut self, token: TokenId, slot_type: SlotType, phase: Phase) -> Vec<EffectLog> {
        let content = self.content;
        let Some(def) = content.token(token) else {
            warn!(token, "equipped token missing from catalog");
            return Vec::new();
        };
        let effect = def.effect_for(slot_type);
        self.apply_effect(
            EffectSource::Token(token),
            &effect.effect_type,
            &effect.effect_values,
            phase,
        )
    }

    pub fn apply_daimon_effects(&mut self, phase: Phase) -> Vec<EffectLog> {
        let content = self.content;
        let Some(daimon) = self.round().and_then(|round| content.daimon(round.daimon_id)) else {
            return Vec::new();
        };
        self.apply_effect(
            EffectSource::Daimon(daimon.id),
            &daimon.effect.effect_type,
            &daimon.effect.effect_values,
            phase,
        )
    }

    /// Effects of each card in order; unknown ids are skipped.
    pub fn apply_card_effects(&mut self, cards: &[CardId], phase: Phase) -> Vec<EffectLog> {
        let content = self.content;
        let mut logs = Vec::new();
        for &card in cards {
            let Some(def) = content.card(card) else {
                warn!(card, "card missing from catalog");
                continue;
            };
            logs.extend(self.apply_effect(
                EffectSource::Card(card),
                &def.effect_type,
                &def.effect_values,
                phase,
            ));
        }
        logs
    }

    /// Token, daimon, then player-hand effects for `phase`.
    pub(super) fn apply_table_effects(&mut self, phase: Phase) -> Vec<EffectLog> {
        let mut logs = self.apply_token_effects(phase);
        logs.extend(self.apply_daimon_effects(phase));
        let cards = self
            .hand()
            .map(|hand| hand.player_hand.clone())
            .unwrap_or_default();
        logs.extend(self.apply_card_effects(&cards, phase));
        logs
    }
}
