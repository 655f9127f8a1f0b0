use super::{EngineError, GameStateManager};
use crate::{
    compute_weights, sample_without_replacement, CardDef, CardId, Event, Game, Phase, Round,
    RoundStatus, UnknownCard, Weighting, TUTORIAL_DECK,
};
use tracing::{debug, info};

impl GameStateManager<'_> {
    /// Opens a new game and refills the player's blood pool.
    pub fn start_game(&mut self) -> Result<(), EngineError> {
        if self.game().is_some_and(Game::is_in_progress) {
            return Err(EngineError::GameInProgress);
        }
        let player = &mut self.table.player;
        player.blood_pool = player.max_blood_pool;
        player.games_played += 1;
        let blood_pool = player.blood_pool;
        self.table.game = Some(Game::new());
        self.table.round = None;
        self.table.hand = None;
        self.dirty.player = true;
        self.dirty.game = true;
        self.dirty.round = true;
        self.dirty.hand = true;
        info!(player = self.table.player.id, blood_pool, "game started");
        self.events.push(Event::GameStarted { blood_pool });
        Ok(())
    }

    /// Picks and scales the next daimon, shuffles, then applies round-start effects.
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        let content = self.content;
        let config = self.config;
        if self.round_in_progress() {
            return Err(EngineError::RoundInProgress);
        }
        let progression = self.table.player.story_progression;
        let game = self
            .table
            .game
            .as_mut()
            .filter(|game| game.is_in_progress())
            .ok_or(EngineError::NoGame)?;

        let daimon = match content.next_daimon(progression) {
            Some(daimon) if i64::from(progression) > i64::from(game.daimon_progress) => {
                game.daimon_progress = progression as i32;
                daimon
            }
            _ => content
                .pick_daimon(progression, &mut self.rng)
                .ok_or(EngineError::NoDaimon(progression))?,
        };
        game.rounds_played += 1;
        let number = game.rounds_played;
        let daimon_health = config.daimon_health(number, daimon.double_health);

        let player = &mut self.table.player;
        // The new round's ceiling is the base max again.
        player.blood_pool = player.blood_pool.min(player.max_blood_pool);
        player.max_round_reached = player.max_round_reached.max(number);
        player.max_daimon_health_reached = player.max_daimon_health_reached.max(daimon_health);
        let tutorial = !player.tutorial_finished;

        self.table.round = Some(Round {
            number,
            daimon_id: daimon.id,
            daimon_blood_pool: daimon_health,
            daimon_max_blood_pool: daimon_health,
            player_max_blood_pool: player.max_blood_pool,
            hands_played: 0,
            shuffled_deck: Vec::new(),
            discard_pile: Vec::new(),
            status: RoundStatus::InProgress,
            reward_claimed: false,
        });
        self.table.hand = None;
        self.dirty.player = true;
        self.dirty.game = true;
        self.dirty.round = true;
        self.dirty.hand = true;

        self.shuffle_deck()?;
        info!(round = number, daimon = daimon.id, daimon_health, tutorial, "round started");
        self.events.push(Event::RoundStarted {
            number,
            daimon: daimon.id,
            daimon_blood_pool: daimon_health,
            tutorial,
        });

        self.apply_token_effects(Phase::RoundStart);
        self.apply_daimon_effects(Phase::RoundStart);
        Ok(())
    }

    /// Builds a fresh shoe and empties the discard pile.
    ///
    /// Tutorial players get the fixed tutorial shoe; everyone else gets their
    /// deck in a rank-weighted order.
    pub fn shuffle_deck(&mut self) -> Result<(), EngineError> {
        let tutorial = !self.table.player.tutorial_finished;
        let cards = self.table.player.deck.clone();
        let number = self.round().ok_or(EngineError::NoRound)?.number;
        let shuffled = if tutorial {
            TUTORIAL_DECK.to_vec()
        } else {
            self.weighted_shuffle(&cards, number)?
        };
        self.replace_shoe(shuffled)
    }

    /// Shuffles the discard pile back into an empty shoe.
    ///
    /// Returns whether a reshuffle happened. A non-empty shoe is left alone,
    /// and so is an empty one with nothing to shuffle back in.
    pub fn reshuffle_if_empty(&mut self) -> Result<bool, EngineError> {
        let Some(round) = self.round() else {
            return Ok(false);
        };
        if !round.shuffled_deck.is_empty() {
            return Ok(false);
        }
        let number = round.number;
        let pile = round.discard_pile.clone();
        let shuffled = if self.table.player.tutorial_finished {
            self.weighted_shuffle(&pile, number)?
        } else {
            let held: Vec<CardId> = self
                .hand()
                .filter(|hand| hand.is_in_progress())
                .map(|hand| [hand.player_hand.as_slice(), hand.daimon_hand.as_slice()].concat())
                .unwrap_or_default();
            TUTORIAL_DECK
                .iter()
                .copied()
                .filter(|card| !held.contains(card))
                .collect()
        };
        if shuffled.is_empty() {
            return Ok(false);
        }
        self.replace_shoe(shuffled)?;
        Ok(true)
    }

    fn replace_shoe(&mut self, shoe: Vec<CardId>) -> Result<(), EngineError> {
        let round = self.table.round.as_mut().ok_or(EngineError::NoRound)?;
        round.shuffled_deck = shoe;
        round.discard_pile.clear();
        let cards = round.shuffled_deck.len();
        self.dirty.round = true;
        debug!(cards, "deck shuffled");
        self.events.push(Event::DeckShuffled { cards });
        Ok(())
    }

    /// Every card exactly once, high ranks biased toward the front early on.
    fn weighted_shuffle(&mut self, cards: &[CardId], round_number: u32) -> Result<Vec<CardId>, EngineError> {
        let content = self.content;
        let config = self.config;
        let defs = cards
            .iter()
            .map(|id| content.card(*id).ok_or(UnknownCard(*id)))
            .collect::<Result<Vec<&CardDef>, _>>()?;
        let weighting = Weighting::default()
            .with_rank(|card: &&CardDef| config.rank_weight(card.rank.numeric(), round_number));
        let weights = compute_weights(&defs, &weighting);
        Ok(sample_without_replacement(cards, &weights, cards.len(), &mut self.rng)?)
    }
}
