use crate::{
    card_catalog, CardDef, CardFlavor, CardId, DaimonId, EffectBundle, Rank, RngState, SlotType,
    TokenId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An effect type paired with its value bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SlotEffect {
    pub effect_type: String,
    #[serde(default)]
    pub effect_values: EffectBundle,
}

impl SlotEffect {
    pub fn none() -> Self {
        Self {
            effect_type: "none".to_string(),
            effect_values: EffectBundle::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaimonDef {
    pub id: DaimonId,
    pub name: String,
    pub rune: String,
    #[serde(default)]
    pub description: String,
    pub story_sequence: u32,
    #[serde(flatten)]
    pub effect: SlotEffect,
    /// Starts each round with twice the scaled health.
    #[serde(default)]
    pub double_health: bool,
    pub intro: String,
    pub player_win: String,
    pub player_lose: String,
    #[serde(default)]
    pub dialogue: Vec<String>,
}

impl DaimonDef {
    pub fn random_dialogue<'a>(&'a self, rng: &mut RngState) -> &'a str {
        rng.pick_index(self.dialogue.len())
            .map(|idx| self.dialogue[idx].as_str())
            .unwrap_or("...")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenDef {
    pub id: TokenId,
    pub name: String,
    pub rune: String,
    pub description: String,
    /// Present only on story tokens.
    #[serde(default)]
    pub story_sequence: Option<u32>,
    pub inscribed: SlotEffect,
    pub oathbound: SlotEffect,
    pub offering: SlotEffect,
}

impl TokenDef {
    pub fn is_story_token(&self) -> bool {
        self.story_sequence.is_some()
    }

    pub fn effect_for(&self, slot_type: SlotType) -> &SlotEffect {
        match slot_type {
            SlotType::Inscribed => &self.inscribed,
            SlotType::Oathbound => &self.oathbound,
            SlotType::Offering => &self.offering,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown card {0}")]
pub struct UnknownCard(pub CardId);

/// Read-only reference data shared by every session.
#[derive(Debug, Clone)]
pub struct Content {
    pub cards: Vec<CardDef>,
    pub daimons: Vec<DaimonDef>,
    pub tokens: Vec<TokenDef>,
}

impl Content {
    /// The generated card catalog plus the given daimons and tokens.
    pub fn new(daimons: Vec<DaimonDef>, tokens: Vec<TokenDef>) -> Self {
        Self {
            cards: card_catalog(),
            daimons,
            tokens,
        }
    }

    pub fn card(&self, id: CardId) -> Option<&CardDef> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.cards
            .get(idx)
            .filter(|card| card.id == id)
            .or_else(|| self.cards.iter().find(|card| card.id == id))
    }

    pub fn ranks(&self, ids: &[CardId]) -> Result<Vec<Rank>, UnknownCard> {
        ids.iter()
            .map(|id| self.card(*id).map(|card| card.rank).ok_or(UnknownCard(*id)))
            .collect()
    }

    pub fn daimon(&self, id: DaimonId) -> Option<&DaimonDef> {
        self.daimons.iter().find(|daimon| daimon.id == id)
    }

    pub fn token(&self, id: TokenId) -> Option<&TokenDef> {
        self.tokens.iter().find(|token| token.id == id)
    }

    /// The story daimon for `story_progression`.
    pub fn next_daimon(&self, story_progression: u32) -> Option<&DaimonDef> {
        self.daimons
            .iter()
            .find(|daimon| daimon.story_sequence == story_progression)
    }

    pub fn unlocked_daimons(&self, story_progression: u32) -> impl Iterator<Item = &DaimonDef> {
        self.daimons
            .iter()
            .filter(move |daimon| daimon.story_sequence <= story_progression)
    }

    pub fn pick_daimon<'a>(&'a self, story_progression: u32, rng: &mut RngState) -> Option<&'a DaimonDef> {
        let unlocked: Vec<&DaimonDef> = self.unlocked_daimons(story_progression).collect();
        rng.pick_index(unlocked.len()).map(|idx| unlocked[idx])
    }

    pub fn next_story_token(&self, story_progression: u32) -> Option<&TokenDef> {
        self.tokens
            .iter()
            .find(|token| token.story_sequence == Some(story_progression))
    }

    /// The plain 52-card deck every new player starts with.
    pub fn starter_deck(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|card| card.flavor == CardFlavor::Standard)
            .map(|card| card.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daimon(id: DaimonId, story_sequence: u32) -> DaimonDef {
        DaimonDef {
            id,
            name: format!("Daimon {id}"),
            rune: format!("rune-{id}"),
            description: String::new(),
            story_sequence,
            effect: SlotEffect::none(),
            double_health: false,
            intro: "intro".to_string(),
            player_win: "win".to_string(),
            player_lose: "lose".to_string(),
            dialogue: Vec::new(),
        }
    }

    #[test]
    fn card_lookup_and_ranks() {
        let content = Content::new(Vec::new(), Vec::new());
        assert_eq!(content.card(1).map(|card| card.id), Some(1));
        assert!(content.card(0).is_none());
        assert!(content.card(313).is_none());
        assert_eq!(content.ranks(&[9999]), Err(UnknownCard(9999)));
        assert_eq!(content.starter_deck().len(), 52);
        assert_eq!(content.starter_deck().first(), Some(&261));
    }

    #[test]
    fn daimon_unlocks_follow_story() {
        let content = Content::new(vec![daimon(1, 0), daimon(2, 1), daimon(3, 2)], Vec::new());
        assert_eq!(content.next_daimon(1).map(|d| d.id), Some(2));
        assert_eq!(content.unlocked_daimons(1).count(), 2);
        let mut rng = RngState::from_seed(5);
        for _ in 0..20 {
            let picked = content.pick_daimon(0, &mut rng).map(|d| d.id);
            assert_eq!(picked, Some(1));
        }
    }

    #[test]
    fn dialogue_falls_back() {
        let mut rng = RngState::from_seed(1);
        let mut def = daimon(1, 0);
        assert_eq!(def.random_dialogue(&mut rng), "...");
        def.dialogue = vec!["hiss".to_string()];
        assert_eq!(def.random_dialogue(&mut rng), "hiss");
    }
}
