use crate::schema::{Content, DaimonDef, GameConfig, SlotEffect, TokenDef};
use anyhow::{bail, Context};
use bloodjack_core::effect_type_def;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

const RULES_FILE: &str = "rules.json";
const DAIMONS_FILE: &str = "daimons.json";
const TOKENS_FILE: &str = "tokens.json";

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    load_json(dir.join(RULES_FILE))
}

pub fn load_daimons(path: &Path) -> anyhow::Result<Vec<DaimonDef>> {
    load_json(path)
}

pub fn load_tokens(path: &Path) -> anyhow::Result<Vec<TokenDef>> {
    load_json(path)
}

/// Loads and validates the daimon and token catalogs under `dir`.
pub fn load_content(dir: &Path) -> anyhow::Result<Content> {
    let daimons = load_daimons(&dir.join(DAIMONS_FILE))?;
    let tokens = load_tokens(&dir.join(TOKENS_FILE))?;
    let content = Content::new(daimons, tokens);
    validate_content(&content).with_context(|| format!("validate {}", dir.display()))?;
    info!(
        cards = content.cards.len(),
        daimons = content.daimons.len(),
        tokens = content.tokens.len(),
        "content loaded"
    );
    Ok(content)
}

pub fn validate_content(content: &Content) -> anyhow::Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut runes = HashSet::new();
    let mut sequences = HashSet::new();
    for daimon in &content.daimons {
        let label = format!("daimon {}", daimon.id);
        if !ids.insert(daimon.id) {
            bail!("duplicate daimon id {}", daimon.id);
        }
        if !names.insert(daimon.name.as_str()) {
            bail!("duplicate daimon name {:?}", daimon.name);
        }
        if !runes.insert(daimon.rune.as_str()) {
            bail!("duplicate daimon rune {:?}", daimon.rune);
        }
        if !sequences.insert(daimon.story_sequence) {
            bail!("duplicate daimon story_sequence {}", daimon.story_sequence);
        }
        validate_effect(&label, &daimon.effect)?;
    }
    if !sequences.contains(&0) {
        bail!("no daimon at story_sequence 0");
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut runes = HashSet::new();
    let mut sequences = HashSet::new();
    for token in &content.tokens {
        let label = format!("token {}", token.id);
        if !ids.insert(token.id) {
            bail!("duplicate token id {}", token.id);
        }
        if !names.insert(token.name.as_str()) {
            bail!("duplicate token name {:?}", token.name);
        }
        if !runes.insert(token.rune.as_str()) {
            bail!("duplicate token rune {:?}", token.rune);
        }
        if let Some(sequence) = token.story_sequence {
            if !sequences.insert(sequence) {
                bail!("duplicate story token story_sequence {sequence}");
            }
        }
        validate_effect(&format!("{label} inscribed"), &token.inscribed)?;
        validate_effect(&format!("{label} oathbound"), &token.oathbound)?;
        validate_effect(&format!("{label} offering"), &token.offering)?;
    }
    Ok(())
}

fn validate_effect(label: &str, effect: &SlotEffect) -> anyhow::Result<()> {
    let Some(def) = effect_type_def(&effect.effect_type) else {
        bail!("{label}: unknown effect_type {:?}", effect.effect_type);
    };
    for (action, _) in effect.effect_values.iter() {
        if !def.actions.contains(&action) {
            bail!(
                "{label}: action {} is not part of effect_type {}",
                action.id(),
                def.id
            );
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ActionKind, EffectBundle, Phase};

    fn daimon(id: u32, story_sequence: u32) -> DaimonDef {
        DaimonDef {
            id,
            name: format!("Daimon {id}"),
            rune: format!("rune-{id}"),
            description: String::new(),
            story_sequence,
            effect: SlotEffect::none(),
            double_health: false,
            intro: String::new(),
            player_win: String::new(),
            player_lose: String::new(),
            dialogue: Vec::new(),
        }
    }

    fn token(id: u32, story_sequence: Option<u32>) -> TokenDef {
        TokenDef {
            id,
            name: format!("Token {id}"),
            rune: format!("token-{id}"),
            description: String::new(),
            story_sequence,
            inscribed: SlotEffect::none(),
            oathbound: SlotEffect::none(),
            offering: SlotEffect::none(),
        }
    }

    #[test]
    fn accepts_a_well_formed_catalog() {
        let content = Content::new(
            vec![daimon(1, 0), daimon(2, 1)],
            vec![token(1, Some(0)), token(2, None), token(3, None)],
        );
        validate_content(&content).expect("valid");
    }

    #[test]
    fn requires_an_opening_daimon() {
        let content = Content::new(vec![daimon(1, 1)], Vec::new());
        let err = validate_content(&content).expect_err("no opener");
        assert!(err.to_string().contains("story_sequence 0"));
    }

    #[test]
    fn rejects_duplicate_story_sequences() {
        let content = Content::new(vec![daimon(1, 0), daimon(2, 0)], Vec::new());
        assert!(validate_content(&content).is_err());

        let content = Content::new(vec![daimon(1, 0)], vec![token(1, Some(2)), token(2, Some(2))]);
        assert!(validate_content(&content).is_err());
    }

    #[test]
    fn rejects_duplicate_runes() {
        let mut second = daimon(2, 1);
        second.rune = "rune-1".to_string();
        let content = Content::new(vec![daimon(1, 0), second], Vec::new());
        let err = validate_content(&content).expect_err("duplicate rune");
        assert!(err.to_string().contains("rune"));
    }

    #[test]
    fn rejects_unknown_effect_types_and_stray_actions() {
        let mut opener = daimon(1, 0);
        opener.effect.effect_type = "summon_bats".to_string();
        let content = Content::new(vec![opener], Vec::new());
        assert!(validate_content(&content).is_err());

        let mut stray = token(1, None);
        stray.inscribed = SlotEffect {
            effect_type: "heal_player".to_string(),
            effect_values: EffectBundle::new().with(ActionKind::DaimonHealth, 0.1, Phase::HandStart),
        };
        let content = Content::new(vec![daimon(1, 0)], vec![stray]);
        let err = validate_content(&content).expect_err("stray action");
        assert!(err.to_string().contains("daimon_health"));
    }

    #[test]
    fn missing_files_name_the_path() {
        let err = load_game_config(Path::new("/nonexistent/assets")).expect_err("missing");
        assert!(format!("{err:#}").contains("rules.json"));
    }
}
