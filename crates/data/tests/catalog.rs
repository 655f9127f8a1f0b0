use bloodjack_core::{
    effect_type_def, GameService, GameStatus, HandStatus, MemoryStore, Phase, PlayerAction,
    RoundStatus, SlotType, TUTORIAL_DECK,
};
use bloodjack_data::{load_content, load_game_config};
use std::path::PathBuf;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

fn service(seed: u64) -> GameService<MemoryStore> {
    let config = load_game_config(&assets_root()).expect("load config");
    let content = load_content(&assets_root()).expect("load content");
    GameService::new(MemoryStore::new(), content, config, seed)
}

#[test]
fn shipped_rules_match_defaults() {
    let config = load_game_config(&assets_root()).expect("load config");
    assert_eq!(config, bloodjack_core::GameConfig::default());
}

#[test]
fn shipped_catalog_is_consistent() {
    let content = load_content(&assets_root()).expect("load content");
    assert_eq!(content.cards.len(), 312);
    assert_eq!(content.starter_deck().len(), 52);
    assert_eq!(content.next_daimon(0).map(|daimon| daimon.id), Some(1));
    assert!(content.daimons.iter().any(|daimon| daimon.double_health));

    let tearstone = content.token(1).expect("tearstone");
    assert!(tearstone.is_story_token());
    let inscribed = tearstone.effect_for(SlotType::Inscribed);
    let def = effect_type_def(&inscribed.effect_type).expect("effect type");
    assert_eq!(def.id, "damage_daimon_limit_health");
    assert!(inscribed
        .effect_values
        .iter()
        .all(|(_, entry)| entry.apply_on_phase == Phase::HandStart));

    let plain: Vec<_> = content
        .tokens
        .iter()
        .filter(|token| !token.is_story_token())
        .collect();
    assert_eq!(plain.len(), 1);
}

#[test]
fn tutorial_round_plays_to_completion() {
    let service = service(7);
    let player = service.create_player("novice").expect("player");
    service.start_game(player.id).expect("game");
    service.start_round(player.id).expect("round");

    let table = service.table(player.id).expect("table");
    let round = table.round.expect("round");
    assert_eq!(round.daimon_id, 1);
    assert_eq!(round.shuffled_deck, TUTORIAL_DECK.to_vec());

    let mut hands = 0;
    loop {
        let table = service.table(player.id).expect("table");
        let round_status = table.round.as_ref().map(|round| round.status);
        if round_status != Some(RoundStatus::InProgress) {
            break;
        }
        assert!(hands < 200, "round never ended");
        let hand_open = table.hand.as_ref().is_some_and(|hand| hand.is_in_progress());
        if !hand_open {
            service.start_hand(player.id).expect("hand");
            hands += 1;
            continue;
        }
        let actions = service.available_actions(player.id).expect("actions");
        if actions.contains(&PlayerAction::Stand) {
            service.stand(player.id).expect("stand");
        } else if actions.contains(&PlayerAction::Draw) {
            service.draw(player.id).expect("draw");
        } else if actions.contains(&PlayerAction::Surrender) {
            service.surrender(player.id).expect("surrender");
        } else {
            panic!("open hand with no actions: {table:?}");
        }
    }

    let table = service.table(player.id).expect("table");
    assert!(table.player.tutorial_finished);
    let game = table.game.expect("game");
    let round = table.round.expect("round");
    assert!(game.total_hands_won + game.total_hands_lost >= 1);
    assert!(table.hand.as_ref().is_some_and(|hand| hand.status != HandStatus::InProgress));
    match round.status {
        RoundStatus::Won => {
            assert_eq!(round.daimon_blood_pool, 0);
            assert_eq!(game.status, GameStatus::InProgress);
            let claimed = service.claim_story_token(player.id).expect("claim");
            assert_eq!(claimed.value, Some(1));
            assert_eq!(claimed.table.player.story_progression, 1);
        }
        RoundStatus::Lost => {
            assert_eq!(table.player.blood_pool, 0);
            assert_eq!(game.status, GameStatus::Lost);
        }
        RoundStatus::InProgress => unreachable!(),
    }
}

#[test]
fn first_round_meets_the_opening_daimon() {
    let service = service(11);
    let player = service.create_player("veteran").expect("player");
    service.start_game(player.id).expect("game");
    service.start_round(player.id).expect("round");
    let first = service.table(player.id).expect("table");
    assert_eq!(first.game.as_ref().map(|game| game.daimon_progress), Some(0));

    assert!(matches!(
        service.start_round(player.id),
        Err(bloodjack_core::EngineError::RoundInProgress)
    ));
}
