use bloodjack_core::*;

const TWO: CardId = 261;
const FIVE: CardId = 264;
const SIX: CardId = 265;
const SEVEN: CardId = 266;
const NINE: CardId = 268;
const TEN: CardId = 269;
const JACK: CardId = 270;
const ACE: CardId = 273;

fn daimon(id: DaimonId, story_sequence: u32, effect: SlotEffect) -> DaimonDef {
    DaimonDef {
        id,
        name: format!("Daimon {id}"),
        rune: format!("rune {id}"),
        description: String::new(),
        story_sequence,
        effect,
        double_health: false,
        intro: "Sit.".to_string(),
        player_win: "Again.".to_string(),
        player_lose: "Mine.".to_string(),
        dialogue: Vec::new(),
    }
}

fn limit_token() -> TokenDef {
    TokenDef {
        id: 1,
        name: "Red Tearstone".to_string(),
        rune: "tearstone".to_string(),
        description: "Wounds feed the stone.".to_string(),
        story_sequence: Some(0),
        inscribed: SlotEffect {
            effect_type: "damage_daimon_limit_health".to_string(),
            effect_values: EffectBundle::new().with(
                ActionKind::DamageDaimonWithDifference,
                -0.15,
                Phase::HandStart,
            ),
        },
        oathbound: SlotEffect::none(),
        offering: SlotEffect::none(),
    }
}

fn content() -> Content {
    Content::new(vec![daimon(1, 0, SlotEffect::none())], vec![limit_token()])
}

/// A veteran player mid-round with a hand-picked shoe.
fn table(shoe: Vec<CardId>) -> Table {
    let config = GameConfig::default();
    let content = content();
    let mut player = Player::new(1, "veteran", content.starter_deck(), &config);
    player.tutorial_finished = true;
    let mut table = Table::new(player);
    table.game = Some(Game::new());
    table.round = Some(Round {
        number: 1,
        daimon_id: 1,
        daimon_blood_pool: 2500,
        daimon_max_blood_pool: 2500,
        player_max_blood_pool: 5000,
        hands_played: 0,
        shuffled_deck: shoe,
        discard_pile: Vec::new(),
        status: RoundStatus::InProgress,
        reward_claimed: false,
    });
    table
}

fn open_hand(table: &mut Table, pot: i64, player_hand: Vec<CardId>, daimon_hand: Vec<CardId>) {
    let mut hand = Hand::new(pot);
    hand.player_hand = player_hand;
    hand.daimon_hand = daimon_hand;
    table.hand = Some(hand);
}

#[test]
fn fraction_values_use_max_health() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TWO]);
    table.player.blood_pool = 1000;
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    let bundle = EffectBundle::new().with(ActionKind::PlayerHealth, 0.5, Phase::HandStart);
    let logs = manager.apply_effect(EffectSource::Card(1), "heal_player", &bundle, Phase::HandStart);
    assert_eq!(
        logs[0].outcome,
        EffectOutcome::PlayerHealth {
            amount: 2500,
            blood_pool: 3500
        }
    );
}

#[test]
fn large_values_use_the_pot() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TWO]);
    table.player.blood_pool = 1000;
    open_hand(&mut table, 1000, vec![TEN, NINE], vec![FIVE]);
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert_eq!(manager.multiplier_amount(Target::Player, 150.0), 1500);
    assert_eq!(manager.multiplier_amount(Target::Player, 1.5), 15);
    assert_eq!(manager.multiplier_amount(Target::Player, 1.0), 5000);
    assert_eq!(manager.multiplier_amount(Target::Daimon, -1.0), -2500);

    let bundle = EffectBundle::new().with(ActionKind::PlayerHealth, 150.0, Phase::OnLoss);
    let logs = manager.apply_effect(EffectSource::Card(2), "loss_blood_return", &bundle, Phase::OnLoss);
    assert_eq!(
        logs[0].outcome,
        EffectOutcome::PlayerHealth {
            amount: 1500,
            blood_pool: 2500
        }
    );
}

#[test]
fn difference_damage_scales_with_missing_health() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TWO]);
    if let Some(round) = table.round.as_mut() {
        round.daimon_blood_pool = 2000;
    }
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    let bundle =
        EffectBundle::new().with(ActionKind::DamageDaimonWithDifference, -0.15, Phase::HandStart);
    let logs = manager.apply_effect(
        EffectSource::Token(1),
        "damage_daimon_limit_health",
        &bundle,
        Phase::HandStart,
    );
    assert_eq!(logs.len(), 1);
    assert_eq!(
        logs[0].outcome,
        EffectOutcome::DaimonHealth {
            amount: -75,
            blood_pool: 1925
        }
    );
}

#[test]
fn effects_only_fire_on_their_phase() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(&content, &config, table(vec![TWO]), RngState::from_seed(1));
    let before = manager.table().clone();
    let bundle = EffectBundle::new().with(ActionKind::DaimonHealth, -0.5, Phase::OnWin);
    assert!(manager
        .apply_effect(EffectSource::Daimon(1), "damage_daimon", &bundle, Phase::HandStart)
        .is_empty());
    assert!(manager
        .apply_effect(EffectSource::Daimon(1), "no_such_type", &bundle, Phase::OnWin)
        .is_empty());
    assert_eq!(manager.table(), &before);
}

#[test]
fn inscribed_token_fires_after_the_stake() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SEVEN, FIVE, SIX, NINE]);
    table.player.grant_token(1);
    let slot = table.player.loadout.inscribed().map(|slot| slot.id).expect("slot");
    table.player.equip_token(slot, 1).expect("equip");
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));

    let status = manager.start_hand().expect("hand");
    assert_eq!(status, HandStatus::InProgress);
    let round = manager.round().expect("round");
    assert_eq!(round.daimon_blood_pool, 2500 - 500 - 75);
    assert_eq!(manager.player().blood_pool, 4500);
    let hand = manager.hand().expect("hand");
    assert_eq!(hand.blood_wager, 1000);
    assert_eq!(hand.player_hand, vec![TEN, SEVEN]);
    assert_eq!(hand.daimon_hand, vec![FIVE]);
}

#[test]
fn settlement_credits_the_winner() {
    let content = content();
    let config = GameConfig::default();

    let mut won = table(Vec::new());
    won.player.blood_pool = 3000;
    open_hand(&mut won, 1000, vec![TEN, NINE], vec![TEN, SEVEN]);
    let mut manager = GameStateManager::new(&content, &config, won, RngState::from_seed(1));
    assert_eq!(manager.hand_resolution(HandOutcome::Won).expect("won"), HandStatus::Won);
    assert_eq!(manager.player().blood_pool, 4000);
    assert_eq!(manager.game().map(|game| game.total_hands_won), Some(1));
    let round = manager.round().expect("round");
    assert_eq!(round.discard_pile, vec![TEN, NINE, TEN, SEVEN]);

    let mut capped = table(Vec::new());
    open_hand(&mut capped, 1000, vec![TEN, NINE], vec![TEN, SEVEN]);
    let mut manager = GameStateManager::new(&content, &config, capped, RngState::from_seed(1));
    manager.hand_resolution(HandOutcome::Won).expect("won");
    assert_eq!(manager.player().blood_pool, 5000);

    let mut lost = table(Vec::new());
    if let Some(round) = lost.round.as_mut() {
        round.daimon_blood_pool = 1000;
    }
    open_hand(&mut lost, 1000, vec![TEN, SEVEN], vec![TEN, NINE]);
    let mut manager = GameStateManager::new(&content, &config, lost, RngState::from_seed(1));
    manager.hand_resolution(HandOutcome::Lost).expect("lost");
    assert_eq!(manager.round().map(|round| round.daimon_blood_pool), Some(2000));
    let game = manager.game().expect("game");
    assert_eq!(game.total_hands_lost, 1);
    assert_eq!(game.win_streak, 0);
}

#[test]
fn push_refunds_half_to_each_side_and_breaks_the_streak() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(Vec::new());
    table.player.blood_pool = 4500;
    if let Some(round) = table.round.as_mut() {
        round.daimon_blood_pool = 2000;
    }
    if let Some(game) = table.game.as_mut() {
        game.record_hand_win();
    }
    open_hand(&mut table, 1000, vec![TEN, NINE], vec![TEN, NINE]);
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert_eq!(manager.resolve_hand().expect("push"), HandStatus::Pushed);
    assert_eq!(manager.player().blood_pool, 5000);
    assert_eq!(manager.round().map(|round| round.daimon_blood_pool), Some(2500));
    let game = manager.game().expect("game");
    assert_eq!(game.win_streak, 0);
    assert_eq!(game.longest_win_streak, 1);
    assert_eq!(game.total_hands_lost, 1);
}

#[test]
fn natural_blackjack_resolves_on_the_deal() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(
        &content,
        &config,
        table(vec![ACE, JACK, FIVE, SIX, NINE]),
        RngState::from_seed(1),
    );
    assert_eq!(manager.start_hand().expect("hand"), HandStatus::Won);
    let hand = manager.hand().expect("hand");
    assert_eq!(hand.daimon_hand, vec![FIVE, SIX]);
    assert_eq!(manager.player().blood_pool, 5000);
    assert!(manager.available_actions().is_empty());
}

#[test]
fn drawing_past_twenty_one_loses_without_a_daimon_turn() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(
        &content,
        &config,
        table(vec![TEN, JACK, FIVE, NINE, SIX]),
        RngState::from_seed(1),
    );
    manager.start_hand().expect("hand");
    assert_eq!(
        manager.available_actions(),
        vec![PlayerAction::Draw, PlayerAction::Stand, PlayerAction::Surrender]
    );
    assert_eq!(manager.draw().expect("draw"), NINE);
    let hand = manager.hand().expect("hand");
    assert_eq!(hand.status, HandStatus::Lost);
    assert_eq!(hand.daimon_hand, vec![FIVE]);
    assert_eq!(manager.round().map(|round| round.daimon_blood_pool), Some(2500));
    assert!(matches!(manager.draw(), Err(EngineError::NoHand)));
}

#[test]
fn daimon_draws_until_it_stands_or_busts() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(
        &content,
        &config,
        table(vec![TEN, NINE, FIVE, SIX, TWO, TEN, ACE]),
        RngState::from_seed(1),
    );
    manager.start_hand().expect("hand");
    assert_eq!(manager.stand().expect("stand"), HandStatus::Won);
    let hand = manager.hand().expect("hand");
    assert_eq!(hand.daimon_hand, vec![FIVE, SIX, TWO, TEN]);
    assert_eq!(hand_total(&content.ranks(&hand.daimon_hand).expect("ranks")), 23);
    assert_eq!(manager.round().map(|round| round.shuffled_deck.clone()), Some(vec![ACE]));
}

#[test]
fn surrender_returns_a_quarter_of_the_pot() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SIX, FIVE, NINE]);
    if let Some(round) = table.round.as_mut() {
        round.daimon_blood_pool = 1500;
    }
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    manager.start_hand().expect("hand");
    assert_eq!(manager.surrender().expect("surrender"), HandStatus::Lost);
    assert_eq!(manager.player().blood_pool, 4500 + 250);
    assert_eq!(manager.round().map(|round| round.daimon_blood_pool), Some(1000 + 750));
    assert!(matches!(manager.double_down(), Err(EngineError::NoHand)));
}

#[test]
fn double_down_is_never_offered() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(
        &content,
        &config,
        table(vec![TEN, SIX, FIVE, NINE]),
        RngState::from_seed(1),
    );
    manager.start_hand().expect("hand");
    assert!(!manager.available_actions().contains(&PlayerAction::DoubleDown));
    assert!(matches!(
        manager.double_down(),
        Err(EngineError::Unsupported(PlayerAction::DoubleDown))
    ));
}

#[test]
fn exhausted_player_forfeits() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SIX, FIVE]);
    table.player.blood_pool = 1;
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert_eq!(manager.start_hand().expect("hand"), HandStatus::Lost);
    assert_eq!(manager.player().blood_pool, 0);
    assert_eq!(manager.round().map(|round| round.status), Some(RoundStatus::Lost));
    assert_eq!(manager.game().map(|game| game.status), Some(GameStatus::Lost));
    assert!(matches!(manager.start_hand(), Err(EngineError::RoundOver)));
}

#[test]
fn stake_that_kills_the_daimon_closes_the_hand() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SIX, FIVE]);
    if let Some(round) = table.round.as_mut() {
        round.daimon_blood_pool = 400;
    }
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert_eq!(manager.start_hand().expect("hand"), HandStatus::Won);
    assert_eq!(manager.round().map(|round| round.status), Some(RoundStatus::Won));
    assert_eq!(manager.player().blood_pool, 4500);
    assert!(manager.hand().expect("hand").player_hand.is_empty());
    assert_eq!(manager.game().map(|game| game.total_hands_won), Some(1));
}

#[test]
fn wager_climbs_after_four_hands() {
    let content = content();
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SIX, FIVE]);
    if let Some(round) = table.round.as_mut() {
        round.hands_played = 4;
    }
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert_eq!(manager.calculate_wager().expect("wager"), 909);
    manager.start_hand().expect("hand");
    assert_eq!(manager.hand().map(|hand| hand.blood_wager), Some(1818));
    assert_eq!(manager.round().map(|round| round.hands_played), Some(5));
}

#[test]
fn tutorial_hand_follows_the_script() {
    let content = content();
    let config = GameConfig::default();
    let player = Player::new(1, "novice", content.starter_deck(), &config);
    let mut manager = GameStateManager::new(&content, &config, Table::new(player), RngState::from_seed(1));
    manager.start_game().expect("game");
    manager.start_round().expect("round");
    manager.start_hand().expect("hand");
    assert_eq!(manager.available_actions(), vec![PlayerAction::Draw]);
    assert!(matches!(
        manager.stand(),
        Err(EngineError::ActionNotAvailable(PlayerAction::Stand))
    ));
    manager.draw().expect("draw");
    assert_eq!(manager.available_actions(), vec![PlayerAction::Stand]);
    assert_eq!(manager.stand().expect("stand"), HandStatus::Won);
    assert_eq!(manager.player().blood_pool, 5000);
    assert_eq!(manager.round().map(|round| round.daimon_blood_pool), Some(2000));
}

#[test]
fn round_start_effects_apply_after_the_shuffle() {
    let daimon_effect = SlotEffect {
        effect_type: "decrease_max_health".to_string(),
        effect_values: EffectBundle::new().with(ActionKind::PlayerMaxHealth, 0.8, Phase::RoundStart),
    };
    let content = Content::new(vec![daimon(1, 0, daimon_effect)], Vec::new());
    let config = GameConfig::default();
    let mut player = Player::new(1, "veteran", content.starter_deck(), &config);
    player.tutorial_finished = true;
    let mut manager = GameStateManager::new(&content, &config, Table::new(player), RngState::from_seed(1));
    manager.start_game().expect("game");
    manager.start_round().expect("round");
    let round = manager.round().expect("round");
    assert_eq!(round.player_max_blood_pool, 4000);
    assert_eq!(round.shuffled_deck.len(), 52);
    assert_eq!(manager.player().blood_pool, 4000);
    assert_eq!(manager.player().max_blood_pool, 5000);
}

#[test]
fn service_commits_each_action_atomically() {
    let service = GameService::new(MemoryStore::new(), content(), GameConfig::default(), 42);
    let player = service.create_player("veteran").expect("player");

    service.start_game(player.id).expect("game");
    let round = service.start_round(player.id).expect("round");
    assert!(round
        .events
        .iter()
        .any(|event| matches!(event, Event::RoundStarted { number: 1, .. })));
    let dealt = service.start_hand(player.id).expect("hand");

    let stored = service.table(player.id).expect("table");
    assert_eq!(stored, dealt.table);
    let shoe = stored.round.as_ref().map(|round| round.shuffled_deck.clone());
    assert_eq!(shoe, dealt.table.round.as_ref().map(|round| round.shuffled_deck.clone()));

    assert!(matches!(
        service.start_round(player.id),
        Err(EngineError::RoundInProgress)
    ));
    assert!(matches!(
        service.double_down(player.id),
        Err(EngineError::Unsupported(PlayerAction::DoubleDown))
    ));
    assert_eq!(service.table(player.id).expect("table"), stored);
}

#[test]
fn story_token_is_claimed_once_per_won_round() {
    let content = content();
    let config = GameConfig::default();
    let mut manager = GameStateManager::new(&content, &config, table(vec![TEN]), RngState::from_seed(1));
    assert!(matches!(manager.claim_story_token(), Err(EngineError::RoundNotWon)));
    manager.set_daimon_health(-2500);
    assert_eq!(manager.claim_story_token().expect("claim"), Some(1));
    assert!(manager.player().owns_token(1));
    assert_eq!(manager.player().story_progression, 1);
    assert!(matches!(manager.claim_story_token(), Err(EngineError::RewardClaimed)));
}

#[test]
fn equipping_mid_round_applies_on_equip_effects() {
    let mut token = limit_token();
    token.oathbound = SlotEffect {
        effect_type: "increase_max_health".to_string(),
        effect_values: EffectBundle::new().with(ActionKind::PlayerMaxHealth, 1.1, Phase::OnEquip),
    };
    let content = Content::new(vec![daimon(1, 0, SlotEffect::none())], vec![token]);
    let config = GameConfig::default();
    let mut table = table(vec![TEN]);
    table.player.grant_token(1);
    let oathbound = table
        .player
        .loadout
        .slots
        .iter()
        .find(|slot| slot.slot_type == SlotType::Oathbound)
        .map(|slot| slot.id)
        .expect("slot");
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    assert!(matches!(manager.equip_token(oathbound, 9), Err(EngineError::UnknownToken(9))));
    let logs = manager.equip_token(oathbound, 1).expect("equip");
    assert_eq!(logs.len(), 1);
    assert_eq!(manager.round().map(|round| round.player_max_blood_pool), Some(5500));
}

#[test]
fn new_round_drops_blood_above_the_base_max() {
    let daimon_effect = SlotEffect {
        effect_type: "increase_max_health".to_string(),
        effect_values: EffectBundle::new().with(ActionKind::PlayerMaxHealth, 1.2, Phase::RoundStart),
    };
    let content = Content::new(vec![daimon(1, 0, daimon_effect)], Vec::new());
    let config = GameConfig::default();
    let mut player = Player::new(1, "veteran", content.starter_deck(), &config);
    player.tutorial_finished = true;
    let mut manager = GameStateManager::new(&content, &config, Table::new(player), RngState::from_seed(1));
    manager.start_game().expect("game");
    manager.start_round().expect("round");
    assert_eq!(manager.player_max_health(), 6000);
    assert_eq!(manager.set_player_health(10_000), 6000);
    manager.set_daimon_health(-1_000_000);
    assert_eq!(manager.round().map(|round| round.status), Some(RoundStatus::Won));

    manager.start_round().expect("second round");
    let round = manager.round().expect("round");
    assert_eq!(round.number, 2);
    assert_eq!(round.player_max_blood_pool, 6000);
    assert_eq!(manager.player().blood_pool, 5000);
    manager.player().check().expect("within base max");
}

#[test]
fn service_commits_rounds_with_a_raised_ceiling() {
    let daimon_effect = SlotEffect {
        effect_type: "increase_max_health".to_string(),
        effect_values: EffectBundle::new().with(ActionKind::PlayerMaxHealth, 1.2, Phase::RoundStart),
    };
    let content = Content::new(vec![daimon(1, 0, daimon_effect)], Vec::new());
    let service = GameService::new(MemoryStore::new(), content, GameConfig::default(), 5);
    let player = service.create_player("veteran").expect("player");
    service.start_game(player.id).expect("game");
    let round = service.start_round(player.id).expect("round");
    let stored = round.table.round.expect("round");
    assert_eq!(stored.player_max_blood_pool, 6000);
    assert!(round.table.player.blood_pool <= stored.player_max_blood_pool);
}

#[test]
fn equip_effect_that_ends_the_round_closes_the_hand() {
    let mut token = limit_token();
    token.offering = SlotEffect {
        effect_type: "damage_player".to_string(),
        effect_values: EffectBundle::new().with(ActionKind::PlayerHealth, -1.0, Phase::OnEquip),
    };
    let content = Content::new(vec![daimon(1, 0, SlotEffect::none())], vec![token]);
    let config = GameConfig::default();
    let mut table = table(vec![TEN, SIX, FIVE, NINE]);
    table.player.grant_token(1);
    let offering = table
        .player
        .loadout
        .slots
        .iter()
        .find(|slot| slot.slot_type == SlotType::Offering)
        .map(|slot| slot.id)
        .expect("slot");
    let mut manager = GameStateManager::new(&content, &config, table, RngState::from_seed(1));
    manager.start_hand().expect("hand");

    manager.equip_token(offering, 1).expect("equip");
    assert_eq!(manager.round().map(|round| round.status), Some(RoundStatus::Lost));
    let hand = manager.hand().expect("hand");
    assert_eq!(hand.status, HandStatus::Lost);
    assert_eq!(manager.game().map(|game| game.total_hands_lost), Some(1));
    assert_eq!(
        manager.round().map(|round| round.discard_pile.clone()),
        Some(vec![TEN, SIX, FIVE])
    );
    assert!(manager.available_actions().is_empty());
}

#[test]
fn concurrent_actions_on_one_player_run_one_at_a_time() {
    let service = GameService::new(MemoryStore::new(), content(), GameConfig::default(), 9);
    let player = service.create_player("novice").expect("player");
    service.start_game(player.id).expect("game");
    service.start_round(player.id).expect("round");

    let dealt: Vec<Result<_, EngineError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| service.start_hand(player.id).map(|report| report.value)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });
    assert_eq!(dealt.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(dealt
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| matches!(err, EngineError::HandInProgress)));

    // The scripted tutorial allows exactly one draw before standing.
    let drawn: Vec<Result<_, EngineError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| service.draw(player.id).map(|report| report.value)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect()
    });
    assert_eq!(drawn.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(drawn
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| matches!(err, EngineError::ActionNotAvailable(PlayerAction::Draw))));

    let serial = GameService::new(MemoryStore::new(), content(), GameConfig::default(), 9);
    let twin = serial.create_player("novice").expect("player");
    serial.start_game(twin.id).expect("game");
    serial.start_round(twin.id).expect("round");
    serial.start_hand(twin.id).expect("hand");
    serial.draw(twin.id).expect("draw");
    let expected = serial.table(twin.id).expect("table");

    let table = service.table(player.id).expect("table");
    let round = table.round.as_ref().expect("round");
    let hand = table.hand.as_ref().expect("hand");
    assert_eq!(round.hands_played, 1);
    assert_eq!(hand.player_hand, vec![279, 277, 281]);
    assert_eq!(hand.daimon_hand, vec![266]);
    assert_eq!(round.shuffled_deck, TUTORIAL_DECK[4..].to_vec());
    assert_eq!(table.round, expected.round);
    assert_eq!(table.hand, expected.hand);
    assert_eq!(table.game, expected.game);
    assert_eq!(table.player.blood_pool, expected.player.blood_pool);
}
