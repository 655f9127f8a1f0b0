use crate::Rank;
use serde::{Deserialize, Serialize};

pub const BLACKJACK: u32 = 21;

/// Blackjack total with at most one ace promoted to 11.
pub fn hand_total(ranks: &[Rank]) -> u32 {
    let mut sum = 0u32;
    let mut aces = 0u32;
    for rank in ranks {
        if rank.is_ace() {
            aces += 1;
        } else {
            sum += rank.blackjack_value();
        }
    }
    sum += aces;
    if aces > 0 && sum + 10 <= BLACKJACK {
        sum += 10;
    }
    sum
}

pub fn is_blackjack(ranks: &[Rank]) -> bool {
    ranks.len() == 2 && hand_total(ranks) == BLACKJACK
}

pub fn is_bust(ranks: &[Rank]) -> bool {
    hand_total(ranks) > BLACKJACK
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandOutcome {
    Won,
    Lost,
    Pushed,
}

/// Outcome from the player's side of the table.
pub fn hand_result(player: &[Rank], daimon: &[Rank]) -> HandOutcome {
    let player_blackjack = is_blackjack(player);
    let daimon_blackjack = is_blackjack(daimon);
    let player_total = hand_total(player);
    let daimon_total = hand_total(daimon);

    match (player_blackjack, daimon_blackjack) {
        (true, true) => HandOutcome::Pushed,
        (true, false) => HandOutcome::Won,
        (false, true) => HandOutcome::Lost,
        _ if player_total > BLACKJACK => HandOutcome::Lost,
        _ if daimon_total > BLACKJACK => HandOutcome::Won,
        _ if player_total > daimon_total => HandOutcome::Won,
        _ if player_total < daimon_total => HandOutcome::Lost,
        _ => HandOutcome::Pushed,
    }
}
