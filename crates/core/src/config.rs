use serde::{Deserialize, Serialize};

/// Balance constants for rounds, wagers and deck weighting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub base_player_health: i64,
    pub base_daimon_health: i64,
    pub daimon_scaling_factor: f64,
    pub min_wager: i64,
    /// Hands played before the wager starts climbing.
    pub flat_wager_hands: u32,
    pub wager_step: i64,
    /// Hand count past which the wager stops climbing.
    pub wager_scaling_cap: u32,
    pub deck_size: usize,
    pub daimon_stand_total: u32,
    pub rank_bias_threshold: u8,
    pub rank_bias_fade_round: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_player_health: 5000,
            base_daimon_health: 2500,
            daimon_scaling_factor: 1.155,
            min_wager: 500,
            flat_wager_hands: 4,
            wager_step: 409,
            wager_scaling_cap: 15,
            deck_size: 52,
            daimon_stand_total: 17,
            rank_bias_threshold: 10,
            rank_bias_fade_round: 5,
        }
    }
}

impl GameConfig {
    pub fn daimon_health(&self, round_number: u32, double_health: bool) -> i64 {
        let exponent = round_number.saturating_sub(1) as i32;
        let mut health = self.base_daimon_health as f64 * self.daimon_scaling_factor.powi(exponent);
        if double_health {
            health *= 2.0;
        }
        health as i64
    }

    /// Per-side stake for the next hand; the pot is twice this.
    ///
    /// Never more than `blood_pool - 1`, so the deduction alone cannot drain
    /// the player.
    pub fn wager_for(&self, hands_played: u32, blood_pool: i64) -> i64 {
        let wager = if hands_played < self.flat_wager_hands {
            self.min_wager
        } else {
            let scaling = hands_played.min(self.wager_scaling_cap);
            let steps = (scaling + 1).saturating_sub(self.flat_wager_hands);
            self.min_wager + i64::from(steps) * self.wager_step
        };
        wager.min((blood_pool - 1).max(0))
    }

    /// Shuffle weight for a card of `rank_numeric` in round `round_number`.
    ///
    /// High ranks are doubled in round one and fade back to neutral by
    /// `rank_bias_fade_round`.
    pub fn rank_weight(&self, rank_numeric: u8, round_number: u32) -> f64 {
        let fade_round = self.rank_bias_fade_round.max(2);
        if rank_numeric < self.rank_bias_threshold || round_number >= fade_round {
            return 1.0;
        }
        let round = f64::from(round_number.max(1));
        let fade = (f64::from(fade_round) - round) / f64::from(fade_round - 1);
        1.0 + fade / round
    }
}
