use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Trigger point an effect entry is gated on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    OnEquip,
    RoundStart,
    HandStart,
    OnWin,
    OnLoss,
    OnPush,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::OnEquip,
        Phase::RoundStart,
        Phase::HandStart,
        Phase::OnWin,
        Phase::OnLoss,
        Phase::OnPush,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Phase::OnEquip => "on_equip",
            Phase::RoundStart => "round_start",
            Phase::HandStart => "hand_start",
            Phase::OnWin => "on_win",
            Phase::OnLoss => "on_loss",
            Phase::OnPush => "on_push",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        let value = value.to_lowercase();
        Phase::ALL.into_iter().find(|phase| phase.id() == value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PlayerHealth,
    DaimonHealth,
    BloodWager,
    PlayerMaxHealth,
    DaimonMaxHealth,
    DamageDaimonWithDifference,
    ShowCardCount,
    ShowNextCardCount,
    ShowNextCard,
    #[serde(rename = "none")]
    NoEffect,
}

impl ActionKind {
    pub fn id(self) -> &'static str {
        match self {
            ActionKind::PlayerHealth => "player_health",
            ActionKind::DaimonHealth => "daimon_health",
            ActionKind::BloodWager => "blood_wager",
            ActionKind::PlayerMaxHealth => "player_max_health",
            ActionKind::DaimonMaxHealth => "daimon_max_health",
            ActionKind::DamageDaimonWithDifference => "damage_daimon_with_difference",
            ActionKind::ShowCardCount => "show_card_count",
            ActionKind::ShowNextCardCount => "show_next_card_count",
            ActionKind::ShowNextCard => "show_next_card",
            ActionKind::NoEffect => "none",
        }
    }

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "player_health" => Some(Self::PlayerHealth),
            "daimon_health" => Some(Self::DaimonHealth),
            "blood_wager" | "blood_pot" => Some(Self::BloodWager),
            "player_max_health" => Some(Self::PlayerMaxHealth),
            "daimon_max_health" => Some(Self::DaimonMaxHealth),
            "damage_daimon_with_difference" => Some(Self::DamageDaimonWithDifference),
            "show_card_count" => Some(Self::ShowCardCount),
            "show_next_card_count" => Some(Self::ShowNextCardCount),
            "show_next_card" => Some(Self::ShowNextCard),
            "none" => Some(Self::NoEffect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EffectValue {
    pub value: f64,
    pub apply_on_phase: Phase,
}

/// Declarative effect script: action -> {value, apply_on_phase}.
///
/// Serialises as a JSON object keyed by action id, the same layout the
/// catalog files and the persisted snapshots use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct EffectBundle(BTreeMap<ActionKind, EffectValue>);

impl EffectBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, action: ActionKind, value: f64, phase: Phase) -> Self {
        self.insert(action, value, phase);
        self
    }

    pub fn insert(&mut self, action: ActionKind, value: f64, phase: Phase) {
        self.0.insert(
            action,
            EffectValue {
                value,
                apply_on_phase: phase,
            },
        );
    }

    /// Value for `action` if its entry fires on `phase`.
    pub fn value_on(&self, action: ActionKind, phase: Phase) -> Option<f64> {
        self.0
            .get(&action)
            .filter(|entry| entry.apply_on_phase == phase)
            .map(|entry| entry.value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &EffectValue)> {
        self.0.iter().map(|(action, value)| (*action, value))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EffectTypeDef {
    pub id: &'static str,
    pub actions: &'static [ActionKind],
    pub description: &'static str,
}

pub const EFFECT_TYPES: &[EffectTypeDef] = &[
    EffectTypeDef {
        id: "heal_player",
        actions: &[ActionKind::PlayerHealth],
        description: "The gambler's blood pool is replenished.",
    },
    EffectTypeDef {
        id: "damage_player",
        actions: &[ActionKind::PlayerHealth],
        description: "The gambler takes extra damage.",
    },
    EffectTypeDef {
        id: "increase_max_health",
        actions: &[ActionKind::PlayerMaxHealth],
        description: "Increases the gambler's maximum blood pool capacity.",
    },
    EffectTypeDef {
        id: "decrease_max_health",
        actions: &[ActionKind::PlayerMaxHealth],
        description: "Decreases the gambler's maximum blood pool capacity.",
    },
    EffectTypeDef {
        id: "heal_daimon",
        actions: &[ActionKind::DaimonHealth],
        description: "The house's blood pool is replenished.",
    },
    EffectTypeDef {
        id: "damage_daimon",
        actions: &[ActionKind::DaimonHealth],
        description: "The house takes extra damage.",
    },
    EffectTypeDef {
        id: "increase_daimon_max_health",
        actions: &[ActionKind::DaimonMaxHealth],
        description: "Increases the house's maximum blood pool capacity.",
    },
    EffectTypeDef {
        id: "decrease_daimon_max_health",
        actions: &[ActionKind::DaimonMaxHealth],
        description: "Decreases the house's maximum blood pool capacity.",
    },
    EffectTypeDef {
        id: "increase_pot_on_win",
        actions: &[ActionKind::BloodWager],
        description: "Increases blood pot payout on a win.",
    },
    EffectTypeDef {
        id: "push_blood_return",
        actions: &[ActionKind::PlayerHealth],
        description: "Increases blood pot returned on a push.",
    },
    EffectTypeDef {
        id: "loss_blood_return",
        actions: &[ActionKind::PlayerHealth],
        description: "Partially refunds blood lost on a loss.",
    },
    EffectTypeDef {
        id: "show_card_count",
        actions: &[ActionKind::ShowCardCount],
        description: "Shows the current card count.",
    },
    EffectTypeDef {
        id: "show_next_card_count",
        actions: &[ActionKind::ShowNextCardCount],
        description: "Shows whether the next card will increase or decrease the card count.",
    },
    EffectTypeDef {
        id: "show_next_card",
        actions: &[ActionKind::ShowNextCard],
        description: "Shows the next card.",
    },
    EffectTypeDef {
        id: "damage_daimon_limit_health",
        actions: &[
            ActionKind::DamageDaimonWithDifference,
            ActionKind::PlayerMaxHealth,
        ],
        description: "The house takes extra damage by limiting the gambler's blood pool.",
    },
    EffectTypeDef {
        id: "damage_daimon_and_player",
        actions: &[ActionKind::DaimonHealth, ActionKind::PlayerHealth],
        description: "The house and the gambler take extra damage.",
    },
    EffectTypeDef {
        id: "none",
        actions: &[ActionKind::NoEffect],
        description: "No effect.",
    },
];

pub fn effect_type_def(effect_type: &str) -> Option<&'static EffectTypeDef> {
    EFFECT_TYPES.iter().find(|def| def.id == effect_type)
}

/// Actions triggered by `effect_type`; unknown types trigger nothing.
pub fn effect_actions(effect_type: &str) -> &'static [ActionKind] {
    effect_type_def(effect_type).map_or(&[], |def| def.actions)
}

pub fn effect_description(effect_type: &str) -> Option<&'static str> {
    effect_type_def(effect_type).map(|def| def.description)
}
