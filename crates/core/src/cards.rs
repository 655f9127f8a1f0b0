use crate::{ActionKind, EffectBundle, Phase};
use serde::{Deserialize, Serialize};

pub type CardId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
        }
    }

    /// Numeric strength used by effect formulas and deck weighting.
    pub fn numeric(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 15,
        }
    }

    /// Hard blackjack value; aces count 1 here and are promoted by the totaler.
    pub fn blackjack_value(self) -> u32 {
        match self {
            Rank::Ace => 1,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => u32::from(other.numeric()),
        }
    }

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    /// Hi-Lo counting tag.
    pub fn hi_lo(self) -> i32 {
        match self.blackjack_value() {
            2..=6 => 1,
            7..=9 => 0,
            _ => -1,
        }
    }
}

/// Flavor printed on a card; decides which effect it carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardFlavor {
    Exhumed,
    Charred,
    Fleshwoven,
    Blessed,
    Bloodstained,
    Standard,
}

struct FlavorDef {
    effect_type: &'static str,
    action: Option<(ActionKind, Phase)>,
    formula: fn(f64) -> f64,
    description: &'static str,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl CardFlavor {
    pub const ALL: [CardFlavor; 6] = [
        CardFlavor::Exhumed,
        CardFlavor::Charred,
        CardFlavor::Fleshwoven,
        CardFlavor::Blessed,
        CardFlavor::Bloodstained,
        CardFlavor::Standard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CardFlavor::Exhumed => "Exhumed",
            CardFlavor::Charred => "Charred",
            CardFlavor::Fleshwoven => "Fleshwoven",
            CardFlavor::Blessed => "Blessed",
            CardFlavor::Bloodstained => "Bloodstained",
            CardFlavor::Standard => "Standard",
        }
    }

    fn def(self) -> FlavorDef {
        match self {
            CardFlavor::Exhumed => FlavorDef {
                effect_type: "increase_pot_on_win",
                action: Some((ActionKind::BloodWager, Phase::OnWin)),
                formula: |rank| (25.0 * rank / 15.0).round(),
                description: "Cards ripped from a corpse's stiff grip.",
            },
            CardFlavor::Charred => FlavorDef {
                effect_type: "loss_blood_return",
                action: Some((ActionKind::PlayerHealth, Phase::OnLoss)),
                formula: |rank| (1.0 + 20.0 * rank / 15.0).round(),
                description: "The embers on these cards can still cauterize wounds.",
            },
            CardFlavor::Fleshwoven => FlavorDef {
                effect_type: "push_blood_return",
                action: Some((ActionKind::PlayerHealth, Phase::OnPush)),
                formula: |rank| (1.0 + 25.0 * rank / 15.0).round(),
                description:
                    "These cards appear to have a leathery texture and an odd familiarity.",
            },
            CardFlavor::Blessed => FlavorDef {
                effect_type: "heal_player",
                action: Some((ActionKind::PlayerHealth, Phase::HandStart)),
                formula: |rank| round4(0.04 * rank / 15.0),
                description: "The cards are blinding, and sizzle to the touch.",
            },
            CardFlavor::Bloodstained => FlavorDef {
                effect_type: "damage_daimon",
                action: Some((ActionKind::DaimonHealth, Phase::HandStart)),
                formula: |rank| -round4(0.1 * rank / 15.0),
                description:
                    "The cards are matted together by blood, filling the room with their foul odor.",
            },
            CardFlavor::Standard => FlavorDef {
                effect_type: "none",
                action: None,
                formula: |_| 0.0,
                description:
                    "A standard deck of cards, they are almost boring with how ordinary they appear.",
            },
        }
    }

    pub fn effect_type(self) -> &'static str {
        self.def().effect_type
    }

    pub fn description(self) -> &'static str {
        self.def().description
    }

    /// Effect bundle for a card of this flavor at `rank`.
    pub fn effect_values(self, rank: Rank) -> EffectBundle {
        let def = self.def();
        match def.action {
            Some((action, phase)) => {
                EffectBundle::new().with(action, (def.formula)(f64::from(rank.numeric())), phase)
            }
            None => EffectBundle::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardDef {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    pub flavor: CardFlavor,
    pub name: String,
    pub description: String,
    pub effect_type: String,
    pub effect_values: EffectBundle,
}

impl CardDef {
    /// Builds a card and computes its effect bundle once.
    pub fn new(id: CardId, flavor: CardFlavor, suit: Suit, rank: Rank) -> Self {
        Self {
            id,
            suit,
            rank,
            flavor,
            name: format!("{} {} of {}", flavor.name(), rank.name(), suit.name()),
            description: flavor.description().to_string(),
            effect_type: flavor.effect_type().to_string(),
            effect_values: flavor.effect_values(rank),
        }
    }
}

/// Every flavor x suit x rank, ids assigned from 1 in that order.
pub fn card_catalog() -> Vec<CardDef> {
    let mut cards = Vec::with_capacity(CardFlavor::ALL.len() * 52);
    let mut next_id: CardId = 1;
    for flavor in CardFlavor::ALL {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(CardDef::new(next_id, flavor, suit, rank));
                next_id += 1;
            }
        }
    }
    cards
}
