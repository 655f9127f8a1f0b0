pub use bloodjack_core::{
    ActionKind, Content, DaimonDef, EffectBundle, EffectValue, GameConfig, Phase, SlotEffect,
    TokenDef,
};
