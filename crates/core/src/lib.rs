//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod engine;
pub mod events;
pub mod hand;
pub mod inventory;
pub mod rng;
pub mod service;
pub mod state;
pub mod store;

pub use cards::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use effects::*;
pub use engine::*;
pub use events::*;
pub use hand::*;
pub use inventory::*;
pub use rng::*;
pub use service::*;
pub use state::*;
pub use store::*;
