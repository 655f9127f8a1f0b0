use crate::TokenId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type SlotId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SlotType {
    Inscribed,
    Oathbound,
    Offering,
}

impl SlotType {
    pub const ALL: [SlotType; 3] = [SlotType::Inscribed, SlotType::Oathbound, SlotType::Offering];

    /// Maximum number of slots of this type a player may hold.
    pub fn limit(self) -> usize {
        match self {
            SlotType::Inscribed => 1,
            SlotType::Oathbound => 2,
            SlotType::Offering => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub id: SlotId,
    pub slot_type: SlotType,
    #[serde(default)]
    pub token: Option<TokenId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Loadout {
    pub slots: Vec<Slot>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadoutError {
    #[error("player can only have {limit} {slot_type:?} slots")]
    SlotLimit { slot_type: SlotType, limit: usize },
    #[error("unknown slot {0}")]
    UnknownSlot(SlotId),
    #[error("token {token} is already assigned to slot {slot}")]
    TokenAlreadyEquipped { token: TokenId, slot: SlotId },
    #[error("token {0} is not owned by the player")]
    TokenNotOwned(TokenId),
}

impl Loadout {
    /// One slot of every type, up to each type's limit.
    pub fn full() -> Self {
        let slots = SlotType::ALL
            .into_iter()
            .flat_map(|slot_type| std::iter::repeat(slot_type).take(slot_type.limit()))
            .zip(1..)
            .map(|(slot_type, id)| Slot {
                id,
                slot_type,
                token: None,
            })
            .collect();
        Self { slots }
    }

    pub fn count(&self, slot_type: SlotType) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.slot_type == slot_type)
            .count()
    }

    pub fn add_slot(&mut self, slot_type: SlotType) -> Result<SlotId, LoadoutError> {
        let limit = slot_type.limit();
        if self.count(slot_type) >= limit {
            return Err(LoadoutError::SlotLimit { slot_type, limit });
        }
        let id = self.slots.iter().map(|slot| slot.id).max().map_or(1, |max| max + 1);
        self.slots.push(Slot {
            id,
            slot_type,
            token: None,
        });
        Ok(id)
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn inscribed(&self) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.slot_type == SlotType::Inscribed)
    }

    /// Places `token` in `slot_id`; a token occupies at most one slot.
    pub fn equip(&mut self, slot_id: SlotId, token: TokenId) -> Result<(), LoadoutError> {
        if let Some(other) = self
            .slots
            .iter()
            .find(|slot| slot.id != slot_id && slot.token == Some(token))
        {
            return Err(LoadoutError::TokenAlreadyEquipped {
                token,
                slot: other.id,
            });
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.id == slot_id)
            .ok_or(LoadoutError::UnknownSlot(slot_id))?;
        slot.token = Some(token);
        Ok(())
    }

    pub fn unequip(&mut self, slot_id: SlotId) -> Result<Option<TokenId>, LoadoutError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.id == slot_id)
            .ok_or(LoadoutError::UnknownSlot(slot_id))?;
        Ok(slot.token.take())
    }
}
