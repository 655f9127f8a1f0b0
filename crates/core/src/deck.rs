use crate::{CardId, PlayerAction, RngState};
use std::collections::HashSet;
use thiserror::Error;

/// Fixed shoe dealt until the player finishes the tutorial.
pub const TUTORIAL_DECK: [CardId; 23] = [
    279, 277, 266, 281, 282, 308, 280, 274, 284, 271, 278, 264, 305, 283, 285, 272, 310, 286, 311,
    273, 270, 268, 292,
];

/// Scripted tutorial steps, keyed by cards dealt from the tutorial shoe.
pub fn tutorial_actions(cards_dealt: usize) -> Option<&'static [PlayerAction]> {
    match cards_dealt {
        3 => Some(&[PlayerAction::Draw]),
        4 | 8 => Some(&[PlayerAction::Stand]),
        13 => Some(&[PlayerAction::Surrender]),
        _ => None,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    #[error("items and weights size must match ({items} != {weights})")]
    SizeMismatch { items: usize, weights: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck must have exactly {expected} cards, got {got}")]
    WrongSize { expected: usize, got: usize },
    #[error("deck contains duplicate card id {0}")]
    Duplicate(CardId),
    #[error("card {0} is not owned by the player")]
    NotOwned(CardId),
}

pub type WeightFn<'a, T> = Box<dyn Fn(&T) -> f64 + 'a>;

/// Three independent per-card weight factors, multiplied together.
pub struct Weighting<'a, T> {
    rank: WeightFn<'a, T>,
    effect: WeightFn<'a, T>,
    suit: WeightFn<'a, T>,
}

impl<'a, T: 'a> Default for Weighting<'a, T> {
    fn default() -> Self {
        Self {
            rank: Box::new(|_| 1.0),
            effect: Box::new(|_| 1.0),
            suit: Box::new(|_| 1.0),
        }
    }
}

impl<'a, T: 'a> Weighting<'a, T> {
    pub fn with_rank(mut self, weight: impl Fn(&T) -> f64 + 'a) -> Self {
        self.rank = Box::new(weight);
        self
    }

    pub fn with_effect(mut self, weight: impl Fn(&T) -> f64 + 'a) -> Self {
        self.effect = Box::new(weight);
        self
    }

    pub fn with_suit(mut self, weight: impl Fn(&T) -> f64 + 'a) -> Self {
        self.suit = Box::new(weight);
        self
    }
}

pub fn compute_weights<T>(items: &[T], weighting: &Weighting<'_, T>) -> Vec<f64> {
    items
        .iter()
        .map(|item| (weighting.rank)(item) * (weighting.effect)(item) * (weighting.suit)(item))
        .collect()
}

/// Prefix sums over a fixed-capacity array with O(log n) update and search.
struct Fenwick {
    tree: Vec<f64>,
}

impl Fenwick {
    fn from_weights(weights: &[f64]) -> Self {
        let mut tree = vec![0.0; weights.len() + 1];
        for (idx, weight) in weights.iter().enumerate() {
            let mut pos = idx + 1;
            while pos < tree.len() {
                tree[pos] += weight;
                pos += pos & pos.wrapping_neg();
            }
        }
        Self { tree }
    }

    fn add(&mut self, idx: usize, delta: f64) {
        let mut pos = idx + 1;
        while pos < self.tree.len() {
            self.tree[pos] += delta;
            pos += pos & pos.wrapping_neg();
        }
    }

    /// Index of the first slot whose cumulative weight exceeds `target`.
    fn search(&self, mut target: f64) -> usize {
        let len = self.tree.len() - 1;
        let mut pos = 0;
        let mut step = if len == 0 { 0 } else { 1 << (usize::BITS - 1 - len.leading_zeros()) };
        while step > 0 {
            let next = pos + step;
            if next <= len && self.tree[next] <= target {
                pos = next;
                target -= self.tree[next];
            }
            step >>= 1;
        }
        pos
    }
}

/// Weighted selection of up to `count` distinct items.
///
/// Each draw searches the cumulative weights and swaps the chosen item to the
/// end of the live range. Returns fewer than `count` items once the pool is
/// exhausted.
pub fn sample_without_replacement<T: Clone>(
    items: &[T],
    weights: &[f64],
    count: usize,
    rng: &mut RngState,
) -> Result<Vec<T>, SampleError> {
    if items.len() != weights.len() {
        return Err(SampleError::SizeMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    let mut pool = items.to_vec();
    let mut weights: Vec<f64> = weights
        .iter()
        .map(|weight| if weight.is_finite() { weight.max(0.0) } else { 0.0 })
        .collect();
    let mut tree = Fenwick::from_weights(&weights);
    let mut total: f64 = weights.iter().sum();
    let mut live = pool.len();
    let mut selected = Vec::with_capacity(count.min(live));

    while selected.len() < count && live > 0 {
        let idx = if total > 0.0 {
            tree.search(rng.next_f64() * total).min(live - 1)
        } else {
            rng.pick_index(live).unwrap_or(0)
        };
        selected.push(pool[idx].clone());

        let last = live - 1;
        let removed = weights[idx];
        let moved = weights[last];
        if idx != last {
            tree.add(idx, moved - removed);
            pool.swap(idx, last);
            weights.swap(idx, last);
        }
        tree.add(last, -moved);
        weights[last] = 0.0;
        total -= removed;
        if total < 0.0 {
            total = 0.0;
        }
        live -= 1;
    }
    Ok(selected)
}

/// Rejects sequences that repeat a card id.
pub fn ensure_unique(ids: &[CardId]) -> Result<(), DeckError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(*id) {
            return Err(DeckError::Duplicate(*id));
        }
    }
    Ok(())
}

pub fn validate_deck(
    cards: &[CardId],
    expected: usize,
    owns: impl Fn(CardId) -> bool,
) -> Result<(), DeckError> {
    if cards.len() != expected {
        return Err(DeckError::WrongSize {
            expected,
            got: cards.len(),
        });
    }
    ensure_unique(cards)?;
    if let Some(card) = cards.iter().find(|card| !owns(**card)) {
        return Err(DeckError::NotOwned(*card));
    }
    Ok(())
}
