use rand::seq::SliceRandom;
use rand::Rng;

use crate::role::{Role, COPIES_PER_ROLE, ROLES};

/// The court deck. Cards leave only by drawing and come back only by
/// an explicit return, so the census of deck + hands + exchange pool
/// stays at fifteen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Role>,
}

impl Deck {
    /// Three copies of each role, in catalog order. Shuffle before dealing.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(ROLES.len() * COPIES_PER_ROLE);
        for role in ROLES {
            for _ in 0..COPIES_PER_ROLE {
                cards.push(role);
            }
        }
        Self { cards }
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Role {
        self.cards.pop().expect("drew from an empty deck")
    }

    pub fn put_back(&mut self, role: Role) {
        self.cards.push(role);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.cards.iter()
    }
}
