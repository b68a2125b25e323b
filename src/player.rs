use crate::role::Role;

/// Stable identifier a client presents with every intent.
pub type PlayerId = String;

/// One influence slot. Revealed cards stay in the hand, face up, forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub role: Role,
    pub revealed: bool,
}

impl Card {
    pub fn hidden(role: Role) -> Self {
        Self { role, revealed: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub coins: u8,
    pub hand: Vec<Card>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coins: 2,
            hand: Vec::with_capacity(2),
        }
    }

    pub fn influence_left(&self) -> usize {
        self.hand.iter().filter(|c| !c.revealed).count()
    }

    pub fn is_eliminated(&self) -> bool {
        self.influence_left() == 0
    }

    /// Does the player actually hold this role face down?
    pub fn has_live(&self, role: Role) -> bool {
        self.hand.iter().any(|c| !c.revealed && c.role == role)
    }

    /// Slot index of the first face-down copy of `role`.
    pub fn position_of_live(&self, role: Role) -> Option<usize> {
        self.hand.iter().position(|c| !c.revealed && c.role == role)
    }

    /// Flip a slot face up and return what was there.
    pub fn reveal(&mut self, idx: usize) -> Role {
        let card = &mut self.hand[idx];
        debug_assert!(!card.revealed, "revealing a card twice");
        card.revealed = true;
        card.role
    }

    /// Swap the role at a slot for a fresh one, leaving the slot face down
    /// and every other slot untouched.
    pub fn replace_slot(&mut self, idx: usize, role: Role) -> Role {
        let card = &mut self.hand[idx];
        debug_assert!(!card.revealed, "replacing a revealed card");
        std::mem::replace(&mut card.role, role)
    }

    pub fn live_roles(&self) -> Vec<Role> {
        self.hand.iter().filter(|c| !c.revealed).map(|c| c.role).collect()
    }

    pub fn revealed_roles(&self) -> Vec<Role> {
        self.hand.iter().filter(|c| c.revealed).map(|c| c.role).collect()
    }

    pub fn gain(&mut self, coins: u8) {
        self.coins += coins;
    }

    pub fn spend(&mut self, coins: u8) {
        debug_assert!(self.coins >= coins, "spending coins the player does not have");
        self.coins -= coins;
    }
}
