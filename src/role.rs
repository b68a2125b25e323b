use serde::{Deserialize, Serialize};

use crate::action::Action;

/// The five court roles. Three copies of each make up the 15-card deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static ROLES: [Role; 5] = [
    Role::Duke,
    Role::Assassin,
    Role::Captain,
    Role::Ambassador,
    Role::Contessa,
];

/// Copies of each role in the deck.
pub const COPIES_PER_ROLE: usize = 3;

/// Total cards in circulation: deck + hands + staged returns, always.
pub const DECK_SIZE: usize = ROLES.len() * COPIES_PER_ROLE;

impl Role {
    /// The action this role grants, if any. Contessa only blocks.
    pub fn action(self) -> Option<Action> {
        match self {
            Role::Duke => Some(Action::Tax),
            Role::Assassin => Some(Action::Assassinate),
            Role::Captain => Some(Action::Steal),
            Role::Ambassador => Some(Action::Exchange),
            Role::Contessa => None,
        }
    }

    /// Actions this role can be claimed to block.
    pub fn blocks(self) -> &'static [Action] {
        match self {
            Role::Duke => &[Action::ForeignAid],
            Role::Assassin => &[],
            Role::Captain => &[Action::Steal],
            Role::Ambassador => &[Action::Steal],
            Role::Contessa => &[Action::Assassinate],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Duke => "Duke",
            Role::Assassin => "Assassin",
            Role::Captain => "Captain",
            Role::Ambassador => "Ambassador",
            Role::Contessa => "Contessa",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
