use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Everything a player can declare on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Steal,
    Exchange,
}

pub static ACTIONS: [Action; 7] = [
    Action::Income,
    Action::ForeignAid,
    Action::Coup,
    Action::Tax,
    Action::Assassinate,
    Action::Steal,
    Action::Exchange,
];

impl Action {
    /// Coins deducted the moment the action is declared. Not refunded.
    pub fn cost(self) -> u8 {
        match self {
            Action::Coup => 7,
            Action::Assassinate => 3,
            _ => 0,
        }
    }

    pub fn requires_target(self) -> bool {
        matches!(self, Action::Coup | Action::Assassinate | Action::Steal)
    }

    /// The role a declarer implicitly claims to hold, if any.
    pub fn claims(self) -> Option<Role> {
        match self {
            Action::Tax => Some(Role::Duke),
            Action::Assassinate => Some(Role::Assassin),
            Action::Steal => Some(Role::Captain),
            Action::Exchange => Some(Role::Ambassador),
            Action::Income | Action::ForeignAid | Action::Coup => None,
        }
    }

    /// Only claimed actions can be challenged.
    pub fn challengeable(self) -> bool {
        self.claims().is_some()
    }

    pub fn blockable(self) -> bool {
        !self.blocked_by().is_empty()
    }

    /// Roles that may be claimed to block this action.
    pub fn blocked_by(self) -> &'static [Role] {
        match self {
            Action::ForeignAid => &[Role::Duke],
            Action::Assassinate => &[Role::Contessa],
            Action::Steal => &[Role::Captain, Role::Ambassador],
            Action::Income | Action::Coup | Action::Tax | Action::Exchange => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Income => "Income",
            Action::ForeignAid => "Foreign Aid",
            Action::Coup => "Coup",
            Action::Tax => "Tax",
            Action::Assassinate => "Assassinate",
            Action::Steal => "Steal",
            Action::Exchange => "Exchange",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
