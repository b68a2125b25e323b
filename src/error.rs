use thiserror::Error;

use crate::action::Action;
use crate::game::Phase;
use crate::role::Role;

/// Why an intent was rejected. Rejections never mutate the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session id is already in use")]
    SessionExists,
    #[error("Session state was corrupted and the game is unrecoverable")]
    SessionCorrupted,
    #[error("Player not found")]
    UnknownPlayer,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Cannot do that in the {0} phase")]
    WrongPhase(Phase),
    #[error("You are eliminated")]
    Eliminated,
    #[error("You have 10+ coins and must Coup!")]
    MustCoup,
    #[error("Not enough coins. Need {needed}")]
    InsufficientCoins { needed: u8 },
    #[error("This action requires a target")]
    TargetRequired,
    #[error("Invalid target")]
    InvalidTarget,
    #[error("Cannot target yourself")]
    TargetIsSelf,
    #[error("Target has no coins to steal")]
    TargetHasNoCoins,
    #[error("Cannot challenge yourself")]
    ChallengeOwnAction,
    #[error("Blocker cannot challenge their own block")]
    ChallengeOwnBlock,
    #[error("This action cannot be blocked")]
    NotBlockable,
    #[error("{role} cannot block {action}")]
    RoleCannotBlock { role: Role, action: Action },
    #[error("Only the target can block this action")]
    NotTheTarget,
    #[error("You are not eligible to respond")]
    NotEligible,
    #[error("You have already allowed this")]
    AlreadyResponded,
    #[error("Not your turn to select influence")]
    NotSelectingInfluence,
    #[error("Invalid card selection")]
    InvalidCardSelection,
    #[error("Must select exactly {expected} cards to keep")]
    WrongExchangeCount { expected: usize },
    #[error("The game is over")]
    GameOver,
    #[error("A game needs 2 to 6 players, not {0}")]
    InvalidPlayerCount(usize),
    #[error("Player ids must be unique")]
    DuplicatePlayer,
    #[error("Player is already in another session")]
    AlreadyInSession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_read_like_a_human_wrote_them() {
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(GameError::MustCoup.to_string(), "You have 10+ coins and must Coup!");
        assert_eq!(
            GameError::InsufficientCoins { needed: 7 }.to_string(),
            "Not enough coins. Need 7"
        );
        assert_eq!(
            GameError::RoleCannotBlock { role: Role::Duke, action: Action::Steal }.to_string(),
            "Duke cannot block Steal"
        );
    }
}
