//! Server-authoritative engine for the bluffing card game Coup.
//!
//! The engine owns the turn/phase state machine: who acts, what was
//! claimed, who may challenge or block, how hidden hands resolve a
//! challenge, and how coins, cards, and eliminations move. Everything
//! else is a collaborator: a transport decodes client frames into
//! [`Intent`]s, hands them to the [`SessionRegistry`], and broadcasts
//! the per-player [`PlayerView`] projections that come back. Clients
//! never see another player's face-down cards.

pub mod action;
pub mod deck;
pub mod error;
pub mod events;
pub mod game;
pub mod player;
pub mod registry;
mod resolve;
pub mod role;
pub mod sim;
pub mod view;

#[cfg(test)]
mod testutil;

pub use action::Action;
pub use error::GameError;
pub use game::{Game, Phase, SessionId};
pub use player::{Card, Player, PlayerId};
pub use registry::{Intent, SessionRegistry};
pub use role::Role;
pub use view::PlayerView;
