//! The session store and the intent envelope. A transport decodes one
//! client frame into an [`Intent`], names the session and the sender,
//! and lets [`SessionRegistry::submit`] do the rest.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::GameError;
use crate::game::{Game, SessionId};
use crate::player::PlayerId;
use crate::role::Role;
use crate::view::PlayerView;

/// One decoded client request. The serialized shape is the wire
/// vocabulary: a `type` tag plus the intent's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    DeclareAction {
        action: Action,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PlayerId>,
    },
    Challenge,
    Block {
        claimed_card: Role,
    },
    Allow,
    SelectInfluence {
        card_index: usize,
    },
    ExchangeCards {
        selected_cards: Vec<usize>,
    },
    Resign,
}

impl Game {
    /// Dispatch one decoded intent to the matching engine operation.
    pub fn apply(&mut self, player: &str, intent: &Intent) -> Result<(), GameError> {
        match intent {
            Intent::DeclareAction { action, target } => {
                self.declare_action(player, *action, target.as_deref())
            }
            Intent::Challenge => self.challenge(player),
            Intent::Block { claimed_card } => self.block(player, *claimed_card),
            Intent::Allow => self.allow(player),
            Intent::SelectInfluence { card_index } => self.select_influence(player, *card_index),
            Intent::ExchangeCards { selected_cards } => self.exchange_cards(player, selected_cards),
            Intent::Resign => self.resign(player),
        }
    }
}

/// All live sessions, owned by the embedder. One mutex per session
/// serializes that table's intents; distinct sessions run in parallel.
/// A panic inside a session poisons only that session's lock, which
/// later callers see as [`GameError::SessionCorrupted`].
#[derive(Debug, Default)]
pub struct SessionRegistry {
    games: RwLock<HashMap<SessionId, Arc<Mutex<Game>>>>,
    players: RwLock<HashMap<PlayerId, SessionId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session, deal the table, and hand back each player's
    /// opening view for the transport to deliver.
    pub fn create_session(
        &self,
        id: impl Into<SessionId>,
        roster: &[(&str, &str)],
        seed: u64,
    ) -> Result<Vec<(PlayerId, PlayerView)>, GameError> {
        let id = id.into();
        let game = Game::new(id.clone(), roster, seed)?;
        let views = game
            .players()
            .iter()
            .map(|p| Ok((p.id.clone(), game.view_for(&p.id)?)))
            .collect::<Result<Vec<_>, GameError>>()?;

        // id and membership checks happen under the write locks, so a
        // racing create cannot clobber a live session or seat a player
        // at two tables
        let mut games = self.games.write().map_err(|_| GameError::SessionCorrupted)?;
        let mut players = self.players.write().map_err(|_| GameError::SessionCorrupted)?;
        if games.contains_key(&id) {
            return Err(GameError::SessionExists);
        }
        if roster.iter().any(|(pid, _)| players.contains_key(*pid)) {
            return Err(GameError::AlreadyInSession);
        }
        for (pid, _) in roster {
            players.insert((*pid).to_owned(), id.clone());
        }
        games.insert(id.clone(), Arc::new(Mutex::new(game)));
        log::debug!("session {id} created with {} players", roster.len());
        Ok(views)
    }

    /// The shared handle for one session. Callers that want to batch
    /// several intents under one lock can hold this directly.
    pub fn game(&self, session: &str) -> Result<Arc<Mutex<Game>>, GameError> {
        let games = self.games.read().map_err(|_| GameError::SessionCorrupted)?;
        games.get(session).cloned().ok_or(GameError::SessionNotFound)
    }

    /// Which session a player is seated in, if any.
    pub fn session_of(&self, player: &str) -> Option<SessionId> {
        self.players.read().ok()?.get(player).cloned()
    }

    /// Run one intent against one session. A rejection leaves the
    /// session untouched.
    pub fn submit(&self, session: &str, player: &str, intent: &Intent) -> Result<(), GameError> {
        let game = self.game(session)?;
        let mut game = game.lock().map_err(|_| GameError::SessionCorrupted)?;
        let result = game.apply(player, intent);

        if result.is_ok() && *intent == Intent::Resign {
            // the seat is dead for good; stop routing this player here
            if let Ok(mut players) = self.players.write() {
                players.remove(player);
            }
        }
        result
    }

    /// Project one session for one viewer.
    pub fn view(&self, session: &str, viewer: &str) -> Result<PlayerView, GameError> {
        let game = self.game(session)?;
        let game = game.lock().map_err(|_| GameError::SessionCorrupted)?;
        game.view_for(viewer)
    }

    /// Drop a finished session and every player mapping that pointed
    /// at it. The embedder calls this after its grace period.
    pub fn remove_session(&self, session: &str) -> Result<(), GameError> {
        let mut games = self.games.write().map_err(|_| GameError::SessionCorrupted)?;
        games.remove(session).ok_or(GameError::SessionNotFound)?;
        let mut players = self.players.write().map_err(|_| GameError::SessionCorrupted)?;
        players.retain(|_, s| s != session);
        log::debug!("session {session} removed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.games.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
