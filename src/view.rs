//! Per-player projections. Everything a client may see, nothing it may not:
//! hidden hands are redacted down to a count and the face-up cards.

use serde::Serialize;

use crate::action::Action;
use crate::error::GameError;
use crate::events::Event;
use crate::game::{Game, Phase, SessionId, MUST_COUP_AT};
use crate::player::PlayerId;
use crate::role::Role;

/// Narration lines shipped with each projection.
const LOG_TAIL: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub game_id: SessionId,
    pub phase: Phase,
    pub turn_number: u32,
    pub current_player_id: Option<PlayerId>,
    pub players: Vec<SeatView>,
    pub deck_size: usize,
    pub current_action: Option<ActionView>,
    pub block: Option<BlockView>,
    pub challenge: Option<ChallengeView>,
    pub is_your_turn: bool,
    pub available_actions: Vec<ActionOption>,
    pub exchange_options: Option<ExchangePrompt>,
    pub must_select_influence: bool,
    pub can_challenge: bool,
    pub can_block: bool,
    pub block_options: Vec<Role>,
    pub can_allow: bool,
    pub game_log: Vec<Event>,
    pub winner: Option<WinnerView>,
}

/// One seat as this viewer sees it. `influence` is present only on the
/// viewer's own seat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub position: usize,
    pub coins: u8,
    pub influence_count: usize,
    pub revealed_cards: Vec<Role>,
    pub is_eliminated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influence: Option<Vec<CardView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub card: Role,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionView {
    pub action: Action,
    pub actor: PlayerId,
    pub target: Option<PlayerId>,
    pub claimed_card: Option<Role>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    pub blocking_player: PlayerId,
    pub blocking_card: Role,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    pub challenging_player: PlayerId,
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub challenge_success: bool,
    pub revealed_card: Option<Role>,
}

/// A declarable action, with the seats it could target right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOption {
    pub action: Action,
    pub cost: u8,
    pub claims: Option<Role>,
    pub available_targets: Vec<TargetRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetRef {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePrompt {
    pub hand_cards: Vec<Role>,
    pub drawn_cards: Vec<Role>,
    pub must_select: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnerView {
    pub id: PlayerId,
    pub name: String,
}

impl Game {
    /// Project the table for one player. The response flags agree exactly
    /// with what the intent methods would accept.
    pub fn view_for(&self, player: &str) -> Result<PlayerView, GameError> {
        let seat = self.seat_of(player).ok_or(GameError::UnknownPlayer)?;
        let me = &self.players[seat];

        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(position, p)| SeatView {
                id: p.id.clone(),
                name: p.name.clone(),
                position,
                coins: p.coins,
                influence_count: p.influence_left(),
                revealed_cards: p.revealed_roles(),
                is_eliminated: p.is_eliminated(),
                influence: (position == seat).then(|| {
                    p.hand
                        .iter()
                        .map(|c| CardView { card: c.role, revealed: c.revealed })
                        .collect()
                }),
            })
            .collect();

        let current_action = self.action.as_ref().map(|turn| ActionView {
            action: turn.action,
            actor: self.players[turn.actor].id.clone(),
            target: turn.target.map(|t| self.players[t].id.clone()),
            claimed_card: turn.action.claims(),
        });
        let block = self.block.as_ref().map(|b| BlockView {
            blocking_player: self.players[b.blocker].id.clone(),
            blocking_card: b.claimed,
        });
        let challenge = self.challenge.as_ref().map(|c| ChallengeView {
            challenging_player: self.players[c.challenger].id.clone(),
            winner: self.players[if c.succeeded { c.challenger } else { c.challenged }].id.clone(),
            loser: self.players[c.loser].id.clone(),
            challenge_success: c.succeeded,
            revealed_card: c.proven,
        });

        let is_your_turn = self.phase != Phase::GameOver && seat == self.current;
        let available_actions = if self.phase == Phase::ActionDeclaration && is_your_turn {
            self.available_actions(seat)
        } else {
            Vec::new()
        };

        let exchange_options = (self.phase == Phase::ExchangingCards && is_your_turn).then(|| {
            ExchangePrompt {
                hand_cards: me.live_roles(),
                drawn_cards: self.exchange_pool.clone(),
                must_select: me.influence_left(),
            }
        });

        let can_challenge = matches!(
            self.phase,
            Phase::AwaitingChallenge | Phase::AwaitingBlockChallenge
        ) && self.responders.is_pending(seat);

        let block_options = self.block_options(seat);
        let can_allow = matches!(
            self.phase,
            Phase::AwaitingChallenge | Phase::AwaitingBlock | Phase::AwaitingBlockChallenge
        ) && self.responders.is_pending(seat);

        Ok(PlayerView {
            game_id: self.id.clone(),
            phase: self.phase,
            turn_number: self.turn,
            current_player_id: (self.phase != Phase::GameOver)
                .then(|| self.players[self.current].id.clone()),
            players,
            deck_size: self.deck.len(),
            current_action,
            block,
            challenge,
            is_your_turn,
            available_actions,
            exchange_options,
            must_select_influence: self.selecting == Some(seat),
            can_challenge,
            can_block: !block_options.is_empty(),
            block_options,
            can_allow,
            game_log: self.log.tail(LOG_TAIL).to_vec(),
            winner: self.winner.map(|w| WinnerView {
                id: self.players[w].id.clone(),
                name: self.players[w].name.clone(),
            }),
        })
    }

    /// Roles this seat could legally block with right now.
    fn block_options(&self, seat: usize) -> Vec<Role> {
        if !matches!(self.phase, Phase::AwaitingChallenge | Phase::AwaitingBlock) {
            return Vec::new();
        }
        if !self.responders.is_pending(seat) {
            return Vec::new();
        }
        match self.action.as_ref() {
            Some(turn) if turn.action.blockable() => {
                if turn.action == Action::ForeignAid || turn.target == Some(seat) {
                    turn.action.blocked_by().to_vec()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    /// What the current player may declare, in catalog order. A ten-coin
    /// hand collapses the menu to Coup alone.
    fn available_actions(&self, seat: usize) -> Vec<ActionOption> {
        let player = &self.players[seat];
        if player.is_eliminated() {
            return Vec::new();
        }
        let option = |action: Action, targets: Vec<TargetRef>| ActionOption {
            action,
            cost: action.cost(),
            claims: action.claims(),
            available_targets: targets,
        };
        let attackable: Vec<TargetRef> = self.target_refs(seat, false);
        if player.coins >= MUST_COUP_AT {
            return vec![option(Action::Coup, attackable)];
        }

        let mut actions = vec![
            option(Action::Income, Vec::new()),
            option(Action::ForeignAid, Vec::new()),
        ];
        if player.coins >= Action::Coup.cost() {
            actions.push(option(Action::Coup, attackable.clone()));
        }
        actions.push(option(Action::Tax, Vec::new()));
        if player.coins >= Action::Assassinate.cost() {
            actions.push(option(Action::Assassinate, attackable));
        }
        let steal_targets = self.target_refs(seat, true);
        if !steal_targets.is_empty() {
            actions.push(option(Action::Steal, steal_targets));
        }
        actions.push(option(Action::Exchange, Vec::new()));
        actions
    }

    fn target_refs(&self, seat: usize, need_coins: bool) -> Vec<TargetRef> {
        self.players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != seat && !p.is_eliminated() && (!need_coins || p.coins > 0))
            .map(|(_, p)| TargetRef { id: p.id.clone(), name: p.name.clone() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::ROLES;
    use crate::testutil::*;

    /// The response flags must agree with what the engine would accept.
    fn assert_flags_match(game: &Game) {
        for p in game.players() {
            let view = game.view_for(&p.id).unwrap();

            let challenge_ok = {
                let mut probe = game.clone();
                probe.challenge(&p.id).is_ok()
            };
            assert_eq!(view.can_challenge, challenge_ok, "challenge flag for {}", p.id);

            let allow_ok = {
                let mut probe = game.clone();
                probe.allow(&p.id).is_ok()
            };
            assert_eq!(view.can_allow, allow_ok, "allow flag for {}", p.id);

            for role in ROLES {
                let block_ok = {
                    let mut probe = game.clone();
                    probe.block(&p.id, role).is_ok()
                };
                assert_eq!(
                    view.block_options.contains(&role),
                    block_ok,
                    "block flag for {} with {role}",
                    p.id
                );
            }

            let select_ok = {
                let mut probe = game.clone();
                let card = probe.players[probe.seat_of(&p.id).unwrap()]
                    .hand
                    .iter()
                    .position(|c| !c.revealed);
                match card {
                    Some(idx) => probe.select_influence(&p.id, idx).is_ok(),
                    None => false,
                }
            };
            assert_eq!(view.must_select_influence, select_ok, "select flag for {}", p.id);
        }
    }

    #[test]
    fn hidden_hands_are_redacted() {
        let game = fresh_game(3);
        let viewer = game.players()[0].id.clone();
        let view = game.view_for(&viewer).unwrap();

        for seat in &view.players {
            if seat.id == viewer {
                let hand = seat.influence.as_ref().unwrap();
                assert_eq!(hand.len(), 2);
            } else {
                assert!(seat.influence.is_none());
                assert_eq!(seat.influence_count, 2);
                assert!(seat.revealed_cards.is_empty());
            }
        }

        // the serialized form drops the influence key entirely
        let json = serde_json::to_value(&view).unwrap();
        let others: Vec<_> = json["players"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|p| p["id"] != serde_json::Value::String(viewer.clone()))
            .collect();
        assert!(!others.is_empty());
        for other in others {
            assert!(other.get("influence").is_none());
        }
    }

    #[test]
    fn revealed_cards_become_public() {
        let mut game = fresh_game(3);
        let victim = game.players()[1].id.clone();
        let role = game.players[1].hand[0].role;
        game.players[1].reveal(0);

        let viewer = game.players()[0].id.clone();
        let view = game.view_for(&viewer).unwrap();
        let seat = view.players.iter().find(|s| s.id == victim).unwrap();
        assert_eq!(seat.revealed_cards, vec![role]);
        assert_eq!(seat.influence_count, 1);
        assert!(!seat.is_eliminated);
    }

    #[test]
    fn wire_keys_follow_the_client_vocabulary() {
        let game = fresh_game(3);
        let viewer = game.players()[0].id.clone();
        let json = serde_json::to_value(game.view_for(&viewer).unwrap()).unwrap();

        assert_eq!(json["phase"], "actionDeclaration");
        assert!(json.get("turnNumber").is_some());
        assert!(json.get("currentPlayerId").is_some());
        assert!(json.get("deckSize").is_some());
        assert!(json.get("gameLog").is_some());
        let entry = &json["gameLog"][0];
        assert!(entry.get("type").is_some());
        assert!(entry.get("message").is_some());
    }

    #[test]
    fn menu_is_cut_down_to_coup_at_ten_coins() {
        let mut game = fresh_game(3);
        let actor = turn_holder(&game);
        let seat = game.seat_of(&actor).unwrap();
        game.players[seat].coins = 10;

        let view = game.view_for(&actor).unwrap();
        assert_eq!(view.available_actions.len(), 1);
        let only = &view.available_actions[0];
        assert_eq!(only.action, Action::Coup);
        assert_eq!(only.cost, 7);
        assert_eq!(only.available_targets.len(), 2);
    }

    #[test]
    fn steal_is_not_offered_when_no_target_has_coins() {
        let mut game = fresh_game(3);
        let actor = turn_holder(&game);
        for p in &mut game.players {
            if p.id != actor {
                p.coins = 0;
            }
        }
        let view = game.view_for(&actor).unwrap();
        assert!(view.available_actions.iter().all(|o| o.action != Action::Steal));
        // and the menu is only offered to the player whose turn it is
        let other = game.players().iter().find(|p| p.id != actor).unwrap().id.clone();
        assert!(game.view_for(&other).unwrap().available_actions.is_empty());
    }

    #[test]
    fn flags_track_legality_through_a_contested_steal() {
        let mut game = fresh_game(4);
        assert_flags_match(&game);

        let actor = turn_holder(&game);
        let victim = game.players().iter().find(|p| p.id != actor).unwrap().id.clone();
        game.declare_action(&actor, Action::Steal, Some(&victim)).unwrap();
        assert_flags_match(&game); // challenge window

        everyone_allows(&mut game);
        assert_flags_match(&game); // block window, target only

        game.block(&victim, Role::Captain).unwrap();
        assert_flags_match(&game); // block challenge window

        game.challenge(&actor).unwrap();
        assert_flags_match(&game); // someone is selecting influence
    }

    #[test]
    fn flags_track_legality_in_a_foreign_aid_window() {
        let mut game = fresh_game(3);
        let actor = turn_holder(&game);
        game.declare_action(&actor, Action::ForeignAid, None).unwrap();
        assert_flags_match(&game);

        // one allow later the remaining responder still matches
        let responder = game.players[game.responders.eligible[0]].id.clone();
        game.allow(&responder).unwrap();
        assert_flags_match(&game);
    }

    #[test]
    fn exchange_prompt_shows_hand_and_draws() {
        let mut game = fresh_game(3);
        let actor = turn_holder(&game);
        game.declare_action(&actor, Action::Exchange, None).unwrap();
        everyone_allows(&mut game);

        let view = game.view_for(&actor).unwrap();
        let prompt = view.exchange_options.unwrap();
        assert_eq!(prompt.must_select, 2);
        assert_eq!(prompt.hand_cards.len(), 2);
        assert_eq!(prompt.drawn_cards.len(), 2);
        assert_eq!(prompt.drawn_cards, game.exchange_pool);

        // nobody else gets the prompt
        let other = game.players().iter().find(|p| p.id != actor).unwrap().id.clone();
        assert!(game.view_for(&other).unwrap().exchange_options.is_none());
    }

    #[test]
    fn game_over_view_names_the_winner_and_stops_the_clock() {
        let mut game = fresh_game(2);
        let actor = turn_holder(&game);
        let other = game.players().iter().find(|p| p.id != actor).unwrap().id.clone();
        game.resign(&other).unwrap();

        let view = game.view_for(&actor).unwrap();
        assert_eq!(view.phase, Phase::GameOver);
        assert!(view.current_player_id.is_none());
        assert!(!view.is_your_turn);
        assert!(view.available_actions.is_empty());
        assert_eq!(view.winner.unwrap().id, actor);
    }
}
