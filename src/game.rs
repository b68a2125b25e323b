use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use crate::action::Action;
use crate::deck::Deck;
use crate::error::GameError;
use crate::events::{EventCategory, EventLog};
use crate::player::{Card, Player};
use crate::role::Role;

/// Identifier the registry hands out when a session is created.
pub type SessionId = String;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// At this many coins the only legal declaration is Coup.
pub const MUST_COUP_AT: u8 = 10;

/// Where the turn currently sits. Serialized names are the wire vocabulary
/// clients already speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    ActionDeclaration,
    AwaitingChallenge,
    AwaitingBlock,
    AwaitingBlockChallenge,
    ResolvingChallenge,
    ResolvingBlockChallenge,
    SelectingInfluenceToLose,
    ExchangingCards,
    GameOver,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::ActionDeclaration => "actionDeclaration",
            Phase::AwaitingChallenge => "awaitingChallenge",
            Phase::AwaitingBlock => "awaitingBlock",
            Phase::AwaitingBlockChallenge => "awaitingBlockChallenge",
            Phase::ResolvingChallenge => "resolvingChallenge",
            Phase::ResolvingBlockChallenge => "resolvingBlockChallenge",
            Phase::SelectingInfluenceToLose => "selectingInfluenceToLose",
            Phase::ExchangingCards => "exchangingCards",
            Phase::GameOver => "gameOver",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The declaration being played out this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAction {
    pub action: Action,
    pub actor: usize,
    pub target: Option<usize>,
}

/// A block claim sitting on top of the declared action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnBlock {
    pub blocker: usize,
    pub claimed: Role,
}

/// Outcome of the hidden-hand inspection. `succeeded` means the claim was
/// a bluff and the challenger won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnChallenge {
    pub challenger: usize,
    pub challenged: usize,
    pub loser: usize,
    pub succeeded: bool,
    pub proven: Option<Role>,
}

/// Who may still respond in the open window. `eligible` is frozen when the
/// phase is entered and only ever shrinks (by resignation); joining late is
/// impossible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Responders {
    pub eligible: Vec<usize>,
    pub allowed: Vec<usize>,
}

impl Responders {
    pub(crate) fn freeze(eligible: Vec<usize>) -> Self {
        Self { eligible, allowed: Vec::new() }
    }

    pub fn is_eligible(&self, seat: usize) -> bool {
        self.eligible.contains(&seat)
    }

    pub fn has_allowed(&self, seat: usize) -> bool {
        self.allowed.contains(&seat)
    }

    /// Eligible and not yet on record as allowing.
    pub fn is_pending(&self, seat: usize) -> bool {
        self.is_eligible(seat) && !self.has_allowed(seat)
    }

    pub fn all_done(&self) -> bool {
        self.eligible.iter().all(|&s| self.has_allowed(s))
    }

    pub(crate) fn mark_allowed(&mut self, seat: usize) {
        self.allowed.push(seat);
    }

    pub(crate) fn remove(&mut self, seat: usize) {
        self.eligible.retain(|&s| s != seat);
        self.allowed.retain(|&s| s != seat);
    }

    pub(crate) fn clear(&mut self) {
        self.eligible.clear();
        self.allowed.clear();
    }
}

/// One table of Coup. All mutation comes in through the intent methods,
/// which validate fully before touching anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: SessionId,
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) current: usize,
    pub(crate) turn: u32,
    pub(crate) phase: Phase,
    pub(crate) action: Option<TurnAction>,
    pub(crate) block: Option<TurnBlock>,
    pub(crate) challenge: Option<TurnChallenge>,
    pub(crate) responders: Responders,
    pub(crate) selecting: Option<usize>,
    pub(crate) pending_losses: VecDeque<usize>,
    pub(crate) exchange_pool: Vec<Role>,
    pub(crate) winner: Option<usize>,
    pub(crate) log: EventLog,
    pub(crate) rng: Pcg64Mcg,
}

impl Game {
    /// Deal a fresh table. Seating order is randomized, so the roster order
    /// carries no advantage.
    pub fn new(id: impl Into<SessionId>, roster: &[(&str, &str)], seed: u64) -> Result<Game, GameError> {
        if roster.len() < MIN_PLAYERS || roster.len() > MAX_PLAYERS {
            return Err(GameError::InvalidPlayerCount(roster.len()));
        }
        for (i, (id, _)) in roster.iter().enumerate() {
            if roster[..i].iter().any(|(other, _)| other == id) {
                return Err(GameError::DuplicatePlayer);
            }
        }

        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let mut players: Vec<Player> =
            roster.iter().map(|(id, name)| Player::new(*id, *name)).collect();
        {
            use rand::seq::SliceRandom;
            players.shuffle(&mut rng);
        }

        let mut deck = Deck::standard();
        deck.shuffle(&mut rng);
        for player in &mut players {
            player.hand.push(Card::hidden(deck.draw()));
            player.hand.push(Card::hidden(deck.draw()));
        }

        let mut game = Game {
            id: id.into(),
            players,
            deck,
            current: 0,
            turn: 1,
            phase: Phase::ActionDeclaration,
            action: None,
            block: None,
            challenge: None,
            responders: Responders::default(),
            selecting: None,
            pending_losses: VecDeque::new(),
            exchange_pool: Vec::new(),
            winner: None,
            log: EventLog::new(),
            rng,
        };
        let count = game.players.len();
        game.add_log(EventCategory::Info, format!("Game started with {count} players"));
        game.debug_census();
        Ok(game)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|seat| &self.players[seat])
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub(crate) fn seat_of(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    pub(crate) fn add_log(&mut self, category: EventCategory, message: impl Into<String>) {
        self.log.record(self.turn, category, message);
    }

    fn known_live_seat(&self, player: &str) -> Result<usize, GameError> {
        let seat = self.seat_of(player).ok_or(GameError::UnknownPlayer)?;
        if self.phase == Phase::GameOver {
            return Err(GameError::GameOver);
        }
        Ok(seat)
    }

    /// Declare the turn's action. Costs are paid here, before any challenge,
    /// and are never refunded.
    pub fn declare_action(
        &mut self,
        player: &str,
        action: Action,
        target: Option<&str>,
    ) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated);
        }
        if self.phase != Phase::ActionDeclaration {
            return Err(GameError::WrongPhase(self.phase));
        }
        if self.players[seat].coins >= MUST_COUP_AT && action != Action::Coup {
            return Err(GameError::MustCoup);
        }
        if self.players[seat].coins < action.cost() {
            return Err(GameError::InsufficientCoins { needed: action.cost() });
        }

        let target_seat = if action.requires_target() {
            let id = target.ok_or(GameError::TargetRequired)?;
            let t = self.seat_of(id).ok_or(GameError::InvalidTarget)?;
            if self.players[t].is_eliminated() {
                return Err(GameError::InvalidTarget);
            }
            if t == seat {
                return Err(GameError::TargetIsSelf);
            }
            if action == Action::Steal && self.players[t].coins == 0 {
                return Err(GameError::TargetHasNoCoins);
            }
            Some(t)
        } else {
            None
        };

        self.players[seat].spend(action.cost());
        self.action = Some(TurnAction { action, actor: seat, target: target_seat });

        let actor = self.players[seat].name.clone();
        let message = match action {
            Action::Income => format!("{actor} takes Income"),
            Action::ForeignAid => format!("{actor} takes Foreign Aid"),
            Action::Coup => {
                let t = &self.players[target_seat.unwrap()].name;
                format!("{actor} launches a Coup against {t}")
            }
            Action::Tax => format!("{actor} claims Duke for Tax"),
            Action::Assassinate => {
                let t = &self.players[target_seat.unwrap()].name;
                format!("{actor} claims Assassin to assassinate {t}")
            }
            Action::Steal => {
                let t = &self.players[target_seat.unwrap()].name;
                format!("{actor} claims Captain to steal from {t}")
            }
            Action::Exchange => format!("{actor} claims Ambassador to Exchange"),
        };
        self.add_log(EventCategory::Action, message);

        if action.challengeable() {
            self.enter_response_phase(Phase::AwaitingChallenge);
        } else if action.blockable() {
            self.enter_response_phase(Phase::AwaitingBlock);
        } else {
            // income and coup have no response window
            self.resolve_action();
        }
        self.debug_census();
        Ok(())
    }

    /// Challenge the standing claim: the action's role in the challenge
    /// window, the block's role in the block-challenge window. The hand is
    /// inspected immediately and the loser owes an influence.
    pub fn challenge(&mut self, player: &str) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated);
        }
        if self.phase != Phase::AwaitingChallenge && self.phase != Phase::AwaitingBlockChallenge {
            return Err(GameError::WrongPhase(self.phase));
        }
        let (challenged, claimed) = match self.phase {
            Phase::AwaitingBlockChallenge => {
                let block = self.block.as_ref().expect("block challenge without a block");
                if seat == block.blocker {
                    return Err(GameError::ChallengeOwnBlock);
                }
                (block.blocker, block.claimed)
            }
            _ => {
                let turn = self.action.as_ref().expect("challenge window without an action");
                if seat == turn.actor {
                    return Err(GameError::ChallengeOwnAction);
                }
                let claimed = turn.action.claims().expect("unclaimed action reached a challenge window");
                (turn.actor, claimed)
            }
        };
        if !self.responders.is_eligible(seat) {
            return Err(GameError::NotEligible);
        }
        if self.responders.has_allowed(seat) {
            return Err(GameError::AlreadyResponded);
        }

        let challenger_name = self.players[seat].name.clone();
        let challenged_name = self.players[challenged].name.clone();
        self.add_log(
            EventCategory::Challenge,
            format!("{challenger_name} challenges {challenged_name}'s {claimed}"),
        );

        let next_phase = if self.phase == Phase::AwaitingBlockChallenge {
            Phase::ResolvingBlockChallenge
        } else {
            Phase::ResolvingChallenge
        };

        if self.players[challenged].has_live(claimed) {
            // honest claim: the shown card cycles through the deck and the
            // slot is refilled in place, face down
            let slot = self.players[challenged]
                .position_of_live(claimed)
                .expect("has_live promised a slot");
            self.deck.put_back(claimed);
            self.deck.shuffle(&mut self.rng);
            let fresh = self.deck.draw();
            self.players[challenged].replace_slot(slot, fresh);

            self.add_log(
                EventCategory::Challenge,
                format!("{challenged_name} reveals {claimed}! {challenger_name} loses influence"),
            );
            self.challenge = Some(TurnChallenge {
                challenger: seat,
                challenged,
                loser: seat,
                succeeded: false,
                proven: Some(claimed),
            });
            self.phase = next_phase;
            self.responders.clear();
            self.queue_influence_loss(seat);
        } else {
            self.add_log(
                EventCategory::Challenge,
                format!("{challenged_name} cannot reveal {claimed}! {challenged_name} loses influence"),
            );
            self.challenge = Some(TurnChallenge {
                challenger: seat,
                challenged,
                loser: challenged,
                succeeded: true,
                proven: None,
            });
            self.phase = next_phase;
            self.responders.clear();
            self.queue_influence_loss(challenged);
        }
        self.debug_census();
        Ok(())
    }

    /// Claim a role to block the declared action. Legal in the block window,
    /// or preemptively while the challenge window is still open.
    pub fn block(&mut self, player: &str, claimed: Role) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated);
        }
        if self.phase != Phase::AwaitingChallenge && self.phase != Phase::AwaitingBlock {
            return Err(GameError::WrongPhase(self.phase));
        }
        let turn = self.action.as_ref().expect("block window without an action");
        let action = turn.action;
        let target = turn.target;
        if !action.blockable() {
            return Err(GameError::NotBlockable);
        }
        if !action.blocked_by().contains(&claimed) {
            return Err(GameError::RoleCannotBlock { role: claimed, action });
        }
        if action.requires_target() && target != Some(seat) {
            return Err(GameError::NotTheTarget);
        }
        if !self.responders.is_eligible(seat) {
            return Err(GameError::NotEligible);
        }
        if self.responders.has_allowed(seat) {
            return Err(GameError::AlreadyResponded);
        }

        self.block = Some(TurnBlock { blocker: seat, claimed });
        let blocker = self.players[seat].name.clone();
        self.add_log(EventCategory::Block, format!("{blocker} claims {claimed} to block"));
        self.enter_response_phase(Phase::AwaitingBlockChallenge);
        self.debug_census();
        Ok(())
    }

    /// Decline to contest. Once every frozen responder has allowed, the
    /// window closes and the turn advances.
    pub fn allow(&mut self, player: &str) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated);
        }
        match self.phase {
            Phase::AwaitingChallenge | Phase::AwaitingBlock | Phase::AwaitingBlockChallenge => {}
            other => return Err(GameError::WrongPhase(other)),
        }
        if !self.responders.is_eligible(seat) {
            return Err(GameError::NotEligible);
        }
        if self.responders.has_allowed(seat) {
            return Err(GameError::AlreadyResponded);
        }

        self.responders.mark_allowed(seat);
        if self.responders.all_done() {
            self.advance_after_responses();
        }
        self.debug_census();
        Ok(())
    }

    /// Choose which influence card to flip after losing a challenge or
    /// taking a Coup or assassination with two cards left.
    pub fn select_influence(&mut self, player: &str, card: usize) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if self.selecting != Some(seat) {
            return Err(GameError::NotSelectingInfluence);
        }
        if card >= self.players[seat].hand.len() || self.players[seat].hand[card].revealed {
            return Err(GameError::InvalidCardSelection);
        }

        let role = self.players[seat].reveal(card);
        let name = self.players[seat].name.clone();
        self.add_log(EventCategory::Influence, format!("{name} loses influence ({role})"));
        if self.players[seat].is_eliminated() {
            self.add_log(EventCategory::Elimination, format!("{name} has been eliminated!"));
        }
        self.selecting = None;

        // a queued second loss keeps the turn parked until it is paid
        while let Some(next) = self.pending_losses.pop_front() {
            if !self.players[next].is_eliminated() {
                self.selecting = Some(next);
                self.debug_census();
                return Ok(());
            }
        }

        self.route_after_influence_loss();
        self.check_winner();
        self.debug_census();
        Ok(())
    }

    /// Keep exactly `influence_left` cards out of hand plus the two drawn.
    /// Indices address the combined pool: live hand cards first, then draws.
    pub fn exchange_cards(&mut self, player: &str, keep: &[usize]) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }
        if self.phase != Phase::ExchangingCards {
            return Err(GameError::WrongPhase(self.phase));
        }
        let expected = self.players[seat].influence_left();
        if keep.len() != expected {
            return Err(GameError::WrongExchangeCount { expected });
        }
        let mut pool = self.players[seat].live_roles();
        pool.extend(self.exchange_pool.iter().copied());
        if keep.iter().any(|&i| i >= pool.len()) {
            return Err(GameError::InvalidCardSelection);
        }
        for (i, &idx) in keep.iter().enumerate() {
            if keep[..i].contains(&idx) {
                return Err(GameError::InvalidCardSelection);
            }
        }

        let kept: Vec<Role> = keep.iter().map(|&i| pool[i]).collect();
        let returned: Vec<Role> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| !keep.contains(i))
            .map(|(_, &role)| role)
            .collect();

        // refill live slots in place so revealed cards keep their positions
        let mut kept_iter = kept.into_iter();
        for card in &mut self.players[seat].hand {
            if !card.revealed {
                card.role = kept_iter.next().expect("kept count matches live slots");
            }
        }
        for role in returned {
            self.deck.put_back(role);
        }
        self.deck.shuffle(&mut self.rng);
        self.exchange_pool.clear();

        let name = self.players[seat].name.clone();
        self.add_log(EventCategory::Action, format!("{name} completes Exchange"));
        self.next_turn();
        self.debug_census();
        Ok(())
    }

    /// Leave the table. All influence is revealed and whatever the player
    /// owed the current turn is normalized away so play never stalls.
    pub fn resign(&mut self, player: &str) -> Result<(), GameError> {
        let seat = self.known_live_seat(player)?;
        if self.players[seat].is_eliminated() {
            return Err(GameError::Eliminated);
        }

        for idx in 0..self.players[seat].hand.len() {
            if !self.players[seat].hand[idx].revealed {
                self.players[seat].reveal(idx);
            }
        }
        let name = self.players[seat].name.clone();
        self.add_log(EventCategory::Elimination, format!("{name} has left the game and is eliminated"));

        self.pending_losses.retain(|&s| s != seat);

        if self.selecting == Some(seat) {
            // their owed loss is moot now; route as if it was just paid
            self.selecting = None;
            let mut advanced = false;
            while let Some(next) = self.pending_losses.pop_front() {
                if !self.players[next].is_eliminated() {
                    self.selecting = Some(next);
                    advanced = true;
                    break;
                }
            }
            if !advanced {
                self.route_after_influence_loss();
            }
        } else if seat == self.current && self.selecting.is_none() {
            // the turn dies with its owner
            self.next_turn();
        } else if seat == self.current {
            // someone else still owes a loss; the routing guard will end
            // the turn once it is paid
        } else if self.phase == Phase::AwaitingBlockChallenge
            && self.block.as_ref().map(|b| b.blocker) == Some(seat)
        {
            // block abandoned, the action goes through
            self.resolve_action();
        } else if self.responders.is_eligible(seat) {
            self.responders.remove(seat);
            if self.responders.all_done() {
                self.advance_after_responses();
            }
        }

        self.check_winner();
        self.debug_census();
        Ok(())
    }
}
