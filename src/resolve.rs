//! Turn resolution: what happens between an accepted intent and the next
//! stable phase. Everything here is infallible; intents validate first.

use crate::action::Action;
use crate::events::EventCategory;
use crate::game::{Game, Phase, Responders, MUST_COUP_AT};
use crate::role::DECK_SIZE;

impl Game {
    /// Open a response window. The responder set is computed once, here;
    /// a window nobody can answer closes on the spot.
    pub(crate) fn enter_response_phase(&mut self, phase: Phase) {
        let eligible = self.eligible_responders(phase);
        self.phase = phase;
        self.responders = Responders::freeze(eligible);
        if self.responders.all_done() {
            self.advance_after_responses();
        }
    }

    pub(crate) fn eligible_responders(&self, phase: Phase) -> Vec<usize> {
        let turn = self.action.as_ref().expect("response window without an action");
        match phase {
            Phase::AwaitingChallenge => self.living_except(turn.actor),
            Phase::AwaitingBlock => {
                if turn.action == Action::ForeignAid {
                    self.living_except(turn.actor)
                } else {
                    // the only other blockable actions are targeted
                    let target = turn.target.expect("blockable action without a target");
                    if self.players[target].is_eliminated() {
                        Vec::new()
                    } else {
                        vec![target]
                    }
                }
            }
            Phase::AwaitingBlockChallenge => {
                let blocker = self.block.as_ref().expect("block challenge without a block").blocker;
                self.living_except(blocker)
            }
            other => unreachable!("{other} is not a response window"),
        }
    }

    fn living_except(&self, skip: usize) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(seat, p)| *seat != skip && !p.is_eliminated())
            .map(|(seat, _)| seat)
            .collect()
    }

    /// The window closed with nobody contesting.
    pub(crate) fn advance_after_responses(&mut self) {
        match self.phase {
            Phase::AwaitingChallenge => {
                let action = self.action.as_ref().expect("challenge window without an action").action;
                if action.blockable() {
                    self.enter_response_phase(Phase::AwaitingBlock);
                } else {
                    self.resolve_action();
                }
            }
            Phase::AwaitingBlock => self.resolve_action(),
            Phase::AwaitingBlockChallenge => {
                self.add_log(EventCategory::Block, "Block successful! Action cancelled.");
                self.next_turn();
            }
            other => unreachable!("{other} is not a response window"),
        }
    }

    /// Park the seat for an influence choice, or queue it behind one
    /// already in progress.
    pub(crate) fn queue_influence_loss(&mut self, seat: usize) {
        if self.selecting.is_none() {
            self.selecting = Some(seat);
        } else {
            self.pending_losses.push_back(seat);
        }
    }

    /// Where the turn goes once an owed influence loss has been paid.
    pub(crate) fn route_after_influence_loss(&mut self) {
        if self.players[self.current].is_eliminated() {
            // the actor resigned while the loss was pending
            self.next_turn();
            return;
        }
        match self.phase {
            Phase::ResolvingChallenge => {
                let succeeded = self
                    .challenge
                    .as_ref()
                    .expect("resolving a challenge that never happened")
                    .succeeded;
                if succeeded {
                    // the claim was a bluff, the action fails outright
                    self.next_turn();
                } else {
                    let action = self.action.as_ref().expect("challenge without an action").action;
                    if action.blockable() {
                        self.enter_response_phase(Phase::AwaitingBlock);
                    } else {
                        self.resolve_action();
                    }
                }
            }
            Phase::ResolvingBlockChallenge => {
                let succeeded = self
                    .challenge
                    .as_ref()
                    .expect("resolving a challenge that never happened")
                    .succeeded;
                if succeeded {
                    // the block was a bluff, the action goes through
                    self.resolve_action();
                } else {
                    self.next_turn();
                }
            }
            Phase::SelectingInfluenceToLose => self.next_turn(),
            other => unreachable!("no influence loss resolves in {other}"),
        }
    }

    /// Apply the action's effect. Reached only after every window has
    /// closed in the action's favor.
    pub(crate) fn resolve_action(&mut self) {
        let turn = self.action.clone().expect("resolving without an action");
        let actor = turn.actor;
        let actor_name = self.players[actor].name.clone();
        match turn.action {
            Action::Income => {
                self.players[actor].gain(1);
                self.add_log(EventCategory::Action, format!("{actor_name} takes 1 coin (Income)"));
                self.next_turn();
            }
            Action::ForeignAid => {
                self.players[actor].gain(2);
                self.add_log(EventCategory::Action, format!("{actor_name} takes 2 coins (Foreign Aid)"));
                self.next_turn();
            }
            Action::Tax => {
                self.players[actor].gain(3);
                self.add_log(EventCategory::Action, format!("{actor_name} takes 3 coins (Tax)"));
                self.next_turn();
            }
            Action::Steal => {
                let target = turn.target.expect("steal without a target");
                if self.players[target].is_eliminated() {
                    // the target fell on the way here, nothing to take
                    self.next_turn();
                    return;
                }
                let stolen = self.players[target].coins.min(2);
                self.players[target].spend(stolen);
                self.players[actor].gain(stolen);
                let target_name = self.players[target].name.clone();
                self.add_log(
                    EventCategory::Action,
                    format!("{actor_name} steals {stolen} coins from {target_name}"),
                );
                self.next_turn();
            }
            Action::Coup | Action::Assassinate => {
                let target = turn.target.expect("attack without a target");
                if self.players[target].is_eliminated() {
                    self.next_turn();
                    return;
                }
                let target_name = self.players[target].name.clone();
                let hit = if turn.action == Action::Coup { "Coup" } else { "Assassination" };
                self.add_log(EventCategory::Action, format!("{actor_name}'s {hit} hits {target_name}"));
                if self.players[target].influence_left() == 1 {
                    let last = self.players[target]
                        .hand
                        .iter()
                        .position(|c| !c.revealed)
                        .expect("one influence left");
                    self.players[target].reveal(last);
                    self.add_log(
                        EventCategory::Elimination,
                        format!("{target_name} loses their last influence and is eliminated!"),
                    );
                    self.next_turn();
                } else {
                    self.selecting = Some(target);
                    self.phase = Phase::SelectingInfluenceToLose;
                    self.responders.clear();
                }
            }
            Action::Exchange => {
                let drawn = [self.deck.draw(), self.deck.draw()];
                self.exchange_pool.extend(drawn);
                self.phase = Phase::ExchangingCards;
                self.responders.clear();
                self.add_log(EventCategory::Action, format!("{actor_name} draws cards for Exchange"));
            }
        }
    }

    /// Tear the turn down and hand the table to the next living player.
    pub(crate) fn next_turn(&mut self) {
        self.action = None;
        self.block = None;
        self.challenge = None;
        self.responders.clear();
        self.selecting = None;
        self.pending_losses.clear();
        if !self.exchange_pool.is_empty() {
            // an abandoned exchange returns its draws
            while let Some(role) = self.exchange_pool.pop() {
                self.deck.put_back(role);
            }
            self.deck.shuffle(&mut self.rng);
        }

        loop {
            self.current = (self.current + 1) % self.players.len();
            if !self.players[self.current].is_eliminated() {
                break;
            }
        }
        self.turn += 1;
        self.phase = Phase::ActionDeclaration;

        self.check_winner();
        if self.phase == Phase::GameOver {
            return;
        }
        if self.players[self.current].coins >= MUST_COUP_AT {
            let name = self.players[self.current].name.clone();
            self.add_log(EventCategory::Warning, format!("{name} has 10+ coins and must Coup!"));
        }
    }

    /// Idempotent: once a winner is on record nothing changes.
    pub(crate) fn check_winner(&mut self) {
        if self.winner.is_some() {
            return;
        }
        let mut living = self.players.iter().enumerate().filter(|(_, p)| !p.is_eliminated());
        let first = living.next();
        if let (Some((seat, _)), None) = (first, living.next()) {
            self.winner = Some(seat);
            self.phase = Phase::GameOver;
            self.selecting = None;
            self.pending_losses.clear();
            self.responders.clear();
            let name = self.players[seat].name.clone();
            self.add_log(EventCategory::Victory, format!("{name} wins the game!"));
        }
    }

    /// Deck + hands + exchange pool always add up to the full deck.
    pub(crate) fn debug_census(&self) {
        let hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        debug_assert_eq!(
            self.deck.len() + self.exchange_pool.len() + hands,
            DECK_SIZE,
            "card census broken"
        );
    }
}
