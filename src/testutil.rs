//! Shared helpers for in-crate tests.

use crate::game::Game;
use crate::player::Card;
use crate::role::{Role, DECK_SIZE, ROLES};

pub(crate) fn fresh_game(n: usize) -> Game {
    let names = [
        ("p1", "Alice"),
        ("p2", "Bob"),
        ("p3", "Carol"),
        ("p4", "Dave"),
        ("p5", "Eve"),
        ("p6", "Frank"),
    ];
    Game::new("g1", &names[..n], 42).unwrap()
}

/// id of the player whose turn it is.
pub(crate) fn turn_holder(game: &Game) -> String {
    game.current_player().id.clone()
}

/// Force a seat's hand and rebuild the deck so the fifteen-card census
/// still holds.
pub(crate) fn rig_hand(game: &mut Game, seat: usize, roles: [Role; 2]) {
    game.players[seat].hand[0] = Card::hidden(roles[0]);
    game.players[seat].hand[1] = Card::hidden(roles[1]);
    let held: usize =
        game.players.iter().map(|p| p.hand.len()).sum::<usize>() + game.exchange_pool.len();
    while !game.deck.is_empty() {
        game.deck.draw();
    }
    let mut i = 0;
    while game.deck.len() + held < DECK_SIZE {
        game.deck.put_back(ROLES[i % ROLES.len()]);
        i += 1;
    }
    game.debug_census();
}

/// Every pending responder allows, closing the current window.
pub(crate) fn everyone_allows(game: &mut Game) {
    let pending: Vec<String> = game
        .responders
        .eligible
        .iter()
        .filter(|&&s| !game.responders.has_allowed(s))
        .map(|&s| game.players[s].id.clone())
        .collect();
    for id in pending {
        game.allow(&id).unwrap();
    }
}

pub(crate) fn census_total(game: &Game) -> usize {
    let hands: usize = game.players.iter().map(|p| p.hand.len()).sum();
    game.deck.len() + game.exchange_pool.len() + hands
}
