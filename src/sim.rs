//! Random playout driver. Every move is picked from what the projected
//! views say is legal, so a playout exercises exactly the surface a
//! client sees: if the views and the intent methods ever disagree, a
//! playout trips over it.

use rand::Rng;

use crate::game::Game;
use crate::player::PlayerId;
use crate::registry::Intent;

/// Every intent any player could legally submit right now, gathered
/// from their projections alone.
pub fn legal_intents(game: &Game) -> Vec<(PlayerId, Intent)> {
    let mut intents = Vec::new();
    for p in game.players() {
        let view = game.view_for(&p.id).expect("seated player has a view");

        for option in &view.available_actions {
            if option.action.requires_target() {
                for target in &option.available_targets {
                    intents.push((
                        p.id.clone(),
                        Intent::DeclareAction {
                            action: option.action,
                            target: Some(target.id.clone()),
                        },
                    ));
                }
            } else {
                intents.push((
                    p.id.clone(),
                    Intent::DeclareAction { action: option.action, target: None },
                ));
            }
        }

        if view.can_challenge {
            intents.push((p.id.clone(), Intent::Challenge));
        }
        for &role in &view.block_options {
            intents.push((p.id.clone(), Intent::Block { claimed_card: role }));
        }
        if view.can_allow {
            intents.push((p.id.clone(), Intent::Allow));
        }

        if view.must_select_influence {
            let hand = view
                .players
                .iter()
                .find(|s| s.id == p.id)
                .and_then(|s| s.influence.as_ref())
                .expect("selecting player sees their own hand");
            for (idx, card) in hand.iter().enumerate() {
                if !card.revealed {
                    intents.push((p.id.clone(), Intent::SelectInfluence { card_index: idx }));
                }
            }
        }

        if let Some(prompt) = &view.exchange_options {
            let pool = prompt.hand_cards.len() + prompt.drawn_cards.len();
            for keep in keep_sets(pool, prompt.must_select) {
                intents.push((p.id.clone(), Intent::ExchangeCards { selected_cards: keep }));
            }
        }
    }
    intents
}

/// Every way to keep `choose` indices out of `pool`, in index order.
fn keep_sets(pool: usize, choose: usize) -> Vec<Vec<usize>> {
    fn recurse(pool: usize, choose: usize, from: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if prefix.len() == choose {
            out.push(prefix.clone());
            return;
        }
        for idx in from..pool {
            prefix.push(idx);
            recurse(pool, choose, idx + 1, prefix, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    recurse(pool, choose, 0, &mut Vec::new(), &mut out);
    out
}

/// Apply one uniformly random legal intent. Returns false once the
/// game is over.
pub fn step<R: Rng>(game: &mut Game, rng: &mut R) -> bool {
    if game.is_over() {
        return false;
    }
    let mut intents = legal_intents(game);
    assert!(!intents.is_empty(), "live game offered no legal intent");
    let pick = rng.gen_range(0..intents.len());
    let (player, intent) = intents.swap_remove(pick);
    game.apply(&player, &intent)
        .expect("the view offered an intent the engine rejected");
    true
}

/// Play random moves until somebody wins.
pub fn playout<R: Rng>(game: &mut Game, rng: &mut R) -> PlayerId {
    while step(game, rng) {}
    game.winner().expect("finished game has a winner").id.clone()
}
