//! Demo driver: plays one random four-player game to completion,
//! narrates it, and prints the winner's final projection as JSON.
//! Pass a number to replay a specific seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use coup_engine::{sim, Game};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| rand::thread_rng().gen());
    println!("seed: {seed}");

    let roster = [("p1", "Alice"), ("p2", "Bob"), ("p3", "Carol"), ("p4", "Dave")];
    let mut game = Game::new("demo", &roster, seed).expect("valid roster");
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let winner = sim::playout(&mut game, &mut rng);

    for event in game.events().iter() {
        println!("T{:<3} {}", event.turn, event.message);
    }

    let view = game.view_for(&winner).expect("winner is seated");
    println!("{}", serde_json::to_string_pretty(&view).expect("view serializes"));
}
