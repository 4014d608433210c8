extern crate othello_player;

use othello_player::board::{Board, Move, Side};
use othello_player::boards::othello::OthelloBoard;
use othello_player::player::Player;
use othello_player::random::RandomPlayer;
use std::time::Instant;

const CLOCK_MS: i64 = 3_000;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    // The engine plays white against a random mover.
    let mut engine = Player::new(Side::White);
    let mut opponent = RandomPlayer::new(Side::Black);
    let mut board = OthelloBoard::default();
    let mut clock = CLOCK_MS;
    let mut to_move = Side::Black;
    let mut last_move: Option<Move> = None;

    while !board.is_done() {
        let mv = if to_move == engine.side() {
            let started = Instant::now();
            let mv = match engine.decide_move(last_move, clock) {
                Ok(mv) => mv,
                Err(err) => {
                    eprintln!("engine rejected the game state: {err}");
                    std::process::exit(1);
                }
            };
            clock -= started.elapsed().as_millis() as i64;
            if clock < 0 {
                log::warn!("engine overran its clock by {} ms", -clock);
                clock = 0;
            }
            mv
        } else {
            opponent.decide_move(last_move)
        };

        match mv {
            Some(mv) => println!("{to_move}: {mv}"),
            None => println!("{to_move}: pass"),
        }
        board.do_move(mv, to_move);
        last_move = mv;
        to_move = to_move.other();
    }

    println!("{board}");
    println!(
        "Final score: black {} - white {} ({clock} ms left on the engine's clock)",
        board.count_black(),
        board.count_white()
    );
}
