//! Demo binary: load a position, show legal moves, search for a reply,
//! and play it out a few plies. A plain self-contained driver, no
//! protocol parsing or host integration involved.

use mcu_chess::Engine;

fn main() {
    env_logger::init();

    let mut engine = Engine::new();
    log::info!("starting position: {}", engine.to_position_string());

    let mut buffer = [(0u8, 0u8); 256];
    let count = engine.enumerate_legal_moves(&mut buffer);
    log::info!("{count} pseudo-legal moves available");

    for ply in 0..6 {
        if engine.is_checkmate() {
            log::info!("checkmate after {ply} plies");
            break;
        }
        if engine.is_stalemate() {
            log::info!("stalemate after {ply} plies");
            break;
        }
        match engine.find_best_move(50_000, 4) {
            Some((from, to)) => {
                let played = engine.play_move(from, to);
                log::info!("ply {ply}: {from:#x} -> {to:#x} (played = {played})");
                if !played {
                    break;
                }
            }
            None => {
                log::info!("no move found at ply {ply}");
                break;
            }
        }
    }

    println!("{}", engine.to_position_string());
}
