//! Checkpoint and rollback with the state store.
//!
//! Run with: cargo run --example state_checkpoints

use g2c::GameState;
use serde_json::json;

fn main() {
    let mut state = GameState::new();
    state.set("level", 1);
    state.set("inventory", json!(["sword"]));
    state.save_checkpoint();
    println!("Checkpoint 0:\n{}\n", state.to_json());

    state.set("level", 2);
    state.set("inventory", json!(["sword", "shield"]));
    state.save_checkpoint();
    println!("Checkpoint 1:\n{}\n", state.to_json());

    state.set("level", 3);
    state.remove("inventory");
    println!("Live state:\n{}\n", state.to_json());

    state.restore_checkpoint();
    println!("After restore_checkpoint():\n{}\n", state.to_json());

    if let Err(e) = state.restore_checkpoint_at(0) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!("After restore_checkpoint_at(0):\n{}\n", state.to_json());

    match state.restore_checkpoint_at(5) {
        Ok(()) => println!("Unexpectedly restored checkpoint 5"),
        Err(e) => println!("restore_checkpoint_at(5) refused: {}", e),
    }
    println!("{} checkpoints kept", state.checkpoint_count());
}
