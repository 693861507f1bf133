use bevy::prelude::*;

use poke_a_bone::run_game;

/// Main application function
fn main() -> AppExit {
    run_game(|score: u32| {
        println!(
            "{} {}",
            console::style("Final Score:").bold().green(),
            console::style(score).bold()
        );
    })
}
