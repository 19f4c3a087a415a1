//! Replay Example
//!
//! Replays a planner transcript against a fresh state manager. The transcript
//! holds a `Goal: {...}` block and a numbered plan; both are fed through the
//! manager exactly as a live planner response would be.
//!
//! ```text
//! RUST_LOG=info cargo run --example replay -- [transcript.txt] [catalog.toml]
//! ```
//!
//! Without arguments a built-in transcript runs against the home catalog.

use std::env;
use std::fs;

use esmrs::plan::parse_plan_steps;
use esmrs::{Catalog, Result, StateManager};

const TRANSCRIPT: &str = r#"I will bring a cup of milk to the user.
Goal: {target_location: "living room", items_needed: {"cup": 1, "milk": 1}}

1. go to the kitchen shelf
2. pick up the cup
3. go to the refrigerator
4. open the refrigerator
5. take milk from refrigerator
6. close the refrigerator
7. go to the living room
8. hand over cup to user
9. hand over milk to user
10. done
"#;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = env::args().skip(1);
    let transcript = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => TRANSCRIPT.to_string(),
    };
    let mut manager = match args.next() {
        Some(path) => StateManager::with_catalog(Catalog::load(path)?)?,
        None => StateManager::new(),
    };

    println!("Replaying planner transcript");
    println!("============================\n");

    if let Err(e) = manager.try_set_task_goal(&transcript) {
        eprintln!("No usable goal in transcript: {}", e);
    } else {
        println!("Goal: {}\n", manager.state().task_goal);
    }

    for response in manager.execute_plan(parse_plan_steps(&transcript)) {
        println!("{}\n", response);
    }

    println!("{}\n", manager.render_prompt_view());
    println!(
        "{} snapshots recorded:\n{}",
        manager.history().len(),
        manager.history_json()?
    );

    Ok(())
}
