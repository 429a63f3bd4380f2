//! Output for the `show` subcommand.

pub mod json;
pub mod table;

use crate::station::Snapshot;

pub fn print(snapshot: Option<&Snapshot>, json_output: bool) {
    match snapshot {
        Some(snapshot) if json_output => println!("{}", json::render(snapshot)),
        Some(snapshot) => print!("{}", table::render(snapshot)),
        None => println!("No snapshot stored yet. Run 'fuelcheck check' to create one."),
    }
}
