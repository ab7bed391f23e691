// Each module handles a group of CLI subcommands. main.rs parses arguments,
// loads the floor and dispatches here.

pub mod features;
pub mod graph;
pub mod route;
