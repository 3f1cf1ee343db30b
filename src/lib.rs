// Public API for integration tests and the terminal front end

pub mod cli;
pub mod config;
pub mod countdown;
pub mod game;
pub mod handlers;
pub mod haptics;
pub mod prefs;
pub mod protocol;
pub mod setup;
pub mod state;
pub mod types;
pub mod words;
