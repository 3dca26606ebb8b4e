//! Terminal front end: commands, rendering and the console player

pub mod commands;
pub mod console_player;
pub mod render;
