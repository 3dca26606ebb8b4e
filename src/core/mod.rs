//! Timer, playlist ingestion, player control and tasks

pub mod ingest;
pub mod player;
pub mod tasks;
pub mod timer;
pub mod youtube;
