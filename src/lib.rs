//! yt-focus library
//!
//! Focus/break timer, YouTube playlist ingestion, player control and a
//! task list, behind one application controller.

pub mod app;
pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;
