// File: src/tasks/mod.rs

pub mod live_check;

pub use live_check::{spawn_live_check_task, LiveCheck, TickOutcome};
