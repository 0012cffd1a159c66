// File: src/platforms/mod.rs

pub mod discord;
pub mod twitch;
