// File: src/platforms/discord/mod.rs

pub mod runtime;

pub use runtime::DiscordPlatform;
