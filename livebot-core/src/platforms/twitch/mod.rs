// File: src/platforms/twitch/mod.rs

pub mod auth;
pub mod client;
pub mod requests;

pub use auth::TwitchAppAuthenticator;
pub use client::TwitchHelixClient;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";
pub const OAUTH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
