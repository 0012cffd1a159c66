// src/lib.rs

pub mod app;
pub mod config;
pub mod http;
pub mod platforms;
pub mod services;
pub mod tasks;

pub use config::BotConfig;
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use livebot_common::error::Error;
