// File: src/services/mod.rs

pub mod notifier;
pub mod token_manager;

pub use notifier::StreamNotifier;
pub use token_manager::TokenManager;
