// File: livebot-common/src/models/mod.rs
pub mod stream;

pub use stream::{StreamSnapshot, StreamsResponse};
