// File: livebot-common/src/traits/mod.rs
pub mod notify_traits;
pub mod stream_traits;

pub use notify_traits::{ChannelSink, LiveNotifier, NotifyOutcome};
pub use stream_traits::{StreamsApi, TokenSource};
