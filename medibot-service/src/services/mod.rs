pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod relay;
pub mod reply_parser;

pub use relay::MessageRelay;
