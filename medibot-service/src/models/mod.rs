pub mod message;

pub use message::{ClassifiedReply, ConditionLevel, IncomingRequest, FALLBACK_REPLY};
