pub mod metrics;
pub mod origin;
pub mod request_id;
pub mod security_headers;
