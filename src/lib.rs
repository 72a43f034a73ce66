//! httpspan - Incremental HTTP/1.x Parser
//!
//! Core library: a resumable, callback-driven parser that reports zero-copy
//! spans and validates message framing.

pub mod config;
pub mod http;

pub use config::Settings;
pub use http::error::{ErrorKind, ParseError};
pub use http::flags::Flags;
pub use http::handler::Handler;
pub use http::message::{MessageHead, MessageKind, Strictness, Version};
pub use http::parser::{Outcome, Parser};
pub use http::span::{Span, SpanKind};
