//! HTTP/1.x message parsing.
//!
//! This module implements an incremental parser that recognizes requests and
//! responses from an arbitrary sequence of byte buffers and reports what it
//! finds as spans into those buffers.
//!
//! # Architecture
//!
//! - **`parser`**: The state machine driving `consume`/`finish`
//! - **`state`**: Enumerated parser positions
//! - **`framing`**: Streaming interpretation of `Content-Length`,
//!   `Transfer-Encoding` and `Connection`
//! - **`handler`**: The callback trait events are reported to
//! - **`span`**, **`flags`**, **`error`**, **`message`**: Shared value types
//! - **`request`**, **`response`**: Method and status tables, owned messages
//! - **`collector`**, **`trace`**: Ready-made handlers
//!
//! # Message State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Start    │ ← Skip empty lines
//!        └──────┬──────┘
//!               │ First byte
//!               ▼
//!        ┌──────────────────┐
//!        │   Start-line     │ ← Method/URL/version or version/status/reason
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Headers      │ ← Field/value spans, framing flags
//!        └──────┬───────────┘
//!               │ Empty line: framing resolved
//!               ├─ Content-Length → Body
//!               ├─ chunked → Chunks → Trailers
//!               ├─ response without framing → Body until EOF
//!               └─ no body
//!               ▼
//!        ┌──────────────────┐
//!        │      Done        │ ← Pause on upgrade, restart or reject
//!        └──────────────────┘
//! ```

pub(crate) mod chars;
pub mod collector;
pub mod error;
pub mod flags;
pub(crate) mod framing;
pub mod handler;
pub mod message;
pub mod parser;
pub mod request;
pub mod response;
pub mod span;
pub(crate) mod state;
pub mod trace;
