//! Async client for the [Source/GoldSrc A2S server-query protocol](https://developer.valvesoftware.com/wiki/Server_queries).
//!
//! Build a [`QueryContext`] and call its `query_*` methods; each opens its own socket,
//! reassembles the response (handling multi-packet and compressed replies transparently), and
//! decodes it into a typed value.

pub mod appids;
pub mod assembler;
pub mod buffer;
pub mod context;
pub mod decode;
pub mod engine;
pub mod error;
pub mod ports;
pub mod request;
pub mod response;
pub mod wire;

pub use context::{InfoVariant, QueryContext, Timed};
pub use error::{A2SError, Result};
pub use wire::Engine;
