//! Request frame construction.
//!
//! A request frame is: 4-byte split-mode header (-1) ++ 1-byte message header ++
//! kind-specific payload.

use crate::buffer::ByteBuffer;

/// Split-mode header value for a single, unfragmented packet.
pub const IS_NOT_SPLIT: i32 = -1;
/// Split-mode header value for a fragment of a multi-packet response.
pub const IS_SPLIT: i32 = -2;
/// Challenge value that asks the server to hand back a fresh challenge.
pub const RECEIVE_A_CHALLENGE: i32 = -1;

const INFO_PAYLOAD: &str = "Source Engine Query";

/// Which A2S request is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Info,
    Player,
    Rules,
    Ping,
    GetChallenge,
}

impl RequestKind {
    /// The one-byte message header for this request kind.
    pub fn message_header(self) -> u8 {
        match self {
            RequestKind::Info => b'T',
            RequestKind::Player => b'U',
            RequestKind::Rules => b'V',
            RequestKind::Ping => b'i',
            RequestKind::GetChallenge => b'W',
        }
    }

    /// Whether this request kind requires a challenge round-trip.
    pub fn needs_challenge(self) -> bool {
        matches!(self, RequestKind::Player | RequestKind::Rules)
    }
}

/// An encoded A2S request, ready to be sent as one or more UDP datagrams.
#[derive(Debug, Clone)]
pub struct Request {
    kind: RequestKind,
    bytes: Vec<u8>,
}

impl Request {
    fn build(kind: RequestKind, write_payload: impl FnOnce(&mut ByteBuffer)) -> Self {
        let mut buf = ByteBuffer::new();
        buf.write_long(IS_NOT_SPLIT);
        buf.write_byte(kind.message_header());
        write_payload(&mut buf);

        Request {
            kind,
            bytes: buf.into_vec(),
        }
    }

    pub fn info() -> Self {
        Self::build(RequestKind::Info, |buf| buf.write_string(INFO_PAYLOAD))
    }

    /// `challenge` is `None` for the initial "please give me a challenge" request.
    pub fn player(challenge: Option<i32>) -> Self {
        Self::build(RequestKind::Player, |buf| {
            buf.write_long(challenge.unwrap_or(RECEIVE_A_CHALLENGE))
        })
    }

    pub fn rules(challenge: Option<i32>) -> Self {
        Self::build(RequestKind::Rules, |buf| {
            buf.write_long(challenge.unwrap_or(RECEIVE_A_CHALLENGE))
        })
    }

    pub fn ping() -> Self {
        Self::build(RequestKind::Ping, |_| {})
    }

    pub fn get_challenge() -> Self {
        Self::build(RequestKind::GetChallenge, |_| {})
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Requests are always a single packet for the kinds this crate builds, but exposing an
/// iterator of wire-ready parts keeps the call site (`for part in &request { socket.send(part) }`)
/// stable if a future request kind ever needs splitting.
impl<'a> IntoIterator for &'a Request {
    type Item = &'a [u8];
    type IntoIter = std::iter::Once<&'a [u8]>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self.as_bytes())
    }
}
