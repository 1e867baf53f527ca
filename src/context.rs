//! Public query surface. A [`QueryContext`] carries the per-target configuration (engine
//! flavor, app id, timeout) explicitly, rather than through ambient/global state, and exposes
//! one async method per A2S query kind.

use std::sync::Once;
use std::time::{Duration, Instant};

use crate::appids::goldsrc_app_uses_source_info;
use crate::assembler::ResponseAssembler;
use crate::buffer::ByteBuffer;
use crate::decode::{decode_challenge, decode_info, decode_info_goldsrc, decode_ping, decode_players, decode_rules};
use crate::engine;
use crate::error::A2SError;
use crate::request::Request;
use crate::response::{ChallengeResponse, InfoGoldSrcResponse, InfoResponse, PingResponse, PlayersResponse, RulesResponse};
use crate::wire::Engine;

/// A decoded value together with the round-trip time of the query that produced it, measured
/// from the first request sent to the moment the response finished assembling.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub round_trip: Duration,
}

/// `A2S_INFO` replies differently depending on engine flavor; which variant comes back is a
/// property of the target server, not something the caller chooses.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoVariant {
    Source(InfoResponse),
    GoldSrc(InfoGoldSrcResponse),
}

/// The default size budget for an outbound request before it would need to be split across
/// multiple datagrams. None of the request kinds this crate builds ever get close to it; it's
/// carried for parity with the upstream protocol client and in case a future request kind
/// needs it.
pub const DEFAULT_SPLIT_SIZE: usize = 0x04E0;

/// Per-target query configuration, threaded explicitly through every call instead of being
/// read from global/thread-local state.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub engine: Engine,
    pub app_id: Option<u32>,
    pub timeout: Duration,
    /// Outbound request split threshold; see [`DEFAULT_SPLIT_SIZE`].
    pub split_size: usize,
    /// Whether to ask the server for a compressed response where the protocol allows it.
    /// Compression is otherwise the server's own decision; this only affects the small number
    /// of app IDs that honor a client preference.
    pub use_compression: bool,
}

impl Default for QueryContext {
    fn default() -> Self {
        QueryContext {
            engine: Engine::Source,
            app_id: None,
            timeout: Duration::from_secs(10),
            split_size: DEFAULT_SPLIT_SIZE,
            use_compression: false,
        }
    }
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_app_id(mut self, app_id: u32) -> Self {
        self.app_id = Some(app_id);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_split_size(mut self, split_size: usize) -> Self {
        self.split_size = split_size;
        self
    }

    pub fn with_compression(mut self, use_compression: bool) -> Self {
        self.use_compression = use_compression;
        self
    }

    fn expected_info_header(&self) -> u8 {
        match self.engine {
            Engine::Source => b'I',
            Engine::GoldSrc => {
                let uses_source_schema = self
                    .app_id
                    .map(goldsrc_app_uses_source_info)
                    .unwrap_or(false);
                if uses_source_schema {
                    b'I'
                } else {
                    b'm'
                }
            }
        }
    }

    pub async fn query_info(&self, addr: &str) -> Result<Timed<InfoVariant>, A2SError> {
        let socket = engine::connect(addr, self.timeout).await?;
        let header = self.expected_info_header();

        // GoldSrc servers may emit extra A2S_INFO_GOLDSRC datagrams before the real reply.
        let assembler = if header == b'm' {
            ResponseAssembler::tolerant(self.engine, self.app_id, header)
        } else {
            ResponseAssembler::new(self.engine, self.app_id, header)
        };

        let (payload, round_trip) = engine::round_trip(&socket, &Request::info(), self.timeout, assembler).await?;
        let mut buf = ByteBuffer::from_bytes(payload);

        let value = if header == b'm' {
            InfoVariant::GoldSrc(decode_info_goldsrc(&mut buf)?)
        } else {
            InfoVariant::Source(decode_info(&mut buf)?)
        };

        Ok(Timed { value, round_trip })
    }

    /// Runs the challenge round-trip shared by `A2S_PLAYER` and `A2S_RULES`: a first exchange
    /// asking for a challenge number, then the real request carrying it. Both hops share a
    /// single wall-clock deadline, per `self.timeout` -- a slow challenge reply eats into the
    /// budget left for the real request rather than each hop getting its own fresh timeout.
    async fn query_with_challenge<T>(
        &self,
        addr: &str,
        build: fn(Option<i32>) -> Request,
        response_header: u8,
        decode: fn(&mut ByteBuffer) -> Result<T, A2SError>,
    ) -> Result<Timed<T>, A2SError> {
        let deadline = Instant::now() + self.timeout;
        let socket = engine::connect(addr, self.timeout).await?;

        let challenge_assembler = ResponseAssembler::new(self.engine, self.app_id, b'A');
        let (challenge_payload, round_trip) = engine::round_trip(
            &socket,
            &build(None),
            deadline.saturating_duration_since(Instant::now()),
            challenge_assembler,
        )
        .await?;
        let mut buf = ByteBuffer::from_bytes(challenge_payload);
        let challenge = decode_challenge(&mut buf)?.challenge;

        let response_assembler = ResponseAssembler::new(self.engine, self.app_id, response_header);
        let (payload, _) = engine::round_trip(
            &socket,
            &build(Some(challenge)),
            deadline.saturating_duration_since(Instant::now()),
            response_assembler,
        )
        .await?;
        let mut buf = ByteBuffer::from_bytes(payload);
        let value = decode(&mut buf)?;

        Ok(Timed { value, round_trip })
    }

    pub async fn query_players(&self, addr: &str) -> Result<Timed<PlayersResponse>, A2SError> {
        self.query_with_challenge(addr, Request::player, b'D', decode_players).await
    }

    pub async fn query_rules(&self, addr: &str) -> Result<Timed<RulesResponse>, A2SError> {
        self.query_with_challenge(addr, Request::rules, b'E', decode_rules).await
    }

    pub async fn query_get_challenge(&self, addr: &str) -> Result<Timed<ChallengeResponse>, A2SError> {
        let socket = engine::connect(addr, self.timeout).await?;
        let assembler = ResponseAssembler::new(self.engine, self.app_id, b'A');
        let (payload, round_trip) =
            engine::round_trip(&socket, &Request::get_challenge(), self.timeout, assembler).await?;
        let mut buf = ByteBuffer::from_bytes(payload);
        Ok(Timed {
            value: decode_challenge(&mut buf)?,
            round_trip,
        })
    }

    /// `A2A_PING` is disabled on most servers still reachable today; this method is kept for
    /// completeness but logs a one-time deprecation warning the first time it's called.
    pub async fn query_ping(&self, addr: &str) -> Result<Timed<PingResponse>, A2SError> {
        warn_ping_deprecated();

        let socket = engine::connect(addr, self.timeout).await?;
        let assembler = ResponseAssembler::new(self.engine, self.app_id, b'j');
        let (payload, round_trip) = engine::round_trip(&socket, &Request::ping(), self.timeout, assembler).await?;
        let mut buf = ByteBuffer::from_bytes(payload);
        Ok(Timed {
            value: decode_ping(&mut buf)?,
            round_trip,
        })
    }
}

static PING_DEPRECATION_WARNED: Once = Once::new();

fn warn_ping_deprecated() {
    PING_DEPRECATION_WARNED.call_once(|| {
        log::warn!("query_ping is deprecated: A2A_PING is disabled on most modern Source/GoldSrc servers");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::UdpSocket;

    async fn loopback_pair() -> (UdpSocket, String) {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        (server, addr)
    }

    #[tokio::test]
    async fn query_info_round_trips_over_a_real_socket() {
        let (server, addr) = loopback_pair().await;

        let mut reply = ByteBuffer::new();
        reply.write_long(-1);
        reply.write_byte(b'I');
        reply.write_byte(17);
        reply.write_string("Loopback Server");
        reply.write_string("de_dust2");
        reply.write_string("cstrike");
        reply.write_string("Counter-Strike");
        reply.write_short(10);
        reply.write_byte(1);
        reply.write_byte(16);
        reply.write_byte(0);
        reply.write_byte(b'd');
        reply.write_byte(b'l');
        reply.write_byte(0);
        reply.write_byte(0);
        reply.write_string("1.0.0.0");
        let reply = reply.into_vec();

        tokio::spawn(async move {
            let mut buf = [0u8; 1400];
            let (n, peer) = server.recv_from(&mut buf).await.unwrap();
            assert!(n > 0);
            server.send_to(&reply, peer).await.unwrap();
        });

        let ctx = QueryContext::new().with_timeout(Duration::from_secs(2));
        let result = ctx.query_info(&addr).await.unwrap();
        match result.value {
            InfoVariant::Source(info) => assert_eq!(info.name, "Loopback Server"),
            InfoVariant::GoldSrc(_) => panic!("expected the Source schema"),
        }
    }

    #[tokio::test]
    async fn query_players_runs_the_challenge_round_trip() {
        let (server, addr) = loopback_pair().await;

        tokio::spawn(async move {
            let mut buf = [0u8; 1400];

            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            let mut challenge_reply = ByteBuffer::new();
            challenge_reply.write_long(-1);
            challenge_reply.write_byte(b'A');
            challenge_reply.write_long(777);
            server.send_to(&challenge_reply.into_vec(), peer).await.unwrap();

            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            let mut players_reply = ByteBuffer::new();
            players_reply.write_long(-1);
            players_reply.write_byte(b'D');
            players_reply.write_byte(1);
            players_reply.write_byte(0);
            players_reply.write_string("alice");
            players_reply.write_long(5);
            players_reply.write_float(42.0);
            server.send_to(&players_reply.into_vec(), peer).await.unwrap();
        });

        let ctx = QueryContext::new().with_timeout(Duration::from_secs(2));
        let result = ctx.query_players(&addr).await.unwrap();
        assert_eq!(result.value.declared_count, 1);
        assert_eq!(result.value.players[0].name, "alice");
    }

    #[tokio::test]
    async fn query_times_out_when_nothing_answers() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        drop(server); // nothing is listening, so recv will never complete before the deadline

        let ctx = QueryContext::new().with_timeout(Duration::from_millis(100));
        let result = ctx.query_info(&addr).await;
        assert!(matches!(result, Err(A2SError::Timeout(_)) | Err(A2SError::Io(_))));
    }
}
