//! Async UDP plumbing: binds a socket, drives the send/receive exchange against a deadline,
//! and feeds received datagrams to a [`ResponseAssembler`] until it completes.

use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::assembler::{Progress, ResponseAssembler};
use crate::error::A2SError;
use crate::request::Request;

const RECV_BUFFER_SIZE: usize = 4096;

/// Binds an ephemeral local port and connects it to `addr`, so that subsequent `send`/`recv`
/// calls don't need to pass the peer address each time.
pub async fn connect(addr: &str, budget: Duration) -> Result<UdpSocket, A2SError> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    timeout(budget, socket.connect(addr)).await??;
    Ok(socket)
}

/// Sends `request` once and feeds received datagrams to `assembler` until it reports
/// completion or `budget` elapses. Returns the decoded payload and the time from send to
/// completion.
pub async fn round_trip(
    socket: &UdpSocket,
    request: &Request,
    budget: Duration,
    mut assembler: ResponseAssembler,
) -> Result<(Vec<u8>, Duration), A2SError> {
    let start = Instant::now();

    for part in request {
        timeout(budget, socket.send(part)).await??;
    }

    let mut buf = [0u8; RECV_BUFFER_SIZE];
    loop {
        let remaining = budget.saturating_sub(start.elapsed());
        let n = timeout(remaining, socket.recv(&mut buf)).await??;

        match assembler.feed(&buf[..n])? {
            Progress::Done(payload) => return Ok((payload, start.elapsed())),
            Progress::InProgress => continue,
        }
    }
}
