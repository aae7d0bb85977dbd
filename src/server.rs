//! A single-threaded UDP server: binds an endpoint, validates and parses
//! each datagram, optionally waits out a bundle's time tag, and hands the
//! result to a user-supplied handler.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use socket2::{Domain, Socket, Type};

use crate::decoder;
use crate::errors::Result;
use crate::types::OscPacket;

/// Maximum time the receive loop blocks on a single `recv_from` before
/// checking the shutdown flag again.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// The single extension point a server consumer implements: called once
/// per accepted datagram with the sender's address, the parsed packet, and
/// the wall-clock time the datagram was received.
pub trait OscHandler {
    fn handle(&mut self, source: SocketAddr, packet: OscPacket, received_at: SystemTime);
}

impl<F> OscHandler for F
where
    F: FnMut(SocketAddr, OscPacket, SystemTime),
{
    fn handle(&mut self, source: SocketAddr, packet: OscPacket, received_at: SystemTime) {
        self(source, packet, received_at)
    }
}

/// A handle that can unblock a running [`OscServer::serve_forever`] loop
/// from another thread. Cloning shares the same underlying flag.
#[derive(Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn new() -> ShutdownHandle {
        ShutdownHandle(Arc::new(AtomicBool::new(false)))
    }

    pub fn shutdown(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_shutdown(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct OscServer {
    socket: UdpSocket,
    shutdown: ShutdownHandle,
}

impl OscServer {
    /// Bind `addr`, setting `SO_REUSEADDR` before binding the way the
    /// reference server does, so a restarted server can rebind promptly.
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<OscServer> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| crate::errors::OscError::BadAddress("no address to bind".into()))?;

        let domain = if addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };
        let socket2 = Socket::new(domain, Type::DGRAM, None)?;
        socket2.set_reuse_address(true)?;
        socket2.bind(&addr.into())?;
        socket2.set_nonblocking(false)?;

        let socket: UdpSocket = socket2.into();
        socket.set_read_timeout(Some(POLL_INTERVAL))?;

        Ok(OscServer {
            socket,
            shutdown: ShutdownHandle::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// A handle that can be used to stop [`serve_forever`](Self::serve_forever)
    /// from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Runs the receive loop until [`ShutdownHandle::shutdown`] is called.
    /// Each valid datagram is parsed and, if it is a bundle scheduled for a
    /// future time, dispatch is delayed until that time arrives.
    pub fn serve_forever<H: OscHandler>(&self, handler: &mut H) -> Result<()> {
        let mut buf = [0u8; decoder::MTU];
        while !self.shutdown.is_shutdown() {
            let (n, source) = match self.socket.recv_from(&mut buf) {
                Ok(v) => v,
                Err(e) if is_timeout(&e) => continue,
                Err(e) => return Err(e.into()),
            };
            let received_at = SystemTime::now();
            let datagram = &buf[..n];

            if !looks_like_osc(datagram) {
                tracing::warn!(?source, "dropping datagram that is not a valid OSC packet");
                continue;
            }

            let (_, packet) = match decoder::decode_udp(datagram) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(?source, error = %e, "dropping unparseable OSC packet");
                    continue;
                }
            };

            honor_time_tag(&packet);
            handler.handle(source, packet, received_at);
        }
        Ok(())
    }
}

/// Cheap sanity check mirroring the reference server's `verify_request`:
/// accept only datagrams that look like a message (`/`-prefixed) or a
/// bundle (`#bundle\0`-prefixed).
fn looks_like_osc(datagram: &[u8]) -> bool {
    matches!(datagram.first(), Some(b'/') | Some(b'#'))
}

/// If `packet` is a bundle carrying a future, non-IMMEDIATELY time tag,
/// block until that time is reached.
fn honor_time_tag(packet: &OscPacket) {
    if let OscPacket::Bundle(bundle) = packet {
        if bundle.timetag.is_immediately() {
            return;
        }
        let scheduled: SystemTime = bundle.timetag.into();
        if let Ok(delay) = scheduled.duration_since(SystemTime::now()) {
            std::thread::sleep(delay);
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
