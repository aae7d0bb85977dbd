//! A minimal fire-and-forget UDP client: a list of destinations and a
//! socket to broadcast built datagrams to all of them.

use std::net::{ToSocketAddrs, UdpSocket};

use crate::encoder;
use crate::errors::{OscError, Result};
use crate::types::OscPacket;

/// A UDP socket paired with a list of `(host, port)` destinations. Sending
/// a packet transmits it to every configured destination.
///
/// The socket is opened lazily again after [`OscClient::close`] is called,
/// so a client can be reused for a send after being closed.
pub struct OscClient {
    socket: Option<UdpSocket>,
    destinations: Vec<(String, u16)>,
}

impl OscClient {
    /// Open a non-blocking UDP socket bound to an OS-assigned local port.
    pub fn new() -> Result<OscClient> {
        let socket = bind_ephemeral()?;
        Ok(OscClient {
            socket: Some(socket),
            destinations: Vec::new(),
        })
    }

    /// Add a destination. The address is resolved lazily at send time, so
    /// hostnames are accepted here as well as literal IPs.
    pub fn add<S: Into<String>>(&mut self, address: S, port: u16) -> Result<()> {
        if port == 0 {
            return Err(OscError::BadArg("port must be greater than zero".into()));
        }
        self.destinations.push((address.into(), port));
        Ok(())
    }

    /// Remove the first destination matching `address`/`port` exactly.
    pub fn remove(&mut self, address: &str, port: u16) {
        if let Some(index) = self
            .destinations
            .iter()
            .position(|(a, p)| a == address && *p == port)
        {
            self.destinations.remove(index);
        }
    }

    /// Remove every configured destination.
    pub fn clear(&mut self) {
        self.destinations.clear();
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Build `packet` and send it to every configured destination. Reopens
    /// the socket transparently if it was previously [`close`](Self::close)d.
    pub fn send(&mut self, packet: &OscPacket) -> Result<()> {
        if self.socket.is_none() {
            self.socket = Some(bind_ephemeral()?);
        }
        let socket = self.socket.as_ref().expect("socket just ensured open");

        let dgram = encoder::encode(packet)?;
        for (address, port) in &self.destinations {
            for addr in (address.as_str(), *port).to_socket_addrs()? {
                socket.send_to(&dgram, addr)?;
            }
        }
        Ok(())
    }

    /// Release the socket. Idempotent; a subsequent `send` reopens it.
    pub fn close(&mut self) {
        self.socket = None;
    }
}

impl Default for OscClient {
    fn default() -> Self {
        OscClient::new().expect("failed to open default UDP client socket")
    }
}

fn bind_ephemeral() -> Result<UdpSocket> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_nonblocking(true)?;
    Ok(socket)
}
