//! **osc_proto** is an implementation of the [OSC 1.0](http://opensoundcontrol.org/spec-1_0)
//! protocol in pure Rust: a byte-exact codec for messages and nested, time-tagged
//! bundles, plus a synchronous UDP [`client`] and [`server`] built on top of it.

extern crate nom;

/// Crate specific error types.
mod errors;
/// OSC data types, see [OSC 1.0 specification](https://opensoundcontrol.stanford.edu/spec-1_0.html) for details.
mod types;

pub use crate::errors::*;
pub use crate::types::*;

/// Address validation.
pub mod address;
/// A fire-and-forget UDP client that broadcasts to a list of destinations.
pub mod client;
/// Provides a decoding method for OSC packets.
pub mod decoder;
/// Encodes an `OscPacket` to a byte vector.
pub mod encoder;
/// A single-threaded UDP server that dispatches parsed packets to a handler.
pub mod server;

pub use client::OscClient;
pub use server::{OscHandler, OscServer, ShutdownHandle};
