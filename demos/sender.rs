//! Sends a handful of OSC messages to a destination, the way a lightweight
//! controller surface (an XY pad, say) would drive a synth over the network.
//!
//! Usage: sender DEST_IP:DEST_PORT

use std::time::Duration;
use std::{env, f32, process, thread};

use osc_proto::{OscClient, OscMessage, OscPacket, OscType};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} DEST_IP:DEST_PORT", args[0]);
        process::exit(1);
    }
    let (host, port) = split_host_port(&args[1]);

    let mut client = OscClient::new().expect("failed to open UDP client socket");
    client.add(host, port).expect("invalid destination");

    // Switch to view "/3".
    client
        .send(&OscPacket::Message(OscMessage::new("/3")))
        .unwrap();

    // Drive two XY pads in a slow circle.
    let steps = 128;
    let step_size = 2.0 * f32::consts::PI / steps as f32;
    for i in 0.. {
        let x = 0.5 + (step_size * (i % steps) as f32).sin() / 2.0;
        let y = 0.5 + (step_size * (i % steps) as f32).cos() / 2.0;

        let mut xy1 = OscMessage::new("/3/xy1");
        xy1.push(OscType::Float(x));
        xy1.push(OscType::Float(y));
        client.send(&OscPacket::Message(xy1)).unwrap();

        let mut xy2 = OscMessage::new("/3/xy2");
        xy2.push(OscType::Float(y));
        xy2.push(OscType::Float(x));
        client.send(&OscPacket::Message(xy2)).unwrap();

        thread::sleep(Duration::from_millis(20));
    }
}

fn split_host_port(arg: &str) -> (&str, u16) {
    let (host, port) = arg.rsplit_once(':').unwrap_or_else(|| {
        eprintln!("expected HOST:PORT, got {arg}");
        process::exit(1);
    });
    let port: u16 = port.parse().unwrap_or_else(|_| {
        eprintln!("invalid port {port}");
        process::exit(1);
    });
    (host, port)
}
