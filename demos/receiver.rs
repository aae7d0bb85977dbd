//! Binds an OSC server and prints every message or bundle it receives.
//!
//! Usage: receiver BIND_IP:PORT

use std::{env, process};

use osc_proto::{OscPacket, OscServer};

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} BIND_IP:PORT", args[0]);
        process::exit(1);
    }

    let server = OscServer::bind(&args[1]).expect("failed to bind");
    println!("listening on {}", server.local_addr().unwrap());

    server
        .serve_forever(&mut |source, packet, received_at| {
            println!("from {source} at {received_at:?}:");
            print_packet(&packet, 1);
        })
        .expect("server loop failed");
}

fn print_packet(packet: &OscPacket, depth: usize) {
    let indent = "  ".repeat(depth);
    match packet {
        OscPacket::Message(msg) => println!("{indent}{msg}"),
        OscPacket::Bundle(bundle) => {
            println!("{indent}#bundle {}", bundle.timetag);
            for child in &bundle.content {
                print_packet(child, depth + 1);
            }
        }
    }
}
