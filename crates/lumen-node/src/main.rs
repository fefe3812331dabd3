//! `lumen-noded`: the E1.31/sACN node daemon.
//!
//! # Usage
//!
//! ```bash
//! lumen-noded --bind 0.0.0.0 --log-level debug
//! ```
//!
//! No RPC, HTTP admin, or plugin surface is implemented here — those are
//! out of scope collaborators (see the project's design notes). This
//! binary wires up the transport and the node and runs the receive loop;
//! without a collaborator registering handlers, received frames are logged
//! and dropped for lack of a destination.

use std::net::Ipv4Addr;

use clap::Parser;
use lumen_core::E131Node;
use lumen_node::{
    transport::{Transport, MAX_DATAGRAM_LEN},
    SystemEnv,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// E1.31 (sACN) streaming DMX node daemon.
#[derive(Parser, Debug)]
#[command(name = "lumen-noded")]
#[command(about = "ANSI E1.31 / sACN streaming DMX node")]
#[command(version)]
struct Args {
    /// Interface address to bind to.
    #[arg(long, default_value = "0.0.0.0")]
    bind: Ipv4Addr,

    /// UDP port to bind to.
    #[arg(long, default_value_t = lumen_node::transport::E131_PORT)]
    port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Accept frames whose CID matches our own (disabled by default).
    #[arg(long, default_value_t = false)]
    enable_loopback: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("lumen-noded starting");

    let mut transport = Transport::bind(args.bind, args.port).await?;
    tracing::info!(addr = %transport.local_addr()?, "listening");

    let mut node = E131Node::new(SystemEnv::new(), args.enable_loopback);
    node.start();
    tracing::info!(cid = %node.cid(), "node started");

    let mut buf = [0u8; MAX_DATAGRAM_LEN];
    loop {
        let len = match transport.recv(&mut buf).await {
            Ok(len) => len,
            Err(err) => {
                tracing::warn!(error = %err, "receive failed");
                continue;
            },
        };

        match node.on_datagram(&buf[..len]) {
            lumen_core::DatagramOutcome::NoHandler => {
                tracing::debug!("received frame for a universe with no registered handler");
            },
            outcome => {
                tracing::debug!(?outcome, "datagram processed");
            },
        }
    }
}
