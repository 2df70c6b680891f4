use engine_bridge::bindings::{LoggingReceiver, MessageChannel};
use engine_bridge::config::BridgeConfig;
use std::io::{self, BufRead};
use std::sync::Arc;

/// Stand-in host: logs outbound messages and reads inbound JSON from stdin,
/// one message per line.
fn main() {
    let registry = match engine_bridge::initialize(BridgeConfig::load_or_default()) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Bridge failed to start: {}", e);
            std::process::exit(1);
        }
    };

    registry.set(Arc::new(LoggingReceiver::new("stdout-host")));

    let channel = MessageChannel::global();
    channel.subscribe(|message| {
        tracing::info!(target: "bridge", "Inbound {:?}", message);
    });

    if let Err(e) = channel.announce_initialized() {
        eprintln!("Failed to announce initialization: {}", e);
        std::process::exit(1);
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                std::process::exit(1);
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Decode failures are already logged by the channel
        let _ = channel.on_message_received(line);
    }

    tracing::info!(target: "bridge", stats = ?registry.stats(), "Bridge shutting down");
}
