//! Sign a webhook payload the way Martian Pay does and print the header.
//!
//! Usage: `martian-sign [PAYLOAD_FILE]` (reads stdin when no file is given).
//!
//! The timestamp comes from `MARTIAN_SIGN_TIMESTAMP`, falling back to the
//! event's `created` field. Set `MARTIAN_PAY_WEBHOOK_SECRET_PREVIOUS` to add a
//! second `v1` entry as during secret rotation.

use std::io::Read;

use martian_pay::{compute_signature, sign_payload, WebhookSecret, SIGNATURE_HEADER};

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let secret = match std::env::var("MARTIAN_PAY_WEBHOOK_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
    {
        Some(s) => WebhookSecret::from(s),
        None => {
            tracing::error!("MARTIAN_PAY_WEBHOOK_SECRET is required.");
            std::process::exit(1);
        }
    };

    let payload = match std::env::args().nth(1) {
        Some(path) => std::fs::read(&path).unwrap_or_else(|e| {
            tracing::error!("cannot read {path}: {e}");
            std::process::exit(1);
        }),
        None => {
            let mut buf = Vec::new();
            if let Err(e) = std::io::stdin().read_to_end(&mut buf) {
                tracing::error!("cannot read stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };

    let timestamp = match std::env::var("MARTIAN_SIGN_TIMESTAMP") {
        Ok(ts) => ts.parse::<i64>().unwrap_or_else(|_| {
            tracing::error!("MARTIAN_SIGN_TIMESTAMP must be Unix seconds, got {ts:?}");
            std::process::exit(1);
        }),
        Err(_) => match martian_pay::webhook::decode_event(&payload) {
            Ok(event) => event.created,
            Err(e) => {
                tracing::error!(
                    "payload is not an event ({e}); set MARTIAN_SIGN_TIMESTAMP explicitly"
                );
                std::process::exit(1);
            }
        },
    };

    let mut header = sign_payload(secret.as_bytes(), timestamp, &payload);

    if let Some(previous) = std::env::var("MARTIAN_PAY_WEBHOOK_SECRET_PREVIOUS")
        .ok()
        .filter(|s| !s.is_empty())
    {
        let previous = WebhookSecret::from(previous);
        tracing::info!("adding a second v1 signature with the previous secret");
        header = header.with_signature(compute_signature(previous.as_bytes(), timestamp, &payload));
    }

    if secret.len() < 32 {
        tracing::warn!(
            "secret is only {} bytes (minimum 32 recommended)",
            secret.len()
        );
    }

    println!("{SIGNATURE_HEADER}: {header}");
}
