//! Decodes a Recurly webhook body and prints it as JSON.
//!
//! ```text
//! recurly-webhook [FILE]
//! ```
//!
//! Reads `FILE`, or stdin when it is omitted or `-`. Exit status:
//!
//! - `0`: decoded, JSON written to stdout
//! - `1`: unreadable or malformed body
//! - `2`: well-formed body with an unregistered notification name

mod observability;

use std::{
    fs::File,
    io::{self, Write},
    process::ExitCode,
};

use recurly::{
    RecurlyError,
    webhooks::{Notification, parse_notification},
};
use tracing::{error, info, warn};

use crate::observability::{LogFormat, init_observability};

const EXIT_UNKNOWN_NOTIFICATION: u8 = 2;

fn main() -> ExitCode {
    init_observability(LogFormat::from_env());

    let source = std::env::args().nth(1).filter(|arg| arg != "-");
    let result = match &source {
        Some(path) => File::open(path).map_err(RecurlyError::from).and_then(parse_notification),
        None => parse_notification(io::stdin().lock()),
    };

    match result {
        Ok(notification) => match print(&notification) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(error = %err, "failed to write notification");
                ExitCode::FAILURE
            }
        },
        Err(RecurlyError::UnknownNotification { name }) => {
            warn!(name = %name, "ignoring unregistered notification");
            ExitCode::from(EXIT_UNKNOWN_NOTIFICATION)
        }
        Err(err) => {
            error!(
                source = source.as_deref().unwrap_or("stdin"),
                error = %err,
                "failed to decode webhook"
            );
            ExitCode::FAILURE
        }
    }
}

fn print(notification: &Notification) -> io::Result<()> {
    info!(kind = %notification.kind(), "decoded notification");
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, notification)?;
    writeln!(stdout)
}
