//! # Papeleria Register Library
//!
//! The counter-side process of Papeleria POS. It owns the database and
//! answers JSON commands, one per line.
//!
//! ## Module Organization
//! ```text
//! papeleria_register/
//! ├── lib.rs          ◄─── You are here (logging, serve loop)
//! ├── config.rs       ◄─── Environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command enum, dispatch, envelope
//! │   ├── product.rs  ◄─── Catalogue commands
//! │   └── sale.rs     ◄─── Sale commands
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Streams
//! ```text
//! stdin  ──► one JSON command per line
//! stdout ◄── one JSON reply per line
//! stderr ◄── tracing output
//! ```

pub mod commands;
pub mod config;
pub mod error;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use papeleria_db::Database;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=papeleria=trace` - Show trace for papeleria crates only
/// - Default: INFO, DEBUG for papeleria crates
///
/// Logs go to stderr so they never interleave with replies.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,papeleria=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Answers commands from `input` until end of stream.
///
/// Blank lines are skipped. A line that is not UTF-8 gets a validation
/// error reply and the loop goes on. Every reply is flushed before the next
/// line is read, so a caller can drive the register interactively.
pub async fn serve<R, W>(db: &Database, mut input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled: u64 = 0;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => commands::handle_line(db, line.trim()).await,
            Err(e) => {
                warn!(error = %e, "Command line is not valid UTF-8");
                commands::reject_line("Invalid command: input is not valid UTF-8")
            }
        };

        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        handled += 1;
        debug!(handled, "Reply written");
    }

    info!(handled, "Input closed");
    Ok(())
}
