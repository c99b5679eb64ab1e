//! Terminal front end
//! 
//! A line-oriented console that drives the timer registry and renders the
//! board the registry publishes.

pub mod commands;
pub mod handlers;
pub mod render;
pub mod responses;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use commands::{parse_command, Command, CommandError, HELP};
pub use handlers::{Console, Reply};
pub use render::{render_board, watch_alerts};
pub use responses::StatusResponse;

/// Read commands from `input` until `quit`, end of input or shutdown
pub async fn run_console<R, W>(
    console: &Console,
    input: R,
    mut output: W,
    shutdown: CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let slot_count = console.registry().slot_count();
    let mut lines = input.lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Console stopping on shutdown");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            info!("Console input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match parse_command(&line, slot_count) {
            Ok(command) => console.handle(command),
            Err(e) => Reply::Text(format!("{} (type 'help' for commands)", e)),
        };

        match reply {
            Reply::Text(text) => {
                output.write_all(text.as_bytes()).await?;
                if !text.ends_with('\n') {
                    output.write_all(b"\n").await?;
                }
                output.flush().await?;
            }
            Reply::Quit => {
                info!("Quit requested");
                break;
            }
        }
    }

    Ok(())
}
