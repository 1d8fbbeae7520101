//! Line-oriented console: one command per line, timers ticking in between.

use std::path::Path;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{AppError, AppResult};

use super::{parse_command, App, Reply, COMMAND_HELP, UI_TICK_INTERVAL};

pub async fn run_console(app: &App, page: &Path) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(UI_TICK_INTERVAL);
    println!("{COMMAND_HELP}");

    loop {
        tokio::select! {
            _ = ticker.tick() => app.tick(Instant::now()),
            line = lines.next_line() => {
                let Some(line) = line.map_err(AppError::Console)? else {
                    tracing::debug!("console input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                match app.handle(command).await {
                    Reply::Done => {}
                    Reply::Message(message) => println!("{message}"),
                    Reply::Save => {
                        super::write_page(app, page).await?;
                        println!("page written to {}", page.display());
                    }
                    Reply::Quit => break,
                }
            }
        }
    }
    Ok(())
}
