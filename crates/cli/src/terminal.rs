//! Terminal input — operator lines read on a background task.
//!
//! Blank lines are skipped. `exit` / `quit` (any case) end the session; so
//! does end of input, which shows up as the channel closing.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// One thing the operator typed.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Quit,
}

pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Read lines from `reader` until EOF, an exit command, or a read error.
pub fn spawn_reader<R>(reader: R) -> mpsc::Receiver<io::Result<Input>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if is_exit_command(line) {
                        let _ = tx.send(Ok(Input::Quit)).await;
                        break;
                    }

                    if tx.send(Ok(Input::Line(line.to_string()))).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF (Ctrl+D)
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
    });

    rx
}

/// Operator input from stdin.
pub fn stdin() -> mpsc::Receiver<io::Result<Input>> {
    spawn_reader(io::BufReader::new(io::stdin()))
}
