//! Operator console: screen clearing, text output and line input.

use std::io::{BufRead, Write};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use derive_more::{Display, Error};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, instrument, warn};

/// Console error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Console error: {} at {}:{}", message, file, line)]
pub struct ConsoleError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConsoleError {
    /// Creates a new console error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Where the operator sees the board and types moves.
///
/// `read_line` waits until a full line is available. The match exchange
/// never races it, so an interrupt that arrives mid-prompt is only
/// observed after the operator presses enter.
#[async_trait]
pub trait Console: Send {
    /// Clears the display.
    fn clear(&mut self);

    /// Shows a block of text.
    fn show(&mut self, text: &str);

    /// Prints `prompt` and reads one line, without its line terminator.
    async fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;
}

/// Lines typed by the operator, read on a dedicated thread.
///
/// The thread blocks on the source and hands each line over a channel, so
/// an abandoned prompt leaves nothing behind for the runtime to wait on
/// when it shuts down. Clones share the same source.
#[derive(Debug, Clone)]
pub struct LineInput {
    lines: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl LineInput {
    /// Starts a reader thread over `source`.
    pub fn spawn<R>(source: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let spawned = std::thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || forward_lines(source, tx));
        if let Err(e) = spawned {
            error!(error = %e, "Failed to start console input thread");
        }
        Self {
            lines: Arc::new(Mutex::new(rx)),
        }
    }

    /// The process-wide stdin reader, started on first use.
    pub fn stdin() -> Self {
        static STDIN: OnceLock<LineInput> = OnceLock::new();
        STDIN
            .get_or_init(|| Self::spawn(std::io::BufReader::new(std::io::stdin())))
            .clone()
    }

    /// Waits for the next line, without its line terminator.
    ///
    /// Cancelling the wait loses nothing: the line stays queued for the
    /// next call.
    pub async fn next_line(&self) -> Result<String, ConsoleError> {
        self.lines
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| ConsoleError::new("stdin closed"))
    }
}

fn forward_lines<R: BufRead>(mut source: R, lines: mpsc::Sender<String>) {
    let mut line = String::new();
    loop {
        line.clear();
        match source.read_line(&mut line) {
            Ok(0) => {
                debug!("Console input reached end of file");
                return;
            }
            Ok(_) => {
                if lines.blocking_send(trim_newline(&line).to_string()).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "Console read failed");
                return;
            }
        }
    }
}

/// Console backed by the process terminal.
#[derive(Debug)]
pub struct TerminalConsole {
    input: LineInput,
}

impl TerminalConsole {
    /// Creates a console reading from stdin and writing to stdout.
    pub fn new() -> Self {
        Self::with_input(LineInput::stdin())
    }

    /// Creates a console reading from `input` and writing to stdout.
    pub fn with_input(input: LineInput) -> Self {
        Self { input }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for TerminalConsole {
    fn clear(&mut self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
            warn!(error = %e, "Failed to clear terminal");
        }
    }

    fn show(&mut self, text: &str) {
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    #[instrument(skip(self))]
    async fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        {
            let mut stdout = std::io::stdout();
            write!(stdout, "{}", prompt)
                .and_then(|()| stdout.flush())
                .map_err(|e| ConsoleError::new(format!("write prompt: {}", e)))?;
        }

        let line = self.input.next_line().await?;
        debug!(input = %line, "Read console line");
        Ok(line)
    }
}

/// Strips one trailing `\n` or `\r\n`; everything else is kept verbatim.
pub(crate) fn trim_newline(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::time::{Duration, Instant};

    use super::*;

    /// A source whose reads block until the sender is dropped.
    struct Stalled(std::sync::mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_line_input_yields_trimmed_lines() {
        let input = LineInput::spawn(Cursor::new("e2-e4\r\n e7 e5 \n"));

        assert_eq!(input.next_line().await.expect("first line"), "e2-e4");
        assert_eq!(input.next_line().await.expect("second line"), " e7 e5 ");
        let err = input.next_line().await.expect_err("input is exhausted");
        assert_eq!(err.message, "stdin closed");
    }

    #[tokio::test]
    async fn test_cancelled_read_leaves_input_usable() {
        let (hold, stalled) = std::sync::mpsc::channel::<()>();
        let input = LineInput::spawn(std::io::BufReader::new(Stalled(stalled)));

        let waited = tokio::time::timeout(Duration::from_millis(20), input.next_line()).await;
        assert!(waited.is_err());

        drop(hold);
        let err = input.next_line().await.expect_err("input is exhausted");
        assert_eq!(err.message, "stdin closed");
    }

    #[test]
    fn test_pending_read_does_not_block_runtime_shutdown() {
        let (hold, stalled) = std::sync::mpsc::channel::<()>();
        let input = LineInput::spawn(std::io::BufReader::new(Stalled(stalled)));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");

        let started = Instant::now();
        runtime.block_on(async {
            let mut console = TerminalConsole::with_input(input);
            let waited =
                tokio::time::timeout(Duration::from_millis(50), console.read_line("")).await;
            assert!(waited.is_err());
        });
        drop(runtime);
        assert!(started.elapsed() < Duration::from_secs(2));

        drop(hold);
    }

    #[test]
    fn test_trim_newline() {
        assert_eq!(trim_newline("e2-e4\n"), "e2-e4");
        assert_eq!(trim_newline("e2-e4\r\n"), "e2-e4");
        assert_eq!(trim_newline(" e2 e4 "), " e2 e4 ");
        assert_eq!(trim_newline("\n"), "");
    }
}
