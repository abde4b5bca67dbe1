//! Terminal spinner shown while a prompt is being generated.
//!
//! Generation can sit in the poll loop for up to half a minute, so the
//! spinner shows elapsed seconds next to the message.

use std::io::Write;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// One rendered spinner line, without the leading clear sequence.
fn render(tick: usize, message: &str, elapsed: Duration) -> String {
    let frame = FRAMES[tick % FRAMES.len()];
    format!("{frame} {message} ({}s)", elapsed.as_secs())
}

/// A spinner on stderr, driven by a background task.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: tokio::sync::watch::Sender<bool>,
    started: Instant,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
        let message = message.to_string();
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            let mut tick = 0;
            loop {
                // \x1b[2K clears the line, \r returns to its start
                eprint!("\x1b[2K\r{}", render(tick, &message, started.elapsed()));
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                tick += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            cancel: cancel_tx,
            started,
        }
    }

    /// Stop the spinner, clear its line, and report how long it ran.
    pub async fn stop(self) -> Duration {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
        self.started.elapsed()
    }
}
