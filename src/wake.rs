//! Wake trigger
//!
//! The trigger is a typed confirmation, not acoustic detection: the operator
//! types the wake word on stdin. Ctrl-C (or closing stdin) while waiting
//! shuts the assistant down cleanly.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::Result;

/// Outcome of waiting on the wake trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeEvent {
    /// The operator confirmed the wake word; start a turn
    Triggered,
    /// The process was interrupted; exit cleanly
    Shutdown,
}

/// Blocks until the assistant should start a turn or exit
#[async_trait(?Send)]
pub trait WakeTrigger {
    /// Wait for the next wake event
    ///
    /// # Errors
    ///
    /// Returns error if the trigger source fails
    async fn wait(&mut self) -> Result<WakeEvent>;
}

/// Line-based trigger reading the wake word from stdin
pub struct ConsoleTrigger {
    wake_word: String,
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleTrigger {
    /// Create a trigger for the given wake word
    #[must_use]
    pub fn new(wake_word: &str) -> Self {
        Self {
            wake_word: wake_word.trim().to_lowercase(),
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait(?Send)]
impl WakeTrigger for ConsoleTrigger {
    async fn wait(&mut self) -> Result<WakeEvent> {
        println!("Type \"{}\" and press enter to start a turn.", self.wake_word);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    return Ok(WakeEvent::Shutdown);
                }
                line = self.lines.next_line() => {
                    match line? {
                        // stdin closed: treat like an interrupt
                        None => return Ok(WakeEvent::Shutdown),
                        Some(input) if matches_wake_word(&input, &self.wake_word) => {
                            tracing::info!(wake_word = %self.wake_word, "wake word confirmed");
                            return Ok(WakeEvent::Triggered);
                        }
                        Some(input) => {
                            tracing::debug!(input = %input, "not the wake word, still waiting");
                        }
                    }
                }
            }
        }
    }
}

/// Case-insensitive, whitespace-tolerant wake word match
fn matches_wake_word(input: &str, wake_word: &str) -> bool {
    input.trim().to_lowercase() == wake_word
}
