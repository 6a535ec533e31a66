//! Speech source supervisor
//!
//! The continuous speech recognizer is a long-lived external process
//! that hiccups. The restart decision lives here, not in any view
//! handler: transient errors (network blip, no-speech timeout)
//! restart the source after a short backoff; a permission denial or an
//! explicit user stop ends the loop for good.

use crate::error::ListenError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// External speech-to-text collaborator. Produces raw transcripts on
/// an unpredictable cadence.
#[async_trait]
pub trait SpeechSource: Send {
    async fn next_transcript(&mut self) -> Result<String, ListenError>;
}

/// Observable supervisor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerState {
    Idle,
    Listening,
    Restarting,
    /// Terminal: permission denial, user stop, or teardown.
    Stopped { reason: String },
}

/// Supervises a [`SpeechSource`], forwarding transcripts downstream.
pub struct SpeechSupervisor<S> {
    source: S,
    enabled: Arc<AtomicBool>,
    restart_backoff: Duration,
    state_tx: watch::Sender<ListenerState>,
}

impl<S: SpeechSource> SpeechSupervisor<S> {
    pub fn new(source: S) -> Self {
        let (state_tx, _) = watch::channel(ListenerState::Idle);
        Self {
            source,
            enabled: Arc::new(AtomicBool::new(true)),
            restart_backoff: Duration::from_millis(500),
            state_tx,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.restart_backoff = backoff;
        self
    }

    /// Flag for user-initiated stop. Clearing it ends the loop before
    /// the next poll; the source is never restarted afterwards.
    pub fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    pub fn state(&self) -> watch::Receiver<ListenerState> {
        self.state_tx.subscribe()
    }

    /// Poll the source until a permanent error, user stop, or
    /// cancellation. Transcripts go out through `transcripts`.
    pub async fn run(mut self, transcripts: mpsc::Sender<String>, cancel: CancellationToken) {
        loop {
            if !self.enabled.load(Ordering::SeqCst) {
                self.stop("stopped by user");
                return;
            }
            if cancel.is_cancelled() {
                self.stop("cancelled");
                return;
            }
            let _ = self.state_tx.send(ListenerState::Listening);

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    self.stop("cancelled");
                    return;
                }
                result = self.source.next_transcript() => result,
            };

            match result {
                Ok(text) => {
                    if transcripts.send(text).await.is_err() {
                        self.stop("downstream closed");
                        return;
                    }
                }
                Err(ListenError::Transient(cause)) => {
                    tracing::warn!(error = %cause, "speech source hiccup, restarting");
                    let _ = self.state_tx.send(ListenerState::Restarting);
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.stop("cancelled");
                            return;
                        }
                        _ = tokio::time::sleep(self.restart_backoff) => {}
                    }
                }
                Err(ListenError::PermissionDenied) => {
                    tracing::error!("speech permission denied, not restarting");
                    self.stop("permission denied");
                    return;
                }
                Err(ListenError::Stopped) => {
                    self.stop("stopped by user");
                    return;
                }
            }
        }
    }

    fn stop(&self, reason: &str) {
        let _ = self.state_tx.send(ListenerState::Stopped {
            reason: reason.to_string(),
        });
    }
}
