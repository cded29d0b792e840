//! Process-level supervision of the consumer loop.
//!
//! State machine over Running, Backoff, and Terminated. A loop failure
//! counts toward a fixed threshold and costs a fixed backoff; a normal loop
//! return restarts immediately without counting. The failure counter is
//! never decremented: the threshold cuts off a run of failures, it is not
//! a sliding window. Shutdown is observed between loop invocations only.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::consumer::ConsumerLoop;
use crate::shutdown::ShutdownToken;

/// Supervisor restart policy.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Pause between a loop failure and the next restart
    pub backoff: Duration,
    /// Loop failures tolerated before terminating the process
    pub max_failures: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(5),
            max_failures: 5,
        }
    }
}

/// Final status the process exits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Cooperative shutdown completed
    Clean,
    /// Failure threshold reached
    Fatal,
}

impl ExitStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Fatal => 1,
        }
    }
}

enum State {
    Running,
    Backoff,
    Terminated(ExitStatus),
}

/// Owns the restart/backoff policy around the consumer loop.
pub struct Supervisor {
    consumer_loop: ConsumerLoop,
    shutdown: ShutdownToken,
    config: SupervisorConfig,
}

impl Supervisor {
    pub fn new(consumer_loop: ConsumerLoop, shutdown: ShutdownToken) -> Self {
        Self::with_config(consumer_loop, shutdown, SupervisorConfig::default())
    }

    pub fn with_config(
        consumer_loop: ConsumerLoop,
        shutdown: ShutdownToken,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            consumer_loop,
            shutdown,
            config,
        }
    }

    /// Runs until clean shutdown or the failure threshold.
    pub async fn run(&self) -> ExitStatus {
        let mut failures: u32 = 0;
        let mut state = State::Running;

        loop {
            state = match state {
                State::Running => {
                    if self.shutdown.is_triggered() {
                        info!("Shutdown requested, terminating");
                        State::Terminated(ExitStatus::Clean)
                    } else {
                        match self.consumer_loop.run().await {
                            Ok(()) => {
                                warn!("Consumer loop exited unexpectedly, restarting");
                                State::Running
                            }
                            Err(e) => {
                                failures += 1;
                                error!(
                                    failures = failures,
                                    error = %e,
                                    "Consumer loop failed"
                                );

                                if failures >= self.config.max_failures {
                                    error!(
                                        threshold = self.config.max_failures,
                                        "Too many consecutive failures, terminating"
                                    );
                                    State::Terminated(ExitStatus::Fatal)
                                } else {
                                    State::Backoff
                                }
                            }
                        }
                    }
                }
                State::Backoff => {
                    // Shutdown cuts the backoff short; the token itself is
                    // still only acted on at the Running boundary
                    tokio::select! {
                        _ = sleep(self.config.backoff) => {}
                        _ = self.shutdown.triggered() => {}
                    }
                    State::Running
                }
                State::Terminated(status) => {
                    info!(code = status.code(), "Supervisor terminated");
                    return status;
                }
            };
        }
    }
}
