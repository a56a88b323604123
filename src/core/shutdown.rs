//! Run deadline and signal coordination
//!
//! The coordinating thread waits for whichever comes first: the configured
//! run deadline, an interrupt/terminate signal, or a worker failure that
//! already triggered the shared [`CancellationToken`]. The token is then
//! triggered, which releases every blocked worker.
//!
//! Signal handlers are tasks on the caller's runtime, so they only run while
//! that runtime is being driven. Keep driving it (e.g. by joining workers
//! through `spawn_blocking`) until the run is fully torn down, otherwise a
//! second signal cannot force the exit.

use crate::core::cancellation::{CancellationToken, Wake};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

/// Exit status used when a second signal abandons the graceful stop
pub const FORCED_EXIT_CODE: i32 = 130;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// The configured timeout elapsed
    Deadline,
    /// A termination signal arrived
    Signal,
    /// The token was triggered elsewhere, e.g. by a failing worker
    Cancelled,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShutdownReason::Deadline => "deadline",
            ShutdownReason::Signal => "signal",
            ShutdownReason::Cancelled => "cancelled",
        })
    }
}

/// Sending half shared by every signal handler
#[derive(Clone)]
struct ShutdownRequest {
    tx: broadcast::Sender<()>,
    requested: Arc<AtomicBool>,
}

impl ShutdownRequest {
    fn send(&self) {
        self.requested.store(true, Ordering::Release);
        let _ = self.tx.send(());
    }
}

/// Token listener that wakes the coordinator's async wait
struct TokenWaker(Notify);

impl Wake for TokenWaker {
    fn wake_all(&self) {
        // notify_one stores a permit if nobody is waiting yet
        self.0.notify_one();
    }
}

/// Bridges tokio signal handling to the worker cancellation token
pub struct ShutdownCoordinator {
    request: ShutdownRequest,
    token: Arc<CancellationToken>,
    token_waker: Arc<TokenWaker>,
}

impl ShutdownCoordinator {
    pub fn new(token: Arc<CancellationToken>) -> (Self, broadcast::Receiver<()>) {
        let (tx, shutdown_rx) = broadcast::channel(8);
        let token_waker = Arc::new(TokenWaker(Notify::new()));
        let listener: Weak<TokenWaker> = Arc::downgrade(&token_waker);
        token.register(listener);

        let coordinator = Self {
            request: ShutdownRequest {
                tx,
                requested: Arc::new(AtomicBool::new(false)),
            },
            token,
            token_waker,
        };

        (coordinator, shutdown_rx)
    }

    /// True once a termination signal has been received
    pub fn is_shutdown_requested(&self) -> bool {
        self.request.requested.load(Ordering::Acquire)
    }

    /// Wait for `deadline` or a shutdown request, then trigger the token
    ///
    /// Must be called from within a tokio runtime. Installs the process
    /// signal handlers on first use.
    pub async fn run_until(
        &self,
        deadline: Duration,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> ShutdownReason {
        setup_signal_handlers(self.request.clone());

        let reason = if self.is_shutdown_requested() {
            ShutdownReason::Signal
        } else if self.token.is_set() {
            ShutdownReason::Cancelled
        } else {
            tokio::select! {
                _ = tokio::time::sleep(deadline) => ShutdownReason::Deadline,
                _ = shutdown_rx.recv() => ShutdownReason::Signal,
                _ = self.token_waker.0.notified() => ShutdownReason::Cancelled,
            }
        };

        match reason {
            ShutdownReason::Deadline => {
                log::info!(
                    "Run time of {}s elapsed; stopping workers",
                    deadline.as_secs()
                )
            }
            ShutdownReason::Signal => log::warn!("Shutdown requested; stopping workers"),
            ShutdownReason::Cancelled => log::warn!("Run cancelled before the deadline"),
        }
        self.token.trigger();

        reason
    }
}

/// Install handlers that turn termination signals into a shutdown request
fn setup_signal_handlers(request: ShutdownRequest) {
    #[cfg(unix)]
    {
        // Restore default SIGPIPE so piping the summary into `head` exits quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use std::sync::atomic::AtomicUsize;
        use tokio::signal::unix::{signal, SignalKind};
        let signal_count = Arc::new(AtomicUsize::new(0));
        let signals = [
            SignalKind::interrupt(),
            SignalKind::terminate(),
            SignalKind::hangup(),
            SignalKind::quit(),
        ];

        for kind in signals {
            let request = request.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    while sig.recv().await.is_some() {
                        let prev = sig_ctr.fetch_add(1, Ordering::AcqRel);
                        request.send();
                        if prev >= 1 {
                            log::warn!("Second signal received; exiting immediately");
                            crate::core::logging::flush_logging();
                            std::process::exit(FORCED_EXIT_CODE);
                        }
                    }
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            let mut received = 0usize;
            while tokio::signal::ctrl_c().await.is_ok() {
                received += 1;
                request.send();
                if received >= 2 {
                    std::process::exit(FORCED_EXIT_CODE);
                }
            }
        });
    }
}
