//! Ctrl+C handling.
//!
//! The first SIGINT or SIGTERM cancels a [`CancellationToken`]; fetch loops
//! and the download pipeline stop issuing new requests once it fires.
//! A second signal exits immediately.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Exit status after a forced second interrupt.
pub const FORCED_EXIT_STATUS: i32 = 130;

/// Install the signal listener and return the token it cancels.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let count = Arc::new(AtomicU32::new(0));

    let handler_token = token.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut sigterm = {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(sigterm) => Some(sigterm),
                Err(e) => {
                    tracing::warn!("Cannot listen for SIGTERM: {}", e);
                    None
                }
            }
        };

        loop {
            #[cfg(unix)]
            let received = match sigterm.as_mut() {
                Some(sigterm) => tokio::select! {
                    r = tokio::signal::ctrl_c() => r.is_ok(),
                    _ = sigterm.recv() => true,
                },
                None => tokio::signal::ctrl_c().await.is_ok(),
            };

            #[cfg(not(unix))]
            let received = tokio::signal::ctrl_c().await.is_ok();

            if !received {
                tracing::warn!("Cannot listen for Ctrl+C, interrupts will not be graceful");
                return;
            }

            if count.fetch_add(1, Ordering::SeqCst) == 0 {
                tracing::info!("Interrupt received, finishing in-flight requests...");
                tracing::info!("Press Ctrl+C again to force exit");
                handler_token.cancel();
            } else {
                tracing::warn!("Force exit requested");
                std::process::exit(FORCED_EXIT_STATUS);
            }
        }
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_tokens_observe_parent_cancel() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_install_returns_live_token() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
    }
}
