//! # Payment Processing
//!
//! Simulated payment terminal. Authorization is a timed wait that the
//! cashier can abort at any point before it completes.
//!
//! ## Authorization Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Payment Authorization                                │
//! │                                                                         │
//! │  begin() ──► (PaymentCancelHandle, PendingPayment)                      │
//! │                      │                      │                           │
//! │                      │                      ▼                           │
//! │                      │        authorize(tender, pending)                │
//! │                      │                      │                           │
//! │                      │         ┌────────────┴─────────────┐             │
//! │                      │         │  select!                 │             │
//! │                      │         │   sleep(processing +     │──► Ok(())   │
//! │                      │         │         confirmation)    │             │
//! │                      └── cancel() ──► signal received     │──► Cancelled│
//! │                                └──────────────────────────┘             │
//! │                                                                         │
//! │  Dropping the handle without cancelling lets the payment finish.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use till_core::Tender;

use crate::state::config::PaymentSettings;

/// Payment failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The cashier aborted before authorization completed.
    #[error("Payment cancelled")]
    Cancelled,
}

/// Cancels an in-flight payment.
#[derive(Debug)]
pub struct PaymentCancelHandle {
    signal: oneshot::Sender<()>,
}

impl PaymentCancelHandle {
    /// Signals the payment to stop. Returns false if it already finished.
    pub fn cancel(self) -> bool {
        self.signal.send(()).is_ok()
    }

    /// True once the matching authorization is no longer waiting.
    pub fn is_finished(&self) -> bool {
        self.signal.is_closed()
    }
}

/// The receiving half handed to `authorize`.
#[derive(Debug)]
pub struct PendingPayment {
    cancelled: oneshot::Receiver<()>,
}

/// Simulated payment terminal.
#[derive(Debug, Clone, Copy)]
pub struct PaymentProcessor {
    processing_delay: Duration,
    confirmation_delay: Duration,
}

impl PaymentProcessor {
    pub fn new(processing_delay: Duration, confirmation_delay: Duration) -> Self {
        PaymentProcessor {
            processing_delay,
            confirmation_delay,
        }
    }

    pub fn from_config(settings: &PaymentSettings) -> Self {
        PaymentProcessor::new(settings.processing_delay(), settings.confirmation_delay())
    }

    /// Total time a payment waits before completing.
    pub fn authorization_window(&self) -> Duration {
        self.processing_delay + self.confirmation_delay
    }

    /// Opens a cancellation channel for one payment.
    pub fn begin() -> (PaymentCancelHandle, PendingPayment) {
        let (signal, cancelled) = oneshot::channel();
        (
            PaymentCancelHandle { signal },
            PendingPayment { cancelled },
        )
    }

    /// Waits out the authorization window unless cancelled first.
    ///
    /// ## Returns
    /// * `Ok(())` - Authorized, the sale may be recorded
    /// * `Err(PaymentError::Cancelled)` - Nothing may be recorded
    pub async fn authorize(&self, tender: &Tender, pending: PendingPayment) -> Result<(), PaymentError> {
        debug!(
            method = %tender.method,
            window_ms = self.authorization_window().as_millis() as u64,
            "Payment processing"
        );

        let delay = tokio::time::sleep(self.authorization_window());
        tokio::pin!(delay);

        tokio::select! {
            _ = &mut delay => {
                info!(method = %tender.method, "Payment authorized");
                Ok(())
            }
            signal = pending.cancelled => match signal {
                Ok(()) => {
                    warn!(method = %tender.method, "Payment cancelled");
                    Err(PaymentError::Cancelled)
                }
                Err(_) => {
                    // Handle dropped without cancelling.
                    delay.await;
                    info!(method = %tender.method, "Payment authorized");
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn processor() -> PaymentProcessor {
        PaymentProcessor::new(Duration::from_millis(2000), Duration::from_millis(1500))
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorize_waits_full_window() {
        let (_handle, pending) = PaymentProcessor::begin();
        let start = Instant::now();

        processor().authorize(&Tender::card(), pending).await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_processing() {
        let (handle, pending) = PaymentProcessor::begin();
        let start = Instant::now();

        let task = tokio::spawn(async move { processor().authorize(&Tender::card(), pending).await });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!handle.is_finished());
        assert!(handle.cancel());

        assert_eq!(task.await.unwrap(), Err(PaymentError::Cancelled));
        assert!(start.elapsed() < Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_still_authorizes() {
        let (handle, pending) = PaymentProcessor::begin();
        drop(handle);

        let result = processor().authorize(&Tender::digital(), pending).await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_completion_reports_false() {
        let (handle, pending) = PaymentProcessor::begin();

        processor().authorize(&Tender::card(), pending).await.unwrap();

        assert!(handle.is_finished());
        assert!(!handle.cancel());
    }
}
