//! Transient notifications.
//!
//! Every toast carries a sequence number. A dismissal timer only clears the
//! toast it was started for, so an old timer firing late leaves a newer toast
//! on screen.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::state::{AppEvent, AppState};

/// A visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Sequence number, increasing with every toast shown.
    pub seq: u64,
    /// Message text.
    pub message: String,
}

#[derive(Debug, Default)]
struct Slot {
    last_seq: u64,
    current: Option<Toast>,
}

/// Shows toasts and dismisses them after a delay.
#[derive(Debug, Clone)]
pub struct Notifier {
    state: AppState,
    slot: Arc<Mutex<Slot>>,
}

impl Notifier {
    /// Create a notifier that reports through `state`.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// The toast currently on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the notifier lock is poisoned.
    pub fn current(&self) -> Result<Option<Toast>> {
        Ok(self.lock()?.current.clone())
    }

    /// Show `message`, replacing any visible toast, and schedule its
    /// dismissal after `duration`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the notifier lock is poisoned.
    pub fn show(&self, message: impl Into<String>, duration: Duration) -> Result<JoinHandle<()>> {
        let toast = {
            let mut slot = self.lock()?;
            slot.last_seq += 1;
            let toast = Toast {
                seq: slot.last_seq,
                message: message.into(),
            };
            slot.current = Some(toast.clone());
            toast
        };

        debug!(seq = toast.seq, message = %toast.message, "Showing notification");
        self.state.publish(AppEvent::NotificationShown {
            seq: toast.seq,
            message: toast.message,
        });

        let notifier = self.clone();
        let seq = toast.seq;
        Ok(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Err(e) = notifier.dismiss(seq) {
                warn!(seq, error = %e, "Failed to dismiss notification");
            }
        }))
    }

    /// Dismiss the toast with sequence number `seq` if it is still visible.
    ///
    /// Returns `true` if a toast was hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the notifier lock is poisoned.
    pub fn dismiss(&self, seq: u64) -> Result<bool> {
        {
            let mut slot = self.lock()?;
            if slot.current.as_ref().map(|t| t.seq) != Some(seq) {
                debug!(seq, "Stale dismissal ignored");
                return Ok(false);
            }
            slot.current = None;
        }
        self.state.publish(AppEvent::NotificationDismissed { seq });
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Slot>> {
        self.slot.lock().map_err(|_| Error::StoreLock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use tokio::time::sleep;

    fn create_test_notifier() -> (AppState, Notifier) {
        let state = AppState::load(Arc::new(MemoryStore::new())).unwrap();
        let notifier = Notifier::new(state.clone());
        (state, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_dismissed_after_duration() {
        let (_, notifier) = create_test_notifier();
        notifier.show("Employee deleted", Duration::from_millis(1200)).unwrap();

        sleep(Duration::from_millis(1100)).await;
        assert_eq!(
            notifier.current().unwrap().map(|t| t.message),
            Some("Employee deleted".to_string())
        );

        sleep(Duration::from_millis(200)).await;
        assert!(notifier.current().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_keeps_newer_toast() {
        let (_, notifier) = create_test_notifier();
        notifier.show("first", Duration::from_millis(1200)).unwrap();
        sleep(Duration::from_millis(600)).await;
        notifier.show("second", Duration::from_millis(1200)).unwrap();

        // The first timer has fired by now.
        sleep(Duration::from_millis(700)).await;
        let toast = notifier.current().unwrap().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.seq, 2);

        sleep(Duration::from_millis(600)).await;
        assert!(notifier.current().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_published() {
        let (state, notifier) = create_test_notifier();
        let mut rx = state.subscribe();

        let handle = notifier.show("saved", Duration::from_millis(3000)).unwrap();
        handle.await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::NotificationShown {
                seq: 1,
                message: "saved".to_string()
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::NotificationDismissed { seq: 1 }
        );
    }

    #[test]
    fn test_dismiss_unknown_seq() {
        let (_, notifier) = create_test_notifier();
        assert!(!notifier.dismiss(7).unwrap());
    }
}
