use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use shared::domain::{create_account, Account};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::{error::FetchError, fetcher::AccountFetcher, notifier::Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Holds the current account snapshot and replaces it on refresh.
///
/// Overlapping refreshes are not coalesced: each one fetches independently
/// and whichever resolves last leaves its snapshot in place.
pub struct AccountController {
    fetcher: Arc<dyn AccountFetcher>,
    notifier: Arc<dyn Notifier>,
    account: RwLock<Account>,
    in_flight: AtomicUsize,
}

impl AccountController {
    pub fn new(fetcher: Arc<dyn AccountFetcher>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_account(create_account(), fetcher, notifier)
    }

    pub fn with_account(
        account: Account,
        fetcher: Arc<dyn AccountFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            account: RwLock::new(account),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn account(&self) -> Account {
        self.account.read().await.clone()
    }

    pub fn state(&self) -> RefreshState {
        if self.refreshes_in_flight() == 0 {
            RefreshState::Idle
        } else {
            RefreshState::Refreshing
        }
    }

    pub fn refreshes_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Fetches a new snapshot and swaps it in.
    ///
    /// `FetchError::Unexpected` is logged, reported through the notifier and
    /// swallowed. Any other failure is returned; in both cases the held
    /// account is left as it was.
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let _in_flight = InFlight::enter(&self.in_flight);
        let current = self.account().await;
        debug!(calendars = current.calendars.len(), "refreshing account");

        match self.fetcher.fetch(&current).await {
            Ok(updated) => {
                info!(
                    calendars = updated.calendars.len(),
                    events = updated.event_count(),
                    "account refreshed"
                );
                *self.account.write().await = updated;
                Ok(())
            }
            Err(err @ FetchError::Unexpected) => {
                error!(error = %err, "account refresh failed");
                self.notifier.notify(&format!("Failed to refresh agenda: {err}"));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "account refresh failed; returning error to caller");
                Err(err)
            }
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
