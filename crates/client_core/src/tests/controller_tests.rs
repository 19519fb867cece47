use super::*;
use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::domain::{Calendar, CalendarId, Event, EventId};
use tokio::sync::oneshot;

use crate::notifier::RecordingNotifier;

fn account_with_calendar(color: &str) -> Account {
    Account {
        calendars: vec![Calendar {
            id: CalendarId(1),
            color: color.to_string(),
            events: vec![Event {
                id: EventId(1),
                title: "Planning".to_string(),
                date: Utc
                    .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
                    .single()
                    .expect("valid time"),
                department: Some("Sales".to_string()),
            }],
        }],
    }
}

struct ScriptedFetcher {
    results: Mutex<VecDeque<Result<Account, FetchError>>>,
    seen: Mutex<Vec<Account>>,
}

impl ScriptedFetcher {
    fn new(results: impl IntoIterator<Item = Result<Account, FetchError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<Account> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl AccountFetcher for ScriptedFetcher {
    async fn fetch(&self, current: &Account) -> Result<Account, FetchError> {
        self.seen.lock().expect("seen lock").push(current.clone());
        self.results
            .lock()
            .expect("results lock")
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted result".to_string())))
    }
}

/// Each fetch parks until the test hands it an account through a gate.
struct GatedFetcher {
    gates: Mutex<VecDeque<oneshot::Receiver<Account>>>,
}

#[async_trait]
impl AccountFetcher for GatedFetcher {
    async fn fetch(&self, _current: &Account) -> Result<Account, FetchError> {
        let gate = self
            .gates
            .lock()
            .expect("gates lock")
            .pop_front()
            .expect("gate available");
        gate.await
            .map_err(|_| FetchError::Transport("gate dropped".to_string()))
    }
}

fn controller(
    fetcher: Arc<dyn AccountFetcher>,
) -> (AccountController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = AccountController::new(fetcher, notifier.clone());
    (controller, notifier)
}

#[tokio::test]
async fn starts_idle_with_factory_account() {
    let (controller, _notifier) = controller(Arc::new(ScriptedFetcher::new([])));
    assert_eq!(controller.state(), RefreshState::Idle);
    assert_eq!(controller.account().await, create_account());
}

#[tokio::test]
async fn successful_refresh_replaces_account() {
    let updated = account_with_calendar("red");
    let fetcher = Arc::new(ScriptedFetcher::new([Ok(updated.clone())]));
    let (controller, notifier) = controller(fetcher.clone());

    controller.refresh().await.expect("refresh");

    assert_eq!(controller.account().await, updated);
    assert_eq!(controller.state(), RefreshState::Idle);
    assert_eq!(fetcher.seen(), vec![create_account()]);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn refresh_passes_currently_held_account_to_fetcher() {
    let first = account_with_calendar("red");
    let second = account_with_calendar("blue");
    let fetcher = Arc::new(ScriptedFetcher::new([Ok(first.clone()), Ok(second.clone())]));
    let (controller, _notifier) = controller(fetcher.clone());

    controller.refresh().await.expect("first refresh");
    controller.refresh().await.expect("second refresh");

    assert_eq!(fetcher.seen(), vec![create_account(), first]);
    assert_eq!(controller.account().await, second);
}

#[tokio::test]
async fn unexpected_error_is_reported_and_swallowed() {
    let initial = account_with_calendar("red");
    let fetcher = Arc::new(ScriptedFetcher::new([Err(FetchError::Unexpected)]));
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = AccountController::with_account(initial.clone(), fetcher, notifier.clone());

    controller.refresh().await.expect("handled failure resolves");

    assert_eq!(controller.account().await, initial);
    assert_eq!(
        notifier.messages(),
        vec!["Failed to refresh agenda: Unexpected error".to_string()]
    );
    assert_eq!(controller.state(), RefreshState::Idle);
}

#[tokio::test]
async fn other_errors_propagate_unchanged() {
    let initial = account_with_calendar("red");
    let failure = FetchError::Transport("Network down".to_string());
    let fetcher = Arc::new(ScriptedFetcher::new([Err(failure.clone())]));
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = AccountController::with_account(initial.clone(), fetcher, notifier.clone());

    let err = controller.refresh().await.expect_err("unhandled failure");

    assert_eq!(err, failure);
    assert_eq!(err.to_string(), "Network down");
    assert_eq!(controller.account().await, initial);
    assert!(notifier.messages().is_empty());
    assert_eq!(controller.state(), RefreshState::Idle);
}

#[tokio::test]
async fn rejected_api_error_propagates() {
    let failure = FetchError::Rejected {
        code: shared::error::ErrorCode::Validation,
        message: "missing field `account`".to_string(),
    };
    let (controller, notifier) = controller(Arc::new(ScriptedFetcher::new([Err(failure.clone())])));

    assert_eq!(controller.refresh().await, Err(failure));
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn refreshing_is_reported_while_waiting_for_the_held_account() {
    let updated = account_with_calendar("red");
    let (controller, _notifier) = controller(Arc::new(ScriptedFetcher::new([Ok(updated.clone())])));

    let writer = controller.account.write().await;
    let observe = {
        let controller = &controller;
        async move {
            while controller.refreshes_in_flight() == 0 {
                tokio::task::yield_now().await;
            }
            assert_eq!(controller.state(), RefreshState::Refreshing);
            drop(writer);
        }
    };

    let (refreshed, ()) = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        async { tokio::join!(controller.refresh(), observe) },
    )
    .await
    .expect("refresh waits on the held account, not forever");
    refreshed.expect("refresh");

    assert_eq!(controller.account().await, updated);
    assert_eq!(controller.state(), RefreshState::Idle);
}

#[tokio::test]
async fn overlapping_refreshes_keep_the_last_resolved_snapshot() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let fetcher = Arc::new(GatedFetcher {
        gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
    });
    let (controller, _notifier) = controller(fetcher);

    let resolved_first = account_with_calendar("red");
    let resolved_last = account_with_calendar("blue");

    let release = async {
        while controller.refreshes_in_flight() < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.state(), RefreshState::Refreshing);

        second_tx.send(resolved_first.clone()).expect("second gate");
        while controller.account().await != resolved_first {
            tokio::task::yield_now().await;
        }
        first_tx.send(resolved_last.clone()).expect("first gate");
    };

    let (a, b, ()) = tokio::join!(controller.refresh(), controller.refresh(), release);
    a.expect("refresh a");
    b.expect("refresh b");

    assert_eq!(controller.account().await, resolved_last);
    assert_eq!(controller.state(), RefreshState::Idle);
}
