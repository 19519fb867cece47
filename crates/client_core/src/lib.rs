//! Account state for the agenda client: fetching snapshots and holding the
//! current one.

pub mod controller;
pub mod error;
pub mod fetcher;
pub mod notifier;

pub use controller::{AccountController, RefreshState};
pub use error::FetchError;
pub use fetcher::{AccountFetcher, HttpAccountFetcher, DEFAULT_FETCH_TIMEOUT};
pub use notifier::{Notifier, RecordingNotifier, StderrNotifier};
