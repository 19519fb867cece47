use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(CalendarId);
id_newtype!(EventId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: CalendarId,
    /// Color tag shown in the calendar selector; doubles as the filter key.
    pub color: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Snapshot of everything the agenda shows for one user.
///
/// An account is never edited in place: a refresh swaps the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub calendars: Vec<Calendar>,
}

impl Account {
    pub fn event_count(&self) -> usize {
        self.calendars
            .iter()
            .map(|calendar| calendar.events.len())
            .sum()
    }
}

/// Account held before the first refresh completes.
pub fn create_account() -> Account {
    Account::default()
}
