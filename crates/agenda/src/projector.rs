use std::{convert::Infallible, fmt, str::FromStr};

use shared::domain::{Account, Calendar, Event};

/// Selector value meaning "every calendar".
pub const ALL_CALENDARS: &str = "all";

const NO_DEPARTMENT_LABEL: &str = "No Department";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CalendarFilter {
    #[default]
    All,
    Color(String),
}

impl CalendarFilter {
    pub fn matches(&self, calendar: &Calendar) -> bool {
        match self {
            Self::All => true,
            Self::Color(color) => *color == calendar.color,
        }
    }
}

impl FromStr for CalendarFilter {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(ALL_CALENDARS) {
            Ok(Self::All)
        } else {
            Ok(Self::Color(value.to_string()))
        }
    }
}

impl fmt::Display for CalendarFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CALENDARS),
            Self::Color(color) => f.write_str(color),
        }
    }
}

/// View settings owned by the caller and passed in on every projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaQuery {
    pub calendar: CalendarFilter,
    pub group_by_department: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaItem<'a> {
    pub calendar: &'a Calendar,
    pub event: &'a Event,
}

impl<'a> AgendaItem<'a> {
    pub fn department(&self) -> Department<'a> {
        match self.event.department.as_deref() {
            Some(label) => Department::Named(label),
            None => Department::Unassigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department<'a> {
    Named(&'a str),
    /// Bucket for events that carry no department label.
    Unassigned,
}

impl Department<'_> {
    pub fn label(&self) -> &str {
        match self {
            Self::Named(label) => label,
            Self::Unassigned => NO_DEPARTMENT_LABEL,
        }
    }
}

impl fmt::Display for Department<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentGroup<'a> {
    pub department: Department<'a>,
    pub items: Vec<AgendaItem<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Agenda<'a> {
    Flat(Vec<AgendaItem<'a>>),
    Grouped(Vec<DepartmentGroup<'a>>),
}

impl<'a> Agenda<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(items) => items.len(),
            Self::Grouped(groups) => groups.iter().map(|group| group.items.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every item in display order; groups are concatenated in group order.
    pub fn items(&self) -> Box<dyn Iterator<Item = &AgendaItem<'a>> + '_> {
        match self {
            Self::Flat(items) => Box::new(items.iter()),
            Self::Grouped(groups) => Box::new(groups.iter().flat_map(|group| group.items.iter())),
        }
    }
}

/// Derives the agenda for `account` under `query`.
pub fn project<'a>(account: &'a Account, query: &AgendaQuery) -> Agenda<'a> {
    let items = sorted_items(account, &query.calendar);
    if query.group_by_department {
        Agenda::Grouped(group_by_department(items))
    } else {
        Agenda::Flat(items)
    }
}

/// Events of the matching calendars, ordered by date.
///
/// The sort is stable, so events sharing a date keep calendar order and then
/// their order inside the calendar.
pub fn sorted_items<'a>(account: &'a Account, filter: &CalendarFilter) -> Vec<AgendaItem<'a>> {
    let mut items: Vec<AgendaItem<'a>> = account
        .calendars
        .iter()
        .filter(|calendar| filter.matches(calendar))
        .flat_map(|calendar| {
            calendar
                .events
                .iter()
                .map(move |event| AgendaItem { calendar, event })
        })
        .collect();
    items.sort_by_key(|item| item.event.date);
    items
}

/// Distinct departments of `items`, in order of first appearance.
pub fn departments<'a>(items: &[AgendaItem<'a>]) -> Vec<Department<'a>> {
    let mut seen = Vec::new();
    for item in items {
        let department = item.department();
        if !seen.contains(&department) {
            seen.push(department);
        }
    }
    seen
}

/// Splits already-sorted items into per-department groups.
///
/// Groups appear in first-occurrence order and keep the relative order of
/// their items.
pub fn group_by_department(items: Vec<AgendaItem<'_>>) -> Vec<DepartmentGroup<'_>> {
    departments(&items)
        .into_iter()
        .map(|department| DepartmentGroup {
            department,
            items: items
                .iter()
                .copied()
                .filter(|item| item.department() == department)
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOption {
    pub label: String,
    pub value: CalendarFilter,
}

/// Choices for the calendar selector: "All", then one entry per calendar.
pub fn calendar_options(account: &Account) -> Vec<CalendarOption> {
    std::iter::once(CalendarOption {
        label: "All".to_string(),
        value: CalendarFilter::All,
    })
    .chain(account.calendars.iter().map(|calendar| CalendarOption {
        label: calendar.color.clone(),
        value: CalendarFilter::Color(calendar.color.clone()),
    }))
    .collect()
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
