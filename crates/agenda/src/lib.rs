//! Agenda derivation: turns an account snapshot into the ordered event list the
//! agenda view displays, plus the small pieces of text around it.

pub mod greeting;
pub mod projector;
pub mod render;

pub use greeting::greeting;
pub use projector::{
    calendar_options, departments, group_by_department, project, sorted_items, Agenda,
    AgendaItem, AgendaQuery, CalendarFilter, CalendarOption, Department, DepartmentGroup,
    ALL_CALENDARS,
};
pub use render::render_agenda;
