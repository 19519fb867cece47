use std::fmt::Write as _;

use crate::projector::{Agenda, AgendaItem};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Plain-text agenda: the title line, then one line per event.
pub fn render_agenda(title: &str, agenda: &Agenda<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");

    if agenda.is_empty() {
        out.push_str("No events\n");
        return out;
    }

    match agenda {
        Agenda::Flat(items) => {
            for item in items {
                write_item(&mut out, item, "");
            }
        }
        Agenda::Grouped(groups) => {
            for group in groups {
                let _ = writeln!(out, "{}", group.department);
                for item in &group.items {
                    write_item(&mut out, item, "  ");
                }
            }
        }
    }

    out
}

fn write_item(out: &mut String, item: &AgendaItem<'_>, indent: &str) {
    let title = if item.event.title.is_empty() {
        "(untitled)"
    } else {
        item.event.title.as_str()
    };
    let _ = writeln!(
        out,
        "{indent}{}  [{}] {title}",
        item.event.date.format(DATE_FORMAT),
        item.calendar.color,
    );
}
