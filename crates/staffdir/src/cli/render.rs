//! Text rendering of directory data for the terminal.

use std::fmt::Write as _;

use crate::employee::Employee;
use crate::format::{format_optional_date, format_phone};
use crate::i18n::Messages;
use crate::list::PageWindow;

const TABLE_COLUMNS: [&str; 9] = [
    "firstName",
    "lastName",
    "employmentDate",
    "birthDate",
    "phone",
    "email",
    "department",
    "position",
    "id",
];

fn row(employee: &Employee) -> [String; 9] {
    [
        employee.first_name.clone(),
        employee.last_name.clone(),
        format_optional_date(employee.employment_date),
        format_optional_date(employee.birth_date),
        format_phone(&employee.phone),
        employee.email.clone(),
        employee.department.to_string(),
        employee.position.to_string(),
        employee.id.to_string(),
    ]
}

/// One line per employee.
#[must_use]
pub fn plain(employees: &[&Employee]) -> String {
    employees
        .iter()
        .map(|e| {
            format!(
                "{}\t{}\t{}\t{}\t{}/{}\n",
                e.id,
                e.full_name(),
                format_phone(&e.phone),
                e.email,
                e.department,
                e.position
            )
        })
        .collect()
}

/// An aligned table with translated headers.
#[must_use]
pub fn table(employees: &[&Employee], messages: &Messages) -> String {
    let headers: Vec<&str> = TABLE_COLUMNS.into_iter().map(|key| messages.get(key)).collect();
    let rows: Vec<[String; 9]> = employees.iter().map(|e| row(e)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for cells in &rows {
        push_row(&mut out, cells.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// A card per employee with translated labels.
#[must_use]
pub fn cards(employees: &[&Employee], messages: &Messages) -> String {
    employees
        .iter()
        .map(|e| detail(e, messages))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every field of one employee, one per line.
#[must_use]
pub fn detail(employee: &Employee, messages: &Messages) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", employee.id, employee.full_name());
    for (key, value) in TABLE_COLUMNS.into_iter().zip(row(employee)).take(8) {
        let _ = writeln!(out, "  {:<20} {value}", messages.get(key));
    }
    out
}

/// The pagination bar, or `None` when there is a single page.
#[must_use]
pub fn pagination(window: Option<&PageWindow>, messages: &Messages) -> Option<String> {
    let window = window?;
    let mut parts: Vec<String> = Vec::new();
    if window.first {
        parts.push("1".to_string());
    }
    if window.leading_gap {
        parts.push("...".to_string());
    }
    for page in &window.pages {
        if *page == window.current {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    if window.trailing_gap {
        parts.push("...".to_string());
    }
    if window.last {
        parts.push(window.total.to_string());
    }
    Some(format!(
        "{} {}/{}: < {} >",
        messages.get("page"),
        window.current,
        window.total,
        parts.join(" ")
    ))
}
