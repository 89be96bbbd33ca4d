//! Terminal output helpers shared by all commands.
//!
//! Uses:
//! - `console` for colors (respects NO_COLOR, auto-disables when piped)
//! - `comfy-table` for the task table

use std::io::{self, Write};

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use console::style;

use crate::store::{TaskItem, TaskPriority, TaskStatus};

// ── Messages ───────────────────────────────────────────────────────

pub fn header(text: &str) {
    println!("{}", style(text).bold().cyan());
}

pub fn success(text: &str) {
    println!("{} {}", style("✓").green(), style(text).bright());
}

pub fn error(text: &str) {
    eprintln!("{} {}", style("✗").red(), style(text).bright());
}

pub fn warning(text: &str) {
    println!("{} {}", style("!").yellow(), style(text).bright());
}

pub fn dim(text: &str) {
    println!("{}", style(text).dim());
}

/// Print a key-value pair with a styled key.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", style(key).cyan().bold(), value);
}

// ── Prompts ────────────────────────────────────────────────────────

/// Ask a yes/no question; only an explicit `y`/`yes` counts as yes.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Read a password without echoing it back.
pub fn prompt_password(label: &str) -> io::Result<String> {
    let term = console::Term::stdout();
    term.write_str(&format!("{label}: "))?;
    term.read_secure_line()
}

// ── Tasks ──────────────────────────────────────────────────────────

fn column_header(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn status_cell(status: TaskStatus) -> Cell {
    let color = match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Completed => Color::Green,
    };
    Cell::new(status).fg(color)
}

fn priority_cell(priority: TaskPriority) -> Cell {
    let color = match priority {
        TaskPriority::Low => Color::Grey,
        TaskPriority::Medium => Color::Yellow,
        TaskPriority::High => Color::Red,
    };
    Cell::new(priority).fg(color)
}

/// Render the task list as a table.
pub fn task_table(tasks: &[TaskItem]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            column_header("ID"),
            column_header("Title"),
            column_header("Status"),
            column_header("Priority"),
            column_header("Updated"),
        ]);

    for task in tasks {
        table.add_row(vec![
            Cell::new(&task.id).fg(Color::Green),
            Cell::new(&task.title),
            status_cell(task.status),
            priority_cell(task.priority),
            Cell::new(task.updated_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
}

/// Render one task in full.
pub fn task_detail(task: &TaskItem) {
    header(&task.title);
    kv("id", &task.id);
    kv("status", &task.status.to_string());
    kv("priority", &task.priority.to_string());
    if !task.description.is_empty() {
        kv("description", &task.description);
    }
    kv("created", &task.created_at.format("%Y-%m-%d %H:%M").to_string());
    kv("updated", &task.updated_at.format("%Y-%m-%d %H:%M").to_string());
}
