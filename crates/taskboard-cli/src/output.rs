//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use taskboard_core::validation::ValidationFailure;
use taskboard_core::{MoveOutcome, Project, ProjectStatus};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn status_colored(status: ProjectStatus) -> ColoredString {
    match status {
        ProjectStatus::Active => status.as_str().magenta(),
        ProjectStatus::Finished => status.as_str().blue(),
    }
}

fn label_colored(status: ProjectStatus, label: &str) -> ColoredString {
    match status {
        ProjectStatus::Active => label.magenta().bold(),
        ProjectStatus::Finished => label.blue().bold(),
    }
}

/// Print projects as a table.
pub fn print_projects_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("{}", "No projects found.".dimmed());
        return;
    }

    println!("{:<10} {:<30} {:<10} {:<6}", "ID", "Title", "Status", "People");
    println!("{}", "─".repeat(60));

    for project in projects {
        println!(
            "{:<10} {} {:<10} {:<6}",
            short_id(&project.id),
            pad_right(&truncate_visual(&project.title, 30), 30),
            status_colored(project.status),
            project.people
        );
    }

    println!();
    println!("{} project(s) total", projects.len());
}

/// Print the two lists side by side, or stacked on narrow terminals.
pub fn print_board(projects: &[Project]) {
    let width = term_width();
    let columns: Vec<(ProjectStatus, Vec<&Project>)> = ProjectStatus::ALL
        .iter()
        .map(|&status| (status, projects.iter().filter(|p| p.status == status).collect()))
        .collect();

    if width < 60 {
        print_board_stacked(&columns);
    } else {
        print_board_wide(&columns, width);
    }
}

fn print_board_stacked(columns: &[(ProjectStatus, Vec<&Project>)]) {
    for (status, cards) in columns {
        println!("{}", label_colored(*status, status.label()));
        if cards.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for card in cards {
            println!("  • {} {}", card.title, format!("({})", card.persons()).dimmed());
        }
        println!();
    }
}

fn print_board_wide(columns: &[(ProjectStatus, Vec<&Project>)], term_w: usize) {
    let col_width = ((term_w - 3) / columns.len()).clamp(20, 40);
    let border = |left: &str, mid: &str, right: &str| {
        let line = vec!["─".repeat(col_width); columns.len()].join(mid);
        println!("{}", format!("{}{}{}", left, line, right).dimmed());
    };

    border("┌", "┬", "┐");
    print!("{}", "│".dimmed());
    for (status, cards) in columns {
        let header = format!("{} {}", status.label(), cards.len());
        let header = truncate_visual(&header, col_width);
        let padding = col_width.saturating_sub(UnicodeWidthStr::width(header.as_str()));
        let left = padding / 2;
        print!(
            "{}{}{}{}",
            " ".repeat(left),
            label_colored(*status, &header),
            " ".repeat(padding - left),
            "│".dimmed()
        );
    }
    println!();
    border("├", "┼", "┤");

    // each card takes two rows: title, then people
    let rows = columns.iter().map(|(_, cards)| cards.len()).max().unwrap_or(0);
    for row in 0..rows {
        for line in 0..2 {
            print!("{}", "│".dimmed());
            for (_, cards) in columns {
                let cell = match (cards.get(row), line) {
                    (Some(card), 0) => format!(" {}", card.title),
                    (Some(card), _) => format!("   {}", card.persons()),
                    (None, _) => String::new(),
                };
                let cell = pad_right(&truncate_visual(&cell, col_width), col_width);
                if line == 0 {
                    print!("{}", cell);
                } else {
                    print!("{}", cell.dimmed());
                }
                print!("{}", "│".dimmed());
            }
            println!();
        }
    }
    border("└", "┴", "┘");
}

/// Print the result of a move.
pub fn print_move_outcome(outcome: &MoveOutcome) {
    match outcome {
        MoveOutcome::Moved { id, from, to } => println!(
            "{} Moved project {} from {} to {}",
            "✓".green().bold(),
            short_id(id).dimmed(),
            status_colored(*from),
            status_colored(*to)
        ),
        MoveOutcome::Unchanged { id, status } => println!(
            "{} Project {} is already {}",
            "·".dimmed(),
            short_id(id).dimmed(),
            status_colored(*status)
        ),
        MoveOutcome::NotFound { id } => println!("{} No project with id {}", "✗".red().bold(), id),
    }
}

/// Print a rejected submission with its per-field reasons.
pub fn print_rejection(failure: &ValidationFailure) {
    println!("{} {}", "✗".red().bold(), failure.message.red());
    for field in &failure.fields {
        let reasons: Vec<String> = field.violations.iter().map(|v| v.to_string()).collect();
        println!("    {}: {}", field.field.bold(), reasons.join(", "));
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("a longer title", 8), "a long..");
        assert_eq!(truncate_visual("日本語のタイトル", 7), "日本..");
    }

    #[test]
    fn test_pad_right_wide_chars() {
        assert_eq!(pad_right("日本", 6), "日本  ");
        assert_eq!(pad_right("toolong", 3), "toolong");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
