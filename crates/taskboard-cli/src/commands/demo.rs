//! Headless board session.
//!
//! Drives the same components the server renders: submits through the
//! form, drags a card through the list drop targets, then prints the board.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;

use taskboard_core::dom::EventOutcome;
use taskboard_core::validation::RawProjectInput;
use taskboard_core::{BoardApp, ProjectStatus};

use crate::output;

#[derive(Args)]
pub struct DemoArgs {
    /// Print the rendered page markup at the end
    #[arg(long)]
    pub html: bool,
}

fn input(title: &str, description: &str, people: &str) -> RawProjectInput {
    RawProjectInput {
        title: title.to_string(),
        description: description.to_string(),
        people: people.to_string(),
    }
}

fn step(n: usize, text: &str) {
    println!();
    println!("{} {}", format!("[{}]", n).magenta().bold(), text.bold());
}

pub fn execute(args: DemoArgs) -> Result<()> {
    let mut app = BoardApp::new()?;

    let notifications = Rc::new(Cell::new(0usize));
    {
        let notifications = notifications.clone();
        app.subscribe(move |_| notifications.set(notifications.get() + 1));
    }

    step(1, "Submitting projects through the form");
    let submissions = [
        input("Build API", "Routes for the board", "3"),
        input("Write docs", "Guide for new users", "1"),
        input("", "tiny", "9"),
    ];
    for submission in &submissions {
        match app.submit(submission)? {
            EventOutcome::Added(project) => println!(
                "  {} {} ({})",
                "✓".green().bold(),
                project.title.cyan(),
                project.persons().dimmed()
            ),
            EventOutcome::Rejected(failure) => output::print_rejection(&failure),
            EventOutcome::Move(_) => {}
        }
    }

    let first = app
        .snapshot()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("No project was added"))?;

    step(2, &format!("Dragging '{}' onto FINISHED PROJECTS", first.title));
    let outcome = app.move_via_drag(&first.id, ProjectStatus::Finished)?;
    output::print_move_outcome(&outcome);

    step(3, "Dropping it on the same list again");
    let outcome = app.move_via_drag(&first.id, ProjectStatus::Finished)?;
    output::print_move_outcome(&outcome);

    step(4, "Board");
    output::print_board(&app.snapshot());
    println!();
    println!("{} store notification(s)", notifications.get());

    if args.html {
        println!();
        println!("{}", app.render_html()?);
    }
    Ok(())
}
