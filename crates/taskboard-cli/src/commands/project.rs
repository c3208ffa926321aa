//! Project commands against a running server.

use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;

use taskboard_core::validation::RawProjectInput;
use taskboard_core::{MoveOutcome, ProjectStatus};

use crate::client::BoardClient;
use crate::output;

#[derive(Args)]
pub struct AddArgs {
    /// Project title
    pub title: String,

    /// Project description
    #[arg(short, long)]
    pub description: String,

    /// Number of people assigned
    #[arg(short, long)]
    pub people: String,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Project ID
    pub project_id: String,

    /// Target list (active, finished)
    pub status: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show one list (active, finished)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Show the two lists side by side
    #[arg(long)]
    pub board: bool,
}

fn parse_status(raw: &str) -> Result<ProjectStatus> {
    ProjectStatus::parse(raw).ok_or_else(|| {
        let valid: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();
        anyhow!("Unknown status '{}'. Expected one of: {}", raw, valid.join(", "))
    })
}

pub async fn add(args: AddArgs, url: &str) -> Result<()> {
    let client = BoardClient::new(url)?;
    let input = RawProjectInput {
        title: args.title,
        description: args.description,
        people: args.people,
    };

    match client.add(&input).await? {
        Ok(project) => {
            println!(
                "{} Added project: {} ({})",
                "✓".green().bold(),
                project.title.cyan(),
                project.id.dimmed()
            );
            Ok(())
        }
        Err(failure) => {
            output::print_rejection(&failure);
            bail!("Project was not added")
        }
    }
}

pub async fn move_project(args: MoveArgs, url: &str) -> Result<()> {
    let status = parse_status(&args.status)?;
    let client = BoardClient::new(url)?;

    let outcome = client.move_project(&args.project_id, status).await?;
    if let MoveOutcome::NotFound { id } = &outcome {
        bail!("No project with id {}", id);
    }
    output::print_move_outcome(&outcome);
    Ok(())
}

pub async fn list(args: ListArgs, url: &str) -> Result<()> {
    let filter = args.status.as_deref().map(parse_status).transpose()?;
    let client = BoardClient::new(url)?;

    let mut projects = client.list().await?;
    if let Some(status) = filter {
        projects.retain(|p| p.status == status);
    }

    if args.board {
        output::print_board(&projects);
    } else {
        output::print_projects_table(&projects);
    }
    Ok(())
}
