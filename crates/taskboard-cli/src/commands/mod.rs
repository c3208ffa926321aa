//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::client::DEFAULT_URL;

pub mod demo;
pub mod project;
pub mod serve;

/// Project board with drag-and-drop lists
#[derive(Parser)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of a running board server
    #[arg(long, global = true, env = "TASKBOARD_URL", default_value = DEFAULT_URL)]
    pub url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(serve::ServeArgs),

    /// Run a scripted board session in-process
    Demo(demo::DemoArgs),

    /// Add a project on the running server
    Add(project::AddArgs),

    /// Move a project to another list on the running server
    Move(project::MoveArgs),

    /// Show the projects of the running server
    List(project::ListArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Demo(args) => demo::execute(args),
            Commands::Add(args) => project::add(args, &self.url).await,
            Commands::Move(args) => project::move_project(args, &self.url).await,
            Commands::List(args) => project::list(args, &self.url).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["taskboard", "add", "Docs", "-d", "Write the guide", "-p", "2"]).unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.title, "Docs");
                assert_eq!(args.description, "Write the guide");
                assert_eq!(args.people, "2");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["taskboard", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert!(!args.log);
                assert!(args.port > 0);
            }
            _ => panic!("expected serve"),
        }
    }
}
