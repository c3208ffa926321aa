//! Web server command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "TASKBOARD_PORT", default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "TASKBOARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "taskboard.log")]
    pub log_file: PathBuf,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    println!();
    println!("  {} {}", "Taskboard".magenta().bold(), "Web Server".bold());
    println!();
    println!("  {}      http://{}:{}", "Board".green(), args.host, args.port);
    println!("  {}        http://{}:{}/api/projects", "API".green(), args.host, args.port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), args.host, args.port);
    if args.log {
        println!("  {}       {}", "Logs".green(), args.log_file.display());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    taskboard_web::run_server(&args.host, args.port).await
}
