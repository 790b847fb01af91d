mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pbix-extract")]
#[command(about = "Extract the semantic model and table data from Power BI .pbix files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show a summary of the data model")]
    Info {
        #[arg(help = "Path to the .pbix file")]
        path: String,
    },
    #[command(about = "Print the semantic model as JSON")]
    Model {
        #[arg(help = "Path to the .pbix file")]
        path: String,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(about = "List the data model's table names")]
    Tables {
        #[arg(help = "Path to the .pbix file")]
        path: String,
    },
    #[command(about = "Decode one table's data as JSON")]
    Table {
        #[arg(help = "Path to the .pbix file")]
        path: String,
        #[arg(help = "Table name")]
        name: String,
        #[arg(long, help = "Limit the number of rows emitted")]
        limit: Option<usize>,
        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { path } => commands::info::run(&path),
        Commands::Model { path, pretty } => commands::model::run(&path, pretty),
        Commands::Tables { path } => commands::tables::run(&path),
        Commands::Table {
            path,
            name,
            limit,
            pretty,
        } => commands::table::run(&path, &name, limit, pretty),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
