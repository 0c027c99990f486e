use crate::render::{run_list, run_normalize, run_show, ListArgs, NormalizeArgs, ShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vastrabo::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Västrabo",
    about = "Look up Västra Götaland municipalities and their housing-portal links",
    version
)]
struct Cli {
    /// Load kommuner.csv/hyresvardar.csv from this directory instead of the built-in table
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect municipalities from the command line
    Kommun {
        #[command(subcommand)]
        command: KommunCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KommunCommand {
    /// List every municipality in the catalog
    List(ListArgs),
    /// Show landlords, portal links and commute details for one municipality
    Show(ShowArgs),
    /// Print every derived name form and portal link for an arbitrary name
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let catalog_dir = cli.catalog_dir;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, catalog_dir).await,
        Command::Kommun { command } => match command {
            KommunCommand::List(args) => run_list(args, catalog_dir),
            KommunCommand::Show(args) => run_show(args, catalog_dir),
            KommunCommand::Normalize(args) => run_normalize(args, catalog_dir),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["vastrabo-api"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(cli.catalog_dir.is_none());
    }

    #[test]
    fn parses_show_with_global_catalog_dir() {
        let cli = Cli::try_parse_from([
            "vastrabo-api",
            "kommun",
            "show",
            "Lilla Edet",
            "--json",
            "--catalog-dir",
            "/srv/data",
        ])
        .expect("parses");
        assert_eq!(cli.catalog_dir, Some(PathBuf::from("/srv/data")));
        match cli.command {
            Some(Command::Kommun {
                command: KommunCommand::Show(args),
            }) => {
                assert_eq!(args.name, "Lilla Edet");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_name() {
        assert!(Cli::try_parse_from(["vastrabo-api", "kommun", "show"]).is_err());
    }
}
