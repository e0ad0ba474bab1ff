//! profilectl - turn profile subscriptions into Flux manifests

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;
mod writer;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "profilectl")]
#[command(author = "profilectl Contributors")]
#[command(version)]
#[command(about = "Resolve Flux profile subscriptions into deployable manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Profile catalog URL
    #[arg(long, global = true, env = "PROFILECTL_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a profile installation
    #[command(visible_alias = "install")]
    Add {
        /// Name of the installation
        #[arg(long)]
        name: String,

        /// Namespace for generated resources [default: default]
        #[arg(long)]
        namespace: Option<String>,

        /// Branch of the profile repository [default: main]
        #[arg(long)]
        profile_branch: Option<String>,

        /// Key in the `<name>-values` ConfigMap holding values for this profile
        #[arg(long)]
        config_map: Option<String>,

        /// Directory to create the installation folder in
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// URL of the repository holding the profile
        #[arg(long)]
        profile_repo_url: Option<String>,

        /// Path to the profile inside the repository
        #[arg(long, default_value = ".")]
        profile_path: String,

        /// Read repositories from a local mirror instead of cloning
        #[arg(long)]
        local_root: Option<PathBuf>,

        /// Catalog entry: <CATALOG>/<PROFILE>[/<VERSION>]
        catalog_ref: Option<String>,
    },

    /// Resolve a subscription file and print its manifests
    Resolve {
        /// ProfileSubscription file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        output: OutputFormat,

        /// Read repositories from a local mirror instead of cloning
        #[arg(long)]
        local_root: Option<PathBuf>,
    },

    /// Search the catalog for profiles
    Search {
        /// Profile name to look for
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show a catalog profile
    Show {
        /// Catalog entry: <CATALOG>/<PROFILE>[/<VERSION>]
        reference: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog_url = cli.catalog_url.as_deref();
    let result = match cli.command {
        Commands::Add {
            name,
            namespace,
            profile_branch,
            config_map,
            out,
            profile_repo_url,
            profile_path,
            local_root,
            catalog_ref,
        } => commands::add::run(&commands::add::AddOptions {
            namespace: namespace.as_deref(),
            profile_branch: profile_branch.as_deref(),
            config_map: config_map.as_deref(),
            profile_repo_url: profile_repo_url.as_deref(),
            profile_path: &profile_path,
            catalog_ref: catalog_ref.as_deref(),
            catalog_url,
            local_root: local_root.as_deref(),
            ..commands::add::AddOptions::new(&name, &out)
        }),

        Commands::Resolve {
            file,
            output,
            local_root,
        } => commands::resolve::run(&file, output, local_root.as_deref()),

        Commands::Search { name, output } => commands::search::run(&name, catalog_url, output),

        Commands::Show { reference, output } => {
            commands::show::run(&reference, catalog_url, output)
        }
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
