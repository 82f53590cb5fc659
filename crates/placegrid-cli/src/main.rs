use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "placegrid",
    about = "placegrid — locality-aware container placement",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute locality preferences for the containers in a scenario file.
    ///
    /// Prints one line per requested container: the preferred hosts and
    /// racks, or `<any>` for containers requested without a preference.
    Plan {
        /// Scenario file
        #[arg(short, long, default_value = "placegrid.toml")]
        file: String,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write a sample placegrid.toml
    Init {
        /// Directory to write into (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("placegrid=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { file, format } => commands::plan::plan(&file, &format),
        Commands::Init { path } => commands::init::init(&path),
    }
}
