use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "strainwatch", version, about = "Strainwatch fatigue monitor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Classify a foreground process / window
    Classify(commands::classify::ClassifyArgs),
    /// Replay a steady activity pattern on a simulated clock
    Simulate(commands::simulate::SimulateArgs),
    /// Run the live monitor, reading samples from stdin
    Monitor(commands::monitor::MonitorArgs),
    /// Show the restored fatigue state
    Status(commands::status::StatusArgs),
    /// Cluster management
    Cluster {
        #[command(subcommand)]
        action: commands::cluster::ClusterAction,
    },
    /// Break-task history
    Tasks(commands::tasks::TasksArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STRAINWATCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Monitor(args) => commands::monitor::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Cluster { action } => commands::cluster::run(action),
        Commands::Tasks(args) => commands::tasks::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
