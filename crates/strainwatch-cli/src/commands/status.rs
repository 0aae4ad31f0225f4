use std::sync::Arc;

use clap::Args;
use strainwatch_core::{Clock, Config, SystemClock};

#[derive(Args)]
pub struct StatusArgs {
    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
    /// Number of processes listed in today's usage breakdown
    #[arg(long, default_value = "5")]
    pub top: usize,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let clock = Arc::new(SystemClock);
    let (db, monitor) = super::restored_monitor(&config, clock.clone())?;
    let snapshot = monitor.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("fatigue:  {:.1} ({})", snapshot.value, snapshot.severity.label());
    println!(
        "today:    {}m engaged",
        snapshot.counters.today_active_seconds / 60
    );
    println!("forecast: {}", snapshot.forecast.describe());

    let usage = db.usage_for(clock.today())?;
    if !usage.is_empty() {
        println!("usage:");
        for record in usage.iter().take(args.top) {
            println!(
                "  {:<24} {:<13} {:>4}m {:02}s",
                record.process_name,
                record.category.as_str(),
                record.seconds / 60,
                record.seconds % 60
            );
        }
    }
    Ok(())
}
