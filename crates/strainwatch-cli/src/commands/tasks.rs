use clap::Args;
use strainwatch_core::storage::{Database, FatigueStore};

#[derive(Args)]
pub struct TasksArgs {
    /// Number of tasks to show
    #[arg(long, default_value = "20")]
    pub limit: usize,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TasksArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tasks = db.list_break_tasks(args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("no break tasks recorded");
        return Ok(());
    }
    for t in &tasks {
        println!(
            "{}  {:<8}  {:<9}  credit {:>4.1}  {}",
            t.created_at.format("%Y-%m-%d %H:%M"),
            t.task_type.as_str(),
            t.result.as_str(),
            t.recovery_credit,
            t.trigger_reason.as_str(),
        );
    }
    Ok(())
}
