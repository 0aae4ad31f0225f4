use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use strainwatch_core::{
    BreakTaskResult, Clock, Config, Event, FatigueSnapshot, ForegroundContext, ManualClock, Monitor,
    TickSample,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Simulated minutes
    #[arg(long, default_value = "60")]
    pub minutes: u32,
    /// Idle seconds reported on every tick
    #[arg(long, default_value = "0")]
    pub idle_seconds: f64,
    /// Audio is playing
    #[arg(long)]
    pub audio: bool,
    /// Foreground process
    #[arg(long)]
    pub process: Option<String>,
    /// Foreground window title
    #[arg(long, default_value = "")]
    pub title: String,
    /// Starting fatigue value
    #[arg(long, default_value = "0")]
    pub start: f64,
    /// How break tasks are settled once their duration has passed
    #[arg(long, default_value = "completed", value_parser = parse_result)]
    pub settle: BreakTaskResult,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

fn parse_result(s: &str) -> Result<BreakTaskResult, String> {
    match BreakTaskResult::parse(s) {
        Some(BreakTaskResult::Pending) | None => {
            Err(format!("expected completed, snoozed or skipped, got '{s}'"))
        }
        Some(result) => Ok(result),
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut monitor = Monitor::new(&config, Vec::new(), clock.clone());
    let restored = monitor.restore(Some(&FatigueSnapshot::new(args.start, clock.now())), 0);
    emit(&args, &restored)?;

    let mut sample = TickSample::new(args.idle_seconds, args.audio);
    if let Some(process) = &args.process {
        sample = sample.with_foreground(ForegroundContext::new(process.clone(), args.title.clone()));
    }

    for second in 0..u64::from(args.minutes) * 60 {
        let mut events = monitor.tick(&sample);
        events.extend(monitor.evaluate_intervention().into_events());

        if let Some(task) = monitor.breaks().pending().cloned() {
            let elapsed = (clock.now() - task.created_at).num_seconds();
            if elapsed >= i64::from(task.duration_seconds) {
                if let Some(settled) = monitor.settle_break_task(&task.id, args.settle) {
                    events.extend(settled.into_events());
                }
            }
        }

        for event in &events {
            emit(&args, event)?;
        }
        if !args.json && (second + 1) % 60 == 0 {
            let snap = monitor.snapshot();
            println!(
                "{:>4}m  fatigue {:>5.1}  slope {:>+6.2}/min  {:<10}  {}",
                (second + 1) / 60,
                snap.value,
                snap.slope,
                snap.severity.label(),
                snap.forecast.describe(),
            );
        }
        clock.advance_secs(1);
    }

    if args.json {
        println!("{}", serde_json::to_string(&monitor.snapshot())?);
    }
    Ok(())
}

fn emit(args: &SimulateArgs, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::ActivityChanged { from, to, .. } => println!("      activity {from:?} -> {to:?}"),
        Event::SeverityChanged { from, to, value, .. } => {
            println!("      severity {} -> {} at {value:.1}", from.label(), to.label())
        }
        Event::ThresholdReached { value, .. } => println!("      threshold reached at {value:.1}"),
        Event::Intervention { record } => println!("      {:?}: {}", record.level, record.message),
        Event::BreakTaskCreated { task } => println!(
            "      break {} ({}s, {})",
            task.task_type.as_str(),
            task.duration_seconds,
            task.trigger_reason.as_str()
        ),
        Event::BreakTaskSettled { task } => println!(
            "      break {} {} (credit {:.1})",
            task.task_type.as_str(),
            task.result.as_str(),
            task.recovery_credit
        ),
        Event::FatigueRestored { value, .. } => println!("      starting at {value:.1}"),
    }
    Ok(())
}
