//! Live monitor loop.
//!
//! Ticks once per interval on a tokio timer. Samples arrive as JSON lines on
//! stdin and replace the reading used by subsequent ticks:
//!
//! ```text
//! {"type":"sample","idle_seconds":0.4,"audio_playing":false,"foreground":{"process_name":"code","window_title":"main.rs"}}
//! {"type":"settle","result":"completed"}
//! {"type":"break","task_type":"eye"}
//! {"type":"evaluate"}
//! {"type":"snapshot"}
//! ```
//!
//! Events are written to stdout as JSON lines.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;
use strainwatch_core::{
    BreakTaskRecord, BreakTaskResult, BreakTaskType, Config, Event, Monitor, PersistenceWriter,
    SystemClock, TickSample,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

#[derive(Args)]
pub struct MonitorArgs {
    /// Milliseconds between ticks; each tick counts as one second
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,
    /// Stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Only evaluate interventions on an explicit `evaluate` line
    #[arg(long)]
    pub manual_evaluate: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Input {
    Sample(TickSample),
    Settle {
        #[serde(default)]
        task_id: Option<String>,
        #[serde(default = "default_result")]
        result: BreakTaskResult,
    },
    Break {
        task_type: BreakTaskType,
    },
    Evaluate,
    Snapshot,
}

fn default_result() -> BreakTaskResult {
    BreakTaskResult::Completed
}

struct Session {
    monitor: Monitor,
    writer: PersistenceWriter,
    sample: TickSample,
    snapshot_every: u64,
    auto_evaluate: bool,
}

impl Session {
    fn on_tick(&mut self, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
        let mut events = self.monitor.tick(&self.sample);
        if self.auto_evaluate {
            events.extend(self.monitor.evaluate_intervention().into_events());
        }
        self.publish(&events)?;

        if ticks % self.snapshot_every == 0 {
            self.persist();
        }
        Ok(())
    }

    fn on_input(&mut self, input: Input) -> Result<(), Box<dyn std::error::Error>> {
        match input {
            Input::Sample(sample) => self.sample = sample,
            Input::Settle { task_id, result } => {
                let id = match task_id.or_else(|| self.monitor.breaks().pending().map(|t| t.id.clone())) {
                    Some(id) => id,
                    None => {
                        tracing::warn!("no pending break task to settle");
                        return Ok(());
                    }
                };
                match self.monitor.settle_break_task(&id, result) {
                    Some(settled) => self.publish(&settled.into_events())?,
                    None => tracing::warn!(%id, "break task is not pending"),
                }
            }
            Input::Break { task_type } => match self.monitor.request_break(task_type) {
                Some(task) => self.publish(&[Event::BreakTaskCreated { task }])?,
                None => tracing::warn!("a break task is already pending"),
            },
            Input::Evaluate => {
                let outcome = self.monitor.evaluate_intervention();
                println!(
                    "{}",
                    serde_json::json!({ "type": "evaluation", "record": &outcome.record })
                );
                self.publish(&outcome.into_events())?;
            }
            Input::Snapshot => {
                println!(
                    "{}",
                    serde_json::json!({ "type": "snapshot", "snapshot": self.monitor.snapshot() })
                );
            }
        }
        Ok(())
    }

    fn publish(&self, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
        for event in events {
            println!("{}", serde_json::to_string(event)?);
            if let Some(task) = task_of(event) {
                self.writer.save_break_task(task.clone());
            }
        }
        Ok(())
    }

    fn persist(&mut self) {
        self.writer.save_snapshot(self.monitor.fatigue_snapshot());
        for record in self.monitor.take_usage() {
            self.writer.add_usage(record);
        }
    }
}

fn task_of(event: &Event) -> Option<&BreakTaskRecord> {
    match event {
        Event::BreakTaskCreated { task } | Event::BreakTaskSettled { task } => Some(task),
        _ => None,
    }
}

pub fn run(args: MonitorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (db, monitor) = super::restored_monitor(&config, Arc::new(SystemClock))?;
    tracing::info!(value = monitor.engine().value(), "monitor starting");

    let writer = PersistenceWriter::spawn(db)?;
    let mut session = Session {
        monitor,
        writer,
        sample: TickSample::default(),
        snapshot_every: config.persistence.snapshot_interval_secs.max(1),
        auto_evaluate: !args.manual_evaluate,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(&mut session, &args));

    session.persist();
    session.writer.shutdown();
    result
}

async fn drive(session: &mut Session, args: &MonitorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ticks += 1;
                session.on_tick(ticks)?;
                if args.ticks.is_some_and(|limit| ticks >= limit) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match serde_json::from_str::<Input>(&line) {
                        Ok(input) => session.on_input(input)?,
                        Err(e) => tracing::warn!(error = %e, "ignoring malformed input line"),
                    },
                    None => stdin_open = false,
                }
            }
        }
    }
    Ok(())
}
