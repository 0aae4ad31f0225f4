//! Background persistence.
//!
//! The monitor loop never waits on SQLite: writes are queued to a worker
//! thread that owns the store. A failed write is logged and dropped.

use std::thread::JoinHandle;

use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use super::store::{FatigueSnapshot, FatigueStore, UsageRecord};
use crate::breaks::BreakTaskRecord;

#[derive(Debug)]
pub enum WriteOp {
    SaveSnapshot(FatigueSnapshot),
    AddUsage(UsageRecord),
    SaveBreakTask(BreakTaskRecord),
    /// Acknowledged once every earlier op has been applied.
    Flush(oneshot::Sender<()>),
    Shutdown,
}

impl WriteOp {
    fn name(&self) -> &'static str {
        match self {
            WriteOp::SaveSnapshot(_) => "save_snapshot",
            WriteOp::AddUsage(_) => "add_usage",
            WriteOp::SaveBreakTask(_) => "save_break_task",
            WriteOp::Flush(_) => "flush",
            WriteOp::Shutdown => "shutdown",
        }
    }
}

pub struct PersistenceWriter {
    tx: UnboundedSender<WriteOp>,
    handle: Option<JoinHandle<()>>,
}

impl PersistenceWriter {
    /// Move `store` onto a dedicated writer thread.
    pub fn spawn<S>(store: S) -> std::io::Result<Self>
    where
        S: FatigueStore + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = std::thread::Builder::new()
            .name("strainwatch-writer".into())
            .spawn(move || run(store, rx))?;
        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Queue an op. Returns `false` if the worker has already stopped.
    pub fn submit(&self, op: WriteOp) -> bool {
        match self.tx.send(op) {
            Ok(()) => true,
            Err(SendError(op)) => {
                tracing::warn!(op = op.name(), "persistence worker is gone; dropping write");
                false
            }
        }
    }

    pub fn save_snapshot(&self, snapshot: FatigueSnapshot) -> bool {
        self.submit(WriteOp::SaveSnapshot(snapshot))
    }

    pub fn add_usage(&self, record: UsageRecord) -> bool {
        self.submit(WriteOp::AddUsage(record))
    }

    pub fn save_break_task(&self, task: BreakTaskRecord) -> bool {
        self.submit(WriteOp::SaveBreakTask(task))
    }

    /// Block until everything queued so far has been written. Must not be
    /// called from inside an async context.
    pub fn flush(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.submit(WriteOp::Flush(ack_tx)) && ack_rx.blocking_recv().is_ok()
    }

    /// Drain the queue and stop the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx.send(WriteOp::Shutdown);
            if handle.join().is_err() {
                tracing::error!("persistence worker panicked");
            }
        }
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<S: FatigueStore>(store: S, mut rx: UnboundedReceiver<WriteOp>) {
    tracing::debug!("persistence worker started");
    while let Some(op) = rx.blocking_recv() {
        let name = op.name();
        let result = match op {
            WriteOp::SaveSnapshot(snapshot) => store.save_snapshot(&snapshot),
            WriteOp::AddUsage(record) => store.add_usage(&record),
            WriteOp::SaveBreakTask(task) => store.save_break_task(&task),
            WriteOp::Flush(ack) => {
                let _ = ack.send(());
                Ok(())
            }
            WriteOp::Shutdown => break,
        };
        if let Err(e) = result {
            tracing::warn!(op = name, error = %e, "persistence write failed");
        }
    }
    tracing::debug!("persistence worker stopped");
}
