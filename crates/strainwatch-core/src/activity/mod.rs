mod machine;

pub use machine::{
    ActivityMachine, ActivityReading, ActivityState, ActivityStep, ActivityThresholds,
    SessionCounters,
};
