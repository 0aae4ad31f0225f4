mod messages;
mod policy;

pub use messages::{variants_for, MessageVariant, MESSAGES};
pub use policy::{InterventionConfig, InterventionLevel, InterventionPolicy, InterventionRecord};
