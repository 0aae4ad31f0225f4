//! Context classifier.
//!
//! Maps the foreground process / website to a [`WorkloadCategory`] and the
//! load weight that scales fatigue accumulation. User clusters take priority
//! over the built-in browser-keyword and application tables.

mod category;
mod cluster;
mod context;
mod tables;

pub use category::{CategoryWeights, WorkloadCategory, UNMAPPED_LOAD_WEIGHT};
pub use cluster::{preset_clusters, Cluster, ClusterEditError, ClusterSet, CLUSTER_CACHE_CAPACITY};
pub use context::{
    classify_application, classify_builtin, classify_site_text, extract_domain, is_browser,
    site_friendly_name, BuiltinMatch, Classification, ClassificationSource, ClusterRef,
    ContextClassifier, ForegroundContext,
};
