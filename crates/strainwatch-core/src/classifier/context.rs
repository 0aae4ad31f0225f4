//! Foreground context -> workload category and load weight.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use url::Url;

use super::category::{CategoryWeights, WorkloadCategory};
use super::cluster::{Cluster, ClusterSet};
use super::tables::{APPLICATIONS, APPLICATION_HINTS, BROWSERS, SITE_KEYWORDS, SITE_NAMES};

/// What the window/process source reports for the foreground window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForegroundContext {
    pub process_name: String,
    #[serde(default)]
    pub window_title: String,
    #[serde(default)]
    pub resolved_url: Option<String>,
}

impl ForegroundContext {
    pub fn new(process_name: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            window_title: window_title.into(),
            resolved_url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.resolved_url = Some(url.into());
        self
    }

    /// Lowercase process name without a trailing `.exe`/`.app`.
    pub fn normalized_process(&self) -> String {
        normalize_process(&self.process_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Cluster,
    Site,
    Application,
    Fallback,
}

/// Display identity of the cluster that decided a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRef {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<&Cluster> for ClusterRef {
    fn from(c: &Cluster) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: WorkloadCategory,
    pub load_weight: f64,
    pub source: ClassificationSource,
    pub cluster: Option<ClusterRef>,
    pub domain: Option<String>,
    pub site_name: Option<String>,
}

/// Built-in verdict before cluster overrides and weighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinMatch {
    pub category: WorkloadCategory,
    pub source: ClassificationSource,
    pub domain: Option<String>,
    pub site_name: Option<String>,
}

pub fn is_browser(process: &str) -> bool {
    let process = normalize_process(process);
    BROWSERS.iter().any(|b| *b == process)
}

/// Host of a URL without a leading `www.`. Bare hosts are accepted.
pub fn extract_domain(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = Url::parse(raw).or_else(|_| Url::parse(&format!("https://{raw}"))).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

pub fn site_friendly_name(domain: &str) -> Option<&'static str> {
    SITE_NAMES
        .iter()
        .find(|(fragment, _)| domain == *fragment || domain.ends_with(&format!(".{fragment}")))
        .map(|(_, name)| *name)
}

/// Site keywords ordered longest-first so specific keys outrank their prefixes.
fn keywords_longest_first() -> &'static [(&'static str, WorkloadCategory)] {
    static SORTED: OnceLock<Vec<(&'static str, WorkloadCategory)>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut sorted = SITE_KEYWORDS.to_vec();
        // stable: equal lengths keep table order
        sorted.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        sorted
    })
}

/// Classify browser text (domain, site name, title combined).
pub fn classify_site_text(text: &str) -> Option<WorkloadCategory> {
    let text = text.to_lowercase();
    keywords_longest_first()
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, category)| *category)
}

/// Classify a non-browser process name.
pub fn classify_application(process: &str) -> Option<WorkloadCategory> {
    let process = normalize_process(process);
    if process.is_empty() {
        return None;
    }
    APPLICATIONS
        .iter()
        .find(|(name, _)| *name == process)
        .or_else(|| APPLICATION_HINTS.iter().find(|(hint, _)| process.contains(hint)))
        .map(|(_, category)| *category)
}

/// Stateless two-stage lookup: browser text first, then application tables.
pub fn classify_builtin(ctx: &ForegroundContext) -> BuiltinMatch {
    if is_browser(&ctx.process_name) {
        let domain = ctx.resolved_url.as_deref().and_then(extract_domain);
        let site_name = domain.as_deref().and_then(site_friendly_name);
        let text = [
            domain.as_deref().unwrap_or_default(),
            site_name.unwrap_or_default(),
            ctx.window_title.as_str(),
        ]
        .join(" ");

        return match classify_site_text(&text) {
            Some(category) => BuiltinMatch {
                category,
                source: ClassificationSource::Site,
                domain,
                site_name: site_name.map(str::to_string),
            },
            None => BuiltinMatch {
                category: WorkloadCategory::Other,
                source: ClassificationSource::Fallback,
                domain,
                site_name: site_name.map(str::to_string),
            },
        };
    }

    match classify_application(&ctx.process_name) {
        Some(category) => BuiltinMatch {
            category,
            source: ClassificationSource::Application,
            domain: None,
            site_name: None,
        },
        None => BuiltinMatch {
            category: WorkloadCategory::Other,
            source: ClassificationSource::Fallback,
            domain: None,
            site_name: None,
        },
    }
}

/// Cluster overrides on top of the built-in tables.
#[derive(Debug, Clone)]
pub struct ContextClassifier {
    clusters: ClusterSet,
    weights: CategoryWeights,
}

impl Default for ContextClassifier {
    fn default() -> Self {
        Self::new(ClusterSet::with_presets(Vec::new()), CategoryWeights::default())
    }
}

impl ContextClassifier {
    pub fn new(clusters: ClusterSet, weights: CategoryWeights) -> Self {
        Self { clusters, weights }
    }

    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    /// Mutable access for edits; the set clears its own cache.
    pub fn clusters_mut(&mut self) -> &mut ClusterSet {
        &mut self.clusters
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    pub fn load_weight(&self, category: WorkloadCategory) -> f64 {
        self.weights.weight_for(category)
    }

    pub fn classify(&mut self, ctx: &ForegroundContext) -> Classification {
        let builtin = classify_builtin(ctx);

        let url = ctx.resolved_url.as_deref().unwrap_or_default();
        let texts = [ctx.window_title.as_str(), url];
        if let Some(cluster) = self.clusters.lookup(&ctx.normalized_process(), &texts) {
            let load_weight = if cluster.load_weight.is_finite() && cluster.load_weight >= 0.0 {
                cluster.load_weight
            } else {
                self.weights.weight_for(cluster.category)
            };
            return Classification {
                category: cluster.category,
                load_weight,
                source: ClassificationSource::Cluster,
                cluster: Some(ClusterRef::from(cluster)),
                domain: builtin.domain,
                site_name: builtin.site_name,
            };
        }

        Classification {
            category: builtin.category,
            load_weight: self.weights.weight_for(builtin.category),
            source: builtin.source,
            cluster: None,
            domain: builtin.domain,
            site_name: builtin.site_name,
        }
    }
}

fn normalize_process(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let base = lower.rsplit(['/', '\\']).next().unwrap_or(&lower);
    base.strip_suffix(".exe")
        .or_else(|| base.strip_suffix(".app"))
        .unwrap_or(base)
        .to_string()
}
