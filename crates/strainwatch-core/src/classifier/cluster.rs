//! User- and system-defined clusters.
//!
//! A cluster groups process names and window/URL keywords under one load
//! weight and display color. Lookup walks the clusters in list order and the
//! first one matching by process-name containment or keyword containment
//! wins. Process-name matches are memoized in a bounded cache that is
//! cleared wholesale whenever the cluster list changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::category::WorkloadCategory;

/// Entries kept before the process cache is dropped and rebuilt.
pub const CLUSTER_CACHE_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub process_names: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub load_weight: f64,
    pub color: String,
    #[serde(default)]
    pub category: WorkloadCategory,
    #[serde(default)]
    pub is_preset: bool,
}

impl Cluster {
    /// New mutable user cluster with a generated id.
    pub fn user(name: impl Into<String>, load_weight: f64, color: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            process_names: Vec::new(),
            keywords: Vec::new(),
            load_weight,
            color: color.into(),
            category: WorkloadCategory::Other,
            is_preset: false,
        }
    }

    pub fn with_processes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: WorkloadCategory) -> Self {
        self.category = category;
        self
    }

    /// `process` must already be lowercase.
    fn matches_process(&self, process: &str) -> bool {
        !process.is_empty()
            && self
                .process_names
                .iter()
                .map(|p| p.trim().to_lowercase())
                .any(|p| !p.is_empty() && process.contains(&p))
    }

    /// `text` must already be lowercase.
    fn matches_keyword(&self, text: &str) -> bool {
        !text.is_empty()
            && self
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .any(|k| !k.is_empty() && text.contains(&k))
    }
}

/// Immutable system clusters shipped with the application.
pub fn preset_clusters() -> Vec<Cluster> {
    vec![
        Cluster {
            id: "preset-focus-tools".into(),
            name: "Focus Tools".into(),
            process_names: vec![
                "code".into(),
                "devenv".into(),
                "idea".into(),
                "pycharm".into(),
                "rustrover".into(),
                "nvim".into(),
            ],
            keywords: Vec::new(),
            load_weight: 1.0,
            color: "#3b82f6".into(),
            category: WorkloadCategory::Work,
            is_preset: true,
        },
        Cluster {
            id: "preset-video".into(),
            name: "Video & Streaming".into(),
            process_names: vec!["vlc".into(), "potplayer".into(), "mpv".into()],
            keywords: vec![
                "youtube".into(),
                "netflix".into(),
                "twitch".into(),
                "bilibili".into(),
            ],
            load_weight: 0.3,
            color: "#ef4444".into(),
            category: WorkloadCategory::Entertainment,
            is_preset: true,
        },
        Cluster {
            id: "preset-messaging".into(),
            name: "Messaging".into(),
            process_names: vec![
                "slack".into(),
                "discord".into(),
                "teams".into(),
                "telegram".into(),
            ],
            keywords: Vec::new(),
            load_weight: 0.7,
            color: "#10b981".into(),
            category: WorkloadCategory::Communication,
            is_preset: true,
        },
    ]
}

/// Reasons a cluster edit is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterEditError {
    Preset(String),
    NotFound(String),
}

impl std::fmt::Display for ClusterEditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterEditError::Preset(id) => write!(f, "cluster '{id}' is a system preset"),
            ClusterEditError::NotFound(id) => write!(f, "cluster '{id}' not found"),
        }
    }
}

impl std::error::Error for ClusterEditError {}

#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
    /// lowercase process -> index of the first process-matching cluster
    process_cache: HashMap<String, Option<usize>>,
}

impl ClusterSet {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self {
            clusters,
            process_cache: HashMap::new(),
        }
    }

    /// The given user clusters, then every preset whose id none of them
    /// reuses. User clusters therefore win any overlap with a preset.
    pub fn with_presets(user: Vec<Cluster>) -> Self {
        let mut clusters: Vec<Cluster> = user
            .into_iter()
            .filter(|c| !c.is_preset)
            .collect();
        let shadowed: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
        clusters.extend(
            preset_clusters()
                .into_iter()
                .filter(|p| !shadowed.contains(&p.id)),
        );
        Self::new(clusters)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn get(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn cache_len(&self) -> usize {
        self.process_cache.len()
    }

    // ── Edits ────────────────────────────────────────────────────────

    /// Append after the existing user clusters, ahead of the presets.
    pub fn add(&mut self, mut cluster: Cluster) {
        cluster.is_preset = false;
        let at = self
            .clusters
            .iter()
            .position(|c| c.is_preset)
            .unwrap_or(self.clusters.len());
        self.clusters.insert(at, cluster);
        self.process_cache.clear();
    }

    pub fn update(&mut self, cluster: Cluster) -> Result<(), ClusterEditError> {
        let slot = self
            .clusters
            .iter_mut()
            .find(|c| c.id == cluster.id)
            .ok_or_else(|| ClusterEditError::NotFound(cluster.id.clone()))?;
        if slot.is_preset {
            return Err(ClusterEditError::Preset(cluster.id));
        }
        *slot = Cluster {
            is_preset: false,
            ..cluster
        };
        self.process_cache.clear();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Cluster, ClusterEditError> {
        let index = self
            .clusters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ClusterEditError::NotFound(id.to_string()))?;
        if self.clusters[index].is_preset {
            return Err(ClusterEditError::Preset(id.to_string()));
        }
        self.process_cache.clear();
        Ok(self.clusters.remove(index))
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// First cluster (in list order) matching the process name or any of the
    /// keyword texts.
    pub fn lookup(&mut self, process_name: &str, texts: &[&str]) -> Option<&Cluster> {
        let process = process_name.trim().to_lowercase();
        let by_process = self.process_match(&process);

        let lowered: Vec<String> = texts
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        let scan_end = by_process.unwrap_or(self.clusters.len());
        let by_keyword = self.clusters[..scan_end]
            .iter()
            .position(|c| lowered.iter().any(|t| c.matches_keyword(t)));

        by_keyword.or(by_process).map(|i| &self.clusters[i])
    }

    fn process_match(&mut self, process: &str) -> Option<usize> {
        if process.is_empty() {
            return None;
        }
        if let Some(hit) = self.process_cache.get(process) {
            return *hit;
        }
        let found = self.clusters.iter().position(|c| c.matches_process(process));
        if self.process_cache.len() >= CLUSTER_CACHE_CAPACITY {
            self.process_cache.clear();
        }
        self.process_cache.insert(process.to_string(), found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClusterSet {
        ClusterSet::new(vec![
            Cluster::user("Design", 0.9, "#f59e0b")
                .with_processes(["figma"])
                .with_keywords(["dribbble"]),
            Cluster::user("Reading", 0.4, "#8b5cf6")
                .with_processes(["kindle"])
                .with_keywords(["arxiv", "figma"]),
        ])
    }

    #[test]
    fn process_containment_is_case_insensitive() {
        let mut set = sample();
        let hit = set.lookup("Figma.exe", &[]).unwrap();
        assert_eq!(hit.name, "Design");
    }

    #[test]
    fn keyword_matches_title() {
        let mut set = sample();
        let hit = set.lookup("firefox", &["ArXiv - attention paper"]).unwrap();
        assert_eq!(hit.name, "Reading");
        assert!(set.lookup("firefox", &["news"]).is_none());
    }

    #[test]
    fn list_order_decides_between_process_and_keyword() {
        let mut set = sample();
        // "Reading" matches kindle by process, but "Design" is earlier and
        // matches the title keyword.
        let hit = set.lookup("kindle", &["dribbble shots"]).unwrap();
        assert_eq!(hit.name, "Design");
        let hit = set.lookup("kindle", &["chapter 3"]).unwrap();
        assert_eq!(hit.name, "Reading");
    }

    #[test]
    fn cache_is_bounded_and_cleared_on_edit() {
        let mut set = sample();
        for i in 0..CLUSTER_CACHE_CAPACITY {
            set.lookup(&format!("proc-{i}"), &[]);
        }
        assert_eq!(set.cache_len(), CLUSTER_CACHE_CAPACITY);
        set.lookup("one-more", &[]);
        assert_eq!(set.cache_len(), 1);

        set.add(Cluster::user("Music", 0.2, "#000000").with_processes(["one-more"]));
        assert_eq!(set.cache_len(), 0);
        assert_eq!(set.lookup("one-more", &[]).unwrap().name, "Music");
    }

    #[test]
    fn user_cluster_beats_preset_on_shared_process() {
        let mut set = ClusterSet::with_presets(vec![
            Cluster::user("My editor", 1.5, "#123456").with_processes(["code"])
        ]);
        let hit = set.lookup("Code.exe", &[]).unwrap();
        assert_eq!(hit.name, "My editor");
        assert_eq!(hit.load_weight, 1.5);

        set.add(Cluster::user("Streams", 0.1, "#654321").with_keywords(["twitch"]));
        let hit = set.lookup("firefox", &["Twitch - live"]).unwrap();
        assert_eq!(hit.name, "Streams");
    }

    #[test]
    fn user_cluster_with_preset_id_replaces_it() {
        let mut own = Cluster::user("Editors", 1.4, "#abcdef").with_processes(["vim"]);
        own.id = "preset-focus-tools".into();
        let mut set = ClusterSet::with_presets(vec![own]);

        assert_eq!(set.clusters().len(), 3);
        assert_eq!(set.lookup("nvim", &[]).unwrap().name, "Editors");
        assert!(set.lookup("code", &[]).is_none());
        assert!(!set.get("preset-focus-tools").unwrap().is_preset);
    }

    #[test]
    fn presets_are_immutable() {
        let mut set = ClusterSet::with_presets(Vec::new());
        let preset = set.clusters()[0].clone();
        assert!(preset.is_preset);
        assert_eq!(
            set.remove(&preset.id),
            Err(ClusterEditError::Preset(preset.id.clone()))
        );
        let mut edited = preset.clone();
        edited.load_weight = 0.1;
        assert!(matches!(set.update(edited), Err(ClusterEditError::Preset(_))));
    }

    #[test]
    fn user_clusters_can_be_edited_and_removed() {
        let mut set = sample();
        let mut design = set.clusters()[0].clone();
        design.load_weight = 1.2;
        set.update(design.clone()).unwrap();
        assert_eq!(set.get(&design.id).unwrap().load_weight, 1.2);

        let removed = set.remove(&design.id).unwrap();
        assert_eq!(removed.name, "Design");
        assert!(set.lookup("figma", &[]).is_none());
        assert!(matches!(
            set.remove("missing"),
            Err(ClusterEditError::NotFound(_))
        ));
    }
}
