use clap::Subcommand;
use strainwatch_core::classifier::{preset_clusters, Cluster, WorkloadCategory};
use strainwatch_core::storage::{Database, FatigueStore};

#[derive(Subcommand)]
pub enum ClusterAction {
    /// List preset and user clusters
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a user cluster
    Add {
        /// Display name
        name: String,
        /// Load weight applied while a member is in the foreground
        #[arg(long)]
        weight: f64,
        /// Display color
        #[arg(long, default_value = "#6b7280")]
        color: String,
        /// Process names (repeatable)
        #[arg(long = "process")]
        processes: Vec<String>,
        /// Title/URL keywords (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Workload category (work, entertainment, communication, other)
        #[arg(long, default_value = "other")]
        category: String,
    },
    /// Remove a user cluster
    Remove {
        /// Cluster ID
        id: String,
    },
}

pub fn run(action: ClusterAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ClusterAction::List { json } => {
            let mut clusters = preset_clusters();
            clusters.extend(db.list_clusters()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&clusters)?);
            } else {
                for c in &clusters {
                    println!(
                        "{}  {}  weight={:.2}  {}{}",
                        c.id,
                        c.name,
                        c.load_weight,
                        c.category,
                        if c.is_preset { "  (preset)" } else { "" }
                    );
                }
            }
        }
        ClusterAction::Add {
            name,
            weight,
            color,
            processes,
            keywords,
            category,
        } => {
            if processes.is_empty() && keywords.is_empty() {
                return Err("a cluster needs at least one --process or --keyword".into());
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("invalid weight: {weight}").into());
            }
            let cluster = Cluster::user(name, weight, color)
                .with_processes(processes)
                .with_keywords(keywords)
                .with_category(WorkloadCategory::parse(&category));
            db.upsert_cluster(&cluster)?;
            println!("{}", serde_json::to_string_pretty(&cluster)?);
        }
        ClusterAction::Remove { id } => {
            if preset_clusters().iter().any(|c| c.id == id) {
                return Err(format!("cluster '{id}' is a system preset").into());
            }
            if !db.delete_cluster(&id)? {
                return Err(format!("cluster not found: {id}").into());
            }
            println!("cluster removed");
        }
    }
    Ok(())
}
