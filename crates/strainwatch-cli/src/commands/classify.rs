use clap::Args;
use strainwatch_core::classifier::{ClusterSet, ContextClassifier};
use strainwatch_core::storage::{Database, FatigueStore};
use strainwatch_core::{Config, ForegroundContext};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Process name (e.g. "firefox.exe")
    pub process: String,
    /// Window title
    #[arg(long, default_value = "")]
    pub title: String,
    /// Resolved browser URL
    #[arg(long)]
    pub url: Option<String>,
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut classifier = ContextClassifier::new(
        ClusterSet::with_presets(db.list_clusters()?),
        config.weights,
    );

    let mut ctx = ForegroundContext::new(args.process, args.title);
    if let Some(url) = args.url {
        ctx = ctx.with_url(url);
    }
    let classification = classifier.classify(&ctx);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }

    let mut line = format!(
        "{} (weight {:.2}, via {})",
        classification.category,
        classification.load_weight,
        serde_json::to_value(classification.source)?
            .as_str()
            .unwrap_or("unknown"),
    );
    if let Some(cluster) = &classification.cluster {
        line.push_str(&format!(" cluster={}", cluster.name));
    }
    if let Some(domain) = &classification.domain {
        line.push_str(&format!(" domain={domain}"));
    }
    println!("{line}");
    Ok(())
}
