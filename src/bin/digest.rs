use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};
use weekly_report::{
    config::Config,
    digest::{Digest, DigestError},
    extractor::FetchStatus,
    telemetry,
};

/// Read article links from stdin and write a weekly report as Markdown.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Write the report here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let digest = Digest::from_config(&config)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading links from stdin")?;

    let outcome = match digest
        .run(&input, |stage| info!(%stage, "digest progress"))
        .await
    {
        Ok(outcome) => outcome,
        Err(DigestError::NoLinks) => bail!("no article links found on stdin"),
        Err(e) => return Err(e).context("report generation failed"),
    };

    for article in outcome.articles.iter().filter(|a| a.status != FetchStatus::Ok) {
        warn!(url = %article.source_url, status = ?article.status, "article not used");
    }

    match args.out {
        Some(path) => {
            std::fs::write(&path, &outcome.report.markdown)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", outcome.report.markdown),
    }
    Ok(())
}
