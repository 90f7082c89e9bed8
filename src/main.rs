use camino::Utf8PathBuf;
use clap::Parser;

/// Shrink a built static site in place.
#[derive(Parser)]
#[command(name = "scalpel", version, about)]
struct Args {
    /// Build output directory to optimize
    dir: Utf8PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scalpel=info")),
        )
        .init();

    let args = Args::parse();
    let saved = scalpel::pipeline::optimize(&args.dir).await?;
    println!("{saved} bytes reduced");
    Ok(())
}
