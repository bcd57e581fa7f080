use clap::Parser;

use refrain::build::{run_build, run_link, run_mine, LinkConfig, RunConfig};
use refrain::{ChapterId, Result};

mod cli;
use cli::{Cli, Commands};

fn setup_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "refrain=warn",
            1 => "refrain=info",
            2 => "refrain=debug",
            _ => "refrain=trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Mine { run } => {
            let config = RunConfig::load(&run.input, &run.output, &run.overrides(None))?;
            run_mine(&config)?.print_summary("Mine");
        }
        Commands::Link {
            phrases,
            trail,
            output,
            link_min_length,
            chapters,
        } => {
            let config = LinkConfig {
                phrases_dir: phrases,
                trail,
                output_dir: output,
                link_min_length,
                chapters: chapters.into_iter().map(ChapterId::from).collect(),
            };
            run_link(&config)?.print_summary("Link");
        }
        Commands::Build {
            run,
            link_min_length,
        } => {
            let config = RunConfig::load(&run.input, &run.output, &run.overrides(link_min_length))?;
            run_build(&config)?.print_summary("Build");
        }
        Commands::Inspect { file, top } => {
            cli::inspect::inspect_phrase_file(&file, top)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
