use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use storefront_e2e::{config::Config, data::TestData, harness::Suite, report, scenarios};

#[derive(Parser)]
#[command(name = "storefront-e2e")]
#[command(version = "0.1.0")]
#[command(about = "Browser end-to-end test suite for the Storefront demo shop", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite (all scenarios unless filtered)
    Run {
        /// Path to the settings file
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Path to the fixture data file
        #[arg(short, long, default_value = "fixtures/testdata.json")]
        fixtures: PathBuf,

        /// Run only scenarios in this category
        #[arg(long)]
        category: Option<String>,

        /// Run only the scenario with this exact name
        #[arg(long)]
        name: Option<String>,

        /// Force headless mode regardless of the settings file
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Output directory for screenshots, videos and DOM snapshots
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,
    },

    /// List registered scenarios
    List,

    /// Re-generate reports from a previously written results JSON
    Report {
        /// Path to a results.json from an earlier run
        results: PathBuf,

        /// Output directory for the generated reports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            fixtures,
            category,
            name,
            headless,
            output,
        } => {
            let mut config = Config::load(&config)?;
            if headless {
                config.settings.headless = true;
            }
            let data = TestData::load(&fixtures, config.settings.random_seed)?;

            let selected: Vec<_> = scenarios::all_scenarios()
                .into_iter()
                .filter(|s| category.as_deref().map_or(true, |c| s.category() == c))
                .filter(|s| name.as_deref().map_or(true, |n| s.name() == n))
                .collect();
            if selected.is_empty() {
                anyhow::bail!("No scenarios match the given filter");
            }

            println!(
                "{} Running {} scenario(s)",
                "▶".green().bold(),
                selected.len()
            );
            println!("  Base URL: {}", config.settings.base_url.cyan());
            println!(
                "  Browser: {} (headless: {})",
                config.settings.browser.to_string().cyan(),
                config.settings.headless
            );
            if let Some(ref category) = category {
                println!("  Category: {}", category.yellow());
            }
            if let Some(ref name) = name {
                println!("  Scenario: {}", name.yellow());
            }
            println!("  Output: {}", output.display().to_string().cyan());

            let suite = Suite::new(config, data, output);
            let run = suite.run(&selected).await;

            let report_dir = report::resolve_report_dir()?;
            report::write_results_json(&run, &report_dir)?;
            report::generate_all_reports(&run, &report_dir)?;

            print_summary(&run.summary);
            if run.summary.failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::List => {
            for scenario in scenarios::all_scenarios() {
                println!("  {} [{}]", scenario.name(), scenario.category().dimmed());
            }
        }

        Commands::Report { results, output } => {
            println!(
                "{} Generating reports from: {}",
                "📊".to_string().blue(),
                results.display()
            );
            let run = report::load_results(&results)?;
            let dir = match output {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)?;
                    dir
                }
                None => report::resolve_report_dir()?,
            };
            report::generate_all_reports(&run, &dir)?;
        }
    }

    Ok(())
}

fn print_summary(summary: &report::RunSummary) {
    println!("\n{}", "━".repeat(48));
    println!(
        "  Total: {}  Passed: {}  Failed: {}  Skipped: {}  Inconclusive: {}",
        summary.total,
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        summary.skipped.to_string().yellow(),
        summary.inconclusive.to_string().yellow()
    );
    println!(
        "  Success rate: {:.1}%  Duration: {:.1}s",
        summary.success_rate, summary.total_duration_seconds
    );
    if summary.failed == 0 {
        println!("  {}", "All executed scenarios passed".green().bold());
    } else {
        println!(
            "  {}",
            format!("{} scenario(s) failed", summary.failed).red().bold()
        );
    }
}
