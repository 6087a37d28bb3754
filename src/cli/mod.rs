use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::services::format::{create_formatter, ValueFormatter};
use crate::services::loader::load_batch;
use crate::services::transformer::{create_transformer, DataTransformer};
use crate::sources::SourceRegistry;
use crate::types::{GlobalMetrics, PlatformAggregate, ViewModelBundle};

/// Stablecoin market & supply view-model builder
#[derive(Parser)]
#[command(name = "stablewatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the complete view model (items, metrics, platforms)
    View(ReportArgs),

    /// Show per-platform supply aggregates
    Platforms(ReportArgs),

    /// Show global summary metrics
    Metrics(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Payload file, or directory of payload files
    #[arg(long)]
    input: PathBuf,

    /// Payload shape adapter (aggregated, coingecko, coinmarketcap)
    #[arg(long, default_value = "aggregated")]
    source: String,

    /// Display formatter (standard, compact)
    #[arg(long, default_value = "compact")]
    format: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::View(args) => {
                let (bundle, fmt) = build_bundle(&args)?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&bundle)?);
                } else {
                    render_view(&bundle, fmt.as_ref());
                }
                Ok(())
            }
            Commands::Platforms(args) => {
                let (bundle, fmt) = build_bundle(&args)?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&bundle.platform_data)?);
                } else {
                    render_platforms(&bundle.platform_data, fmt.as_ref());
                }
                Ok(())
            }
            Commands::Metrics(args) => {
                let (bundle, fmt) = build_bundle(&args)?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&bundle.metrics)?);
                } else {
                    render_metrics(&bundle.metrics, fmt.as_ref());
                }
                Ok(())
            }
        }
    }
}

/// Construct the pipeline, load the batch, and run one transformation
/// cycle. Configuration errors (unknown source/format kinds) abort here.
fn build_bundle(args: &ReportArgs) -> anyhow::Result<(ViewModelBundle, Box<dyn ValueFormatter>)> {
    let registry = SourceRegistry::new();
    let adapter = registry.resolve(&args.source)?;
    let mut transformer: Box<dyn DataTransformer> = create_transformer("stablecoin", &args.format)?;
    let fmt = create_formatter(&args.format)?;

    let batch = load_batch(&args.input, adapter)?;
    transformer.transform_data(&batch);

    Ok((transformer.complete_view_model(), fmt))
}

fn render_view(bundle: &ViewModelBundle, fmt: &dyn ValueFormatter) {
    render_metrics(&bundle.metrics, fmt);

    println!();
    println!(
        "{:<8} {:<24} {:>12} {:>14} {:>10}",
        "SYMBOL", "NAME", "PRICE", "MARKET CAP", "24H"
    );
    for item in &bundle.items {
        println!(
            "{:<8} {:<24} {:>12} {:>14} {:>10}",
            item.symbol,
            item.name,
            fmt.format_currency(item.price),
            fmt.format_currency(item.market_cap),
            fmt.format_percentage(item.percent_change_24h),
        );
    }

    println!();
    render_platforms(&bundle.platform_data, fmt);
}

fn render_platforms(platforms: &[PlatformAggregate], fmt: &dyn ValueFormatter) {
    println!(
        "{:<16} {:>14} {:>10} {:>10}",
        "PLATFORM", "SUPPLY", "ENTITIES", "SHARE"
    );
    for platform in platforms {
        println!(
            "{:<16} {:>14} {:>10} {:>10}",
            platform.platform_name,
            fmt.format_number(Some(platform.total_supply)),
            platform.entity_count,
            fmt.format_percentage(platform.share_percent_of_global),
        );
    }
}

fn render_metrics(metrics: &GlobalMetrics, fmt: &dyn ValueFormatter) {
    println!(
        "Total market cap: {}",
        fmt.format_currency(Some(metrics.total_market_cap))
    );
    println!(
        "Total supply:     {}",
        fmt.format_number(Some(metrics.total_supply))
    );
    println!("Tracked entities: {}", metrics.entity_count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_view() {
        let cli = Cli::try_parse_from(["stablewatch", "view", "--input", "data.json"]).unwrap();
        match cli.command {
            Commands::View(args) => {
                assert_eq!(args.input, PathBuf::from("data.json"));
                assert_eq!(args.source, "aggregated");
                assert_eq!(args.format, "compact");
                assert!(!args.json);
            }
            _ => panic!("expected view subcommand"),
        }
    }

    #[test]
    fn test_cli_parse_platforms_json() {
        let cli = Cli::try_parse_from([
            "stablewatch",
            "platforms",
            "--input",
            "payloads/",
            "--json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Platforms(ref args) if args.json));
    }

    #[test]
    fn test_cli_parse_source_and_format() {
        let cli = Cli::try_parse_from([
            "stablewatch",
            "metrics",
            "--input",
            "data.json",
            "--source",
            "coingecko",
            "--format",
            "standard",
        ])
        .unwrap();
        match cli.command {
            Commands::Metrics(args) => {
                assert_eq!(args.source, "coingecko");
                assert_eq!(args.format, "standard");
            }
            _ => panic!("expected metrics subcommand"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["stablewatch"]).is_err());
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["stablewatch", "view"]).is_err());
    }

    #[test]
    fn test_unknown_source_aborts() {
        let args = ReportArgs {
            input: PathBuf::from("data.json"),
            source: "defillama".into(),
            format: "compact".into(),
            json: false,
        };
        let err = build_bundle(&args).err().unwrap();
        assert!(err.to_string().contains("defillama"));
    }

    #[test]
    fn test_unknown_format_aborts() {
        let args = ReportArgs {
            input: PathBuf::from("data.json"),
            source: "aggregated".into(),
            format: "fancy".into(),
            json: false,
        };
        let err = build_bundle(&args).err().unwrap();
        assert!(err.to_string().contains("fancy"));
    }
}
