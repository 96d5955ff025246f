use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use supplier_scorecard::config::{self, Config};
use supplier_scorecard::prompt::Prompter;
use supplier_scorecard::report::{ReportFormat, ReportOptions, ReportRenderer};
use supplier_scorecard::scoring::{self, WeightConfig};
use supplier_scorecard::store::{average_by_supplier, EmployeeFilter, EvaluationStore};
use supplier_scorecard::{entry, export, input, output};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_RENDER: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score evaluations and export them as one report
    Report {
        /// JSON array or YAML list of evaluations
        input: PathBuf,
        /// Output format: pdf or csv
        #[arg(short, long, default_value = "pdf")]
        format: ReportFormat,
        /// Only include this employee's evaluations ("ALL" for everyone)
        #[arg(short, long, default_value = "ALL")]
        employee: String,
        /// PNG or JPEG chart to embed above the table (PDF only)
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Output directory (defaults to report.output_dir from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Export one ticket per evaluation, named after the supplier
    Tickets {
        input: PathBuf,
        #[arg(short, long, default_value = "pdf")]
        format: ReportFormat,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print scored evaluations and supplier averages
    Summary {
        input: PathBuf,
        #[arg(short, long, default_value = "ALL")]
        employee: String,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Enter evaluations interactively, then optionally export a report
    Evaluate {
        #[arg(short, long, default_value = "pdf")]
        format: ReportFormat,
        #[arg(long)]
        chart: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Validate and show the configured weights
    Weights,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "supplier-scorecard")]
#[command(about = "Weighted supplier evaluations with PDF/CSV reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/supplier-scorecard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("supplier_scorecard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn fail(code: i32, kind: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", kind, err);
    std::process::exit(code);
}

fn load_store(path: &Path, weights: &WeightConfig) -> EvaluationStore {
    let evaluations =
        input::load_evaluations(path).unwrap_or_else(|e| fail(EXIT_INPUT, "Input error", e));
    input::build_store(evaluations, weights)
        .unwrap_or_else(|e| fail(EXIT_INPUT, "Input error", e))
}

fn read_chart(path: Option<&Path>) -> Option<Vec<u8>> {
    path.map(|p| {
        std::fs::read(p).unwrap_or_else(|e| {
            fail(
                EXIT_INPUT,
                "Input error",
                anyhow::Error::new(e).context(format!("Failed to read chart {}", p.display())),
            )
        })
    })
}

fn renderer_for(config: &Config) -> ReportRenderer {
    ReportRenderer::new(ReportOptions {
        title: config.report_title(),
        ..ReportOptions::default()
    })
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_tracing(verbose);
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading so a broken config can be replaced
    if let Commands::Init = cli.command {
        let mut prompter = Prompter::stdio();
        if let Err(e) = config::init::run_init_wizard(&mut prompter, config_path) {
            fail(EXIT_CONFIG, "Init failed", e);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = config::load_config(config_path)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, "Config error", e));

    // Validate weights at startup; the sum warning is logged by the validator
    let weights = config.effective_weights();
    let warnings = match scoring::validate_weights(&weights) {
        Ok(warnings) => warnings,
        Err(errors) => {
            eprintln!("Weight config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let out_dir_or_default = |out: Option<PathBuf>| out.unwrap_or_else(|| config.output_dir());

    match cli.command {
        Commands::Report {
            input,
            format,
            employee,
            chart,
            out,
        } => {
            let store = load_store(&input, &weights);
            let chart = read_chart(chart.as_deref());
            let filter = EmployeeFilter::parse(&employee);
            match export::export_report(
                &store,
                &filter,
                &renderer_for(&config),
                format,
                chart.as_deref(),
                &out_dir_or_default(out),
            ) {
                Ok(path) => println!("Report written to {}", path.display()),
                Err(e) => fail(EXIT_RENDER, "Report error", e),
            }
        }
        Commands::Tickets { input, format, out } => {
            let store = load_store(&input, &weights);
            let renderer = renderer_for(&config);
            match export::export_tickets(&store, &renderer, format, &out_dir_or_default(out)) {
                Ok(paths) => {
                    for path in paths {
                        println!("Ticket written to {}", path.display());
                    }
                }
                Err(e) => fail(EXIT_RENDER, "Ticket error", e),
            }
        }
        Commands::Summary { input, employee, tsv } => {
            let store = load_store(&input, &weights);
            let records = store.filter(&EmployeeFilter::parse(&employee));

            if tsv {
                let text = output::format_tsv(&records);
                if !text.is_empty() {
                    println!("{}", text);
                }
            } else {
                let use_colors = output::should_use_colors();
                if verbose && !records.is_empty() {
                    for record in &records {
                        let breakdown =
                            scoring::compute_breakdown(&record.ratings().to_map(), &weights)
                                .unwrap_or_else(|e| fail(EXIT_INPUT, "Input error", e.into()));
                        println!("{}", output::format_record_detail(record, &breakdown, use_colors));
                        println!();
                    }
                } else {
                    println!("{}", output::format_records_table(&records, use_colors));
                }
                let ranked = output::rank_suppliers(average_by_supplier(&records));
                if !ranked.is_empty() {
                    println!();
                    println!("Supplier averages:");
                    println!("{}", output::format_supplier_ranking(&ranked, use_colors));
                }
            }
        }
        Commands::Evaluate { format, chart, out } => {
            let chart = read_chart(chart.as_deref());
            let mut store = EvaluationStore::new();
            let mut prompter = Prompter::stdio();

            let accepted = entry::run_entry_session(&mut prompter, &mut store, &weights)
                .unwrap_or_else(|e| fail(EXIT_INPUT, "Input error", e));
            if accepted == 0 {
                println!("No evaluations recorded.");
                std::process::exit(EXIT_SUCCESS);
            }

            let export_now = prompter
                .prompt_yes_no(&format!("Export {} evaluations as {}?", accepted, format), true)
                .unwrap_or_else(|e| fail(EXIT_INPUT, "Input error", e));
            if export_now {
                match export::export_report(
                    &store,
                    &EmployeeFilter::All,
                    &renderer_for(&config),
                    format,
                    chart.as_deref(),
                    &out_dir_or_default(out),
                ) {
                    Ok(path) => println!("Report written to {}", path.display()),
                    Err(e) => fail(EXIT_RENDER, "Report error", e),
                }
            }
        }
        Commands::Weights => {
            let use_colors = output::should_use_colors();
            println!("Weights:");
            println!("{}", output::format_weights(&weights, use_colors));
            for warning in warnings {
                println!("Warning: {}", warning);
            }
        }
        Commands::Init => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}
