mod schedule;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use coriolis_parser::{SigmaCollection, Timespan, parse_sigma_directory, parse_sigma_file};
use coriolis_sql::{
    CompileReport, Compiler, CompilerOptions, LeafPolicy, TimeframePolicy, build_having,
};

use crate::schedule::Schedule;

#[derive(Parser)]
#[command(name = "coriolis")]
#[command(about = "Compile Sigma detection rules into SQL aggregation queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a rule file or a directory of rules and print the SQL
    Compile {
        /// Path to a Sigma rule file or directory of rules
        path: PathBuf,

        #[command(flatten)]
        options: OptionArgs,

        /// Print each query as JSON (title, id, sql) instead of plain SQL
        #[arg(long)]
        json: bool,
    },

    /// Parse a rule file or directory and print the decoded rules as JSON
    Parse {
        /// Path to a Sigma rule file or directory of rules
        path: PathBuf,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the HAVING threshold derived from a condition string
    Condition {
        /// The condition string, e.g. "count() by SourceAddress > 5"
        expr: String,
    },

    /// Recompile rules on a fixed interval, printing the queries each run
    ///
    /// Rules are re-read from disk on every run, so edits are picked up
    /// without a restart. Failures are logged and the next run proceeds.
    Schedule {
        /// Path to a Sigma rule file or directory of rules
        path: PathBuf,

        /// Time between runs (e.g. 30s, 5m, 1h)
        #[arg(short, long, default_value = "5m", value_parser = parse_interval)]
        interval: Timespan,

        /// Stop after this many runs (default: run until Ctrl-C)
        #[arg(long)]
        ticks: Option<u64>,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(clap::Args)]
struct OptionArgs {
    /// Also emit the detection's timeframe as a `timeframe = '<value>'` predicate
    #[arg(long)]
    fold_timeframe: bool,

    /// Reject rules with null search values instead of rendering `null`
    #[arg(long)]
    strict: bool,
}

impl OptionArgs {
    fn compiler(&self) -> Compiler {
        Compiler::with_options(CompilerOptions {
            timeframe: if self.fold_timeframe {
                TimeframePolicy::FoldIntoWhere
            } else {
                TimeframePolicy::Exclude
            },
            leaves: if self.strict {
                LeafPolicy::Strict
            } else {
                LeafPolicy::Permissive
            },
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Schedule { .. } => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Compile {
            path,
            options,
            json,
        } => cmd_compile(path, options, json),
        Commands::Parse { path, pretty } => cmd_parse(path, pretty),
        Commands::Condition { expr } => cmd_condition(expr),
        Commands::Schedule {
            path,
            interval,
            ticks,
            options,
        } => cmd_schedule(path, interval, ticks, options),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_compile(path: PathBuf, options: OptionArgs, json: bool) {
    let collection = match load_collection(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    print_warnings(&collection.errors);

    if collection.is_empty() {
        eprintln!("No rules found in {}", path.display());
        process::exit(1);
    }

    let report = options.compiler().compile_collection(&collection);
    print_report(&report, collection.len() > 1, json);

    if !report.is_clean() || !collection.errors.is_empty() {
        process::exit(1);
    }
}

fn cmd_parse(path: PathBuf, pretty: bool) {
    match load_collection(&path) {
        Ok(collection) => {
            print_warnings(&collection.errors);
            print_json(&collection, pretty);
            if !collection.errors.is_empty() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn cmd_condition(expr: String) {
    match build_having(&expr) {
        Ok(threshold) => println!("{threshold}"),
        Err(e) => {
            eprintln!("Condition error: {e}");
            process::exit(1);
        }
    }
}

fn cmd_schedule(path: PathBuf, interval: Timespan, ticks: Option<u64>, options: OptionArgs) {
    let compiler = options.compiler();
    let schedule = Schedule {
        interval: interval.as_duration(),
        max_ticks: ticks,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            process::exit(1);
        }
    };

    log::info!("compiling rules from {} every {interval}", path.display());

    let runs = runtime.block_on(schedule::run(
        schedule,
        |_| run_cycle(&path, &compiler),
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("unable to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
        },
    ));

    log::info!("scheduler finished after {runs} run(s)");
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One scheduled run: reload the rules, compile them and print the queries.
fn run_cycle(path: &Path, compiler: &Compiler) -> Result<(), String> {
    let collection = load_collection(path)?;
    for err in &collection.errors {
        log::warn!("{err}");
    }

    let report = compiler.compile_collection(&collection);
    print_report(&report, collection.len() > 1, false);

    if report.is_clean() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} rule(s) failed to compile",
            report.failures.len(),
            collection.len()
        ))
    }
}

fn load_collection(path: &Path) -> Result<SigmaCollection, String> {
    if path.is_dir() {
        parse_sigma_directory(path)
            .map_err(|e| format!("Error loading rules from {}: {e}", path.display()))
    } else {
        parse_sigma_file(path).map_err(|e| format!("Error loading rule {}: {e}", path.display()))
    }
}

fn parse_interval(s: &str) -> Result<Timespan, String> {
    let timespan = Timespan::parse(s).map_err(|e| e.to_string())?;
    if timespan.seconds == 0 {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(timespan)
}

fn print_report(report: &CompileReport, with_titles: bool, json: bool) {
    for query in &report.queries {
        if json {
            print_json(query, false);
        } else {
            if with_titles {
                println!("-- {}", query.rule_title);
            }
            println!("{}", query.sql);
        }
    }
    for failure in &report.failures {
        eprintln!("Error compiling rule '{}': {}", failure.rule_title, failure.error);
    }
}

fn print_warnings(errors: &[String]) {
    if !errors.is_empty() {
        eprintln!("Warnings:");
        for err in errors {
            eprintln!("  - {err}");
        }
    }
}

fn print_json(value: &impl serde::Serialize, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(j) => println!("{j}"),
        Err(e) => {
            eprintln!("JSON serialization error: {e}");
            process::exit(1);
        }
    }
}
