//! Command-line interface
//!
//! Subcommands for the training job, the prediction service and the
//! smoke-test client, plus the default interactive launcher.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;

use crate::dataset;
use crate::server::{run_server, LoadStrategy, ServerConfig, MODEL_FILE_NAME};
use crate::training::{TrainEngine, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn metric_row(name: &str, value: f64) {
    println!("  {:<12} {}", muted(name), format!("{:.4}", value).white().bold());
}

fn wait_enter() {
    println!();
    println!("  {}", dim("press enter to continue"));
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "wdbc-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Breast Cancer Wisconsin training job and prediction API")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the classifier and persist the model artifact
    Train {
        /// Directory holding the cached dataset
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Output model file (default: models/model_breast_cancer.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the prediction API server
    Serve {
        /// Server bind host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Load the model on the first request instead of at startup
        #[arg(long)]
        lazy: bool,
    },

    /// Run the observational smoke test against a running instance
    Smoke {
        /// Base URL of the running API
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        base_url: String,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_train(data_dir: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    section("Train");

    step_run("Fetching dataset");
    let start = Instant::now();
    let cache = dataset::ensure_cached(data_dir).await?;
    let df = dataset::load(&cache)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        df.height(),
        df.width(),
        start.elapsed()
    ));

    let config = TrainingConfig::new(dataset::TARGET_COLUMN);
    let mut engine = TrainEngine::new(config);

    step_run("Training logistic regression");
    let start = Instant::now();
    engine.fit(&df)?;
    step_done(&format!("{:?}", start.elapsed()));

    if let Some(metrics) = engine.metrics() {
        info!(
            accuracy = metrics.accuracy,
            f1_score = metrics.f1_score,
            precision = metrics.precision,
            recall = metrics.recall,
            "Model trained successfully"
        );

        println!();
        metric_row("Accuracy", metrics.accuracy);
        metric_row("F1-Score", metrics.f1_score);
        metric_row("Precision", metrics.precision);
        metric_row("Recall", metrics.recall);
        println!();
    }

    let artifact = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new("models").join(MODEL_FILE_NAME));
    engine.save(&artifact)?;
    info!(path = %artifact.display(), "Model serialized and saved");
    step_ok(&format!("Model saved to {}", artifact.display()));
    println!();

    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16, lazy: bool) -> anyhow::Result<()> {
    let strategy = if lazy {
        LoadStrategy::Lazy
    } else {
        LoadStrategy::Eager
    };

    println!();
    println!("  {}", "wdbc-api".white().bold());
    println!("  {}", dim(&"─".repeat(56)));
    println!("  {:<10} {}", muted("Health"), format!("http://{}:{}/", host, port));
    println!("  {:<10} {}", muted("Predict"), format!("http://{}:{}/predict", host, port));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    let config = ServerConfig {
        host: host.to_string(),
        port,
        ..Default::default()
    };

    run_server(config, strategy).await
}

pub async fn cmd_smoke(base_url: &str) -> anyhow::Result<()> {
    section("Smoke test");
    crate::smoke::run(base_url).await?;
    println!();
    Ok(())
}

// ─── Interactive mode ──────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("       {}", "wdbc-api".white().bold());
    println!(
        "       {}",
        dim(&format!(
            "breast cancer prediction service  ·  v{}",
            env!("CARGO_PKG_VERSION")
        ))
    );
    println!();
}

fn show_system_info() {
    use sysinfo::System;

    let mut sys = System::new_all();
    sys.refresh_all();

    section("System");

    println!(
        "  {:<12} {}",
        muted("OS"),
        System::name().unwrap_or_else(|| "unknown".into())
    );
    println!("  {:<12} {}", muted("Arch"), std::env::consts::ARCH);
    println!("  {:<12} {}", muted("CPUs"), sys.cpus().len());
    println!(
        "  {:<12} {:.1} / {:.1} GB",
        muted("Memory"),
        sys.used_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
        sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0,
    );
    println!();
}

pub async fn cmd_interactive() -> anyhow::Result<()> {
    use dialoguer::{theme::ColorfulTheme, Select};

    print_banner();

    let theme = ColorfulTheme {
        active_item_prefix: dialoguer::console::style("  ›".to_string()).for_stderr().cyan(),
        active_item_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        inactive_item_prefix: dialoguer::console::style("   ".to_string()).for_stderr(),
        inactive_item_style: dialoguer::console::Style::new().for_stderr().color256(245),
        prompt_prefix: dialoguer::console::style("  ?".to_string()).for_stderr().color256(111),
        prompt_style: dialoguer::console::Style::new().for_stderr().white().bold(),
        ..ColorfulTheme::default()
    };

    loop {
        let items = &[
            "Start Server          prediction api on :5000",
            "Train Model           fit and persist the classifier",
            "Smoke Test            probe a running instance",
            "System Info           hardware & runtime details",
            "Exit",
        ];

        println!();
        let sel = Select::with_theme(&theme)
            .with_prompt("What would you like to execute")
            .items(items)
            .default(0)
            .interact_opt()?;

        match sel {
            Some(0) => {
                cmd_serve("0.0.0.0", 5000, false).await?;
                break;
            }
            Some(1) => {
                cmd_train(Path::new("data"), None).await?;
                wait_enter();
            }
            Some(2) => {
                cmd_smoke("http://127.0.0.1:5000").await?;
                wait_enter();
            }
            Some(3) => {
                show_system_info();
                wait_enter();
            }
            Some(4) | None => {
                println!();
                println!("  {}", dim("goodbye"));
                println!();
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
