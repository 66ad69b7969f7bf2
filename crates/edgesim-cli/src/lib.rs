//! edgesim CLI: run algorithms on the remote service from a terminal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use edgesim::catalog::{self, Description, ParamSpec, RequestKey, Section};
use edgesim::config::API_ROOT_ENV;
use edgesim::server::{serve, ServerConfig};
use edgesim::{
    charts, http, ClientConfig, CostMetric, ParamForm, ParamSet, RunController, RunOutcome,
    RunState, Selection,
};

#[derive(Parser)]
#[command(
    name = "edgesim",
    about = "edgesim: configure, run and chart offload/autoscale algorithms",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every parameter with its request key, default and description
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one algorithm and show its average costs
    Run {
        /// Algorithm name (PPO, DQN, A2C, SAC, TRPO)
        algorithm: String,
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Run several algorithms in one request and compare them
    Overview {
        /// Algorithm names, separated by spaces or commas
        #[arg(required = true, value_delimiter = ',', num_args = 1..)]
        algorithms: Vec<String>,
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Start the dashboard server
    Serve {
        /// Algorithm service to forward API calls to
        #[arg(long, env = "EDGESIM_UPSTREAM", default_value = "http://127.0.0.1:5000")]
        upstream: String,
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(long, short, default_value_t = 8000)]
        port: u16,
        /// Upstream request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[derive(Args)]
pub struct RunOpts {
    /// Base URL of the algorithm service
    #[arg(long, env = API_ROOT_ENV, default_value = "")]
    pub api_root: String,
    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "EDGESIM_TIMEOUT_SECS")]
    pub timeout: Option<u64>,
    /// Parameter override as request_key=value (repeatable)
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,
    /// YAML file mapping request keys to values
    #[arg(long)]
    pub params_file: Option<PathBuf>,
    /// Write the result charts to an HTML file
    #[arg(long)]
    pub html: Option<PathBuf>,
    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl RunOpts {
    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_root.as_str());
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Catalog defaults, then the params file, then `-p` flags.
    fn collect_params(&self) -> Result<ParamSet> {
        let mut overrides = match &self.params_file {
            Some(path) => ParamSet::from_yaml_file(path)?,
            None => ParamSet::new(),
        };
        overrides = overrides.merged(&ParamSet::from_pairs(self.params.iter().map(String::as_str))?);

        let mut form = ParamForm::full();
        let params = form.mount(&ParamSet::new())?;
        Ok(form.apply_all(&overrides, &params)?)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Catalog { json } => cmd_catalog(json),
        Commands::Run { algorithm, opts } => cmd_run(Selection::Single(algorithm), opts).await,
        Commands::Overview { algorithms, opts } => {
            let names = algorithms
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            cmd_run(Selection::Comparison(names), opts).await
        }
        Commands::Serve {
            upstream,
            host,
            port,
            timeout,
        } => cmd_serve(upstream, host, port, timeout).await,
    }
}

// ─── Command implementations ──────────────────────────────────────────────────

fn cmd_catalog(json: bool) -> Result<()> {
    if json {
        let catalog = serde_json::json!({
            "algorithms": catalog::ALGORITHM_NAMES,
            "environment": catalog::ENV_PARAMS,
            "algorithm": catalog::ALGO_PARAMS,
        });
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Algorithms: {}", catalog::ALGORITHM_NAMES.join(", "));
    for section in [Section::Environment, Section::Algorithm] {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(["Parameter", "Request key", "Default", "Description"]);
        for spec in section.params() {
            table.add_row(catalog_row(spec));
        }
        println!();
        println!("{}", section.title());
        println!("{}", table);
    }
    Ok(())
}

fn catalog_row(spec: &ParamSpec) -> [String; 4] {
    let key = match spec.request_key {
        RequestKey::Single(key) => key.to_string(),
        RequestKey::Range { low, high } => format!("{low} / {high}"),
    };
    let default = match spec.default {
        catalog::DefaultValue::Scalar(v) => v.to_string(),
        catalog::DefaultValue::Range { low, high } => format!("{low} – {high}"),
    };
    let description = match spec.description {
        Description::Single(d) => d.to_string(),
        Description::Range { low, high } => format!("{low}\n{high}"),
    };
    [spec.label.to_string(), key, default, description]
}

async fn cmd_run(selection: Selection, opts: RunOpts) -> Result<()> {
    let names: Vec<String> = match &selection {
        Selection::Single(name) => vec![name.clone()],
        Selection::Comparison(names) => names.clone(),
    };
    for name in names.iter().filter(|n| !catalog::is_algorithm(n)) {
        warn!(algorithm = %name, "not a known algorithm; sending anyway");
    }

    let params = opts.collect_params()?;
    let missing = params.missing_keys();
    if !missing.is_empty() {
        warn!(missing = %missing.join(","), "parameters left unset; the service may reject the run");
    }

    let client = http::connect(&opts.client_config())?;
    let mut controller = RunController::new(selection);
    controller.set_params(params);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Running {}", controller.selection().label()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let state = controller.run(&client).await;
    spinner.finish_and_clear();

    match state {
        RunState::Succeeded {
            outcome,
            duration_secs,
        } => {
            if opts.json {
                println!("{}", serde_json::to_string_pretty(outcome)?);
            } else {
                println!("{} ({})", outcome.title(), format_duration(*duration_secs));
                println!("{}", summary_table(outcome));
            }
            if let Some(path) = &opts.html {
                std::fs::write(path, charts::to_html(outcome))?;
                eprintln!("Charts written to {}", path.display());
            }
            Ok(())
        }
        RunState::Failed(e) => anyhow::bail!("{}\n  cause: {}", e.user_message(), e),
        RunState::Idle | RunState::Running { .. } => anyhow::bail!("run did not start"),
    }
}

async fn cmd_serve(upstream: String, host: String, port: u16, timeout: Option<u64>) -> Result<()> {
    println!("edgesim dashboard");
    println!("   Upstream: {}", upstream);
    println!("   URL:      http://{}:{}", host, port);
    println!();

    let mut upstream = ClientConfig::new(upstream);
    if let Some(secs) = timeout {
        upstream = upstream.with_timeout(Duration::from_secs(secs));
    }
    serve(ServerConfig {
        upstream,
        host,
        port,
    })
    .await
}

// ─── Utilities ────────────────────────────────────────────────────────────────

/// Final value of every metric; one column per algorithm in comparison mode.
pub fn summary_table(outcome: &RunOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    match outcome {
        RunOutcome::Single { costs, .. } => {
            table.set_header(["Metric", "Final average", "Time slots"]);
            for metric in CostMetric::ALL {
                table.add_row([
                    metric.display_name().to_string(),
                    format_value(costs.final_value(metric)),
                    costs.get(metric).len().to_string(),
                ]);
            }
        }
        RunOutcome::Comparison(result) => {
            let algorithms = result.algorithms();
            let mut header = vec!["Metric".to_string()];
            header.extend(algorithms.iter().map(|a| a.to_string()));
            table.set_header(header);
            for metric in CostMetric::ALL {
                let mut row = vec![metric.display_name().to_string()];
                row.extend(algorithms.iter().map(|a| {
                    format_value(result.series(metric, a).and_then(|s| s.last().copied()))
                }));
                table.add_row(row);
            }
        }
    }
    table
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string())
}

fn format_duration(secs: f64) -> String {
    let secs = secs as u64;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}
