use anyhow::Context;
use clap::Parser;
use generator::profile::{write_log, GeneratorConfig};
use gui_bridge::bridge::{serve, SharedSession};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::AnalyzerConfig;
use workflow::export::{write_csv, write_json};
use workflow::report::render_stats_panel;
use workflow::session::Session;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Thrust test log analyzer",
    after_help = "Expected line format: \
                  <timestamp>,<VALID|INVALID>,$thrust_test,<id>,DATA,THST,<value>,N,<esp_ts>*<checksum>"
)]
struct Args {
    /// Captured UART log to load
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Load analyzer settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Restrict value statistics to records flagged VALID
    #[arg(long, default_value_t = false)]
    valid_only: bool,
    /// Keep the sign of load-cell readings instead of using magnitudes
    #[arg(long, default_value_t = false)]
    signed: bool,
    /// Include the recovered (invalid) trace in the dashboard model
    #[arg(long, default_value_t = false)]
    show_invalid: bool,
    #[arg(long)]
    host: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    /// Write decoded records as CSV
    #[arg(long, value_name = "PATH")]
    export_csv: Option<PathBuf>,
    /// Write decoded records as row-oriented JSON
    #[arg(long, value_name = "PATH")]
    export_json: Option<PathBuf>,
    /// Write a synthetic burn log and exit unless --file is also given
    #[arg(long, value_name = "PATH")]
    generate: Option<PathBuf>,
    #[arg(long, default_value_t = 500)]
    samples: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Keep the HTTP bridge alive for dashboards and uploads
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn resolve_config(args: &Args) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    config.valid_only |= args.valid_only;
    config.show_invalid |= args.show_invalid;
    if args.signed {
        config.use_absolute = false;
    }
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = resolve_config(&args)?;

    if let Some(path) = &args.generate {
        let generator = GeneratorConfig {
            samples: args.samples,
            seed: args.seed,
            ..Default::default()
        };
        let lines = write_log(path, &generator)?;
        println!("Generated {} lines into {}", lines, path.display());
        if args.file.is_none() {
            return Ok(());
        }
    }

    let session = match &args.file {
        Some(path) => Session::load(path)?,
        None => Session::empty(),
    };

    println!("{}", session.describe());
    let report = session.report();
    if !session.is_empty() {
        println!(
            "Lines {} -> strict {}, recovered {}, placeholders {}, skipped {}, dropped frames {}",
            report.lines_seen,
            report.strict_records,
            report.recovered_records,
            report.placeholder_records,
            report.skipped_lines,
            report.dropped_frames
        );
    }
    print!(
        "{}",
        render_stats_panel(session.summary(config.summary_options()).as_ref())
    );

    if let Some(path) = &args.export_csv {
        write_csv(path, session.records())?;
        println!("CSV written to {}", path.display());
    }
    if let Some(path) = &args.export_json {
        write_json(path, session.records())?;
        println!("JSON written to {}", path.display());
    }

    if args.serve {
        let state: SharedSession = Arc::new(RwLock::new(session));
        println!(
            "HTTP bridge at http://{}:{} (Ctrl+C to stop)",
            config.host, config.port
        );
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for HTTP bridge")?;
        runtime.block_on(serve(state, config, async {
            if let Err(err) = signal::ctrl_c().await {
                log::error!("awaiting Ctrl+C failed: {err}");
            }
        }))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn cli_flags_override_defaults() {
        let args = Args::parse_from([
            "thrust-analyzer",
            "--valid-only",
            "--signed",
            "--port",
            "9001",
        ]);
        let config = resolve_config(&args).unwrap();
        assert!(config.valid_only);
        assert!(!config.use_absolute);
        assert_eq!(config.port, 9001);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn cli_flags_layer_over_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"show_invalid: true\nhost: 0.0.0.0\n").unwrap();
        let path = temp.into_temp_path();
        let args = Args::parse_from([
            "thrust-analyzer",
            "--config",
            path.to_str().unwrap(),
            "--host",
            "127.0.0.2",
        ]);
        let config = resolve_config(&args).unwrap();
        assert!(config.show_invalid);
        assert!(config.use_absolute);
        assert_eq!(config.host, "127.0.0.2");
    }
}
