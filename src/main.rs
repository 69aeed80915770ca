use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use snomed_mapper::client::{HttpTariffApi, TokioSleeper};
use snomed_mapper::server::{self, ServeOptions};
use snomed_mapper::{cli, config, error};
use snomed_mapper_common::{submit_tariffs, upload_tariff_file, UploadFile, ViewState};
use cli::{Cli, Commands};
use config::Config;
use error::MapperError;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let server_url = cli.server.clone().unwrap_or_else(|| config.server_url.clone());
    let timeout = Duration::from_secs(config.timeout_seconds);

    match cli.command {
        Commands::Serve { reference, host, port, static_dir, output_dir } => {
            let options = ServeOptions {
                host: host.unwrap_or_else(|| config.host.clone()),
                port: port.unwrap_or(config.port),
                reference_path: reference.unwrap_or_else(|| config.reference_path.clone()),
                static_dir: static_dir.unwrap_or_else(|| config.static_dir.clone()),
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                max_upload_bytes: config.max_upload_bytes(),
                retention: config.retention(),
            };
            server::serve(options).await?;
        }

        Commands::Match { names, input, json } => {
            let mut raw_text = names.join("\n");
            if let Some(path) = input {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                raw_text.push('\n');
                raw_text.push_str(&content);
            }

            let api = HttpTariffApi::new(&server_url, timeout)?;
            let mut view = ViewState::new();

            let spinner = spinner("Matching tariff names...");
            let outcome = submit_tariffs(&mut view, &api, &raw_text).await;
            spinner.finish_and_clear();
            if let Err(e) = outcome {
                tracing::debug!(error = ?e, "match failed");
                return Err(MapperError::from(e).into());
            }

            if json {
                let rows: Vec<serde_json::Value> = view
                    .text
                    .rows
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "input_name": r.input_name,
                            "matched_name": r.matched_name,
                            "snomed_code": r.snomed_code,
                            "snomed_description": r.snomed_description,
                            "score": r.score_text,
                            "highlighted": r.highlighted,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &view.text.rows {
                    let marker = if row.highlighted { "✔" } else { " " };
                    println!(
                        "{} {:>8}  {}  →  {} [{}] {}",
                        marker,
                        row.score_text,
                        row.input_name,
                        row.matched_name,
                        row.snomed_code,
                        row.snomed_description
                    );
                }
                println!("\n✅ {} names matched", view.text.rows.len());
            }
        }

        Commands::Upload { file, download } => {
            let upload = match file {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    Some(UploadFile::new(name, bytes))
                }
                None => None,
            };

            let api = HttpTariffApi::new(&server_url, timeout)?;
            let mut view = ViewState::new();
            view.set_selected_file(upload.as_ref().map(|f| f.name.as_str()));
            println!("📄 {}", view.upload.file_label);

            let spinner = spinner(&view.upload.progress.status);
            let outcome = upload_tariff_file(&mut view, &api, &TokioSleeper, upload.as_ref()).await;
            spinner.finish_and_clear();
            if let Err(e) = outcome {
                tracing::debug!(error = ?e, "upload failed");
                return Err(MapperError::from(e).into());
            }

            let results = view
                .upload
                .results
                .clone()
                .context("upload finished without results")?;
            println!("Total tariff items processed: {}", results.total_rows);
            println!("Duplicate items found: {}", results.duplicated_rows);
            println!("Download: {}{}", server_url.trim_end_matches('/'), results.download_url);

            if let Some(dest) = download {
                let size = api.download(&results.download_url, &dest).await?;
                println!("✔ Saved {} ({} bytes)", dest.display(), size);
            }
        }

        Commands::Status => {
            let api = HttpTariffApi::new(&server_url, timeout)?;
            let status = api
                .status()
                .await
                .map_err(|e| MapperError::ApiCall(e.to_string()))?;
            println!("{}: {} (version {})", server_url, status.status, status.version);
        }

        Commands::Config { set_server, set_reference, show } => {
            let mut config = config;

            if let Some(url) = set_server {
                config.set_server_url(url)?;
                println!("✔ Server URL saved");
            }

            if let Some(path) = set_reference {
                config.set_reference_path(path)?;
                println!("✔ Reference map saved");
            }

            if show {
                println!("Settings ({}):", Config::config_path()?.display());
                println!("  Server URL: {}", config.server_url);
                println!("  Listen: {}:{}", config.host, config.port);
                println!("  Reference map: {}", config.reference_path.display());
                println!("  Static dir: {}", config.static_dir.display());
                println!("  Output dir: {}", config.output_dir.display());
                println!("  Max upload: {} MB", config.max_upload_mb);
                println!("  Output retention: {}h", config.retention_hours);
                println!("  Timeout: {}s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
