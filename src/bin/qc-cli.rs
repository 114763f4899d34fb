use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::redirect::Policy;
use serde_json::Value;

use qc_console::routing::{Navigator, Router};

#[derive(Parser)]
#[command(name = "qc-cli")]
#[command(about = "Management CLI for the COPD QC console", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health
    Status,
    /// Summary of the loaded dataset
    Summary,
    /// List active QC rules
    Rules,
    /// List QC findings
    Findings {
        #[arg(short, long)]
        severity: Option<String>,
    },
    /// Upload a CSV or JSON dataset
    Upload { file: PathBuf },
    /// Resolve a path on the server
    Resolve { path: String },
    /// Walk paths through the page router locally and print the history
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{base}/api/health")).send().await?;
            print_response(res).await?;
        }
        Commands::Summary => {
            let res = client.get(format!("{base}/api/summary")).send().await?;
            print_response(res).await?;
        }
        Commands::Rules => {
            let res = client.get(format!("{base}/api/qc/rules")).send().await?;
            print_response(res).await?;
        }
        Commands::Findings { severity } => {
            let mut req = client.get(format!("{base}/api/qc/findings"));
            if let Some(severity) = severity {
                req = req.query(&[("severity", severity)]);
            }
            print_response(req.send().await?).await?;
        }
        Commands::Upload { file } => {
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or("upload path has no file name")?;
            let body = tokio::fs::read(&file).await?;
            let res = client
                .post(format!("{base}/api/upload"))
                .query(&[("filename", filename)])
                .body(body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Resolve { path } => {
            let res = client
                .get(format!("{base}/api/routes/resolve"))
                .query(&[("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Navigate { paths } => {
            let mut navigator = Navigator::new(Arc::new(Router::default()), &paths[0]);
            println!("{} -> {} ({:?})", paths[0], navigator.current_path(), navigator.state());
            for path in &paths[1..] {
                let resolution = navigator.navigate(path);
                let note = if resolution.redirected { " [redirected]" } else { "" };
                println!("{} -> {} ({:?}){note}", path, resolution.path, navigator.state());
            }
            println!("history: {}", navigator.history().join(" | "));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
