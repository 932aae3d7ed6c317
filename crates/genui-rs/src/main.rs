//! Submit one prompt to the generation endpoint and print the rendered UI.
//!
//! The endpoint comes from `--endpoint`, then the `GENUI_ENDPOINT`
//! environment variable, then the built-in default.
//!
//! # Examples
//!
//! ```sh
//! # Render the generated tree
//! genui --prompt "a login form"
//!
//! # Print the raw tree instead
//! genui --prompt "a pricing table" --raw
//!
//! # Prompt from stdin, custom endpoint
//! echo "a settings page" | genui --stdin --endpoint http://localhost:8080/api/generate
//!
//! # JSON Schemas for the request and failure bodies
//! genui --print-schema
//! ```

use std::io::{self, Read};
use std::process;
use std::time::Duration;

use clap::Parser;
use genui_rs::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Exit status for an empty prompt.
const EXIT_EMPTY_PROMPT: i32 = 2;

/// Submit a prompt to a UI generation endpoint and print the result.
#[derive(Parser)]
#[command(name = "genui")]
struct Cli {
    /// Prompt describing the UI to generate
    #[arg(long)]
    prompt: Option<String>,

    /// Read the prompt from stdin
    #[arg(long)]
    stdin: bool,

    /// Generation endpoint URL (overrides GENUI_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Transport timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the generated tree as JSON instead of rendering it
    #[arg(long)]
    raw: bool,

    /// Print JSON Schemas for the request and failure bodies and exit
    #[arg(long)]
    print_schema: bool,

    /// Print captured log lines to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, String> {
    if cli.print_schema {
        let schemas = serde_json::json!({
            "request": json_schema_for::<GenerateRequest>(),
            "success": json_schema_for::<SuccessBody>(),
            "failure": json_schema_for::<ErrorBody>(),
        });
        let text = serde_json::to_string_pretty(&schemas)
            .map_err(|e| format!("failed to serialize schemas: {e}"))?;
        println!("{text}");
        return Ok(0);
    }

    let min_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let (tracing_layer, log_buffer) = UiTracingLayer::with_min_level(min_level);
    tracing_subscriber::registry().with(tracing_layer).init();

    let mut config = ClientConfig::from_env().with_endpoint_override(cli.endpoint);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let prompt = match (cli.prompt, cli.stdin) {
        (Some(p), _) => p,
        (None, true) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
        (None, false) => return Err("either --prompt or --stdin is required".into()),
    };

    let controller = PromptController::new(HttpTransport::new(&config)?);
    controller.update_prompt(prompt);
    if !controller.can_submit() {
        eprintln!("Error: prompt is empty");
        return Ok(EXIT_EMPTY_PROMPT);
    }

    if cli.verbose {
        eprintln!("  POST {}", config.endpoint);
    }
    controller.submit().await;

    let code = match controller.result() {
        GenerateResult::Success { tree } if cli.raw => {
            let text = serde_json::to_string_pretty(&tree)
                .map_err(|e| format!("failed to serialize tree: {e}"))?;
            println!("{text}");
            0
        }
        GenerateResult::Success { tree } => {
            let registry = Registry::builtin();
            match ValidatedRenderer::new(&registry).render(&tree) {
                RenderOutcome::Rendered(lines) => {
                    print!("{}", render_plain(&lines));
                    0
                }
                RenderOutcome::Invalid(issues) => {
                    eprintln!("Generated tree is invalid:");
                    print_issues(&issues);
                    1
                }
            }
        }
        GenerateResult::Error { message, issues } => {
            eprintln!("Generation Failed: {message}");
            if let Some(issues) = issues {
                print_issues(&issues);
            }
            1
        }
        GenerateResult::Idle | GenerateResult::Loading => {
            return Err("submission did not resolve".into());
        }
    };

    for line in log_buffer.drain() {
        eprintln!("  {} {} {}", line.time, line.level.label(), line.message);
    }

    Ok(code)
}

fn print_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        eprintln!("  - {issue}");
    }
}
