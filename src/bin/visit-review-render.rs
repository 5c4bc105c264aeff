use std::env;
use std::fs;
use std::process;

use tracing_subscriber::EnvFilter;
use visit_review::{
    default_catalog, render_tree, DecodeError, Decoder, DecoderConfig, RenderError, View,
    ViewContext,
};

enum CliError {
    Io(String),
    Decode(DecodeError),
    Render(RenderError),
    Context(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: visit-review-render <template.json|template.yaml> [context.json]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  visit-review-render review_template.json");
        eprintln!("  visit-review-render review_template.yaml visit_context.json");
        process::exit(1);
    }

    let config = DecoderConfig::from_env();
    let template_path = &args[1];
    let context_path = args.get(2);

    match run(template_path, context_path.map(String::as_str), config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("✗ {} has errors:", template_path);
            print_error(&e);
            process::exit(1);
        }
    }
}

fn run(
    template_path: &str,
    context_path: Option<&str>,
    config: DecoderConfig,
) -> Result<String, CliError> {
    let root = load_template(template_path, config)?;

    let Some(context_path) = context_path else {
        return Ok(format!("✓ {} is valid", template_path));
    };

    let raw = fs::read_to_string(context_path)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {}", context_path, e)))?;
    let ctx: ViewContext = serde_json::from_str(&raw)
        .map_err(|e| CliError::Context(format!("{}: {}", context_path, e)))?;

    let rendered = render_tree(&root, &ctx).map_err(CliError::Render)?;
    serde_json::to_string_pretty(&rendered)
        .map_err(|e| CliError::Context(format!("Failed to serialize output: {}", e)))
}

fn load_template(path: &str, config: DecoderConfig) -> Result<View, CliError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {}", path, e)))?;

    let decoder = Decoder::with_config(default_catalog(), config);
    tracing::debug!(path, max_depth = decoder.config().max_depth, "loading template");
    let decoded = if path.ends_with(".yaml") || path.ends_with(".yml") {
        decoder.decode_yaml(&content)
    } else {
        decoder.decode_json(&content)
    };
    decoded.map_err(CliError::Decode)
}

fn print_error(error: &CliError) {
    match error {
        CliError::Io(msg) => {
            eprintln!("  I/O error:");
            eprintln!("    {}", msg);
        }
        CliError::Context(msg) => {
            eprintln!("  Invalid view context:");
            eprintln!("    {}", msg);
        }
        CliError::Decode(DecodeError::UnknownViewType { view_type }) => {
            eprintln!("  Unknown view type '{}'", view_type);
            eprintln!("    Known view types:");
            for known in default_catalog().discriminants() {
                eprintln!("      {}", known);
            }
        }
        CliError::Decode(e) => {
            eprintln!("  Template error:");
            eprintln!("    {}", e);
        }
        CliError::Render(e) => {
            eprintln!("  Render error in '{}':", e.view_type());
            eprintln!("    {}", e);
        }
    }
}
