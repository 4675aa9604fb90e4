//! Serve command - session API plus the normalize endpoint.

use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use crate::cli::SessionOptions;
use crate::provider;
use crate::server::{app, state::AppState};

pub fn run(port: u16, options: &SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    // Blocking clients are built before the runtime starts
    let client = provider::build_client(options)?;
    let mut state = AppState::new(options.session_config(), client);

    let normalizer = match provider::build_chat_client(options) {
        Ok(chat) => {
            let model = chat.config().model.clone();
            state = state.with_normalizer(Arc::new(chat));
            Some(model)
        }
        Err(e) => {
            warn!(error = %e, "normalize endpoint disabled");
            eprintln!(
                "{} /api/normalize is disabled: {}",
                "Warning:".yellow(),
                e
            );
            None
        }
    };

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting colmap server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Suggestions: {}", state.client_name());
    match &normalizer {
        Some(model) => println!("  Normalize:   {} ({})", "enabled".green(), model),
        None => println!("  Normalize:   {}", "disabled".dimmed()),
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    println!("{}", "Shutting down...".yellow());
    Ok(())
}
