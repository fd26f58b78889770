//! Command implementations for the Polydict CLI.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dictionary::DictionaryRegistry;
use crate::error::{PolydictError, Result};
use crate::server::{self, ServerConfig, TokenizeService};

/// Execute a CLI command.
pub fn execute_command(args: PolydictArgs) -> Result<()> {
    match &args.command {
        Command::Serve(serve_args) => serve(serve_args.clone(), &args),
        Command::Tokenize(tokenize_args) => tokenize(tokenize_args.clone(), &args),
        Command::Dictionaries(list_args) => list_dictionaries(list_args.clone(), &args),
    }
}

/// Build the server configuration from the config file and flags.
///
/// Flags override values read from the file.
pub fn server_config(args: &ServeArgs) -> Result<ServerConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            debug!("Loading server configuration from: {}", path.display());
            ServerConfig::from_file(path)?
        }
        None => ServerConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(policy) = args.failure_policy {
        config.failure_policy = policy;
    }
    if let Some(command) = &args.render_command {
        config.render_command = Some(command.clone());
    }
    if !args.render_enabled() {
        config.render_command = None;
    }
    if let Some(timeout) = args.render_timeout_ms {
        config.render_timeout_ms = timeout;
    }
    if !args.dictionaries.is_empty() {
        config.dictionaries = Some(args.dictionaries.clone());
    }
    if args.preload {
        config.preload = true;
    }

    config.validate()?;
    Ok(config)
}

/// Run the HTTP server until interrupted.
fn serve(args: ServeArgs, cli_args: &PolydictArgs) -> Result<()> {
    let config = server_config(&args)?;
    if cli_args.verbosity() > 1 {
        println!("Starting server on {}", config.bind_address());
    }

    let registry = Arc::new(DictionaryRegistry::with_builtin_engines());
    let service = Arc::new(TokenizeService::from_config(registry, config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(service))
}

/// Tokenize text with one dictionary or all of them.
fn tokenize(args: TokenizeArgs, cli_args: &PolydictArgs) -> Result<()> {
    let registry = Arc::new(DictionaryRegistry::with_builtin_engines());

    let mut config = ServerConfig {
        render_command: None,
        ..Default::default()
    };
    if let Some(name) = &args.dictionary {
        registry.lookup(Some(name))?;
        config.dictionaries = Some(vec![name.clone()]);
    }

    let service = TokenizeService::new(registry, config);
    if service.dictionary_names().is_empty() {
        return Err(PolydictError::no_dictionaries());
    }

    let start = Instant::now();
    let outcome = service.tokenize(&args.text, &args.encoding, args.mode)?;
    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Tokenized with {} dictionary(ies) in {duration_ms}ms",
        outcome.response.tokens.len()
    );

    let response = outcome.response;
    output_result(
        "Tokenization finished",
        &TokenizationResult {
            input: response.input,
            mode: response.mode,
            tokens: response.tokens,
            errors: response.errors,
            duration_ms,
        },
        cli_args,
    )
}

/// List the registered dictionaries.
fn list_dictionaries(_args: DictionariesArgs, cli_args: &PolydictArgs) -> Result<()> {
    let registry = Arc::new(DictionaryRegistry::with_builtin_engines());
    let service = TokenizeService::new(registry, ServerConfig::default());

    output_result(
        "Registered dictionaries",
        &DictionaryListing {
            dictionaries: service.dictionary_infos(),
        },
        cli_args,
    )
}
