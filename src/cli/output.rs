//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PolydictArgs};
use crate::error::Result;
use crate::server::service::{DictionaryInfo, SURFACE_KEY, TokenRecord};

/// Result structure for a tokenization.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenizationResult {
    pub input: String,
    pub mode: i32,
    pub tokens: BTreeMap<String, Vec<TokenRecord>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
    pub duration_ms: u64,
}

/// Result structure for the dictionary listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct DictionaryListing {
    pub dictionaries: Vec<DictionaryInfo>,
}

/// Output a command result in the requested format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &PolydictArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &PolydictArgs) -> Result<()> {
    if args.verbosity() > 1 && !message.is_empty() {
        println!("{message}");
    }

    let value = serde_json::to_value(result)?;
    if value.get("tokens").is_some() {
        output_tokens_human(&value)
    } else if value.get("dictionaries").is_some() {
        output_dictionaries_human(&value, args)
    } else {
        output_generic_human(&value)
    }
}

/// Output tokenization results in human format, one line per token.
fn output_tokens_human(value: &serde_json::Value) -> Result<()> {
    if let Some(input) = value.get("input").and_then(|i| i.as_str()) {
        println!("Input: {input}");
    }

    if let Some(tokens) = value.get("tokens").and_then(|t| t.as_object()) {
        for (dictionary, records) in tokens {
            println!();
            println!("[{dictionary}]");
            for record in records.as_array().into_iter().flatten() {
                println!("{}", format_record(record));
            }
        }
    }

    if let Some(errors) = value.get("errors").and_then(|e| e.as_object()) {
        for (dictionary, message) in errors {
            println!();
            println!("[{dictionary}] {}", format_value(message));
        }
    }

    if let Some(duration) = value.get("duration_ms").and_then(|d| d.as_u64()) {
        println!();
        println!("Took {duration}ms");
    }
    Ok(())
}

/// Format one token record as `surface<TAB>feature=value,...`.
fn format_record(record: &serde_json::Value) -> String {
    let Some(obj) = record.as_object() else {
        return format_value(record);
    };

    let surface = obj.get(SURFACE_KEY).map(format_value).unwrap_or_default();
    let features: Vec<String> = obj
        .iter()
        .filter(|(key, _)| key.as_str() != SURFACE_KEY)
        .map(|(key, val)| format!("{key}={}", format_value(val)))
        .collect();

    if features.is_empty() {
        surface
    } else {
        format!("{surface}\t{}", features.join(","))
    }
}

/// Output the dictionary listing in human format.
fn output_dictionaries_human(value: &serde_json::Value, args: &PolydictArgs) -> Result<()> {
    let long = matches!(
        &args.command,
        crate::cli::args::Command::Dictionaries(list_args) if list_args.long
    );

    let dictionaries = value
        .get("dictionaries")
        .and_then(|d| d.as_array())
        .cloned()
        .unwrap_or_default();
    if dictionaries.is_empty() {
        println!("No dictionaries registered.");
        return Ok(());
    }

    for info in &dictionaries {
        let name = info.get("name").map(format_value).unwrap_or_default();
        let marker = if info.get("default").and_then(|d| d.as_bool()) == Some(true) {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}");

        if long {
            if let Some(identity) = info.get("identity").and_then(|i| i.as_str()) {
                println!("  Engine: {identity}");
            }
            if let Some(features) = info.get("features").and_then(|f| f.as_array()) {
                let names: Vec<String> = features.iter().map(format_value).collect();
                println!("  Features: {}", names.join(", "));
            }
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PolydictArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
