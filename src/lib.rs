//! # Polydict
//!
//! A dictionary-agnostic tokenizer facade with a multi-dictionary HTTP server.
//!
//! ## Features
//!
//! - Engines discovered once and registered under short dictionary names
//! - Uniform tokens whose features are read by name through a per-dictionary schema
//! - Lazily constructed, shareable tokenizers
//! - An HTTP service tokenizing one request with every served dictionary
//! - Optional morphological engines backed by Lindera (`ipadic`, `unidic` features)

pub mod cli;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod server;
pub mod token;
pub mod tokenizer;

pub mod prelude {
    pub use crate::dictionary::{Dictionary, DictionaryRegistry, FeatureSchema};
    pub use crate::engine::{Engine, EngineProvider, EngineType, FeatureFields, RawToken, TokenKind};
    pub use crate::error::{PolydictError, Result};
    pub use crate::server::{ServerConfig, TokenizeRequest, TokenizeResponse, TokenizeService};
    pub use crate::token::Token;
    pub use crate::tokenizer::Tokenizer;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
