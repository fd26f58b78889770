//! Multi-dictionary tokenization service.
//!
//! A request goes through the following steps:
//!
//! 1. Decode the percent-encoded text with the requested charset
//! 2. Trim it to the length limit of the requested mode
//! 3. Tokenize it with every served dictionary, using cached tokenizers
//! 4. Assemble one response keyed by dictionary name
//!
//! Tokenizers are created on first use per dictionary and cached for the
//! lifetime of the service. Creation goes through a double-checked write
//! lock, so concurrent first requests for one dictionary share a single
//! tokenizer and therefore a single engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use log::{error, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryRegistry;
use crate::error::{PolydictError, Result};
use crate::server::config::{FailurePolicy, ServerConfig};
use crate::server::decode::{DEFAULT_ENCODING, decode_text, trim_input};
use crate::server::graph::lattice_dot;
use crate::server::render::{DotRenderer, GraphRenderer};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Key holding the surface form in a token record.
pub const SURFACE_KEY: &str = "SURFACE";

/// Message shown to callers for any engine failure.
pub const TOKENIZATION_FAILURE: &str = "Exception when tokenizing";

/// One token as it appears in a response: its surface plus every feature.
pub type TokenRecord = BTreeMap<String, String>;

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

/// Parameters of a tokenization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeRequest {
    /// Percent-encoded input text.
    pub text: Option<String>,

    /// Charset of the percent-encoded bytes.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Request mode; the trace mode adds a rendered lattice.
    #[serde(default)]
    pub mode: i32,
}

impl TokenizeRequest {
    /// A UTF-8 request for `text` in `mode`.
    pub fn new<S: Into<String>>(text: S, mode: i32) -> Self {
        TokenizeRequest {
            text: Some(text.into()),
            encoding: default_encoding(),
            mode,
        }
    }
}

/// Result of a multi-dictionary tokenization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    /// Token records per dictionary name.
    pub tokens: BTreeMap<String, Vec<TokenRecord>>,

    /// The decoded, possibly trimmed, input.
    pub input: String,

    /// The requested mode.
    pub mode: i32,

    /// Dictionaries that failed, when partial results are enabled.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,

    /// Rendered lattice of the trace mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viterbi: Option<String>,
}

/// A response together with the graph description still to be rendered.
#[derive(Debug, Clone)]
pub struct TokenizeOutcome {
    pub response: TokenizeResponse,
    pub graph: Option<String>,
}

/// Description of a served dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryInfo {
    pub name: String,
    pub identity: String,
    pub features: Vec<String>,
    pub default: bool,
}

/// Serves tokenization requests across all dictionaries of a registry.
pub struct TokenizeService {
    registry: Arc<DictionaryRegistry>,
    tokenizers: RwLock<AHashMap<String, Arc<Tokenizer>>>,
    config: ServerConfig,
    renderer: Option<Arc<dyn GraphRenderer>>,
}

impl TokenizeService {
    /// Create a service without a graph renderer.
    pub fn new(registry: Arc<DictionaryRegistry>, config: ServerConfig) -> Self {
        if let Some(allowed) = &config.dictionaries {
            let known = registry.names();
            for name in allowed.iter().filter(|name| !known.contains(name)) {
                warn!("Configured dictionary '{name}' is not registered");
            }
        }

        TokenizeService {
            registry,
            tokenizers: RwLock::new(AHashMap::new()),
            config,
            renderer: None,
        }
    }

    /// Create a service, with a [`DotRenderer`] if a render command is configured.
    pub fn from_config(registry: Arc<DictionaryRegistry>, config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let renderer: Option<Arc<dyn GraphRenderer>> = match &config.render_command {
            Some(command) => Some(Arc::new(DotRenderer::new(
                command,
                config.render_timeout(),
            )?)),
            None => None,
        };

        let mut service = Self::new(registry, config);
        service.renderer = renderer;
        Ok(service)
    }

    /// Use `renderer` for trace-mode requests.
    pub fn with_renderer(mut self, renderer: Arc<dyn GraphRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// The registry this service serves.
    pub fn registry(&self) -> &Arc<DictionaryRegistry> {
        &self.registry
    }

    /// The service configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Names of the dictionaries every request is tokenized with.
    pub fn dictionary_names(&self) -> Vec<String> {
        let names = self.registry.names();
        match &self.config.dictionaries {
            Some(allowed) => names
                .into_iter()
                .filter(|name| allowed.contains(name))
                .collect(),
            None => names,
        }
    }

    /// Describe the served dictionaries.
    pub fn dictionary_infos(&self) -> Vec<DictionaryInfo> {
        let default = self.registry.default_dictionary();
        self.dictionary_names()
            .iter()
            .filter_map(|name| self.registry.lookup(Some(name)).ok())
            .map(|dictionary| DictionaryInfo {
                name: dictionary.name().to_string(),
                identity: dictionary.identity().to_string(),
                features: dictionary.feature_names(),
                default: default
                    .as_ref()
                    .is_some_and(|d| Arc::ptr_eq(d, &dictionary)),
            })
            .collect()
    }

    /// Get the cached tokenizer for `name`, creating it on first use.
    pub fn tokenizer(&self, name: &str) -> Result<Arc<Tokenizer>> {
        let cached = self.tokenizers.read().get(name).cloned();
        if let Some(tokenizer) = cached {
            return Ok(tokenizer);
        }

        let mut tokenizers = self.tokenizers.write();
        if let Some(tokenizer) = tokenizers.get(name) {
            return Ok(Arc::clone(tokenizer));
        }

        let tokenizer = Arc::new(Tokenizer::for_dictionary(&self.registry, Some(name))?);
        tokenizers.insert(name.to_string(), Arc::clone(&tokenizer));
        Ok(tokenizer)
    }

    /// Number of tokenizers created so far.
    pub fn cached_tokenizers(&self) -> usize {
        self.tokenizers.read().len()
    }

    /// Construct the engine of every served dictionary.
    ///
    /// Returns the number of dictionaries whose engine is ready. Failures are
    /// logged and leave that dictionary unavailable.
    pub fn preload(&self) -> usize {
        let mut ready = 0;
        for name in self.dictionary_names() {
            match self.tokenizer(&name).and_then(|t| t.warm_up()) {
                Ok(()) => ready += 1,
                Err(e) => error!("Failed to preload dictionary '{name}': {e}"),
            }
        }
        info!("Preloaded {ready} dictionary engine(s)");
        ready
    }

    /// Decode and trim request text for `mode`.
    pub fn prepare_input(&self, text: &str, encoding: &str, mode: i32) -> Result<String> {
        let decoded = decode_text(text, encoding)?;
        info!("Tokenizing text {decoded} using mode {mode}");
        Ok(trim_input(&decoded, self.config.max_length_for(mode)).into_owned())
    }

    /// Run a request synchronously, leaving any rendering to the caller.
    pub fn tokenize(&self, text: &str, encoding: &str, mode: i32) -> Result<TokenizeOutcome> {
        let input = self.prepare_input(text, encoding, mode)?;
        let trace = self.config.is_trace_mode(mode) && self.renderer.is_some();

        let mut tokens = BTreeMap::new();
        let mut errors = BTreeMap::new();
        let mut graph = None;

        for name in self.dictionary_names() {
            match self.tokenize_with(&name, &input) {
                Ok(result) => {
                    if trace && graph.is_none() {
                        graph = Some(lattice_dot(&name, &result));
                    }
                    tokens.insert(name, result.iter().map(token_record).collect());
                }
                Err(e) => {
                    error!("Exception when tokenizing with '{name}': {e}");
                    match self.config.failure_policy {
                        FailurePolicy::Abort if e.is_engine_failure() => return Err(e),
                        FailurePolicy::Abort => {
                            return Err(PolydictError::tokenization(name, e.to_string()));
                        }
                        FailurePolicy::Partial => {
                            errors.insert(name, TOKENIZATION_FAILURE.to_string());
                        }
                    }
                }
            }
        }

        Ok(TokenizeOutcome {
            response: TokenizeResponse {
                tokens,
                input,
                mode,
                errors,
                viterbi: None,
            },
            graph,
        })
    }

    /// Serve a request: tokenize on the blocking pool, then render if traced.
    pub async fn handle(self: Arc<Self>, request: TokenizeRequest) -> Result<TokenizeResponse> {
        let text = request
            .text
            .ok_or_else(|| PolydictError::invalid_request("missing 'text' parameter"))?;
        let encoding = request.encoding;
        let mode = request.mode;

        let service = Arc::clone(&self);
        let outcome = tokio::task::spawn_blocking(move || service.tokenize(&text, &encoding, mode))
            .await
            .map_err(|e| {
                error!("Tokenization task failed: {e}");
                PolydictError::tokenization(self.dictionary_names().join(","), e.to_string())
            })??;

        let TokenizeOutcome {
            mut response,
            graph,
        } = outcome;
        if let (Some(graph), Some(renderer)) = (graph, &self.renderer) {
            match renderer.render(&graph).await {
                Ok(svg) => response.viterbi = Some(svg),
                Err(e) => error!("Error rendering lattice: {e}"),
            }
        }

        Ok(response)
    }

    fn tokenize_with(&self, name: &str, text: &str) -> Result<Vec<Token>> {
        self.tokenizer(name)?.tokenize(text)
    }
}

/// Convert a token into its response record.
pub fn token_record(token: &Token) -> TokenRecord {
    let mut record = TokenRecord::new();
    record.insert(SURFACE_KEY.to_string(), token.surface().to_string());
    for name in token.feature_names() {
        record.insert(name.to_string(), token.feature(name).to_string());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenizeService {
        TokenizeService::new(
            Arc::new(DictionaryRegistry::with_builtin_engines()),
            ServerConfig::default(),
        )
    }

    #[test]
    fn test_tokenize_all_builtin_dictionaries() {
        let service = service();
        let outcome = service.tokenize("東京タワー", DEFAULT_ENCODING, 0).unwrap();
        let response = outcome.response;

        assert_eq!(response.input, "東京タワー");
        assert_eq!(response.mode, 0);
        assert_eq!(response.tokens.len(), service.dictionary_names().len());

        let script = &response.tokens["script"];
        assert_eq!(script[0][SURFACE_KEY], "東京");
        assert_eq!(script[0]["SCRIPT"], "KANJI");
        assert_eq!(script[1]["SCRIPT"], "KATAKANA");
        assert!(outcome.graph.is_none());
    }

    #[test]
    fn test_tokenizers_are_cached() {
        let service = service();
        let first = service.tokenizer("script").unwrap();
        let second = service.tokenizer("script").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cached_tokenizers(), 1);
    }

    #[test]
    fn test_allow_list_restricts_dictionaries() {
        let config = ServerConfig {
            dictionaries: Some(vec!["script".to_string(), "missing".to_string()]),
            ..Default::default()
        };
        let service = TokenizeService::new(
            Arc::new(DictionaryRegistry::with_builtin_engines()),
            config,
        );

        assert_eq!(service.dictionary_names(), vec!["script"]);
        let response = service.tokenize("abc", DEFAULT_ENCODING, 0).unwrap().response;
        assert_eq!(response.tokens.keys().collect::<Vec<_>>(), vec!["script"]);
    }

    #[test]
    fn test_dictionary_infos() {
        let service = service();
        let infos = service.dictionary_infos();

        assert_eq!(infos.iter().filter(|info| info.default).count(), 1);
        let script = infos.iter().find(|info| info.name == "script").unwrap();
        assert_eq!(
            script.features,
            vec!["SCRIPT", "CHARACTER_COUNT", "BYTE_OFFSET"]
        );
    }

    #[test]
    fn test_preload() {
        let service = service();
        assert_eq!(service.preload(), service.dictionary_names().len());
        assert!(service.tokenizer("script").unwrap().is_ready());
    }

    #[tokio::test]
    async fn test_handle_requires_text() {
        let service = Arc::new(service());
        let request = TokenizeRequest {
            text: None,
            encoding: default_encoding(),
            mode: 0,
        };

        assert!(matches!(
            service.handle(request).await,
            Err(PolydictError::InvalidRequest(_))
        ));
    }
}
