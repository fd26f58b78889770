use std::sync::Arc;

use async_trait::async_trait;

use polydict::dictionary::DictionaryRegistry;
use polydict::engine::{Engine, EngineProvider, FnProvider, RawToken, script};
use polydict::error::{PolydictError, Result};
use polydict::server::render::GraphRenderer;
use polydict::server::service::{SURFACE_KEY, TOKENIZATION_FAILURE};
use polydict::server::{FailurePolicy, ServerConfig, TokenizeRequest, TokenizeService};

const SUMOMO: &str = "すもももももももものうち";
const SUMOMO_ENCODED: &str = "%E3%81%99%E3%82%82%E3%82%82%E3%82%82%E3%82%82%E3%82%82%E3%82%82%E3%82%82%E3%82%82%E3%81%AE%E3%81%86%E3%81%A1";

struct FailingEngine;

impl Engine for FailingEngine {
    fn tokenize(&mut self, _text: &str) -> Result<Vec<RawToken>> {
        Err(PolydictError::other("connection cost matrix is corrupt"))
    }
}

struct PanickingEngine;

impl Engine for PanickingEngine {
    fn tokenize(&mut self, _text: &str) -> Result<Vec<RawToken>> {
        panic!("lattice index out of range");
    }
}

struct FixedRenderer(Result<String>);

#[async_trait]
impl GraphRenderer for FixedRenderer {
    async fn render(&self, graph: &str) -> Result<String> {
        assert!(graph.starts_with("digraph"));
        match &self.0 {
            Ok(svg) => Ok(svg.clone()),
            Err(e) => Err(PolydictError::render(e.to_string())),
        }
    }
}

fn script_provider(identity: &str) -> Arc<dyn EngineProvider> {
    Arc::new(FnProvider::new(
        identity,
        &[("SCRIPT", 0), ("CHARACTER_COUNT", 1)],
        || Ok(script::Tokenizer::new()),
    ))
}

fn failing_provider() -> Arc<dyn EngineProvider> {
    Arc::new(FnProvider::new("failing::Tokenizer", &[], || Ok(FailingEngine)))
}

fn two_dictionary_service(config: ServerConfig) -> TokenizeService {
    let registry = DictionaryRegistry::empty();
    registry.register("ipadic", script_provider("polydict::engine::ipadic::Tokenizer"));
    registry.register("unidic", script_provider("polydict::engine::unidic::Tokenizer"));
    TokenizeService::new(Arc::new(registry), config)
}

fn no_render() -> ServerConfig {
    ServerConfig {
        render_command: None,
        ..Default::default()
    }
}

#[test]
fn sumomo_is_tokenized_by_every_dictionary() -> Result<()> {
    let service = two_dictionary_service(no_render());
    let response = service.tokenize(SUMOMO_ENCODED, "utf-8", 0)?.response;

    assert_eq!(response.input, SUMOMO);
    assert_eq!(
        response.tokens.keys().collect::<Vec<_>>(),
        vec!["ipadic", "unidic"]
    );
    for records in response.tokens.values() {
        let surfaces: String = records
            .iter()
            .map(|record| record[SURFACE_KEY].as_str())
            .collect();
        assert_eq!(surfaces, SUMOMO);
        assert!(records.iter().all(|record| record.contains_key("SCRIPT")));
    }
    assert!(response.errors.is_empty());
    assert!(response.viterbi.is_none());
    Ok(())
}

#[test]
fn shift_jis_requests_are_decoded() -> Result<()> {
    let service = two_dictionary_service(no_render());
    let response = service.tokenize("%82%B7%82%E0%82%E0", "Shift_JIS", 0)?.response;

    assert_eq!(response.input, "すもも");
    Ok(())
}

#[test]
fn input_is_trimmed_per_mode() -> Result<()> {
    let service = two_dictionary_service(no_render());

    let long = "あ".repeat(600);
    let response = service.tokenize(&long, "utf-8", 0)?.response;
    assert_eq!(response.input.chars().count(), 512);

    let response = service.tokenize(&"い".repeat(40), "utf-8", 3)?.response;
    assert_eq!(response.input.chars().count(), 32);
    assert_eq!(response.mode, 3);

    let response = service.tokenize("short", "utf-8", 3)?.response;
    assert_eq!(response.input, "short");
    Ok(())
}

#[test]
fn malformed_requests_are_decoding_errors() {
    let service = two_dictionary_service(no_render());

    assert!(matches!(
        service.tokenize("100%", "utf-8", 0),
        Err(PolydictError::Decoding(_))
    ));
    assert!(matches!(
        service.tokenize("%G1", "utf-8", 0),
        Err(PolydictError::Decoding(_))
    ));
    assert!(matches!(
        service.tokenize("abc", "no-such-charset", 0),
        Err(PolydictError::Decoding(_))
    ));
    assert!(matches!(
        service.tokenize("%FF%FE", "utf-8", 0),
        Err(PolydictError::Decoding(_))
    ));
    assert_eq!(service.cached_tokenizers(), 0);
}

#[test]
fn abort_policy_fails_the_whole_request() {
    let registry = DictionaryRegistry::empty();
    registry.register("script", script_provider("script::Tokenizer"));
    registry.register("failing", failing_provider());
    let service = TokenizeService::new(Arc::new(registry), no_render());

    match service.tokenize("text", "utf-8", 0) {
        Err(PolydictError::Tokenization { dictionary, .. }) => assert_eq!(dictionary, "failing"),
        other => panic!("Expected tokenization error, got {other:?}"),
    }
}

#[test]
fn partial_policy_reports_failures_per_dictionary() -> Result<()> {
    let registry = DictionaryRegistry::empty();
    registry.register("script", script_provider("script::Tokenizer"));
    registry.register("failing", failing_provider());
    let config = ServerConfig {
        failure_policy: FailurePolicy::Partial,
        ..no_render()
    };
    let service = TokenizeService::new(Arc::new(registry), config);

    let response = service.tokenize("text", "utf-8", 0)?.response;
    assert_eq!(response.tokens.keys().collect::<Vec<_>>(), vec!["script"]);
    assert_eq!(response.errors["failing"], TOKENIZATION_FAILURE);

    let json = serde_json::to_string(&response)?;
    assert!(!json.contains("corrupt"));
    Ok(())
}

#[test]
fn panicking_engines_fail_only_their_dictionary() -> Result<()> {
    let registry = DictionaryRegistry::empty();
    registry.register("script", script_provider("script::Tokenizer"));
    registry.register(
        "panicking",
        Arc::new(FnProvider::new("panicking::Tokenizer", &[], || Ok(PanickingEngine))),
    );
    let config = ServerConfig {
        failure_policy: FailurePolicy::Partial,
        ..no_render()
    };
    let service = TokenizeService::new(Arc::new(registry), config);

    for _ in 0..2 {
        let response = service.tokenize("text", "utf-8", 0)?.response;
        assert_eq!(response.tokens.keys().collect::<Vec<_>>(), vec!["script"]);
        assert_eq!(response.errors["panicking"], TOKENIZATION_FAILURE);
        assert!(!serde_json::to_string(&response)?.contains("lattice"));
    }
    Ok(())
}

#[tokio::test]
async fn trace_mode_attaches_rendered_lattice() -> Result<()> {
    let service = Arc::new(
        two_dictionary_service(no_render())
            .with_renderer(Arc::new(FixedRenderer(Ok("<svg/>".to_string())))),
    );

    let traced = Arc::clone(&service)
        .handle(TokenizeRequest::new(SUMOMO_ENCODED, 3))
        .await?;
    assert_eq!(traced.viterbi.as_deref(), Some("<svg/>"));

    let plain = service.handle(TokenizeRequest::new(SUMOMO_ENCODED, 0)).await?;
    assert!(plain.viterbi.is_none());
    Ok(())
}

#[tokio::test]
async fn render_failures_leave_the_lattice_out() -> Result<()> {
    let renderer = FixedRenderer(Err(PolydictError::render("dot: command not found")));
    let service = Arc::new(two_dictionary_service(no_render()).with_renderer(Arc::new(renderer)));

    let response = service.handle(TokenizeRequest::new("すもも", 3)).await?;
    assert!(response.viterbi.is_none());
    assert_eq!(response.tokens.len(), 2);
    Ok(())
}
