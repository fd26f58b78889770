//! Dictionary-agnostic tokenizer.
//!
//! A [`Tokenizer`] is bound to one [`Dictionary`]. The engine behind it is
//! constructed on the first call to [`Tokenizer::tokenize`] and reused for
//! every later call. Access to the engine is serialized, so one tokenizer can
//! be shared between threads.
//!
//! If the engine cannot be constructed the failure is logged and remembered:
//! the tokenizer reports [`PolydictError::EngineUnavailable`] from then on.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error};
use parking_lot::Mutex;

use crate::dictionary::{Dictionary, DictionaryRegistry};
use crate::engine::Engine;
use crate::error::{PolydictError, Result};
use crate::token::Token;

enum EngineState {
    Pending,
    Ready(Box<dyn Engine>),
    Unavailable(String),
}

/// A tokenizer that works across all dictionaries.
pub struct Tokenizer {
    dictionary: Arc<Dictionary>,
    engine: Mutex<EngineState>,
}

impl Tokenizer {
    /// Create a tokenizer for a dictionary.
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Tokenizer {
            dictionary,
            engine: Mutex::new(EngineState::Pending),
        }
    }

    /// Create a tokenizer for a named dictionary, or the default one for `None`.
    pub fn for_dictionary(registry: &DictionaryRegistry, name: Option<&str>) -> Result<Self> {
        Ok(Self::new(registry.lookup(name)?))
    }

    /// The dictionary this tokenizer is bound to.
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Tokenize `text`, returning tokens in the order the engine produced them.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut state = self.engine.lock();
        let engine = self.ready_engine(&mut state)?;

        let start = Instant::now();
        let raw_tokens = match panic::catch_unwind(AssertUnwindSafe(|| engine.tokenize(text))) {
            Ok(result) => result.map_err(|e| {
                error!(
                    "Engine for dictionary '{}' failed to tokenize: {e}",
                    self.dictionary.name()
                );
                PolydictError::tokenization(self.dictionary.name(), e.to_string())
            })?,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!(
                    "Engine for dictionary '{}' panicked while tokenizing: {reason}",
                    self.dictionary.name()
                );
                // Rebuild the engine on the next call.
                *state = EngineState::Pending;
                return Err(PolydictError::tokenization(
                    self.dictionary.name(),
                    format!("engine panicked: {reason}"),
                ));
            }
        };
        debug!(
            "Tokenize with {}: {}ms",
            self.dictionary.name(),
            start.elapsed().as_millis()
        );

        Ok(raw_tokens
            .into_iter()
            .map(|raw| Token::new(Arc::clone(&self.dictionary), raw))
            .collect())
    }

    /// Construct the engine now instead of on the first tokenization.
    pub fn warm_up(&self) -> Result<()> {
        let mut state = self.engine.lock();
        self.ready_engine(&mut state).map(|_| ())
    }

    /// Whether the engine has been constructed successfully.
    pub fn is_ready(&self) -> bool {
        matches!(*self.engine.lock(), EngineState::Ready(_))
    }

    fn ready_engine<'a>(&self, state: &'a mut EngineState) -> Result<&'a mut Box<dyn Engine>> {
        if matches!(state, EngineState::Pending) {
            *state = match self.dictionary.create_engine() {
                Ok(engine) => {
                    debug!("Created engine for dictionary '{}'", self.dictionary.name());
                    EngineState::Ready(engine)
                }
                Err(e) => {
                    error!(
                        "Failed to create engine for dictionary '{}' ({}): {e}",
                        self.dictionary.name(),
                        self.dictionary.identity()
                    );
                    EngineState::Unavailable(e.to_string())
                }
            };
        }

        match state {
            EngineState::Ready(engine) => Ok(engine),
            EngineState::Unavailable(reason) => Err(PolydictError::engine_unavailable(
                self.dictionary.name(),
                reason.clone(),
            )),
            EngineState::Pending => Err(PolydictError::engine_unavailable(
                self.dictionary.name(),
                "engine was not constructed",
            )),
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("dictionary", &self.dictionary.name())
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::engine::{EngineProvider, FnProvider, RawToken, script};

    struct FailingEngine;

    impl Engine for FailingEngine {
        fn tokenize(&mut self, _text: &str) -> Result<Vec<RawToken>> {
            Err(PolydictError::other("lattice overflow"))
        }
    }

    #[test]
    fn test_engine_created_once() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let registry = DictionaryRegistry::empty();
        registry.register(
            "script",
            Arc::new(FnProvider::new("script::Tokenizer", &[("SCRIPT", 0)], move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(script::Tokenizer::new())
            })),
        );

        let tokenizer = Tokenizer::for_dictionary(&registry, None).unwrap();
        assert!(!tokenizer.is_ready());
        tokenizer.tokenize("すもも").unwrap();
        tokenizer.tokenize("もも").unwrap();

        assert!(tokenizer.is_ready());
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tokens_keep_engine_order() {
        let registry = DictionaryRegistry::with_builtin_engines();
        let tokenizer = Tokenizer::for_dictionary(&registry, Some("script")).unwrap();
        let tokens = tokenizer.tokenize("東京タワーへ行く").unwrap();

        let surfaces: Vec<_> = tokens.iter().map(|t| t.surface()).collect();
        assert_eq!(surfaces, vec!["東京", "タワー", "へ", "行", "く"]);
        assert!(tokens.iter().all(|t| t.dictionary().name() == "script"));
    }

    #[test]
    fn test_unavailable_engine_is_remembered() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let provider: Arc<dyn EngineProvider> =
            Arc::new(FnProvider::new("broken::Tokenizer", &[], move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<script::Tokenizer, _>(PolydictError::other("missing matrix.def"))
            }));
        let registry = DictionaryRegistry::empty();
        registry.register("broken", provider);

        let tokenizer = Tokenizer::for_dictionary(&registry, Some("broken")).unwrap();
        for _ in 0..3 {
            assert!(matches!(
                tokenizer.tokenize("text"),
                Err(PolydictError::EngineUnavailable { .. })
            ));
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_engine_errors_become_tokenization_errors() {
        let registry = DictionaryRegistry::empty();
        registry.register(
            "failing",
            Arc::new(FnProvider::new("failing::Tokenizer", &[], || Ok(FailingEngine))),
        );

        let tokenizer = Tokenizer::for_dictionary(&registry, Some("failing")).unwrap();
        match tokenizer.tokenize("text") {
            Err(PolydictError::Tokenization { dictionary, reason }) => {
                assert_eq!(dictionary, "failing");
                assert!(reason.contains("lattice overflow"));
            }
            other => panic!("Expected tokenization error, got {other:?}"),
        }
    }

    struct PanickingEngine;

    impl Engine for PanickingEngine {
        fn tokenize(&mut self, _text: &str) -> Result<Vec<RawToken>> {
            panic!("lattice index out of range");
        }
    }

    #[test]
    fn test_engine_panics_become_tokenization_errors() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let registry = DictionaryRegistry::empty();
        registry.register(
            "panicking",
            Arc::new(FnProvider::new("panicking::Tokenizer", &[], move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(PanickingEngine)
            })),
        );

        let tokenizer = Tokenizer::for_dictionary(&registry, Some("panicking")).unwrap();
        for _ in 0..2 {
            match tokenizer.tokenize("text") {
                Err(PolydictError::Tokenization { dictionary, reason }) => {
                    assert_eq!(dictionary, "panicking");
                    assert!(reason.contains("lattice index out of range"));
                }
                other => panic!("Expected tokenization error, got {other:?}"),
            }
        }
        assert!(!tokenizer.is_ready());
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic payload");
    }

    #[test]
    fn test_unknown_dictionary() {
        let registry = DictionaryRegistry::with_builtin_engines();
        assert!(matches!(
            Tokenizer::for_dictionary(&registry, Some("nonexistent")),
            Err(PolydictError::NotFound(_))
        ));
    }
}
