//! Textual graph descriptions of tokenization results.
//!
//! The trace mode renders the path an engine chose through the input as a
//! Graphviz `digraph`: a BOS node, one node per token, and an EOS node.

use std::fmt::Write;

use crate::token::Token;

/// Build a DOT description of the token path produced by `dictionary`.
///
/// Each token node is labelled with its surface form and, when the dictionary
/// declares features, the value of its first feature.
///
/// # Examples
///
/// ```
/// use polydict::dictionary::DictionaryRegistry;
/// use polydict::server::graph::lattice_dot;
/// use polydict::tokenizer::Tokenizer;
///
/// let registry = DictionaryRegistry::with_builtin_engines();
/// let tokenizer = Tokenizer::for_dictionary(&registry, Some("script")).unwrap();
/// let tokens = tokenizer.tokenize("東京タワー").unwrap();
///
/// let dot = lattice_dot("script", &tokens);
/// assert!(dot.starts_with("digraph viterbi {"));
/// assert!(dot.contains("bos -> t0;"));
/// assert!(dot.contains("t1 -> eos;"));
/// ```
pub fn lattice_dot(dictionary: &str, tokens: &[Token]) -> String {
    let mut dot = String::new();
    let _ = writeln!(dot, "digraph viterbi {{");
    let _ = writeln!(
        dot,
        "  graph [charset=\"UTF-8\", rankdir=LR, label=\"{}\"];",
        escape(dictionary)
    );
    let _ = writeln!(dot, "  node [shape=box];");
    let _ = writeln!(dot, "  bos [label=\"BOS\", shape=ellipse];");
    let _ = writeln!(dot, "  eos [label=\"EOS\", shape=ellipse];");

    for (i, token) in tokens.iter().enumerate() {
        let mut label = escape(token.surface());
        if let Some(name) = token.feature_names().next() {
            label.push_str("\\n");
            label.push_str(&escape(token.feature(name)));
        }
        let style = if token.is_unknown() { ", style=dashed" } else { "" };
        let _ = writeln!(dot, "  t{i} [label=\"{label}\"{style}];");
    }

    let mut previous = "bos".to_string();
    for i in 0..tokens.len() {
        let node = format!("t{i}");
        let _ = writeln!(dot, "  {previous} -> {node};");
        previous = node;
    }
    let _ = writeln!(dot, "  {previous} -> eos;");
    dot.push('}');
    dot.push('\n');

    dot
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
