//! Machine-readable derivation export.
//!
//! Two formats:
//! - bracketed trees, `(Phrase (GrNom (GrNom/Nom Le) (Nom chat)) (Phrase\GrNom dort))`;
//! - JSON through `serde_json`, one [`ParseReport`] per sentence.

use categorial_engine::{DerivationTree, Parse};
use categorial_foundation::{Error, ErrorKind, Result};
use serde::Serialize;

/// Renders a derivation as a bracketed tree.
///
/// Terminals are `(Category token)`; inner nodes are `(Category child...)`.
#[must_use]
pub fn brackets(tree: &DerivationTree) -> String {
    let mut out = String::new();
    write_brackets(tree, &mut out);
    out
}

fn write_brackets(tree: &DerivationTree, out: &mut String) {
    out.push('(');
    out.push_str(&tree.category.to_string());
    if let Some(token) = &tree.token {
        out.push(' ');
        out.push_str(token);
    }
    for child in &tree.children {
        out.push(' ');
        write_brackets(child, out);
    }
    out.push(')');
}

/// Serializable view of one derivation node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivationView {
    /// Rule name: `lex` or a combinator symbol.
    pub rule: &'static str,
    /// Category in grammar notation.
    pub category: String,
    /// Node weight.
    pub weight: f64,
    /// Semantic term, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantics: Option<String>,
    /// Token, for terminals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Covered token positions, inclusive.
    pub span: (usize, usize),
    /// Premises, left to right.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DerivationView>,
}

impl From<&DerivationTree> for DerivationView {
    fn from(tree: &DerivationTree) -> Self {
        Self {
            rule: tree.rule.name(),
            category: tree.category.to_string(),
            weight: tree.weight,
            semantics: tree.semantics.as_ref().map(ToString::to_string),
            token: tree.token.clone(),
            span: tree.span,
            children: tree.children.iter().map(Self::from).collect(),
        }
    }
}

/// Serializable result of parsing one sentence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParseReport {
    /// The input sentence.
    pub sentence: String,
    /// Weight of the best derivations; absent when the sentence has none.
    pub weight: Option<f64>,
    /// Every best derivation.
    pub derivations: Vec<DerivationView>,
}

impl ParseReport {
    /// Builds a report from a finished parse.
    #[must_use]
    pub fn new(sentence: impl Into<String>, parse: &Parse) -> Self {
        Self {
            sentence: sentence.into(),
            weight: parse.best_weight(),
            derivations: parse.derivations().iter().map(DerivationView::from).collect(),
        }
    }
}

/// Serializes reports as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}
