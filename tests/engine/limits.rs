//! Integration tests for parse limits
//!
//! Tests the token and derivation kill switches.

use categorial_engine::{DEFAULT_MAX_DERIVATIONS, ParseConfig, Parser};
use categorial_foundation::{ErrorKind, ParseLimit};
use categorial_grammar::Grammar;

const ADJECTIVES: &str = r":- S, NP, N
le => NP/N
grand => N/N
chat => N
dort => S\NP
";

#[test]
fn default_config_caps_derivations() {
    let config = ParseConfig::default();
    assert_eq!(config.max_derivations, Some(DEFAULT_MAX_DERIVATIONS));
    assert_eq!(config.max_tokens, None);
}

#[test]
fn token_limit_rejects_long_sentences() {
    let grammar = Grammar::from_source(ADJECTIVES).unwrap();
    let parser = Parser::new(&grammar).with_config(ParseConfig::default().with_max_tokens(2));

    let err = parser.parse_sentence("le grand chat dort").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(ParseLimit::MaxTokens {
            limit: 2,
            actual: 4
        })
    ));
    assert!(parser.parse_sentence("chat").is_ok());
}

#[test]
fn derivation_limit_rejects_ambiguous_sentences() {
    let grammar = Grammar::from_source(ADJECTIVES).unwrap();
    let parser =
        Parser::new(&grammar).with_config(ParseConfig::default().with_max_derivations(1));

    let err = parser.parse_sentence("le grand chat dort").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::LimitExceeded(ParseLimit::MaxDerivations { limit: 1, actual: 2 })
    ));
}

#[test]
fn ambiguity_grows_with_adjectives() {
    let grammar = Grammar::from_source(ADJECTIVES).unwrap();
    let parser = Parser::new(&grammar).with_config(ParseConfig::unlimited());

    let one = parser.parse_sentence("le grand chat dort").unwrap();
    let two = parser.parse_sentence("le grand grand chat dort").unwrap();
    assert!(two.derivations().len() > one.derivations().len());
}
