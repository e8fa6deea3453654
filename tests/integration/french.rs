//! Integration tests for the bundled French grammar
//!
//! Tests agreement, rule weights, and semantics on `grammars/french.ccg`.

use categorial_engine::{Combinator, Parser};
use categorial_foundation::Category;
use categorial_grammar::{Generator, Grammar};

const FRENCH: &str = include_str!("../../grammars/french.ccg");

fn french() -> Grammar {
    Grammar::from_source(FRENCH).unwrap()
}

fn best_weight(grammar: &Grammar, sentence: &str) -> Option<f64> {
    Parser::new(grammar)
        .parse_sentence(sentence)
        .unwrap()
        .best_weight()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn grammar_loads() {
    let grammar = french();
    assert_eq!(grammar.start(), &Category::primitive("Phrase"));
    assert_eq!(
        grammar.primitives(),
        &["Phrase", "GrNom", "Nom", "VerbeInf", "Ponct", "PP"]
    );
    assert_eq!(grammar.rule_weights().len(), 6);
    assert!(grammar.entries("sœur").len() == 1);
    assert!(grammar.entries("?").len() == 1);
}

#[test]
fn grammar_survives_display_round_trip() {
    let grammar = french();
    let reloaded = Grammar::from_source(&grammar.to_string()).unwrap();
    assert_eq!(reloaded.word_count(), grammar.word_count());
    assert_eq!(reloaded.entry_count(), grammar.entry_count());
    assert_eq!(reloaded.rule_weights(), grammar.rule_weights());
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn le_chat_dort_uses_both_weight_overrides() {
    let grammar = french();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();

    assert_eq!(parse.derivations().len(), 1);
    assert!((parse.best_weight().unwrap() - 3.0).abs() < 1e-9);
    let tree = &parse.derivations()[0];
    assert_eq!(tree.rule.name(), "<");
    assert_eq!(tree.children[0].category.to_string(), "GrNom[Masc]");
    assert!(tree.semantics.is_some());
}

#[test]
fn feminine_subject_agrees() {
    let grammar = french();
    let weight = best_weight(&grammar, "La souris dort").unwrap();
    assert!((weight - 3.0).abs() < 1e-9);
}

#[test]
fn agreement_failure_has_no_parse() {
    let grammar = french();
    assert_eq!(best_weight(&grammar, "La chat dort"), None);
    assert_eq!(best_weight(&grammar, "Le chat dorment"), None);
}

#[test]
fn pronoun_subject_is_down_weighted() {
    let grammar = french();
    let weight = best_weight(&grammar, "Il dort").unwrap();
    assert!((weight - 0.5).abs() < 1e-9);
}

#[test]
fn postposed_adjective() {
    let grammar = french();
    let weight = best_weight(&grammar, "Le chat noir dort").unwrap();
    assert!((weight - 3.0).abs() < 1e-9);
}

#[test]
fn transitive_sentence() {
    let grammar = french();
    let parse = Parser::new(&grammar)
        .parse_sentence("Le chat mange la souris")
        .unwrap();
    assert!(!parse.is_empty());
    for tree in parse.derivations() {
        assert_eq!(tree.leaves(), vec!["Le", "chat", "mange", "la", "souris"]);
        assert!(tree.combinators().contains(&Combinator::ApplicationRight));
    }
}

#[test]
fn unknown_word_has_no_parse() {
    let grammar = french();
    assert_eq!(best_weight(&grammar, "Le chien dort"), None);
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn generated_sentences_are_grammatical() {
    let grammar = french().with_semantics(false);
    let parser = Parser::new(&grammar);
    for seed in 0..20 {
        if let Some(words) = Generator::new(&grammar, seed).sentence() {
            let parse = parser.parse(&words).unwrap();
            assert!(!parse.is_empty(), "no parse for {words:?}");
        }
    }
}
