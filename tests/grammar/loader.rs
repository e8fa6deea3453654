//! Integration tests for the grammar loader
//!
//! Tests declarations, shortcuts, lexicon entries, rule weights, and the
//! errors a malformed grammar produces.

use categorial_foundation::{Category, ErrorKind};
use categorial_grammar::{DEFAULT_WEIGHT, Grammar, parse_category, parse_term};

const TOY: &str = r#"# Toy French grammar
:- Phrase, GrNom, Nom

GrNomM :: GrNom[Masc]
VbIntrans :: Phrase\GrNom

Le => GrNomM/Nom[Masc] {\P. P}
le => GrNomM/Nom[Masc] {\P. P}
le => (2) Nom[Masc] {le}
chat => Nom[Masc] {chat}
dort => VbIntrans {\x. dort(x)}

Weight("<", GrNom, VbIntrans) = 1.5
"#;

fn toy() -> Grammar {
    Grammar::from_source(TOY).unwrap()
}

fn prim(name: &str) -> Category {
    Category::primitive(name)
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn start_is_first_declared_category() {
    let grammar = toy();
    assert_eq!(grammar.start(), &prim("Phrase"));
    assert_eq!(grammar.primitives(), &["Phrase", "GrNom", "Nom"]);
}

#[test]
fn several_declaration_lines_accumulate() {
    let grammar = Grammar::from_source(":- S, NP\n:- PP\nsur => PP/NP\n").unwrap();
    assert_eq!(grammar.start(), &prim("S"));
    assert_eq!(grammar.primitives(), &["S", "NP", "PP"]);
    assert_eq!(grammar.raising_targets().len(), 3);
}

#[test]
fn switches_default_to_semantics_without_raising() {
    let grammar = toy();
    assert!(grammar.use_semantics());
    assert!(!grammar.use_type_raising());

    let toggled = grammar.with_type_raising(true).with_semantics(false);
    assert!(toggled.use_type_raising());
    assert!(!toggled.use_semantics());
}

// =============================================================================
// Lexicon
// =============================================================================

#[test]
fn lexicon_counts() {
    let grammar = toy();
    assert_eq!(grammar.word_count(), 4);
    assert_eq!(grammar.entry_count(), 5);
    assert_eq!(grammar.entries("le").len(), 2);
    assert!(grammar.entries("xyzzy").is_empty());
}

#[test]
fn lexicon_iterates_in_word_order() {
    let grammar = toy();
    let words: Vec<&str> = grammar.lexicon().map(|(word, _)| word.as_str()).collect();
    assert_eq!(words, vec!["Le", "chat", "dort", "le"]);
}

#[test]
fn shortcuts_expand_with_features() {
    let grammar = toy();
    let le = &grammar.entries("Le")[0];
    assert_eq!(le.category.to_string(), "GrNom[Masc]/Nom[Masc]");
    let dort = &grammar.entries("dort")[0];
    assert_eq!(dort.category.to_string(), "Phrase\\GrNom");
}

#[test]
fn lexical_weights_default_to_one() {
    let grammar = toy();
    assert!((grammar.entries("chat")[0].weight - DEFAULT_WEIGHT).abs() < f64::EPSILON);
    assert!((grammar.entries("le")[1].weight - 2.0).abs() < f64::EPSILON);
}

#[test]
fn semantics_are_parsed_terms() {
    let grammar = toy();
    let dort = grammar.entries("dort")[0].semantics.as_ref().unwrap();
    assert!(dort.alpha_eq(&parse_term("\\y. dort(y)").unwrap()));
}

#[test]
fn entry_display_shows_weight_only_when_not_default() {
    let grammar = toy();
    assert_eq!(grammar.entries("chat")[0].to_string(), "Nom[Masc] {chat}");
    assert_eq!(grammar.entries("le")[1].to_string(), "(2) Nom[Masc] {le}");
}

// =============================================================================
// Rule Weights
// =============================================================================

#[test]
fn rule_weight_override_matches_premises() {
    let grammar = toy();
    let subject = Category::tagged("GrNom", "Masc");
    let verb = parse_category("Phrase\\GrNom").unwrap();
    assert!((grammar.rule_weight("<", &[&subject, &verb]) - 1.5).abs() < f64::EPSILON);
}

#[test]
fn other_rules_keep_default_weight() {
    let grammar = toy();
    let subject = prim("GrNom");
    let verb = parse_category("Phrase\\GrNom").unwrap();
    assert!((grammar.rule_weight(">", &[&subject, &verb]) - DEFAULT_WEIGHT).abs() < f64::EPSILON);
    assert!((grammar.rule_weight("<", &[&verb, &subject]) - DEFAULT_WEIGHT).abs() < f64::EPSILON);
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn display_reloads_to_the_same_grammar() {
    let grammar = toy();
    let reloaded = Grammar::from_source(&grammar.to_string()).unwrap();
    assert_eq!(reloaded, grammar);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn missing_declaration_is_an_error() {
    let err = Grammar::from_source("chat => Nom\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingStartType));
}

#[test]
fn undeclared_primitive_reports_its_line() {
    let err = Grammar::from_source(":- S\n\nx => S/NP\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownCategory(ref name) if name == "NP"));
    assert_eq!(err.context.and_then(|c| c.line), Some(3));
}

#[test]
fn features_on_functional_shortcut_are_rejected() {
    let source = ":- Phrase, GrNom\nVb :: Phrase\\GrNom\ndort => Vb[Masc]\n";
    let err = Grammar::from_source(source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::FeaturedFunctional(ref name) if name == "Vb"));
}

#[test]
fn malformed_line_reports_line_and_column() {
    let err = Grammar::from_source(":- S\nx => S/\n").unwrap_err();
    let ErrorKind::Grammar { line, context, .. } = err.kind else {
        panic!("expected grammar error, got {:?}", err.kind);
    };
    assert_eq!(line, 2);
    assert_eq!(context, "x => S/");
}

#[test]
fn rule_weight_needs_a_premise() {
    assert!(Grammar::from_source(":- S\nWeight(\"<\") = 2\n").is_err());
}
