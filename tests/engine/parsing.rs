//! Integration tests for sentence parsing
//!
//! Tests derivations, weights, ties, and semantics on small grammars.

use categorial_engine::{Combinator, Parser, Rule};
use categorial_foundation::Category;
use categorial_grammar::Grammar;

const TOY: &str = r":- Phrase, GrNom, Nom
Le => GrNom/Nom {\P. P}
chat => Nom {chat}
dort => Phrase\GrNom {\x. dort(x)}
";

const ADJECTIVES: &str = r":- S, NP, N
le => NP/N
grand => N/N
chat => N
dort => S\NP
";

fn toy() -> Grammar {
    Grammar::from_source(TOY).unwrap()
}

// =============================================================================
// Basic Derivations
// =============================================================================

#[test]
fn intransitive_sentence_has_one_derivation() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();

    assert_eq!(parse.derivations().len(), 1);
    let tree = &parse.derivations()[0];
    assert_eq!(tree.category, Category::primitive("Phrase"));
    assert!((tree.weight - 1.0).abs() < 1e-9);
    assert_eq!(tree.rule, Rule::Combinator(Combinator::ApplicationLeft));
    assert_eq!(tree.span, (0, 2));
    assert_eq!(tree.leaves(), vec!["Le", "chat", "dort"]);
}

#[test]
fn derivation_tree_shape() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();
    let tree = &parse.derivations()[0];

    assert_eq!(tree.children.len(), 2);
    let subject = &tree.children[0];
    assert_eq!(subject.category.to_string(), "GrNom");
    assert_eq!(subject.rule.name(), ">");
    assert_eq!(subject.span, (0, 1));

    let verb = &tree.children[1];
    assert!(verb.is_terminal());
    assert_eq!(verb.token.as_deref(), Some("dort"));
    assert_eq!(verb.rule.name(), "lex");
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.len(), 5);
}

#[test]
fn semantics_compose_bottom_up() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();
    let tree = &parse.derivations()[0];
    assert_eq!(tree.semantics.as_ref().unwrap().to_string(), "dort(chat)");
    assert_eq!(
        tree.children[0].semantics.as_ref().unwrap().to_string(),
        "chat"
    );
}

#[test]
fn semantics_off_leaves_every_node_bare() {
    let grammar = toy().with_semantics(false);
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();
    let mut annotated = 0;
    parse.derivations()[0].visit(&mut |node| {
        if node.semantics.is_some() {
            annotated += 1;
        }
    });
    assert_eq!(annotated, 0);
}

// =============================================================================
// Rule Weights
// =============================================================================

#[test]
fn rule_weight_override_raises_the_derivation() {
    let source = format!("{TOY}Weight(\"<\", GrNom, Phrase\\GrNom) = 1.5\n");
    let grammar = Grammar::from_source(&source).unwrap();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();

    assert_eq!(parse.derivations().len(), 1);
    assert!((parse.best_weight().unwrap() - 1.5).abs() < 1e-9);
}

#[test]
fn lexical_weights_multiply() {
    let source = TOY.replace("chat => Nom", "chat => (3) Nom");
    let grammar = Grammar::from_source(&source).unwrap();
    let parse = Parser::new(&grammar).parse_sentence("Le chat dort").unwrap();
    assert!((parse.best_weight().unwrap() - 3.0).abs() < 1e-9);
}

#[test]
fn lexical_weight_reaches_the_root() {
    let source = format!("{TOY}chat => (0.5) GrNom\n");
    let grammar = Grammar::from_source(&source).unwrap();

    let parse = Parser::new(&grammar).parse_sentence("chat dort").unwrap();
    assert_eq!(parse.derivations().len(), 1);
    assert!((parse.best_weight().unwrap() - 0.5).abs() < 1e-9);
}

// =============================================================================
// Ties
// =============================================================================

#[test]
fn composition_and_application_tie() {
    let grammar = Grammar::from_source(ADJECTIVES).unwrap();
    let parse = Parser::new(&grammar)
        .parse_sentence("le grand chat dort")
        .unwrap();

    assert_eq!(parse.derivations().len(), 2);
    let composed = parse
        .derivations()
        .iter()
        .filter(|tree| tree.combinators().contains(&Combinator::CompositionRight))
        .count();
    assert_eq!(composed, 1);
    for tree in parse.derivations() {
        assert!((tree.weight - 1.0).abs() < 1e-9);
    }
}

#[test]
fn weight_override_breaks_a_tie() {
    let source = format!("{ADJECTIVES}Weight(\"B>\", NP/N, N/N) = 0.5\n");
    let grammar = Grammar::from_source(&source).unwrap();
    let parse = Parser::new(&grammar)
        .parse_sentence("le grand chat dort")
        .unwrap();

    assert_eq!(parse.derivations().len(), 1);
    assert!(
        !parse.derivations()[0]
            .combinators()
            .contains(&Combinator::CompositionRight)
    );
}

#[test]
fn backward_composition_ties_with_application() {
    let grammar = Grammar::from_source(
        r":- S, NP
Jean => NP
dort => S\NP
vraiment => S\S
",
    )
    .unwrap();
    let parse = Parser::new(&grammar)
        .parse_sentence("Jean dort vraiment")
        .unwrap();

    assert_eq!(parse.derivations().len(), 2);
    let composed: Vec<_> = parse
        .derivations()
        .iter()
        .filter(|tree| tree.combinators().contains(&Combinator::CompositionLeft))
        .collect();
    assert_eq!(composed.len(), 1);
    assert_eq!(composed[0].children[1].category.to_string(), "S\\NP");
}

#[test]
fn nearly_equal_weights_are_not_a_tie() {
    let grammar = Grammar::from_source(
        r":- S, A
a => (1.0) A
a => (1.0000000005) A
b => S\A
",
    )
    .unwrap();
    let parse = Parser::new(&grammar).parse_sentence("a b").unwrap();

    assert_eq!(parse.derivations().len(), 1);
    let best = 1.000_000_000_5_f64;
    assert_eq!(parse.best_weight().map(f64::to_bits), Some(best.to_bits()));
    assert_eq!(parse.derivations()[0].children[0].weight.to_bits(), best.to_bits());
}

// =============================================================================
// Failures Without Errors
// =============================================================================

#[test]
fn unknown_token_gives_empty_result() {
    let grammar = toy();
    let parser = Parser::new(&grammar);
    assert!(parser.parse_sentence("xyzzy").unwrap().is_empty());
    assert!(parser.parse_sentence("Le xyzzy dort").unwrap().is_empty());
}

#[test]
fn empty_sentence_gives_empty_result() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("   ").unwrap();
    assert!(parse.is_empty());
    assert_eq!(parse.best_weight(), None);
}

#[test]
fn wrong_order_gives_empty_result() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("chat Le dort").unwrap();
    assert!(parse.is_empty());
}

#[test]
fn partial_constituent_is_not_a_sentence() {
    let grammar = toy();
    let parse = Parser::new(&grammar).parse_sentence("Le chat").unwrap();
    assert!(parse.is_empty());
    assert!(parse.chart().get(0, 1, &Category::primitive("GrNom")).is_some());
}

// =============================================================================
// Features
// =============================================================================

#[test]
fn agreement_features_filter_readings() {
    let grammar = Grammar::from_source(
        r":- Phrase, GrNom, Nom
Le => GrNom[Masc]/Nom[Masc]
La => GrNom[Fem]/Nom[Fem]
chat => Nom[Masc]
souris => Nom[Fem]
dort => Phrase\GrNom
",
    )
    .unwrap();
    let parser = Parser::new(&grammar);
    assert!(!parser.parse_sentence("Le chat dort").unwrap().is_empty());
    assert!(!parser.parse_sentence("La souris dort").unwrap().is_empty());
    assert!(parser.parse_sentence("La chat dort").unwrap().is_empty());
}
