//! Integration tests for sentence generation
//!
//! Tests determinism and that generated words come from the lexicon.

use categorial_foundation::Category;
use categorial_grammar::{Generator, Grammar};

fn toy() -> Grammar {
    Grammar::from_source(
        r":- Phrase, GrNom, Nom
Le => GrNom/Nom
La => GrNom/Nom
chat => Nom
souris => Nom
dort => Phrase\GrNom
mange => (Phrase\GrNom)/GrNom
",
    )
    .unwrap()
}

#[test]
fn same_seed_same_sequence() {
    let grammar = toy();
    let mut a = Generator::new(&grammar, 11);
    let mut b = Generator::new(&grammar, 11);
    for _ in 0..10 {
        assert_eq!(a.sentence(), b.sentence());
    }
}

#[test]
fn every_word_is_in_the_lexicon() {
    let grammar = toy();
    let mut generator = Generator::new(&grammar, 5);
    for _ in 0..25 {
        let sentence = generator.sentence().unwrap();
        assert!(sentence.iter().all(|word| !grammar.entries(word).is_empty()));
    }
}

#[test]
fn sentences_have_subject_and_verb() {
    let grammar = toy();
    let mut generator = Generator::new(&grammar, 9);
    for _ in 0..25 {
        let sentence = generator.sentence().unwrap();
        assert!(sentence.len() == 3 || sentence.len() == 5, "{sentence:?}");
    }
}

#[test]
fn generates_for_an_inner_category() {
    let grammar = toy();
    let mut generator = Generator::new(&grammar, 2);
    let phrase = generator.generate(&Category::primitive("GrNom")).unwrap();
    assert_eq!(phrase.len(), 2);
    assert!(phrase[0] == "Le" || phrase[0] == "La");
}

#[test]
fn unreachable_category_yields_none() {
    let grammar = toy();
    let mut generator = Generator::new(&grammar, 0);
    assert_eq!(generator.generate(&Category::primitive("Adj")), None);
}
