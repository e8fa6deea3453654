//! Property-based tests for the parser
//!
//! Random word sequences over a small ambiguous grammar, and sentences
//! produced by the generator.

use categorial_engine::{Combinator, ParseConfig, Parser};
use categorial_grammar::{Generator, Grammar};
use proptest::prelude::*;

const SOURCE: &str = r":- S, NP, N
le => NP/N {\P. P}
la => NP/N {\P. P}
grand => N/N {\P x. grand(x) & P(x)}
chat => N {chat}
souris => N {souris}
Jean => NP {jean}
dort => S\NP {\x. dort(x)}
voit => (S\NP)/NP {\y x. voit(x, y)}
vraiment => S\S {\p. vraiment(p)}
";

const WORDS: &[&str] = &[
    "le", "la", "grand", "chat", "souris", "Jean", "dort", "voit", "vraiment",
];

fn grammar(raising: bool) -> Grammar {
    Grammar::from_source(SOURCE)
        .unwrap()
        .with_type_raising(raising)
}

fn sentence() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(WORDS), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn derivations_cover_the_sentence(words in sentence(), raising in any::<bool>()) {
        let grammar = grammar(raising);
        let parse = Parser::new(&grammar)
            .with_config(ParseConfig::unlimited())
            .parse(&words)
            .unwrap();

        for tree in parse.derivations() {
            prop_assert_eq!(tree.leaves(), words.clone());
            prop_assert_eq!(tree.span, (0, words.len() - 1));
            prop_assert!(tree.category.matches(grammar.start()));
        }
    }

    #[test]
    fn returned_derivations_reach_the_best_root_weight(words in sentence()) {
        let grammar = grammar(true);
        let parse = Parser::new(&grammar)
            .with_config(ParseConfig::unlimited())
            .parse(&words)
            .unwrap();

        let chart = parse.chart();
        let reachable = chart
            .cell(0, chart.len() - 1)
            .into_iter()
            .map(|id| chart.judgement(id))
            .filter(|judgement| judgement.category.matches(grammar.start()))
            .map(|judgement| judgement.weight)
            .reduce(f64::max);

        prop_assert_eq!(parse.best_weight(), reachable);
        for tree in parse.derivations() {
            prop_assert_eq!(Some(tree.weight), reachable);
        }
    }

    #[test]
    fn no_type_raising_when_disabled(words in sentence()) {
        let grammar = grammar(false);
        let parse = Parser::new(&grammar)
            .with_config(ParseConfig::unlimited())
            .parse(&words)
            .unwrap();

        prop_assert_eq!(parse.stats().raised, 0);
        for (_, judgement) in parse.chart().judgements() {
            for parent in &judgement.parents {
                prop_assert_ne!(parent.rule(), Some(Combinator::TypeRaising));
            }
        }
    }

    #[test]
    fn parsing_is_deterministic(words in sentence()) {
        let grammar = grammar(true);
        let parser = Parser::new(&grammar).with_config(ParseConfig::unlimited());
        let first = parser.parse(&words).unwrap();
        let second = parser.parse(&words).unwrap();

        prop_assert_eq!(first.derivations(), second.derivations());
        prop_assert_eq!(first.stats(), second.stats());
    }

    #[test]
    fn every_cell_keeps_one_judgement_per_category(words in sentence()) {
        let grammar = grammar(true);
        let parse = Parser::new(&grammar)
            .with_config(ParseConfig::unlimited())
            .parse(&words)
            .unwrap();
        let chart = parse.chart();

        for start in 0..chart.len() {
            for end in start..chart.len() {
                let cell = chart.cell(start, end);
                for (i, a) in cell.iter().enumerate() {
                    for b in &cell[i + 1..] {
                        prop_assert_ne!(
                            &chart.judgement(*a).category,
                            &chart.judgement(*b).category
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn generated_sentences_parse(seed in any::<u64>()) {
        let grammar = grammar(false);
        let mut generator = Generator::new(&grammar, seed).with_max_depth(4);
        if let Some(words) = generator.sentence() {
            let parse = Parser::new(&grammar)
                .with_config(ParseConfig::unlimited())
                .parse(&words)
                .unwrap();
            prop_assert!(!parse.is_empty(), "generated {:?} has no parse", words);
        }
    }
}
