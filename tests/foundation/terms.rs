//! Integration tests for semantic terms
//!
//! Tests reduction, capture avoidance, alpha-equivalence, and display.

use categorial_foundation::{FreshVars, Term, VarId};

fn x() -> VarId {
    VarId::new("x")
}

// =============================================================================
// Application
// =============================================================================

#[test]
fn identity_reduces_to_its_argument() {
    let mut fresh = FreshVars::new();
    let identity = Term::abstraction(vec![x()], Term::Var(x()));
    let reduced = identity.apply(Term::constant("chat"), &mut fresh);
    assert_eq!(reduced, Term::constant("chat"));
}

#[test]
fn applying_a_constant_builds_a_predicate() {
    let mut fresh = FreshVars::new();
    let applied = Term::constant("dort").apply(Term::constant("chat"), &mut fresh);
    assert_eq!(applied.to_string(), "dort(chat)");

    let two = applied.apply(Term::constant("vite"), &mut fresh);
    assert_eq!(two.to_string(), "dort(chat, vite)");
}

#[test]
fn conjunction_distributes_over_its_argument() {
    let mut fresh = FreshVars::new();
    let both = Term::conjoin(Term::constant("chat"), Term::constant("noir"));
    let applied = both.apply(Term::var("x"), &mut fresh);
    assert_eq!(applied.to_string(), "chat(x) & noir(x)");
}

#[test]
fn existential_head_stays_unreduced() {
    let mut fresh = FreshVars::new();
    let quantified = Term::exists(
        x(),
        Term::predicate("chat", vec![Term::Var(x())]),
    );
    let applied = quantified.apply(Term::constant("c"), &mut fresh);
    assert!(matches!(applied, Term::Apply(..)));
    assert_eq!(applied.to_string(), "(exists x. chat(x))(c)");
}

#[test]
fn multi_binder_abstraction_consumes_one_argument() {
    let mut fresh = FreshVars::new();
    let mange = Term::abstraction(
        vec![x(), VarId::new("y")],
        Term::predicate("mange", vec![Term::Var(x()), Term::var("y")]),
    );
    let partial = mange.apply(Term::constant("chat"), &mut fresh);
    assert!(matches!(partial, Term::Abstraction(ref bound, _) if bound.len() == 1));

    let full = partial.apply(Term::constant("souris"), &mut fresh);
    assert_eq!(full.to_string(), "mange(chat, souris)");
}

// =============================================================================
// Capture Avoidance
// =============================================================================

#[test]
fn substitution_does_not_capture_free_variables() {
    let mut fresh = FreshVars::new();
    // \x. \y. x & y applied to the free variable y
    let term = Term::abstraction(
        vec![x()],
        Term::abstraction(
            vec![VarId::new("y")],
            Term::conjoin(Term::Var(x()), Term::var("y")),
        ),
    );
    let applied = term.apply(Term::var("y"), &mut fresh);

    let free: Vec<VarId> = applied.free_vars().into_iter().collect();
    assert_eq!(free, vec![VarId::new("y")]);
    let Term::Abstraction(bound, _) = &applied else {
        panic!("expected abstraction, got {applied}");
    };
    assert_ne!(bound[0], VarId::new("y"));
}

#[test]
fn substitution_skips_shadowed_variables() {
    let mut fresh = FreshVars::new();
    let shadowing = Term::abstraction(vec![x()], Term::Var(x()));
    let result = shadowing.substitute(&x(), &Term::constant("chat"), &mut fresh);
    assert_eq!(result, shadowing);
}

#[test]
fn instantiate_gives_fresh_binders_each_time() {
    let mut fresh = FreshVars::new();
    let template = Term::abstraction(vec![x()], Term::predicate("chat", vec![Term::Var(x())]));
    let first = template.instantiate(&mut fresh);
    let second = template.instantiate(&mut fresh);
    assert_ne!(first, second);
    assert!(first.alpha_eq(&second));
    assert!(first.alpha_eq(&template));
}

// =============================================================================
// Composition and Lifting
// =============================================================================

#[test]
fn compose_builds_a_fresh_abstraction() {
    let mut fresh = FreshVars::new();
    let composed = Term::compose(Term::constant("f"), Term::constant("g"), &mut fresh);
    assert_eq!(composed.to_string(), "\\x_1. f(g(x_1))");
}

#[test]
fn lifted_term_applies_its_argument() {
    let mut fresh = FreshVars::new();
    let lifted = Term::lift(Term::constant("chat"), &mut fresh);
    assert_eq!(lifted.to_string(), "\\f_1. f_1(chat)");

    let applied = lifted.apply(Term::constant("dort"), &mut fresh);
    assert_eq!(applied.to_string(), "dort(chat)");
}

// =============================================================================
// Alpha-Equivalence and Display
// =============================================================================

#[test]
fn alpha_equivalence_ignores_binder_names() {
    let a = Term::abstraction(vec![x()], Term::predicate("f", vec![Term::Var(x())]));
    let z = VarId::new("z");
    let b = Term::abstraction(vec![z.clone()], Term::predicate("f", vec![Term::Var(z)]));
    let c = Term::abstraction(vec![x()], Term::predicate("f", vec![Term::var("y")]));
    assert!(a.alpha_eq(&b));
    assert!(!a.alpha_eq(&c));
}

#[test]
fn conjunction_display_is_left_associative() {
    let a = Term::constant("a");
    let b = Term::constant("b");
    let c = Term::constant("c");
    let left = Term::conjoin(Term::conjoin(a.clone(), b.clone()), c.clone());
    let right = Term::conjoin(a, Term::conjoin(b, c));
    assert_eq!(left.to_string(), "a & b & c");
    assert_eq!(right.to_string(), "a & (b & c)");
}

#[test]
fn fresh_variables_are_numbered_per_generator() {
    let mut fresh = FreshVars::new();
    assert_eq!(fresh.fresh("x").to_string(), "x_1");
    assert_eq!(fresh.rename(&VarId::new("P")).to_string(), "P_2");
    assert_eq!(fresh.issued(), 2);

    let mut other = FreshVars::new();
    assert_eq!(other.fresh("x").to_string(), "x_1");
}

#[test]
fn size_counts_nodes() {
    let term = Term::predicate("mange", vec![Term::constant("chat"), Term::var("y")]);
    assert_eq!(term.size(), 3);
}
