//! Integration tests for categories
//!
//! Tests construction, display, wildcard matching, and type raising.

use categorial_foundation::{Category, Slash};

fn prim(name: &str) -> Category {
    Category::primitive(name)
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_application_categories() {
    assert_eq!(Category::forward(prim("GrNom"), prim("Nom")).to_string(), "GrNom/Nom");
    assert_eq!(
        Category::backward(prim("Phrase"), prim("GrNom")).to_string(),
        "Phrase\\GrNom"
    );
}

#[test]
fn display_parenthesises_functional_operands() {
    let transitive = Category::forward(
        Category::backward(prim("Phrase"), prim("GrNom")),
        prim("GrNom"),
    );
    assert_eq!(transitive.to_string(), "(Phrase\\GrNom)/GrNom");
}

#[test]
fn display_tags_and_named_features() {
    assert_eq!(Category::tagged("Nom", "Fem").to_string(), "Nom[Fem]");
    let np = prim("NP").with_feature("num", "pl");
    assert_eq!(np.to_string(), "NP[num=pl]");
}

// =============================================================================
// Matching
// =============================================================================

#[test]
fn missing_feature_is_a_wildcard() {
    let bare = prim("Nom");
    let masc = Category::tagged("Nom", "Masc");
    assert!(bare.matches(&masc));
    assert!(masc.matches(&bare));
    assert_ne!(bare, masc);
}

#[test]
fn conflicting_features_do_not_match() {
    let masc = Category::tagged("Nom", "Masc");
    let fem = Category::tagged("Nom", "Fem");
    assert!(!masc.matches(&fem));
}

#[test]
fn shape_and_slash_must_agree() {
    let forward = Category::forward(prim("A"), prim("B"));
    let backward = Category::backward(prim("A"), prim("B"));
    assert!(!forward.matches(&backward));
    assert!(!forward.matches(&prim("A")));
    assert!(forward.matches(&forward.clone()));
}

#[test]
fn matching_descends_into_functional_categories() {
    let pattern = Category::forward(prim("GrNom"), prim("Nom"));
    let concrete = Category::forward(
        Category::tagged("GrNom", "Masc"),
        Category::tagged("Nom", "Masc"),
    );
    assert!(pattern.matches(&concrete));
}

// =============================================================================
// Type Raising
// =============================================================================

#[test]
fn raising_yields_both_directions_per_target() {
    let raised = prim("NP").raise(&[prim("S")]);
    let shown: Vec<String> = raised.iter().map(ToString::to_string).collect();
    assert_eq!(shown, vec!["S/(S\\NP)", "S\\(S/NP)"]);
}

#[test]
fn raising_follows_target_order() {
    let raised = prim("NP").raise(&[prim("S"), prim("VP")]);
    assert_eq!(raised.len(), 4);
    assert_eq!(raised[2].to_string(), "VP/(VP\\NP)");
}

#[test]
fn functional_categories_are_not_raised() {
    let functor = Category::forward(prim("S"), prim("NP"));
    assert!(functor.raise(&[prim("S")]).is_empty());
}

// =============================================================================
// Accessors
// =============================================================================

#[test]
fn as_functional_exposes_parts() {
    let category = Category::backward(prim("Phrase"), prim("GrNom"));
    let (result, slash, argument) = category.as_functional().unwrap();
    assert_eq!(result, &prim("Phrase"));
    assert_eq!(slash, Slash::Left);
    assert_eq!(argument, &prim("GrNom"));
    assert!(prim("Phrase").as_functional().is_none());
}

#[test]
fn size_counts_primitive_leaves() {
    let category = Category::forward(
        Category::backward(prim("Phrase"), prim("GrNom")),
        prim("GrNom"),
    );
    assert_eq!(category.size(), 3);

    let mut names = Vec::new();
    category.for_each_primitive(&mut |name, _| names.push(name));
    assert_eq!(names, vec!["Phrase", "GrNom", "GrNom"]);
}

#[test]
fn slash_flip_and_symbol() {
    assert_eq!(Slash::Left.flip(), Slash::Right);
    assert_eq!(Slash::Right.symbol(), '/');
    assert_eq!(Slash::Left.symbol(), '\\');
}
