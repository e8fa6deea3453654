//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use categorial_foundation::{Error, ErrorContext, ErrorKind, ParseLimit};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_unknown_category() {
    let err = Error::unknown_category("NP");
    assert!(matches!(err.kind, ErrorKind::UnknownCategory(ref name) if name == "NP"));
    assert_eq!(err.to_string(), "unknown category: NP");
}

#[test]
fn error_featured_functional() {
    let err = Error::featured_functional("VbTrans");
    assert!(matches!(err.kind, ErrorKind::FeaturedFunctional(_)));
    assert!(err.to_string().contains("VbTrans"));
}

#[test]
fn error_missing_start_type() {
    let err = Error::new(ErrorKind::MissingStartType);
    assert!(err.to_string().contains(":-"));
}

#[test]
fn error_grammar_position() {
    let err = Error::new(ErrorKind::Grammar {
        message: "expected category".to_string(),
        line: 2,
        column: 13,
        context: "Le => GrNom/".to_string(),
    });
    assert_eq!(err.to_string(), "grammar error at 2:13: expected category");
}

#[test]
fn error_io_and_internal() {
    assert!(matches!(Error::io("disk").kind, ErrorKind::Io(_)));
    assert_eq!(Error::internal("oops").to_string(), "internal error: oops");
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn error_max_tokens() {
    let err = Error::limit_exceeded(ParseLimit::MaxTokens {
        limit: 3,
        actual: 5,
    });
    assert_eq!(
        err.to_string(),
        "limit exceeded: max tokens (3) exceeded: sentence has 5"
    );
}

#[test]
fn error_max_derivations() {
    let err = Error::limit_exceeded(ParseLimit::MaxDerivations {
        limit: 10,
        actual: 12,
    });
    assert!(err.to_string().ends_with("chart holds 12"));

    let overflowed = Error::limit_exceeded(ParseLimit::MaxDerivations {
        limit: 10,
        actual: usize::MAX,
    });
    assert!(overflowed.to_string().ends_with("count overflowed"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_display() {
    let context = ErrorContext::new()
        .with_source("french.ccg")
        .with_position(4, 7);
    assert_eq!(context.to_string(), "at french.ccg:4:7");
}

#[test]
fn context_without_source_is_silent() {
    let context = ErrorContext::new().with_position(4, 7);
    assert_eq!(context.to_string(), "");
}

#[test]
fn with_context_attaches() {
    let err = Error::unknown_category("NP").with_context(ErrorContext::new().with_position(3, 1));
    let context = err.context.unwrap();
    assert_eq!(context.line, Some(3));
    assert_eq!(context.column, Some(1));
    assert!(context.source.is_none());
}

#[test]
fn error_is_std_error() {
    let err = Error::io("gone");
    let dynamic: &dyn std::error::Error = &err;
    assert!(dynamic.to_string().contains("gone"));
}
