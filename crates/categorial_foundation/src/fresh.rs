//! Fresh variable generation for semantic terms.
//!
//! Each parse owns one [`FreshVars`] and threads it by `&mut` through every
//! semantic composition, so bound-variable identifiers are unique within a
//! parse without any process-wide counter.
//!
//! # Example
//!
//! ```
//! use categorial_foundation::FreshVars;
//!
//! let mut fresh = FreshVars::new();
//! let x1 = fresh.fresh("x"); // x_1
//! let x2 = fresh.fresh("x"); // x_2
//! assert_ne!(x1, x2);
//! ```

use crate::term::VarId;

/// Parse-scoped generator of unique variable identifiers.
#[derive(Clone, Debug, Default)]
pub struct FreshVars {
    /// Last index handed out (0 is reserved for template variables).
    counter: u32,
}

impl FreshVars {
    /// Creates a generator whose first variable gets index 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a variable with the given base name and a new index.
    pub fn fresh(&mut self, base: &str) -> VarId {
        self.counter += 1;
        VarId::indexed(base, self.counter)
    }

    /// Generates a variable reusing the base name of an existing one.
    pub fn rename(&mut self, var: &VarId) -> VarId {
        let base = var.name().to_string();
        self.fresh(&base)
    }

    /// Number of variables generated so far.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.counter
    }
}
