//! Semantic terms.
//!
//! A small lambda calculus with first-order predicates, conjunction and
//! existential quantification. Lexicon entries carry term templates; the
//! combinators compose them with [`Term::apply`] as the chart is filled.
//!
//! Reduction follows the grammar writer's conventions rather than pure
//! lambda calculus:
//! - applying a constant builds a predicate (`chat` applied to `x` is `chat(x)`);
//! - applying a predicate appends an argument;
//! - applying a conjunction applies both sides, so `(P & Q)(x)` becomes
//!   `P(x) & Q(x)` and shared sub-terms are duplicated.

use std::collections::BTreeSet;
use std::fmt;

use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fresh::FreshVars;

/// Identifier of a term variable.
///
/// Variables written in the grammar have index 0; variables produced during
/// a parse get a positive index from that parse's [`FreshVars`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VarId {
    name: String,
    index: u32,
}

impl VarId {
    /// Creates a template variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::indexed(name, 0)
    }

    /// Creates a variable with an explicit index.
    #[must_use]
    pub fn indexed(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Base name of this variable.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of this variable (0 for template variables).
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}_{}", self.name, self.index)
        }
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({self})")
    }
}

/// A semantic term.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A bound or free variable.
    Var(VarId),
    /// A constant, e.g. `chat`.
    Const(String),
    /// A predicate over arguments, e.g. `mange(x, y)`.
    Predicate(String, Vec<Term>),
    /// An application that cannot be reduced yet, e.g. `P(x)` with `P` a variable.
    Apply(Box<Term>, Vec<Term>),
    /// `\x y. body`
    Abstraction(Vec<VarId>, Box<Term>),
    /// `left & right`
    Conjunction(Box<Term>, Box<Term>),
    /// `exists x. body`
    Existential(VarId, Box<Term>),
}

impl Term {
    /// Creates a variable term.
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(VarId::new(name))
    }

    /// Creates a constant term.
    #[must_use]
    pub fn constant(name: impl Into<String>) -> Self {
        Self::Const(name.into())
    }

    /// Creates a predicate term.
    #[must_use]
    pub fn predicate(name: impl Into<String>, args: Vec<Term>) -> Self {
        Self::Predicate(name.into(), args)
    }

    /// Creates an unreduced application.
    ///
    /// Nested applications are flattened: `(f a) b` is stored as `f(a, b)`.
    #[must_use]
    pub fn application(fun: Term, args: Vec<Term>) -> Self {
        if args.is_empty() {
            return fun;
        }
        match fun {
            Self::Apply(inner, mut existing) => {
                existing.extend(args);
                Self::Apply(inner, existing)
            }
            other => Self::Apply(Box::new(other), args),
        }
    }

    /// Creates an abstraction over `bound`.
    ///
    /// An empty binder list returns the body; a body that is itself an
    /// abstraction is merged into one binder list.
    #[must_use]
    pub fn abstraction(mut bound: Vec<VarId>, body: Term) -> Self {
        if bound.is_empty() {
            return body;
        }
        match body {
            Self::Abstraction(inner, inner_body) => {
                bound.extend(inner);
                Self::Abstraction(bound, inner_body)
            }
            other => Self::Abstraction(bound, Box::new(other)),
        }
    }

    /// Creates `exists var. body`.
    #[must_use]
    pub fn exists(var: VarId, body: Term) -> Self {
        Self::Existential(var, Box::new(body))
    }

    /// Pairs two terms in a conjunction. Shared sub-terms are not merged.
    #[must_use]
    pub fn conjoin(left: Term, right: Term) -> Self {
        Self::Conjunction(Box::new(left), Box::new(right))
    }

    /// Returns true if `var` occurs free in this term.
    #[must_use]
    pub fn occurs_free(&self, var: &VarId) -> bool {
        match self {
            Self::Var(v) => v == var,
            Self::Const(_) => false,
            Self::Predicate(_, args) => args.iter().any(|a| a.occurs_free(var)),
            Self::Apply(fun, args) => {
                fun.occurs_free(var) || args.iter().any(|a| a.occurs_free(var))
            }
            Self::Abstraction(bound, body) => !bound.contains(var) && body.occurs_free(var),
            Self::Conjunction(l, r) => l.occurs_free(var) || r.occurs_free(var),
            Self::Existential(v, body) => v != var && body.occurs_free(var),
        }
    }

    /// Free variables of this term.
    #[must_use]
    pub fn free_vars(&self) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        self.collect_free(&mut Vec::new(), &mut out);
        out
    }

    fn collect_free<'a>(&'a self, bound: &mut Vec<&'a VarId>, out: &mut BTreeSet<VarId>) {
        match self {
            Self::Var(v) => {
                if !bound.contains(&v) {
                    out.insert(v.clone());
                }
            }
            Self::Const(_) => {}
            Self::Predicate(_, args) => {
                for arg in args {
                    arg.collect_free(bound, out);
                }
            }
            Self::Apply(fun, args) => {
                fun.collect_free(bound, out);
                for arg in args {
                    arg.collect_free(bound, out);
                }
            }
            Self::Abstraction(vars, body) => {
                let depth = bound.len();
                bound.extend(vars.iter());
                body.collect_free(bound, out);
                bound.truncate(depth);
            }
            Self::Conjunction(l, r) => {
                l.collect_free(bound, out);
                r.collect_free(bound, out);
            }
            Self::Existential(v, body) => {
                bound.push(v);
                body.collect_free(bound, out);
                bound.pop();
            }
        }
    }

    /// Returns true if the term contains any binder.
    #[must_use]
    pub fn has_binders(&self) -> bool {
        match self {
            Self::Var(_) | Self::Const(_) => false,
            Self::Predicate(_, args) => args.iter().any(Self::has_binders),
            Self::Apply(fun, args) => fun.has_binders() || args.iter().any(Self::has_binders),
            Self::Abstraction(..) | Self::Existential(..) => true,
            Self::Conjunction(l, r) => l.has_binders() || r.has_binders(),
        }
    }

    /// Renames every binder in the term to a fresh variable.
    ///
    /// Used to give each use of a lexicon template its own bound variables.
    #[must_use]
    pub fn instantiate(&self, fresh: &mut FreshVars) -> Term {
        self.rename_binders(&OrdMap::new(), &mut |var| fresh.rename(var))
    }

    fn rename_binders(
        &self,
        env: &OrdMap<VarId, VarId>,
        next: &mut impl FnMut(&VarId) -> VarId,
    ) -> Term {
        match self {
            Self::Var(v) => Self::Var(env.get(v).cloned().unwrap_or_else(|| v.clone())),
            Self::Const(_) => self.clone(),
            Self::Predicate(name, args) => Self::Predicate(
                name.clone(),
                args.iter().map(|a| a.rename_binders(env, next)).collect(),
            ),
            Self::Apply(fun, args) => Self::Apply(
                Box::new(fun.rename_binders(env, next)),
                args.iter().map(|a| a.rename_binders(env, next)).collect(),
            ),
            Self::Abstraction(bound, body) => {
                let mut scope = env.clone();
                let renamed: Vec<VarId> = bound
                    .iter()
                    .map(|v| {
                        let new = next(v);
                        scope.insert(v.clone(), new.clone());
                        new
                    })
                    .collect();
                Self::Abstraction(renamed, Box::new(body.rename_binders(&scope, next)))
            }
            Self::Conjunction(l, r) => Self::Conjunction(
                Box::new(l.rename_binders(env, next)),
                Box::new(r.rename_binders(env, next)),
            ),
            Self::Existential(v, body) => {
                let new = next(v);
                let scope = env.update(v.clone(), new.clone());
                Self::Existential(new, Box::new(body.rename_binders(&scope, next)))
            }
        }
    }

    /// Alpha-equivalence: equal up to the names of bound variables.
    #[must_use]
    pub fn alpha_eq(&self, other: &Term) -> bool {
        self.canonical() == other.canonical()
    }

    fn canonical(&self) -> Term {
        let mut counter = 0;
        self.rename_binders(&OrdMap::new(), &mut |_| {
            counter += 1;
            VarId::indexed("_", counter)
        })
    }

    /// Capture-avoiding substitution of `value` for the free occurrences of `var`.
    ///
    /// Every inserted copy of `value` gets its own fresh binders. A binder
    /// that would capture a free variable of `value` is renamed first.
    /// Applications whose head becomes reducible are reduced on the way out.
    #[must_use]
    pub fn substitute(&self, var: &VarId, value: &Term, fresh: &mut FreshVars) -> Term {
        match self {
            Self::Var(v) if v == var => {
                if value.has_binders() {
                    value.instantiate(fresh)
                } else {
                    value.clone()
                }
            }
            Self::Var(_) | Self::Const(_) => self.clone(),
            Self::Predicate(name, args) => Self::Predicate(
                name.clone(),
                args.iter()
                    .map(|a| a.substitute(var, value, fresh))
                    .collect(),
            ),
            Self::Apply(fun, args) => {
                let head = fun.substitute(var, value, fresh);
                let args: Vec<Term> = args
                    .iter()
                    .map(|a| a.substitute(var, value, fresh))
                    .collect();
                head.apply_all(args, fresh)
            }
            Self::Abstraction(bound, body) => {
                if bound.contains(var) || !body.occurs_free(var) {
                    return self.clone();
                }
                let mut body = (**body).clone();
                let mut renamed = Vec::with_capacity(bound.len());
                for binder in bound {
                    if value.occurs_free(binder) {
                        let new = fresh.rename(binder);
                        body = body.substitute(binder, &Self::Var(new.clone()), fresh);
                        renamed.push(new);
                    } else {
                        renamed.push(binder.clone());
                    }
                }
                Self::Abstraction(renamed, Box::new(body.substitute(var, value, fresh)))
            }
            Self::Conjunction(l, r) => Self::Conjunction(
                Box::new(l.substitute(var, value, fresh)),
                Box::new(r.substitute(var, value, fresh)),
            ),
            Self::Existential(binder, body) => {
                if binder == var || !body.occurs_free(var) {
                    return self.clone();
                }
                if value.occurs_free(binder) {
                    let new = fresh.rename(binder);
                    let body = body.substitute(binder, &Self::Var(new.clone()), fresh);
                    Self::Existential(new, Box::new(body.substitute(var, value, fresh)))
                } else {
                    Self::Existential(binder.clone(), Box::new(body.substitute(var, value, fresh)))
                }
            }
        }
    }

    /// Applies this term to `arg`, reducing when the head allows it.
    #[must_use]
    pub fn apply(self, arg: Term, fresh: &mut FreshVars) -> Term {
        match self {
            Self::Abstraction(..) => match self.instantiate(fresh) {
                Self::Abstraction(mut bound, body) if !bound.is_empty() => {
                    let first = bound.remove(0);
                    let reduced = body.substitute(&first, &arg, fresh);
                    Self::abstraction(bound, reduced)
                }
                Self::Abstraction(_, body) => body.apply(arg, fresh),
                other => Self::application(other, vec![arg]),
            },
            Self::Const(name) => Self::Predicate(name, vec![arg]),
            Self::Predicate(name, mut args) => {
                args.push(arg);
                Self::Predicate(name, args)
            }
            Self::Conjunction(l, r) => {
                let left = l.apply(arg.clone(), fresh);
                let right = r.apply(arg, fresh);
                Self::conjoin(left, right)
            }
            head @ (Self::Var(_) | Self::Apply(..) | Self::Existential(..)) => {
                Self::application(head, vec![arg])
            }
        }
    }

    /// Applies this term to each argument in turn.
    #[must_use]
    pub fn apply_all(self, args: Vec<Term>, fresh: &mut FreshVars) -> Term {
        args.into_iter().fold(self, |acc, arg| acc.apply(arg, fresh))
    }

    /// Composes two functions: `\x. outer (inner x)`.
    #[must_use]
    pub fn compose(outer: Term, inner: Term, fresh: &mut FreshVars) -> Term {
        let x = fresh.fresh("x");
        let inner_applied = inner.apply(Self::Var(x.clone()), fresh);
        Self::abstraction(vec![x], outer.apply(inner_applied, fresh))
    }

    /// Type-raised semantics: `\f. f a`.
    #[must_use]
    pub fn lift(arg: Term, fresh: &mut FreshVars) -> Term {
        let f = fresh.fresh("f");
        Self::abstraction(
            vec![f.clone()],
            Self::application(Self::Var(f), vec![arg]),
        )
    }

    /// Number of nodes in the term.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Var(_) | Self::Const(_) => 1,
            Self::Predicate(_, args) => 1 + args.iter().map(Self::size).sum::<usize>(),
            Self::Apply(fun, args) => 1 + fun.size() + args.iter().map(Self::size).sum::<usize>(),
            Self::Abstraction(_, body) | Self::Existential(_, body) => 1 + body.size(),
            Self::Conjunction(l, r) => 1 + l.size() + r.size(),
        }
    }

    fn write_prec(&self, f: &mut fmt::Formatter<'_>, prec: u8) -> fmt::Result {
        match self {
            Self::Var(v) => write!(f, "{v}"),
            Self::Const(name) => write!(f, "{name}"),
            Self::Predicate(name, args) => {
                write!(f, "{name}")?;
                write_args(f, args)
            }
            Self::Apply(fun, args) => {
                if matches!(**fun, Self::Var(_) | Self::Const(_)) {
                    fun.write_prec(f, 3)?;
                } else {
                    write!(f, "(")?;
                    fun.write_prec(f, 0)?;
                    write!(f, ")")?;
                }
                write_args(f, args)
            }
            Self::Abstraction(bound, body) => {
                if prec > 0 {
                    write!(f, "(")?;
                }
                write!(f, "\\")?;
                for (i, v) in bound.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, ". ")?;
                body.write_prec(f, 0)?;
                if prec > 0 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Self::Existential(v, body) => {
                if prec > 0 {
                    write!(f, "(")?;
                }
                write!(f, "exists {v}. ")?;
                body.write_prec(f, 0)?;
                if prec > 0 {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Self::Conjunction(l, r) => {
                if prec > 1 {
                    write!(f, "(")?;
                }
                l.write_prec(f, 1)?;
                write!(f, " & ")?;
                r.write_prec(f, 2)?;
                if prec > 1 {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Term]) -> fmt::Result {
    write!(f, "(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        arg.write_prec(f, 0)?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_prec(f, 0)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({self})")
    }
}
