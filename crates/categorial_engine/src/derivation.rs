//! Derivation trees.
//!
//! The [`Reconstructor`] walks backpointers from root judgements and expands
//! every tied parent, producing the cross product of alternatives. Semantics
//! are recomputed for each tree from its own children, so two tied
//! derivations built from different lexical readings each carry the term
//! they actually compose to.

use std::collections::HashMap;
use std::fmt;

use categorial_foundation::{Category, FreshVars, Term};
use categorial_grammar::Grammar;

use crate::chart::{Backpointer, Chart, JudgementId};
use crate::rule::Combinator;

/// How a derivation node was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A lexical entry for a token.
    Terminal,
    /// A combinator applied to the node's children.
    Combinator(Combinator),
}

impl Rule {
    /// Display name: the combinator symbol, or `lex` for a terminal.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Terminal => "lex",
            Self::Combinator(rule) => rule.symbol(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One complete derivation of a span.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivationTree {
    /// Rule producing this node.
    pub rule: Rule,
    /// Category of this node.
    pub category: Category,
    /// Weight of this node.
    pub weight: f64,
    /// Semantics of this node, if semantics are on and available.
    pub semantics: Option<Term>,
    /// The token, for terminals.
    pub token: Option<String>,
    /// Covered token positions, inclusive.
    pub span: (usize, usize),
    /// Premises, left to right. Empty for terminals.
    pub children: Vec<DerivationTree>,
}

impl DerivationTree {
    /// Returns true for a lexical leaf.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.rule == Rule::Terminal
    }

    /// Tokens at the leaves, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        if let Some(token) = &self.token {
            leaves.push(token);
        }
        for child in &self.children {
            child.collect_leaves(leaves);
        }
    }

    /// Height of the tree; a terminal has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Every combinator used, in pre-order.
    #[must_use]
    pub fn combinators(&self) -> Vec<Combinator> {
        let mut rules = Vec::new();
        self.visit(&mut |node| {
            if let Rule::Combinator(rule) = node.rule {
                rules.push(rule);
            }
        });
        rules
    }

    /// Visits every node in pre-order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a DerivationTree)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

/// Expands chart judgements into derivation trees.
pub struct Reconstructor<'a> {
    grammar: &'a Grammar,
    chart: &'a Chart,
}

impl<'a> Reconstructor<'a> {
    /// Creates a reconstructor over a filled chart.
    #[must_use]
    pub fn new(grammar: &'a Grammar, chart: &'a Chart) -> Self {
        Self { grammar, chart }
    }

    /// Every derivation below each root, roots in order.
    ///
    /// Callers bound the output size with
    /// [`Chart::derivation_count_all`] first.
    pub fn derivations(&self, roots: &[JudgementId], fresh: &mut FreshVars) -> Vec<DerivationTree> {
        let mut memo = HashMap::new();
        let trees: Vec<DerivationTree> = roots
            .iter()
            .flat_map(|root| self.expand(*root, &mut memo, fresh))
            .collect();
        tracing::debug!(
            roots = roots.len(),
            trees = trees.len(),
            "derivations reconstructed"
        );
        trees
    }

    /// Every derivation below one judgement.
    pub fn trees(&self, id: JudgementId, fresh: &mut FreshVars) -> Vec<DerivationTree> {
        self.expand(id, &mut HashMap::new(), fresh)
    }

    fn expand(
        &self,
        id: JudgementId,
        memo: &mut HashMap<JudgementId, Vec<DerivationTree>>,
        fresh: &mut FreshVars,
    ) -> Vec<DerivationTree> {
        if let Some(trees) = memo.get(&id) {
            return trees.clone();
        }
        let judgement = self.chart.judgement(id);
        let mut trees = Vec::new();

        for parent in &judgement.parents {
            match *parent {
                Backpointer::Lexical { position, entry } => {
                    let token = self.chart.token(position).unwrap_or_default().to_string();
                    let semantics = if self.grammar.use_semantics() {
                        self.grammar
                            .entries(&token)
                            .get(entry)
                            .and_then(|entry| entry.semantics.as_ref())
                            .map(|term| term.instantiate(fresh))
                    } else {
                        None
                    };
                    trees.push(DerivationTree {
                        rule: Rule::Terminal,
                        category: judgement.category.clone(),
                        weight: judgement.weight,
                        semantics,
                        token: Some(token),
                        span: judgement.span,
                        children: Vec::new(),
                    });
                }
                Backpointer::Unary { rule, child } => {
                    for child in self.expand(child, memo, fresh) {
                        trees.push(self.node(rule, id, vec![child], fresh));
                    }
                }
                Backpointer::Binary {
                    rule, left, right, ..
                } => {
                    let lefts = self.expand(left, memo, fresh);
                    let rights = self.expand(right, memo, fresh);
                    for l in &lefts {
                        for r in &rights {
                            trees.push(self.node(rule, id, vec![l.clone(), r.clone()], fresh));
                        }
                    }
                }
            }
        }

        memo.insert(id, trees.clone());
        trees
    }

    fn node(
        &self,
        rule: Combinator,
        id: JudgementId,
        children: Vec<DerivationTree>,
        fresh: &mut FreshVars,
    ) -> DerivationTree {
        let judgement = self.chart.judgement(id);
        let semantics = if self.grammar.use_semantics() {
            let terms: Option<Vec<&Term>> =
                children.iter().map(|child| child.semantics.as_ref()).collect();
            terms.and_then(|terms| rule.semantics(&terms, fresh))
        } else {
            None
        };
        DerivationTree {
            rule: Rule::Combinator(rule),
            category: judgement.category.clone(),
            weight: judgement.weight,
            semantics,
            token: None,
            span: judgement.span,
            children,
        }
    }
}
