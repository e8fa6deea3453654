//! Text rendering of derivation trees.
//!
//! Derivations are drawn proof-style: tokens on top, each combination
//! closed by a line of `=` followed by the rule name, with the resulting
//! category (and optionally its semantics) centred underneath:
//!
//! ```text
//!    Le       chat
//! GrNom/Nom   Nom
//! ================>
//!      GrNom
//! ```
//!
//! Sibling subtrees sit side by side, three columns apart, aligned on
//! their bottom line.

use std::fmt::Write;

use categorial_engine::DerivationTree;

/// Columns between sibling subtrees.
const GUTTER: usize = 3;

/// A rectangle of text lines. `width` excludes the rule name that may hang
/// past the right edge of a rule line.
struct Block {
    lines: Vec<String>,
    width: usize,
}

impl Block {
    fn height(&self) -> usize {
        self.lines.len()
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}

fn centred(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text_width(text)) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// Renders one derivation. With `semantics`, nodes carrying a term show it
/// under their category.
#[must_use]
pub fn render(tree: &DerivationTree, semantics: bool) -> String {
    let block = layout(tree, semantics);
    let mut out = String::new();
    for (i, line) in block.lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

/// Renders every derivation with a numbered header line.
#[must_use]
pub fn render_all(trees: &[DerivationTree], semantics: bool) -> String {
    let mut out = String::new();
    for (i, tree) in trees.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = writeln!(
            out,
            "Derivation {} of {} (weight {})",
            i + 1,
            trees.len(),
            tree.weight
        );
        out.push_str(&render(tree, semantics));
    }
    out
}

fn labels(tree: &DerivationTree, semantics: bool) -> Vec<String> {
    let mut labels = vec![tree.category.to_string()];
    if semantics {
        if let Some(term) = &tree.semantics {
            labels.push(term.to_string());
        }
    }
    labels
}

fn layout(tree: &DerivationTree, semantics: bool) -> Block {
    let labels = labels(tree, semantics);
    let label_width = labels.iter().map(|l| text_width(l)).max().unwrap_or(0);

    if tree.children.is_empty() {
        let token = tree.token.as_deref().unwrap_or_default();
        let width = label_width.max(text_width(token));
        let lines = std::iter::once(token)
            .chain(labels.iter().map(String::as_str))
            .map(|text| centred(text, width))
            .collect();
        return Block { lines, width };
    }

    let premises = beside(tree.children.iter().map(|c| layout(c, semantics)).collect());
    let width = label_width.max(premises.width);
    let offset = " ".repeat((width - premises.width) / 2);

    let mut lines: Vec<String> = premises
        .lines
        .into_iter()
        .map(|line| format!("{offset}{line}"))
        .collect();
    lines.push(format!("{}{}", "=".repeat(width), tree.rule.name()));
    lines.extend(labels.iter().map(|label| centred(label, width)));
    Block { lines, width }
}

/// Places blocks left to right, bottom-aligned.
fn beside(blocks: Vec<Block>) -> Block {
    let mut blocks = blocks.into_iter();
    let Some(mut acc) = blocks.next() else {
        return Block {
            lines: Vec::new(),
            width: 0,
        };
    };
    for right in blocks {
        acc = join(acc, right);
    }
    acc
}

fn join(left: Block, right: Block) -> Block {
    let height = left.height().max(right.height());
    let left_skip = height - left.height();
    let right_skip = height - right.height();

    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let l = row.checked_sub(left_skip).map_or("", |i| left.lines[i].as_str());
        let r = row.checked_sub(right_skip).map_or("", |i| right.lines[i].as_str());
        let pad = (left.width + GUTTER).saturating_sub(text_width(l));
        lines.push(format!("{l}{}{r}", " ".repeat(pad)));
    }
    Block {
        lines,
        width: left.width + GUTTER + right.width,
    }
}
