// AST (Abstract Syntax Tree) definitions for the Tython front end

use crate::parser::lexer::{Token, TokenKind};
use std::fmt;

const TAB_WIDTH: usize = 2;

/// A tree node tagged by the token it was built from.
///
/// Statement, operator and literal nodes carry the source token; the
/// non-terminals (expression, boolean/logical expression, block, program root)
/// carry a synthesized token of the matching [`TokenKind`]. Children are owned
/// exclusively, so the tree is finite and acyclic by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    token: Token,
    name: Option<String>,
    children: Vec<Node>,
}

impl Node {
    /// Create a leaf node
    pub fn leaf(token: Token) -> Self {
        Self {
            token,
            name: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(token: Token, children: Vec<Node>) -> Self {
        Self {
            token,
            name: None,
            children,
        }
    }

    /// Create a node for a parser non-terminal (`EXPR`, `BLOCK`, ...).
    pub fn synthetic(kind: TokenKind, line: usize, children: Vec<Node>) -> Self {
        Self::with_children(Token::new(kind, line), children)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    pub fn value(&self) -> Option<&str> {
        self.token.value()
    }

    pub fn line(&self) -> usize {
        self.token.line()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Total node count, this node included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Depth-first, pre-order walk yielding `(depth, node)`.
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        fn visit<'n>(node: &'n Node, depth: usize, out: &mut Vec<(usize, &'n Node)>) {
            out.push((depth, node));
            for child in &node.children {
                visit(child, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        visit(self, 0, &mut out);
        out
    }

    /// One-line label: the display name if set, otherwise the token.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.token.to_string(),
        }
    }
}

impl fmt::Display for Node {
    /// Indented listing, one node per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (depth, node)) in self.walk().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:indent$}{}", "", node.label(), indent = depth * TAB_WIDTH)?;
        }
        Ok(())
    }
}
