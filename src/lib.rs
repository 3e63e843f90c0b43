//! # Introduction
//!
//! Tython is a small line-oriented language for scientific calculators. This
//! crate is its front end: it tokenizes source text and builds a syntax tree
//! that a later lowering pass or interpreter consumes. A terminal viewer built
//! with [ratatui](https://docs.rs/ratatui) shows the source next to its tree.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Statement parser ─┬→ Expression folding
//!                                    └→ Boolean / logical conditions → Tree
//! ```
//!
//! 1. [`parser`]: tokenizes the source and builds the tree rooted at a `PROG`
//!    node.
//! 2. [`arith`]: the fixed-width arithmetic unit a back end evaluates with.
//! 3. [`ui`]: ratatui-based tree viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let compilation = tython::parser::parse("PROGRAM \"demo\"\nA -> 1 + 2").unwrap();
//! assert_eq!(compilation.root.name(), Some("demo"));
//! assert_eq!(compilation.root.children().len(), 2);
//! ```

pub mod arith;
pub mod parser;
pub mod ui;
