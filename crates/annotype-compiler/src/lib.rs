//! Compiler for free-text documentation type annotations.
//!
//! Turns annotation strings such as `"Array<Foo, Bar>"`,
//! `"Hash{Symbol => String}"` or `"String, nil"` into expressions in the
//! signature syntax consumed by a gradual type-checking layer
//! (`TArray<Foo, Bar>`, `THash`, `Nilable(String)`).
//!
//! The pipeline is: [`lexer::Tokenizer`] scans the annotation into tokens,
//! [`parser::parse`] builds a list of [`tree::TypeNode`]s, and
//! [`convert::convert_type_list`] folds the nodes into one signature
//! expression. Each stage is pure; concurrent calls need no coordination.

pub mod convert;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use convert::{convert_node, convert_type_list};
pub use parser::parse;
pub use tree::TypeNode;
