//! # jql - Abstract Syntax Tree
//!
//! Queries are S-expressions: a parenthesized list whose head is a function
//! name applies that function to the remaining elements.
//!
//! ```text
//! (elem "countries" (elem (keys) (elem "name")))
//! ```
//!
//! ## Implicit `elem`
//!
//! A list of one or two elements that does *not* start with a function name
//! is shorthand for `elem`, so the query above can be written as:
//!
//! ```text
//! ("countries" ((keys) ("name")))
//! ```
//!
//! The parser performs this rewrite, so the tree produced here only contains
//! calls and literals.
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - Call and literal nodes produced by the parser
pub mod node;
pub mod tokens;

pub use node::{Literal, Node};
pub use tokens::Token;
