pub mod ast;
pub mod binder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod evaluator;
pub mod format;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod registry;
pub mod value;

pub use ast::{Literal, Node, Token};
pub use binder::{BindError, bind};
pub use compiler::{CompileError, compile, compile_with};
pub use evaluator::{CompareOp, EvalError, Expression, evaluate};
pub use lexer::{LexError, Lexer, Position};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use registry::Registry;
pub use value::Value;
