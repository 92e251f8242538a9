use std::sync::LazyLock;

use thiserror::Error;

use crate::{
    binder::BindError,
    evaluator::Expression,
    lexer::LexError,
    parser::{self, ParseError},
    registry::Registry,
};

static STANDARD: LazyLock<Registry> = LazyLock::new(Registry::standard);

/// Any error that stops a query from compiling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(LexError),

    #[error("parse error: {0}")]
    Parse(ParseError),

    #[error("bind error: {0}")]
    Bind(#[from] BindError),
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Lex(e) => CompileError::Lex(e),
            e => CompileError::Parse(e),
        }
    }
}

/// Compiles `query` against the built-in functions.
///
/// # Examples
///
/// ```
/// use jql::{compile, Value};
/// use std::collections::HashMap;
///
/// let query = compile(r#"("name")"#).unwrap();
///
/// let mut doc = HashMap::new();
/// doc.insert("name".to_string(), Value::from("Poland"));
///
/// assert_eq!(query.evaluate(&Value::Object(doc)).unwrap(), Value::from("Poland"));
/// ```
pub fn compile(query: &str) -> Result<Expression, CompileError> {
    compile_with(query, &STANDARD)
}

/// Compiles `query`, resolving function names in `registry`.
pub fn compile_with(query: &str, registry: &Registry) -> Result<Expression, CompileError> {
    let ast = parser::parse(query)?;
    let expr = registry.bind(ast)?;
    tracing::debug!(query, "compiled query");
    Ok(expr)
}
