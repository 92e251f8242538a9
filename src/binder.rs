use thiserror::Error;

use crate::{ast::Node, evaluator::Expression, registry::Registry};

/// Errors raised while resolving an AST against a function registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("no such function: {name}")]
    UnknownFunction { name: String },

    #[error("{function} expects {expected} argument(s), got {got}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("{function}: {message}")]
    Shape {
        function: &'static str,
        message: String,
    },
}

/// Binds `node` into an expression tree.
///
/// Arguments are bound left to right before the call's own constructor runs,
/// so the innermost error is reported first.
pub fn bind(node: Node, registry: &Registry) -> Result<Expression, BindError> {
    match node {
        Node::Literal(literal) => Ok(Expression::Constant(literal.into())),
        Node::Call { name, args } => {
            let constructor = registry
                .get(&name)
                .ok_or(BindError::UnknownFunction { name })?;
            let args = args
                .into_iter()
                .map(|arg| bind(arg, registry))
                .collect::<Result<Vec<_>, _>>()?;
            constructor(args)
        }
    }
}
