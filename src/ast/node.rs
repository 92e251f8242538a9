use crate::value::Value;

/// Abstract Syntax Tree node produced by the parser.
///
/// Implicit `elem` lists are already desugared, so every parenthesized form
/// is a [`Node::Call`] by the time the binder sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Function application
    ///
    /// # Examples
    /// ```text
    /// (keys)                -> Call { name: "keys", args: [] }
    /// ("name")              -> Call { name: "elem", args: [Literal("name")] }
    /// (gt ("population") 5) -> Call { name: "gt", args: [Call { .. }, Literal(5)] }
    /// ```
    Call { name: String, args: Vec<Node> },

    /// Constant written in the query
    Literal(Literal),
}

/// Literal values the surface syntax can express.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl Node {
    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            name: name.into(),
            args,
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Boolean(b) => Value::Boolean(b),
            Literal::Integer(n) => Value::Integer(n),
            Literal::String(s) => Value::String(s),
        }
    }
}
