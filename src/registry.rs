//! The table of built-in functions a query can call.
//!
//! Each entry maps a name to a constructor that receives the already-bound
//! arguments and checks their count and fixed roles before building the
//! expression node.

use std::collections::HashMap;

use crate::{
    ast::Node,
    binder::{BindError, bind},
    evaluator::{CompareOp, Expression},
    value::Value,
};

/// Builds an expression node from bound arguments.
pub type Constructor = fn(Vec<Expression>) -> Result<Expression, BindError>;

#[derive(Clone, Default)]
pub struct Registry {
    functions: HashMap<&'static str, Constructor>,
}

impl Registry {
    /// A registry with no functions; see [`Registry::standard`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in function set.
    pub fn standard() -> Self {
        let mut registry = Registry::new();
        registry.register("id", new_identity);
        registry.register("elem", new_element);
        registry.register("keys", new_keys);
        registry.register("array", new_array);
        registry.register("object", new_object);
        registry.register("pipe", new_pipe);
        registry.register("sprintf", new_sprintf);
        registry.register("join", new_join);
        registry.register("filter", new_filter);
        registry.register("eq", new_equal);
        registry.register("lt", new_less_than);
        registry.register("gt", new_greater_than);
        registry.register("range", new_range);
        registry.register("and", new_and);
        registry.register("or", new_or);
        registry.register("not", new_not);
        registry.register("ifte", new_ifte);
        registry.register("error", new_error);
        registry.register("recover", new_recover);
        registry
    }

    pub fn register(&mut self, name: &'static str, constructor: Constructor) {
        self.functions.insert(name, constructor);
    }

    pub fn get(&self, name: &str) -> Option<Constructor> {
        self.functions.get(name).copied()
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn bind(&self, node: Node) -> Result<Expression, BindError> {
        bind(node, self)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .finish()
    }
}

fn exactly<const N: usize>(
    function: &'static str,
    expected: &'static str,
    args: Vec<Expression>,
) -> Result<[Expression; N], BindError> {
    let got = args.len();
    <[Expression; N]>::try_from(args).map_err(|_| BindError::Arity {
        function,
        expected,
        got,
    })
}

/// Splits `args` into a required first argument and an optional second one.
fn one_or_two(
    function: &'static str,
    args: Vec<Expression>,
) -> Result<(Expression, Option<Expression>), BindError> {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(first), second, None) => Ok((first, second)),
        _ => Err(BindError::Arity {
            function,
            expected: "1 or 2",
            got,
        }),
    }
}

/// Rejects a constant argument whose type can never satisfy its role.
fn require_constant(
    function: &'static str,
    role: &str,
    arg: &Expression,
    accepts: fn(&Value) -> bool,
    wanted: &str,
) -> Result<(), BindError> {
    match arg.as_constant() {
        Some(value) if !accepts(value) => Err(BindError::Shape {
            function,
            message: format!("{} must be {}, got {}", role, wanted, value.type_name()),
        }),
        _ => Ok(()),
    }
}

fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Integer(_))
}

fn new_identity(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [] = exactly::<0>("id", "0", args)?;
    Ok(Expression::Identity)
}

fn new_element(args: Vec<Expression>) -> Result<Expression, BindError> {
    let (positions, leaf) = one_or_two("elem", args)?;
    Ok(Expression::Element {
        positions: Box::new(positions),
        leaf: Box::new(leaf.unwrap_or(Expression::Identity)),
    })
}

fn new_keys(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [] = exactly::<0>("keys", "0", args)?;
    Ok(Expression::Keys)
}

fn new_array(args: Vec<Expression>) -> Result<Expression, BindError> {
    Ok(Expression::Array(args))
}

fn new_object(args: Vec<Expression>) -> Result<Expression, BindError> {
    if args.len() % 2 != 0 {
        return Err(BindError::Arity {
            function: "object",
            expected: "an even number of",
            got: args.len(),
        });
    }

    let mut pairs = Vec::with_capacity(args.len() / 2);
    let mut args = args.into_iter();
    while let (Some(key), Some(value)) = (args.next(), args.next()) {
        require_constant("object", "key", &key, is_string, "a string")?;
        pairs.push((key, value));
    }
    Ok(Expression::Object(pairs))
}

fn new_pipe(args: Vec<Expression>) -> Result<Expression, BindError> {
    if args.is_empty() {
        return Err(BindError::Arity {
            function: "pipe",
            expected: "at least 1",
            got: 0,
        });
    }
    Ok(Expression::Pipe(args))
}

fn new_sprintf(args: Vec<Expression>) -> Result<Expression, BindError> {
    let mut args = args.into_iter();
    let format = args.next().ok_or(BindError::Arity {
        function: "sprintf",
        expected: "at least 1",
        got: 0,
    })?;
    require_constant("sprintf", "format", &format, is_string, "a string")?;
    Ok(Expression::Sprintf {
        format: Box::new(format),
        args: args.collect(),
    })
}

fn new_join(args: Vec<Expression>) -> Result<Expression, BindError> {
    let (items, separator) = one_or_two("join", args)?;
    let separator = separator.unwrap_or(Expression::Constant(Value::String(String::new())));
    require_constant("join", "separator", &separator, is_string, "a string")?;
    Ok(Expression::Join {
        items: Box::new(items),
        separator: Box::new(separator),
    })
}

fn new_filter(args: Vec<Expression>) -> Result<Expression, BindError> {
    let (predicate, transform) = one_or_two("filter", args)?;
    Ok(Expression::Filter {
        predicate: Box::new(predicate),
        transform: Box::new(transform.unwrap_or(Expression::Identity)),
    })
}

fn new_equal(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [left, right] = exactly::<2>("eq", "2", args)?;
    Ok(Expression::Equal(Box::new(left), Box::new(right)))
}

fn new_compare(
    function: &'static str,
    op: CompareOp,
    args: Vec<Expression>,
) -> Result<Expression, BindError> {
    let [left, right] = exactly::<2>(function, "2", args)?;
    Ok(Expression::Compare {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn new_less_than(args: Vec<Expression>) -> Result<Expression, BindError> {
    new_compare("lt", CompareOp::LessThan, args)
}

fn new_greater_than(args: Vec<Expression>) -> Result<Expression, BindError> {
    new_compare("gt", CompareOp::GreaterThan, args)
}

fn new_range(args: Vec<Expression>) -> Result<Expression, BindError> {
    let (begin, end) = match one_or_two("range", args)? {
        (end, None) => (Expression::Constant(Value::Integer(0)), end),
        (begin, Some(end)) => (begin, end),
    };
    require_constant("range", "begin", &begin, is_integer, "an integer")?;
    require_constant("range", "end", &end, is_integer, "an integer")?;
    Ok(Expression::Range {
        begin: Box::new(begin),
        end: Box::new(end),
    })
}

fn new_and(args: Vec<Expression>) -> Result<Expression, BindError> {
    Ok(Expression::And(args))
}

fn new_or(args: Vec<Expression>) -> Result<Expression, BindError> {
    Ok(Expression::Or(args))
}

fn new_not(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [value] = exactly::<1>("not", "1", args)?;
    Ok(Expression::Not(Box::new(value)))
}

fn new_ifte(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [condition, then, otherwise] = exactly::<3>("ifte", "3", args)?;
    Ok(Expression::IfThenElse {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    })
}

fn new_error(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [message] = exactly::<1>("error", "1", args)?;
    Ok(Expression::Error(Box::new(message)))
}

fn new_recover(args: Vec<Expression>) -> Result<Expression, BindError> {
    let [inner] = exactly::<1>("recover", "1", args)?;
    Ok(Expression::Recover(Box::new(inner)))
}
