use std::collections::HashMap;

use thiserror::Error;

use crate::{format::sprintf, value::Value};

/// Errors that can occur while evaluating a compiled query against a value.
///
/// Every variant aborts the enclosing evaluation unless a `recover` node
/// sits between the failing node and the root.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Operand of the wrong type or shape
    #[error("type error: {0}")]
    Type(String),

    /// Operand of the right type but with an unusable value
    #[error("out of domain: {0}")]
    OutOfDomain(String),

    /// Raised on purpose by the `error` function
    #[error("error: {0}")]
    User(String),

    /// A value broke an assumption the evaluator relies on
    #[error("internal error: {0}")]
    Internal(String),
}

/// Ordering test performed by `lt` and `gt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    LessThan,
    GreaterThan,
}

/// A bound, immutable expression tree.
///
/// Built once by the binder and then evaluated against any number of input
/// values. Evaluation borrows the tree, so one compiled query can be shared
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal from the query text
    Constant(Value),

    /// `(id)`
    Identity,

    /// `(elem positions leaf)` and the head-less `(positions leaf)` shorthand
    Element {
        positions: Box<Expression>,
        leaf: Box<Expression>,
    },

    /// `(keys)`
    Keys,

    /// `(array e1 e2 ...)`
    Array(Vec<Expression>),

    /// `(object k1 v1 k2 v2 ...)`
    Object(Vec<(Expression, Expression)>),

    /// `(pipe e1 e2 ...)`
    Pipe(Vec<Expression>),

    /// `(sprintf format args...)`
    Sprintf {
        format: Box<Expression>,
        args: Vec<Expression>,
    },

    /// `(join items [separator])`
    Join {
        items: Box<Expression>,
        separator: Box<Expression>,
    },

    /// `(filter predicate [transform])`
    Filter {
        predicate: Box<Expression>,
        transform: Box<Expression>,
    },

    /// `(eq a b)`
    Equal(Box<Expression>, Box<Expression>),

    /// `(lt a b)` and `(gt a b)`
    Compare {
        op: CompareOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `(range [begin] end)`
    Range {
        begin: Box<Expression>,
        end: Box<Expression>,
    },

    /// `(and e1 e2 ...)`
    And(Vec<Expression>),

    /// `(or e1 e2 ...)`
    Or(Vec<Expression>),

    /// `(not e)`
    Not(Box<Expression>),

    /// `(ifte condition then else)`
    IfThenElse {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },

    /// `(error message)`
    Error(Box<Expression>),

    /// `(recover e)`
    Recover(Box<Expression>),
}

impl Expression {
    /// The literal value, if this node is a constant.
    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Expression::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Evaluates the expression with `input` as the current value.
    ///
    /// # Examples
    ///
    /// ```
    /// use jql::{compile, Value};
    ///
    /// let query = compile(r#"(array (id) "x")"#).unwrap();
    /// let result = query.evaluate(&Value::Integer(1)).unwrap();
    /// assert_eq!(result, Value::Array(vec![Value::Integer(1), Value::from("x")]));
    /// ```
    pub fn evaluate(&self, input: &Value) -> Result<Value, EvalError> {
        match self {
            Expression::Constant(value) => Ok(value.clone()),
            Expression::Identity => Ok(input.clone()),
            Expression::Element { positions, leaf } => {
                let positions = positions.evaluate(input)?;
                resolve_positions(&positions, input, leaf)
            }
            Expression::Keys => keys(input),
            Expression::Array(items) => items
                .iter()
                .map(|item| item.evaluate(input))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expression::Object(pairs) => {
                let mut map = HashMap::with_capacity(pairs.len());
                for (index, (key, value)) in pairs.iter().enumerate() {
                    let key = match key.evaluate(input)? {
                        Value::String(key) => key,
                        other => {
                            return Err(EvalError::Type(format!(
                                "object key at position {} must be a string, got {}",
                                index,
                                other.type_name()
                            )));
                        }
                    };
                    let value = value.evaluate(input)?;
                    map.insert(key, value);
                }
                Ok(Value::Object(map))
            }
            Expression::Pipe(stages) => {
                let mut current = input.clone();
                for stage in stages {
                    current = stage.evaluate(&current)?;
                }
                Ok(current)
            }
            Expression::Sprintf { format, args } => {
                let format = match format.evaluate(input)? {
                    Value::String(format) => format,
                    other => {
                        return Err(EvalError::Type(format!(
                            "sprintf format must be a string, got {}",
                            other.type_name()
                        )));
                    }
                };
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(input))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::String(sprintf(&format, &args)))
            }
            Expression::Join { items, separator } => {
                let separator = match separator.evaluate(input)? {
                    Value::String(separator) => separator,
                    other => {
                        return Err(EvalError::Type(format!(
                            "join separator must be a string, got {}",
                            other.type_name()
                        )));
                    }
                };
                match items.evaluate(input)? {
                    Value::Array(items) => {
                        let parts: Vec<String> = items.iter().map(Value::as_string).collect();
                        Ok(Value::String(parts.join(&separator)))
                    }
                    other => Ok(Value::String(other.as_string())),
                }
            }
            Expression::Filter {
                predicate,
                transform,
            } => {
                let items = match input {
                    Value::Array(items) => items,
                    other => {
                        return Err(EvalError::Type(format!(
                            "filter requires an array, got {}",
                            other.type_name()
                        )));
                    }
                };
                let mut kept = Vec::new();
                for item in items {
                    if predicate.evaluate(item)?.is_truthy() {
                        kept.push(transform.evaluate(item)?);
                    }
                }
                Ok(Value::Array(kept))
            }
            Expression::Equal(left, right) => {
                let left = left.evaluate(input)?;
                let right = right.evaluate(input)?;
                Ok(Value::Boolean(left.deep_eq(&right)))
            }
            Expression::Compare { op, left, right } => {
                let left = left.evaluate(input)?;
                let right = right.evaluate(input)?;
                Ok(Value::Boolean(compare(*op, &left, &right)))
            }
            Expression::Range { begin, end } => {
                let begin = range_bound("begin", begin.evaluate(input)?)?;
                let end = range_bound("end", end.evaluate(input)?)?;
                range(begin, end)
            }
            Expression::And(items) => {
                for item in items {
                    if !item.evaluate(input)?.is_truthy() {
                        return Ok(Value::Boolean(false));
                    }
                }
                Ok(Value::Boolean(true))
            }
            Expression::Or(items) => {
                for item in items {
                    if item.evaluate(input)?.is_truthy() {
                        return Ok(Value::Boolean(true));
                    }
                }
                Ok(Value::Boolean(false))
            }
            Expression::Not(value) => Ok(Value::Boolean(!value.evaluate(input)?.is_truthy())),
            Expression::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(input)?.is_truthy() {
                    then.evaluate(input)
                } else {
                    otherwise.evaluate(input)
                }
            }
            Expression::Error(message) => {
                let message = message.evaluate(input)?;
                Err(EvalError::User(message.as_string()))
            }
            Expression::Recover(inner) => match inner.evaluate(input) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::trace!(error = %err, "recovered");
                    Ok(Value::Null)
                }
            },
        }
    }
}

/// Evaluates `expr` against `input`.
pub fn evaluate(expr: &Expression, input: &Value) -> Result<Value, EvalError> {
    expr.evaluate(input)
}

/// Resolves a positions value against `input`, applying `leaf` to every
/// addressed element.
///
/// Arrays and objects of positions broadcast: the result has the same shape
/// as `positions`, with every integer or string replaced by what it addresses.
fn resolve_positions(
    positions: &Value,
    input: &Value,
    leaf: &Expression,
) -> Result<Value, EvalError> {
    match positions {
        Value::Array(positions) => positions
            .iter()
            .map(|position| resolve_positions(position, input, leaf))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(positions) => {
            let mut resolved = HashMap::with_capacity(positions.len());
            for (key, position) in positions {
                resolved.insert(key.clone(), resolve_positions(position, input, leaf)?);
            }
            Ok(Value::Object(resolved))
        }
        Value::Integer(index) => match input {
            Value::Array(items) => {
                // Negative indices are simply out of bounds.
                match usize::try_from(*index).ok().and_then(|i| items.get(i)) {
                    Some(item) => leaf.evaluate(item),
                    None => Ok(Value::Null),
                }
            }
            other => Err(EvalError::Type(format!(
                "integer position {} requires an array, got {}",
                index,
                other.type_name()
            ))),
        },
        Value::String(field) => match input {
            Value::Object(fields) => match fields.get(field) {
                Some(value) => leaf.evaluate(value),
                None => Ok(Value::Null),
            },
            other => Err(EvalError::Type(format!(
                "string position \"{}\" requires an object, got {}",
                field,
                other.type_name()
            ))),
        },
        other => Err(EvalError::Type(format!(
            "invalid position of type {}; expected integer, string, array or object",
            other.type_name()
        ))),
    }
}

fn keys(input: &Value) -> Result<Value, EvalError> {
    match input {
        Value::Array(items) => (0..items.len())
            .map(|i| {
                i64::try_from(i)
                    .map(Value::Integer)
                    .map_err(|_| EvalError::Internal(format!("array index {} exceeds i64", i)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(fields) => {
            let mut names: Vec<&String> = fields.keys().collect();
            names.sort();
            Ok(Value::Array(
                names.into_iter().map(|k| Value::String(k.clone())).collect(),
            ))
        }
        other => Err(EvalError::Type(format!(
            "keys requires an array or object, got {}",
            other.type_name()
        ))),
    }
}

/// Strings compare bytewise, numbers as floats; every other pairing is false.
fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    use std::cmp::Ordering;

    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        _ => match (left.as_float(), right.as_float()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };

    matches!(
        (op, ordering),
        (CompareOp::LessThan, Some(Ordering::Less)) | (CompareOp::GreaterThan, Some(Ordering::Greater))
    )
}

fn range_bound(name: &str, value: Value) -> Result<i64, EvalError> {
    match value {
        Value::Integer(n) => Ok(n),
        other => Err(EvalError::Type(format!(
            "range {} must be an integer, got {}",
            name,
            other.type_name()
        ))),
    }
}

fn range(begin: i64, end: i64) -> Result<Value, EvalError> {
    if end <= begin {
        return Ok(Value::Array(vec![]));
    }

    let len = end
        .checked_sub(begin)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| EvalError::OutOfDomain(format!("range {}..{} is too large", begin, end)))?;

    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| EvalError::OutOfDomain(format!("range {}..{} is too large", begin, end)))?;
    items.extend((begin..end).map(Value::Integer));
    Ok(Value::Array(items))
}
