use std::collections::HashMap;

/// A dynamic JSON value flowing through a compiled query.
///
/// Numbers keep track of where they came from: integer literals written in
/// the query (and values computed from them, like `keys` indices or `range`
/// elements) are [`Value::Integer`], while every number decoded from input
/// JSON is a [`Value::Float`]. Positional addressing and `range` only accept
/// integers. `lt` and `gt` compare both kinds as floating point, while `eq`
/// keeps them apart.
///
/// # Examples
///
/// ```
/// use jql::Value;
/// use std::collections::HashMap;
///
/// let index = Value::Integer(0);
/// let population = Value::Float(38000000.0);
///
/// let mut country = HashMap::new();
/// country.insert("name".to_string(), Value::String("Poland".to_string()));
/// country.insert("population".to_string(), population);
/// let country = Value::Object(country);
///
/// assert!(index.is_truthy());
/// assert_eq!(country.type_name(), "object");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Number decoded from input JSON
    Float(f64),

    /// Integer written in the query or produced by `keys`/`range`
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed map; iteration order carries no meaning
    Object(HashMap<String, Value>),
}

impl Value {
    /// Only `null` and `false` are falsy; `0`, `""` and `[]` are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Default textual representation, used by `join` and by `sprintf`
    /// when a specifier does not fit the value.
    ///
    /// Strings are used as-is; arrays and objects render as compact JSON.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(n) => float_text(*n),
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) | Value::Object(_) => crate::output::to_json(self),
        }
    }

    /// Structural equality used by `eq`.
    ///
    /// Number kinds are not interchangeable: the integer `3` from a query is
    /// never equal to the `3` decoded from input. Object key order does not
    /// matter.
    pub fn deep_eq(&self, other: &Value) -> bool {
        self == other
    }
}

/// Shortest text that reads back as the same float. An exponent is used
/// when the decimal exponent is below -4 or at least 6, so 38000000 is
/// `3.8e+07`.
fn float_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if (-4..6).contains(&exponent) {
        return n.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
