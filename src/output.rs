//! JSON output serialization for query results.
//!
//! All output is deterministic: object keys are always written in
//! lexicographic order, whatever order the object was built in. Decoding the
//! output and printing it again yields the same bytes.
//!
//! # Examples
//!
//! ```
//! use jql::Value;
//! use jql::output::{to_json, to_json_pretty};
//! use std::collections::HashMap;
//!
//! let mut obj = HashMap::new();
//! obj.insert("name".to_string(), Value::String("Alice".to_string()));
//! obj.insert("age".to_string(), Value::Integer(30));
//! let obj = Value::Object(obj);
//!
//! assert_eq!(to_json(&obj), r#"{"age":30,"name":"Alice"}"#);
//! assert_eq!(to_json_pretty(&obj), "{\n  \"age\": 30,\n  \"name\": \"Alice\"\n}");
//! ```

use std::collections::HashMap;

use colored::Colorize;

use crate::value::Value;

pub struct JsonPrinter {
    pretty: bool,
    color: bool,
}

impl JsonPrinter {
    pub fn new(pretty: bool) -> Self {
        JsonPrinter {
            pretty,
            color: false,
        }
    }

    /// Enable ANSI colors for keys and scalars.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        match value {
            Value::Null => self.paint("null", Paint::Null),
            Value::Boolean(b) => self.paint(&b.to_string(), Paint::Boolean),
            Value::Integer(n) => self.paint(&n.to_string(), Paint::Number),
            Value::Float(n) => self.paint(&format_float(*n), Paint::Number),
            Value::String(s) => {
                let quoted = format!("\"{}\"", escape_string(s));
                self.paint(&quoted, Paint::String)
            }
            Value::Array(arr) => self.print_array(arr, indent),
            Value::Object(obj) => self.print_object(obj, indent),
        }
    }

    fn print_array(&self, arr: &[Value], indent: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        if self.pretty {
            let mut result = "[\n".to_string();
            let items: Vec<String> = arr
                .iter()
                .map(|v| {
                    format!(
                        "{}{}",
                        self.indent(indent + 1),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push(']');
            result
        } else {
            let items: Vec<String> = arr.iter().map(|v| self.print_value(v, indent)).collect();
            format!("[{}]", items.join(","))
        }
    }

    fn print_object(&self, obj: &HashMap<String, Value>, indent: usize) -> String {
        if obj.is_empty() {
            return "{}".to_string();
        }

        let mut entries: Vec<(&String, &Value)> = obj.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        if self.pretty {
            let mut result = "{\n".to_string();
            let items: Vec<String> = entries
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}{}: {}",
                        self.indent(indent + 1),
                        self.key(k),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            result.push_str(&items.join(",\n"));
            result.push('\n');
            result.push_str(&self.indent(indent));
            result.push('}');
            result
        } else {
            let items: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}:{}", self.key(k), self.print_value(v, indent)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }

    fn key(&self, key: &str) -> String {
        let quoted = format!("\"{}\"", escape_string(key));
        self.paint(&quoted, Paint::Key)
    }

    fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.color {
            return text.to_string();
        }
        match paint {
            Paint::Key => text.blue().bold().to_string(),
            Paint::String => text.green().to_string(),
            Paint::Number => text.cyan().to_string(),
            Paint::Boolean => text.yellow().to_string(),
            Paint::Null => text.bright_black().to_string(),
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

#[derive(Clone, Copy)]
enum Paint {
    Key,
    String,
    Number,
    Boolean,
    Null,
}

/// Non-finite floats have no JSON spelling and are written as `null`.
fn format_float(n: f64) -> String {
    if n.is_finite() {
        n.to_string()
    } else {
        "null".to_string()
    }
}

fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Converts a Value to compact JSON.
///
/// No indentation or extra whitespace; object keys are sorted.
pub fn to_json(value: &Value) -> String {
    JsonPrinter::new(false).print(value)
}

/// Converts a Value to JSON indented with two spaces per level.
pub fn to_json_pretty(value: &Value) -> String {
    JsonPrinter::new(true).print(value)
}
