//! printf-style formatting for the `sprintf` function.
//!
//! Supported verbs:
//!
//! | Verb | Accepts | Output |
//! |------|---------|--------|
//! | `%s`, `%v` | anything | default textual representation |
//! | `%q` | string | JSON-quoted string |
//! | `%d` | integer | decimal |
//! | `%f`, `%F` | number | fixed point, precision defaults to 6 |
//! | `%e`, `%E` | number | scientific notation (`3.800000e+07`) |
//! | `%g` | number | shortest representation |
//! | `%x`, `%X` | integer, string | hexadecimal |
//! | `%o`, `%b` | integer | octal, binary |
//! | `%t` | boolean | `true`/`false` |
//! | `%%` | - | a literal `%` |
//!
//! Flags `-` (left-justify), `+` (always sign) and `0` (zero padding), a
//! width and a `.precision` may precede the verb. A value that does not fit
//! its verb is rendered with its default textual representation instead of
//! failing. A specifier with no argument left is copied to the output
//! verbatim; surplus arguments are ignored. So is a specifier whose width
//! exceeds 1000000 or whose precision exceeds 65535; it consumes no argument.

use std::sync::LazyLock;

use regex::{Captures, Match, Regex};

use crate::value::Value;

// Padding is materialized, so the width has to stay allocatable.
const MAX_WIDTH: usize = 1_000_000;
// The standard formatter rejects precisions above u16::MAX.
const MAX_PRECISION: usize = u16::MAX as usize;

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([-+ 0#]*)(\d+)?(?:\.(\d+))?([a-zA-Z%])")
        .expect("sprintf specifier pattern is valid")
});

struct Spec {
    left_align: bool,
    plus: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

impl Spec {
    /// `None` when the width or precision is out of range.
    fn from_captures(caps: &Captures<'_>, verb: &str) -> Option<Spec> {
        let flags = caps.get(1).map_or("", |m| m.as_str());
        Some(Spec {
            left_align: flags.contains('-'),
            plus: flags.contains('+'),
            zero_pad: flags.contains('0'),
            width: bounded(caps.get(2), MAX_WIDTH)?,
            precision: bounded(caps.get(3), MAX_PRECISION)?,
            verb: verb.chars().next().unwrap_or('v'),
        })
    }
}

fn bounded(digits: Option<Match<'_>>, max: usize) -> Option<Option<usize>> {
    match digits {
        None => Some(None),
        Some(digits) => digits
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= max)
            .map(Some),
    }
}

/// Formats `args` into `format`.
///
/// ```
/// use jql::{format::sprintf, Value};
///
/// let out = sprintf("%s population: %.0f", &[Value::from("Poland"), Value::Float(38000000.0)]);
/// assert_eq!(out, "Poland population: 38000000");
/// ```
pub fn sprintf(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut last = 0;

    for caps in SPECIFIER.captures_iter(format) {
        let (Some(whole), Some(verb)) = (caps.get(0), caps.get(4)) else {
            continue;
        };
        out.push_str(&format[last..whole.start()]);
        last = whole.end();

        let Some(spec) = Spec::from_captures(&caps, verb.as_str()) else {
            out.push_str(whole.as_str());
            continue;
        };

        if spec.verb == '%' {
            out.push('%');
            continue;
        }

        match args.next() {
            Some(arg) => out.push_str(&render(&spec, arg)),
            None => out.push_str(whole.as_str()),
        }
    }

    out.push_str(&format[last..]);
    out
}

fn render(spec: &Spec, value: &Value) -> String {
    let numeric = matches!(
        spec.verb,
        'd' | 'f' | 'F' | 'e' | 'E' | 'g' | 'x' | 'X' | 'o' | 'b'
    );

    let body = match (spec.verb, value) {
        ('s' | 'v', Value::String(s)) => match spec.precision {
            Some(max) => s.chars().take(max).collect(),
            None => s.clone(),
        },
        ('q', Value::String(s)) => crate::output::to_json(&Value::String(s.clone())),
        ('d', Value::Integer(n)) => signed(n.to_string(), *n >= 0, spec.plus),
        ('f' | 'F', v) if v.as_float().is_some() => {
            let n = v.as_float().unwrap_or_default();
            let precision = spec.precision.unwrap_or(6);
            signed(format!("{:.*}", precision, n), n >= 0.0, spec.plus)
        }
        ('e' | 'E', v) if v.as_float().is_some() => {
            let n = v.as_float().unwrap_or_default();
            let text = scientific(n, spec.precision.unwrap_or(6));
            let text = if spec.verb == 'E' { text.to_uppercase() } else { text };
            signed(text, n >= 0.0, spec.plus)
        }
        ('g', v @ (Value::Integer(_) | Value::Float(_))) => v.as_string(),
        ('x', Value::Integer(n)) => format!("{:x}", n),
        ('X', Value::Integer(n)) => format!("{:X}", n),
        ('x', Value::String(s)) => s.bytes().map(|b| format!("{:02x}", b)).collect(),
        ('X', Value::String(s)) => s.bytes().map(|b| format!("{:02X}", b)).collect(),
        ('o', Value::Integer(n)) => format!("{:o}", n),
        ('b', Value::Integer(n)) => format!("{:b}", n),
        ('t', Value::Boolean(b)) => b.to_string(),
        (_, other) => other.as_string(),
    };

    pad(body, spec, numeric && value.as_float().is_some())
}

fn signed(text: String, non_negative: bool, plus: bool) -> String {
    if plus && non_negative {
        format!("+{}", text)
    } else {
        text
    }
}

/// C-style scientific notation: at least two exponent digits, explicit sign.
fn scientific(n: f64, precision: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let text = format!("{:.*e}", precision, n);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

fn pad(body: String, spec: &Spec, numeric: bool) -> String {
    let Some(width) = spec.width else {
        return body;
    };
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;

    if spec.left_align {
        format!("{}{}", body, " ".repeat(fill))
    } else if spec.zero_pad && numeric {
        // Zeros go between the sign and the digits.
        let (sign, digits) = match body.strip_prefix(['-', '+']) {
            Some(digits) => (&body[..1], digits),
            None => ("", body.as_str()),
        };
        format!("{}{}{}", sign, "0".repeat(fill), digits)
    } else {
        format!("{}{}", " ".repeat(fill), body)
    }
}
