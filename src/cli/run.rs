//! Run a compiled query over a stream of JSON values

use std::io::{BufReader, BufWriter, Read, Write};

use super::{CliError, json_to_value};
use crate::{compile, evaluator::Expression, output::JsonPrinter};

const BUFFER_SIZE: usize = 64 * 1024;

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    /// Indent nested values by two spaces per level
    pub pretty: bool,
    /// Emit ANSI colors
    pub color: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            pretty: true,
            color: false,
        }
    }
}

/// Compile `query` and run it over every JSON value in `input`.
///
/// Returns the number of values processed. See [`run_compiled`].
pub fn run<R: Read, W: Write>(
    query: &str,
    input: R,
    output: W,
    options: &OutputOptions,
) -> Result<usize, CliError> {
    let expr = compile(query)?;
    run_compiled(&expr, input, output, options)
}

/// Evaluate `expr` once per JSON value decoded from `input`, writing one
/// result per line to `output`.
///
/// Values may be separated by any whitespace. The run stops cleanly at end
/// of input and aborts on the first value that fails to decode or evaluate;
/// results already written stay written.
pub fn run_compiled<R: Read, W: Write>(
    expr: &Expression,
    input: R,
    output: W,
    options: &OutputOptions,
) -> Result<usize, CliError> {
    let printer = JsonPrinter::new(options.pretty).with_color(options.color);
    let mut output = BufWriter::with_capacity(BUFFER_SIZE, output);
    let stream = serde_json::Deserializer::from_reader(BufReader::with_capacity(BUFFER_SIZE, input))
        .into_iter::<serde_json::Value>();

    let mut processed = 0;
    for decoded in stream {
        let record = processed + 1;
        let value = json_to_value(decoded.map_err(|source| CliError::Decode { record, source })?);
        let result = expr
            .evaluate(&value)
            .map_err(|source| CliError::Eval { record, source })?;
        writeln!(output, "{}", printer.print(&result))?;
        tracing::trace!(record, "evaluated record");
        processed = record;
    }

    output.flush()?;
    tracing::debug!(processed, "input exhausted");
    Ok(processed)
}
