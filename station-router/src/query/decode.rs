//! Table response decoding.
//!
//! The engine's table response is only loosely structured: `durations` may
//! be absent on error, and individual cells are `null` where no route
//! exists. The schema below makes every key optional and accepts any JSON
//! value as a cell, so the only failures left are the structural ones.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::engine::CODE_OK;

use super::row::DurationRow;

/// Errors from decoding a table response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Response shape did not match the schema (wrong type at some level)
    #[error("malformed table response: {0}")]
    Malformed(String),

    /// Engine reported a non-`Ok` code
    #[error("engine returned {code}: {message}")]
    EngineCode { code: String, message: String },

    /// No `durations` key
    #[error("table response has no durations")]
    MissingDurations,

    /// `durations` is an empty matrix
    #[error("table response has an empty duration matrix")]
    EmptyMatrix,

    /// First row has the wrong number of entries
    #[error("duration row has {actual} entries, expected {expected}")]
    RowLength { expected: usize, actual: usize },
}

/// Only the keys the decoder walks are typed. `message` is read only when
/// reporting an error code, and rows past the first are never looked at.
#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    durations: Option<Vec<Value>>,
}

/// One matrix entry: a number of seconds, or anything else for "no route".
#[derive(Debug)]
struct Cell(Option<f64>);

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Cell(value.as_f64()))
    }
}

/// Decode the first row of a table response.
///
/// `expected` is the number of destinations requested; a row of any other
/// length is rejected rather than returned misaligned.
pub fn decode_row(response: Value, expected: usize) -> Result<DurationRow, DecodeError> {
    let response: TableResponse =
        serde_json::from_value(response).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if let Some(code) = response.code
        && code != CODE_OK
    {
        return Err(DecodeError::EngineCode {
            code,
            message: message_text(response.message),
        });
    }

    let first = response
        .durations
        .ok_or(DecodeError::MissingDurations)?
        .into_iter()
        .next()
        .ok_or(DecodeError::EmptyMatrix)?;
    let row: Vec<Cell> =
        serde_json::from_value(first).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if row.len() != expected {
        return Err(DecodeError::RowLength {
            expected,
            actual: row.len(),
        });
    }

    Ok(DurationRow::new(row.into_iter().map(|c| c.0).collect()))
}

fn message_text(message: Option<Value>) -> String {
    match message {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// A cell is a number, null, or a string
    fn cell() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0.0f64..100_000.0).prop_map(|d| json!(d)),
            Just(Value::Null),
            "[a-z]{0,5}".prop_map(Value::String),
        ]
    }

    proptest! {
        /// Decoding never fails on cell content and keeps every position
        #[test]
        fn cells_never_fail(cells in prop::collection::vec(cell(), 0..30)) {
            let n = cells.len();
            let response = json!({"code": "Ok", "durations": [cells.clone()]});
            let row = decode_row(response, n).unwrap();

            prop_assert_eq!(row.len(), n);
            for (i, cell) in cells.iter().enumerate() {
                prop_assert_eq!(row.get(i), cell.as_f64());
            }
        }
    }
}
