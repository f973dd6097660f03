//! Column schema for the loaded dataset.
//!
//! The schema is inferred once at load time from the full file contents and
//! is fixed for the rest of the session. Inference deliberately recognizes
//! only integer, float, date, and string: 0/1 flags such as `is_canceled`
//! must stay integers so their mean is a rate, not a boolean.

use serde::Serialize;

use crate::data::parse_naive_date;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Date,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    pub data_type: ColumnType,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub columns: Vec<ColumnMeta>,
}

impl Schema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Infers column types from header names and raw string rows. A column
    /// settles on the narrowest type every non-empty value parses as, in
    /// the order integer, float, date, string.
    pub fn infer(headers: &[String], rows: &[Vec<String>]) -> Self {
        let mut candidates = vec![TypeCandidate::new(); headers.len()];
        for row in rows {
            for (idx, field) in row.iter().enumerate().take(headers.len()) {
                if field.is_empty() {
                    continue;
                }
                let candidate = &mut candidates[idx];
                if candidate.possible_integer && field.parse::<i64>().is_err() {
                    candidate.possible_integer = false;
                }
                if candidate.possible_float && field.parse::<f64>().is_err() {
                    candidate.possible_float = false;
                }
                if candidate.possible_date && parse_naive_date(field).is_err() {
                    candidate.possible_date = false;
                }
            }
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| ColumnMeta {
                name: header.to_string(),
                data_type: candidates[idx].decide(),
            })
            .collect();
        Schema { columns }
    }
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    possible_integer: bool,
    possible_float: bool,
    possible_date: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            possible_integer: true,
            possible_float: true,
            possible_date: true,
        }
    }

    fn decide(&self) -> ColumnType {
        if self.possible_integer {
            ColumnType::Integer
        } else if self.possible_float {
            ColumnType::Float
        } else if self.possible_date {
            ColumnType::Date
        } else {
            ColumnType::String
        }
    }
}
