use std::{collections::HashMap, fmt};

use crate::types::ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub outputs: Vec<bool>,
}

/// Rows in counting order; column `k` of `inputs` is the component `inputs[k]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TruthTable {
    pub inputs: Vec<ID>,
    pub outputs: Vec<ID>,
    pub rows: Vec<TruthRow>,
}

impl TruthTable {
    pub fn new(inputs: Vec<ID>, outputs: Vec<ID>) -> TruthTable {
        TruthTable {
            inputs,
            outputs,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of component `id` in row `row`, whether it is an input or an output column.
    pub fn value(&self, row: usize, id: ID) -> Option<bool> {
        let r = self.rows.get(row)?;
        if let Some(k) = self.inputs.iter().position(|i| *i == id) {
            return r.inputs.get(k).copied();
        }
        let k = self.outputs.iter().position(|o| *o == id)?;
        r.outputs.get(k).copied()
    }

    /// Column-wise view of one row, keyed by component id.
    pub fn row_map(&self, row: usize) -> Option<HashMap<ID, bool>> {
        let r = self.rows.get(row)?;
        Some(
            self.inputs
                .iter()
                .zip(r.inputs.iter())
                .chain(self.outputs.iter().zip(r.outputs.iter()))
                .map(|(id, v)| (*id, *v))
                .collect(),
        )
    }

    /// Text rendering with the given column headers (inputs first, then outputs).
    pub fn to_table(&self, headers: Vec<String>) -> Result<Table<char>, String> {
        let width = self.inputs.len() + self.outputs.len();
        if headers.len() != width {
            return Err(format!("{} headers for {} columns", headers.len(), width));
        }
        let mut t = Table::<char>::new();
        t.set_columns(headers)?;
        t.set_rows(
            self.rows
                .iter()
                .map(|r| {
                    r.inputs
                        .iter()
                        .chain(r.outputs.iter())
                        .map(|v| bit_char(*v))
                        .collect()
                })
                .collect(),
        )?;
        Ok(t)
    }
}

pub fn bit_char(v: bool) -> char {
    if v {
        '1'
    } else {
        '0'
    }
}

// a rudimentary text table
pub struct Table<T> {
    cols: Vec<String>,
    pub rows: Vec<Vec<T>>,
}

impl<T: Default + Clone> Table<T> {
    pub fn new() -> Table<T> {
        Table {
            cols: Vec::new(),
            rows: Vec::new(),
        }
    }
    pub fn set_columns(&mut self, cols: Vec<String>) -> Result<(), String> {
        if !self.rows.is_empty() && self.rows[0].len() != cols.len() {
            return Err("Column count does not match existing rows".to_string());
        }
        self.cols = cols;
        Ok(())
    }
    pub fn set_rows(&mut self, rows: Vec<Vec<T>>) -> Result<(), String> {
        if let Some(r) = rows.iter().find(|r| r.len() != self.cols.len()) {
            return Err(format!(
                "Row has {} cells, expected {}",
                r.len(),
                self.cols.len()
            ));
        }
        self.rows = rows;
        Ok(())
    }
    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![T::default(); self.cols.len()]);
        self.rows.len() - 1
    }
}

impl<T: Default + Clone> Default for Table<T> {
    fn default() -> Self {
        Table::new()
    }
}

impl<T: fmt::Display> fmt::Display for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = self
            .cols
            .iter()
            .map(|c| {
                let width = c.len() + 2 + 1; // 2 spaces left and right of the label text
                (" ".repeat(width / 2), " ".repeat(width - width / 2))
            })
            .collect::<Vec<(String, String)>>();
        let total_width = pad.iter().fold(0, |a, b| a + b.0.len() + b.1.len() + 2);
        let rule = total_width.saturating_sub(1);

        writeln!(f, "|{}|", "¯".repeat(rule))?;
        write!(f, "|")?;
        for c in &self.cols {
            write!(f, "  {}  |", c)?;
        }
        writeln!(f)?;
        writeln!(f, "|{}|", "-".repeat(rule))?;
        for row in &self.rows {
            write!(f, "|")?;
            for (i, p) in pad.iter().enumerate() {
                match row.get(i) {
                    Some(v) => write!(f, "{}{}{}|", p.0, v, p.1)?,
                    None => write!(f, "{} {}|", p.0, p.1)?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "|{}|", "_".repeat(rule))?;
        Ok(())
    }
}

/// All assignments of `bits` booleans, most significant (first) column varying slowest.
pub fn bitwise_counter(bits: usize) -> impl Iterator<Item = Vec<bool>> {
    // past 63 bits the count no longer fits; nothing is enumerated
    let total_combs = u32::try_from(bits)
        .ok()
        .and_then(|b| 1u64.checked_shl(b))
        .unwrap_or(0);
    (0..total_combs).map(move |n| {
        (0..bits)
            .map(|k| (n >> (bits - 1 - k)) & 1 == 1)
            .collect::<Vec<bool>>()
    })
}
