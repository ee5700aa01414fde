//! Workbook reading and the row-table record model.
//!
//! A [`Workbook`] is a set of named tables of raw cell rows. The first
//! row of each table holds the column headers; [`Workbook::records`]
//! turns the remaining rows into key→cell [`Record`]s. Reading an
//! `.xlsx` file is the only place calamine types appear — everything
//! downstream works on [`Cell`].

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::cell::Cell;
use crate::error::LoadError;

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Self::Null,
            Data::Bool(b) => Self::Bool(*b),
            Data::Int(i) => Self::Int(*i),
            Data::Float(f) => Self::Float(*f),
            Data::String(s) => Self::Text(s.clone()),
            Data::DateTime(dt) => Self::Float(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

/// Named tables of raw cell rows, as read from a spreadsheet.
pub(crate) struct Workbook {
    tables: HashMap<String, Vec<Vec<Cell>>>,
}

impl Workbook {
    /// Read every worksheet of an `.xlsx` file.
    pub(crate) fn open(path: &Path) -> Result<Self, LoadError> {
        let mut xlsx: Xlsx<_> = open_workbook(path).map_err(|source| LoadError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = xlsx
            .worksheets()
            .into_iter()
            .map(|(name, range)| {
                let rows = range
                    .rows()
                    .map(|row| row.iter().map(Cell::from).collect())
                    .collect();
                (name, rows)
            })
            .collect();
        Ok(Self { tables })
    }

    /// Read a named table into records.
    ///
    /// - Unknown table → empty sequence.
    /// - Header cells are stringified and trimmed; empty headers mark the
    ///   column as unnamed and it is skipped in every data row.
    /// - Rows whose cells are all blank are skipped entirely.
    /// - Rows shorter than the header yield null for the missing trailing
    ///   columns.
    pub(crate) fn records(&self, name: &str) -> Vec<Record> {
        let Some(rows) = self.tables.get(name) else {
            return Vec::new();
        };
        let Some((header_row, data_rows)) = rows.split_first() else {
            return Vec::new();
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.display().unwrap_or_default().trim().to_owned())
            .collect();

        let mut records = Vec::new();
        for row in data_rows {
            if row.iter().all(Cell::is_blank) {
                continue;
            }
            let mut fields = HashMap::new();
            for (i, header) in headers.iter().enumerate() {
                if header.is_empty() {
                    continue;
                }
                fields.insert(
                    header.clone(),
                    row.get(i).cloned().unwrap_or(Cell::Null),
                );
            }
            records.push(Record { fields });
        }
        records
    }
}

#[cfg(test)]
impl Workbook {
    /// Build a workbook directly from in-memory tables.
    pub(crate) fn from_tables<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Vec<Vec<Cell>>)>,
    {
        Self {
            tables: tables
                .into_iter()
                .map(|(name, rows)| (name.to_owned(), rows))
                .collect(),
        }
    }
}

/// One data row of a table, keyed by header name.
pub(crate) struct Record {
    fields: HashMap<String, Cell>,
}

impl Record {
    /// Raw cell for a column; absent columns read as null.
    pub(crate) fn cell(&self, key: &str) -> &Cell {
        self.fields.get(key).unwrap_or(&Cell::Null)
    }

    /// Stringified and trimmed value, empty when absent. Used for slugs
    /// and other identifier columns.
    pub(crate) fn trimmed(&self, key: &str) -> String {
        self.cell(key)
            .display()
            .unwrap_or_default()
            .trim()
            .to_owned()
    }

    /// Stringified value with a default for absent or empty cells.
    ///
    /// Unlike [`Record::trimmed`] the kept value is not trimmed — display
    /// text is preserved as entered.
    pub(crate) fn text_or(&self, key: &str, default: &str) -> String {
        match self.cell(key).display() {
            None => default.to_owned(),
            Some(s) if s.is_empty() => default.to_owned(),
            Some(s) => s,
        }
    }

    /// Truthy coercion with a per-field default.
    pub(crate) fn truthy(&self, key: &str, default: bool) -> bool {
        self.cell(key).truthy(default)
    }

    /// Integer coercion with a default.
    pub(crate) fn int_or(&self, key: &str, default: i64) -> i64 {
        self.cell(key).int_or(default)
    }

    /// Float coercion with a default.
    pub(crate) fn float_or(&self, key: &str, default: f64) -> f64 {
        self.cell(key).float_or(default)
    }
}
