//! Lazily-evaluated data frames: indexed rows plus column-name bookkeeping

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::{json_kind, DataFrameConfig, ParsedConfig};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::record::{infer_column_names, Record};
use crate::series::Series;
use crate::source::{CountingSequence, Element, IntoSequence, Pass};

/// An indexed sequence of rows with an ordered list of column names
///
/// The rows follow exactly the same lazy discipline as a [`Series`]; the
/// column names are captured once at construction and carried unchanged
/// through every derived frame.
pub struct DataFrame<I, R> {
    rows: Series<I, R>,
    column_names: Arc<[String]>,
}

impl<I, R> Clone for DataFrame<I, R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            column_names: Arc::clone(&self.column_names),
        }
    }
}

impl<R: Element> DataFrame<usize, R> {
    /// Create a frame over `rows`, keyed 0, 1, 2, ..., with no column names
    pub fn new(rows: Vec<R>) -> Self {
        Self::from_series(Series::new(rows), Vec::new())
    }
}

impl<R: Element + Record> DataFrame<usize, R> {
    /// Create a frame over `rows`, naming columns after the rows' fields
    pub fn from_records(rows: Vec<R>) -> Self {
        let column_names = infer_column_names(&rows);
        debug!(rows = rows.len(), columns = column_names.len(), "frame from records");
        Self::from_series(Series::new(rows), column_names)
    }
}

impl<I: Element, R: Element> DataFrame<I, R> {
    /// Wrap a series of rows
    pub fn from_series(rows: Series<I, R>, column_names: Vec<String>) -> Self {
        Self {
            rows,
            column_names: column_names.into(),
        }
    }

    /// Construct from a configuration
    pub fn from_config(config: DataFrameConfig<I, R>) -> Result<Self> {
        config.build()
    }

    fn derive(&self, rows: Series<I, R>) -> Self {
        Self {
            rows,
            column_names: Arc::clone(&self.column_names),
        }
    }

    /// Column names, in order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The rows as a series
    pub fn rows(&self) -> &Series<I, R> {
        &self.rows
    }

    /// Begin a fresh pass over the rows
    pub fn iter(&self) -> Pass<'_, R> {
        self.rows.iter()
    }

    /// Begin a fresh pass over the (index, row) pairs
    pub fn iter_pairs(&self) -> Pass<'_, (I, R)> {
        self.rows.iter_pairs()
    }

    /// View over the index keys
    pub fn get_index(&self) -> Index<I> {
        self.rows.get_index()
    }

    /// Materialize the rows
    pub fn to_vec(&self) -> Vec<R> {
        self.rows.to_vec()
    }

    /// Materialize the (index, row) pairs
    pub fn to_pairs(&self) -> Vec<(I, R)> {
        self.rows.to_pairs()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the rows are backed by concrete storage
    pub fn is_baked(&self) -> bool {
        self.rows.is_baked()
    }

    /// Drop the first `count` rows
    pub fn skip(&self, count: isize) -> Result<Self> {
        Ok(self.derive(self.rows.skip(count)?))
    }

    /// Keep at most the first `count` rows
    pub fn take(&self, count: isize) -> Result<Self> {
        Ok(self.derive(self.rows.take(count)?))
    }

    /// Transform every row, keeping the index and column names
    pub fn select<U, F>(&self, transform: F) -> DataFrame<I, U>
    where
        U: Element,
        F: Fn(R) -> U + Send + Sync + 'static,
    {
        DataFrame {
            rows: self.rows.select(transform),
            column_names: Arc::clone(&self.column_names),
        }
    }

    /// Keep the rows that satisfy `predicate`
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.derive(self.rows.filter(predicate))
    }

    /// Re-key the rows with `index`; the index type may change
    pub fn with_index<J: Element>(&self, index: impl IntoSequence<J>) -> DataFrame<J, R> {
        DataFrame {
            rows: self.rows.with_index(index),
            column_names: Arc::clone(&self.column_names),
        }
    }

    /// Re-key the rows 0, 1, 2, ...
    pub fn reset_index(&self) -> DataFrame<usize, R> {
        self.with_index(CountingSequence::<usize>::new())
    }

    /// Materialize the rows into concrete storage
    pub fn bake(&self) -> Self {
        self.derive(self.rows.bake())
    }
}

impl<I: Element, R: Element + Record> DataFrame<I, R> {
    /// The values of one column, keyed like the rows
    ///
    /// Rows missing the field yield `None`.
    pub fn get_column(&self, name: &str) -> Result<Series<I, Option<R::Value>>> {
        if !self.column_names.iter().any(|column| column == name) {
            return Err(Error::column_not_found(name));
        }
        let name = name.to_string();
        Ok(self.rows.select(move |row| row.field(&name)))
    }
}

impl DataFrame<Value, Value> {
    /// Construct from a JSON array of row objects or a configuration object
    ///
    /// Without explicit `columnNames` the names are inferred from the rows'
    /// fields.
    pub fn from_json(config: Value) -> Result<Self> {
        match config {
            Value::Array(rows) => {
                let column_names = infer_column_names(&rows);
                let rows = Series::<Value, Value>::from_source(rows)?;
                Ok(Self::from_series(rows, column_names))
            }
            Value::Object(_) => {
                let parsed = ParsedConfig::parse(config)?;
                DataFrameConfig::from_rows(parsed.series)
                    .column_names(parsed.column_names)
                    .build()
            }
            other => Err(Error::invalid_argument(
                "config",
                format!("expected an array or an object, got {}", json_kind(&other)),
            )),
        }
    }
}

impl<'a, I: Element, R: Element> IntoIterator for &'a DataFrame<I, R> {
    type Item = R;
    type IntoIter = Pass<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<I, R> fmt::Debug for DataFrame<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFrame")
            .field("column_names", &self.column_names)
            .field("rows", &self.rows)
            .finish()
    }
}
