//! Text-table rendering for series and data frames

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::dataframe::DataFrame;
use crate::record::Record;
use crate::series::Series;
use crate::source::Element;

/// Options for rendering a series or frame as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Maximum number of rows rendered before the table is cut short
    pub max_rows: usize,

    /// Header of the index column
    pub index_header: String,

    /// Header of the value column of a series
    pub value_header: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_rows: 20,
            index_header: "__index__".to_string(),
            value_header: "__value__".to_string(),
        }
    }
}

/// Collected cells of a table about to be rendered
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    omitted: usize,
}

impl Table {
    /// Pull at most `max_rows` rows from `pairs`, counting the remainder
    fn gather<T, F>(
        headers: Vec<String>,
        pairs: impl Iterator<Item = T>,
        max_rows: usize,
        cells: F,
    ) -> Self
    where
        F: Fn(T) -> Vec<String>,
    {
        let mut rows = Vec::new();
        let mut omitted = 0;
        for pair in pairs {
            if rows.len() < max_rows {
                rows.push(cells(pair));
            } else {
                omitted += 1;
            }
        }
        Self {
            headers,
            rows,
            omitted,
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        if self.omitted > 0 {
            write!(f, "... {} more rows", self.omitted)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

/// Borrowed series paired with rendering options
pub struct SeriesDisplay<'a, I, V> {
    series: &'a Series<I, V>,
    options: &'a FormatOptions,
}

impl<I: Element + Display, V: Element + Display> Display for SeriesDisplay<'_, I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = vec![
            self.options.index_header.clone(),
            self.options.value_header.clone(),
        ];
        Table::gather(
            headers,
            self.series.iter_pairs(),
            self.options.max_rows,
            |(key, value)| vec![key.to_string(), value.to_string()],
        )
        .render(f)
    }
}

impl<I: Element, V: Element> Series<I, V> {
    /// Render with explicit options
    pub fn display<'a>(&'a self, options: &'a FormatOptions) -> SeriesDisplay<'a, I, V> {
        SeriesDisplay {
            series: self,
            options,
        }
    }
}

impl<I: Element + Display, V: Element + Display> Display for Series<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(&FormatOptions::default()).fmt(f)
    }
}

/// Borrowed frame paired with rendering options
pub struct DataFrameDisplay<'a, I, R> {
    frame: &'a DataFrame<I, R>,
    options: &'a FormatOptions,
}

impl<I, R> Display for DataFrameDisplay<'_, I, R>
where
    I: Element + Display,
    R: Element + Record,
    R::Value: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.frame.column_names();
        let headers = std::iter::once(self.options.index_header.clone())
            .chain(columns.iter().cloned())
            .collect();
        Table::gather(
            headers,
            self.frame.iter_pairs(),
            self.options.max_rows,
            |(key, row)| {
                std::iter::once(key.to_string())
                    .chain(columns.iter().map(|name| {
                        row.field(name)
                            .map(|value| value.to_string())
                            .unwrap_or_default()
                    }))
                    .collect()
            },
        )
        .render(f)
    }
}

impl<I: Element, R: Element> DataFrame<I, R> {
    /// Render with explicit options
    pub fn display<'a>(&'a self, options: &'a FormatOptions) -> DataFrameDisplay<'a, I, R> {
        DataFrameDisplay {
            frame: self,
            options,
        }
    }
}

impl<I, R> Display for DataFrame<I, R>
where
    I: Element + Display,
    R: Element + Record,
    R::Value: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(&FormatOptions::default()).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn series_table() {
        let series = Series::new(vec![10, 200]);
        let expected = "\
__index__  __value__
---------  ---------
0          10
1          200
";
        assert_eq!(series.to_string(), expected);
    }

    #[test]
    fn series_table_is_cut_short() {
        let options = FormatOptions {
            max_rows: 2,
            ..FormatOptions::default()
        };
        let rendered = Series::new(vec![1, 2, 3, 4]).display(&options).to_string();
        assert!(rendered.ends_with("... 2 more rows"));
        assert_eq!(rendered.lines().count(), 5);
    }

    #[test]
    fn frame_table_uses_column_names() {
        let frame = DataFrame::from_records(vec![json!({"a": 1, "b": 2}), json!({"a": 3})]);
        let options = FormatOptions {
            index_header: "#".to_string(),
            ..FormatOptions::default()
        };
        let expected = "\
#  a  b
-  -  -
0  1  2
1  3
";
        assert_eq!(frame.display(&options).to_string(), expected);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: FormatOptions = serde_json::from_value(json!({"max_rows": 5})).unwrap();
        assert_eq!(options.max_rows, 5);
        assert_eq!(options.index_header, "__index__");
    }
}
