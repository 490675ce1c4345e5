//! Construction configuration for series and data frames
//!
//! There are three ways to build a series: a bare list of values, a
//! configuration supplying any subset of `values`, `index` and `pairs`, or a
//! list of pairs. [`SeriesSource`] names them. Missing streams are derived
//! from the ones present:
//!
//! - pairs missing: `PairZip(index, values)`
//! - index missing: slot 0 of the pairs if given, else 0, 1, 2, ...
//! - values missing: slot 1 of the pairs if given, else empty
//!
//! An index or value stream supplied next to the pairs must agree with them
//! in length. When that cannot be told without a pass, the three streams are
//! walked in lockstep instead.
//!
//! The JSON entry points accept the same shape as a dynamically-typed
//! document and check field types at runtime.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::record::infer_column_names;
use crate::series::Series;
use crate::source::{
    self, CountingSequence, Element, IntoSequence, MaterializedSequence, Ordinal,
    RestartableSequence, SeqRef,
};
use crate::transform::ProjectionSequence;
use crate::zip::{keys_of, values_of, zip, ElementExtractSequence};

fn positions<I: Ordinal>() -> SeqRef<I> {
    Arc::new(CountingSequence::<I>::new())
}

/// Builder for a [`Series`] from any subset of its three streams
pub struct SeriesConfig<I, V> {
    values: Option<SeqRef<V>>,
    index: Option<SeqRef<I>>,
    pairs: Option<SeqRef<(I, V)>>,
    baked: bool,
    default_index: Option<fn() -> SeqRef<I>>,
}

impl<I: Ordinal, V: Element> SeriesConfig<I, V> {
    /// Start a configuration whose index defaults to 0, 1, 2, ...
    pub fn new() -> Self {
        Self {
            default_index: Some(positions::<I>),
            ..Self::keyed()
        }
    }
}

impl<I: Ordinal, V: Element> Default for SeriesConfig<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Element, V: Element> SeriesConfig<I, V> {
    /// Start a configuration with no default index
    ///
    /// Building it requires `index` or `pairs`.
    pub fn keyed() -> Self {
        Self {
            values: None,
            index: None,
            pairs: None,
            baked: false,
            default_index: None,
        }
    }

    /// Set the value stream
    #[must_use]
    pub fn values(mut self, values: impl IntoSequence<V>) -> Self {
        self.values = Some(values.into_sequence());
        self
    }

    /// Set the index stream
    #[must_use]
    pub fn index(mut self, index: impl IntoSequence<I>) -> Self {
        self.index = Some(index.into_sequence());
        self
    }

    /// Set the pairs stream
    #[must_use]
    pub fn pairs(mut self, pairs: impl IntoSequence<(I, V)>) -> Self {
        self.pairs = Some(pairs.into_sequence());
        self
    }

    /// Materialize the streams as soon as the series is built
    #[must_use]
    pub fn baked(mut self, baked: bool) -> Self {
        self.baked = baked;
        self
    }

    /// Build the series, deriving whatever streams were not supplied
    pub fn build(self) -> Result<Series<I, V>> {
        let series = match self.pairs {
            Some(pairs) => {
                source::ensure_bounded(&*pairs, "pairs")?;
                let index_supplied = self.index.is_some();
                let values_supplied = self.values.is_some();
                let mut unchecked = false;
                let index = match self.index {
                    Some(index) => {
                        unchecked |= !matches_pairs(&*index, &*pairs, "index")?;
                        index
                    }
                    None => keys_of(Arc::clone(&pairs)),
                };
                let values = match self.values {
                    Some(values) => {
                        unchecked |= !matches_pairs(&*values, &*pairs, "values")?;
                        values
                    }
                    None => values_of(Arc::clone(&pairs)),
                };
                debug!(index_supplied, values_supplied, unchecked, "series from pairs");
                if unchecked {
                    in_lockstep(pairs, index, values)
                } else {
                    Series::from_parts(index, values, pairs, false)
                }
            }
            None => {
                let index_supplied = self.index.is_some();
                let index = match (self.index, self.default_index) {
                    (Some(index), _) => index,
                    (None, Some(default_index)) => default_index(),
                    (None, None) => {
                        return Err(Error::invalid_argument(
                            "index",
                            "required when neither index nor pairs are supplied",
                        ))
                    }
                };
                let values_supplied = self.values.is_some();
                let values = self
                    .values
                    .unwrap_or_else(|| Arc::new(MaterializedSequence::empty()));
                if !index.is_bounded() {
                    source::ensure_bounded(&*values, "values")?;
                }
                debug!(index_supplied, values_supplied, "series from index and values");
                Series::aligned(index, values)
            }
        };
        Ok(if self.baked { series.bake() } else { series })
    }
}

/// Compare a supplied index or value stream with the pairs
///
/// `Ok(true)` when both lengths are known and equal, `Ok(false)` when either
/// length is unknown until a pass runs.
fn matches_pairs<T, P>(
    seq: &dyn RestartableSequence<T>,
    pairs: &dyn RestartableSequence<P>,
    field: &str,
) -> Result<bool> {
    match (seq.len_hint(), pairs.len_hint()) {
        (Some(len), Some(expected)) if len != expected => Err(Error::invalid_argument(
            field,
            format!("has {len} elements but pairs has {expected}"),
        )),
        (Some(_), Some(_)) => Ok(true),
        _ => Ok(false),
    }
}

/// Walk pairs, index and values together so every stream stops at the
/// shortest of the three
fn in_lockstep<I: Element, V: Element>(
    pairs: SeqRef<(I, V)>,
    index: SeqRef<I>,
    values: SeqRef<V>,
) -> Series<I, V> {
    let rows: SeqRef<((I, V), I, V)> = Arc::new(ProjectionSequence::new(
        zip(zip(pairs, index), values),
        |((pair, key), value)| (pair, key, value),
    ));
    Series::from_parts(
        Arc::new(ElementExtractSequence::<_, 1>::new(Arc::clone(&rows))),
        Arc::new(ElementExtractSequence::<_, 2>::new(Arc::clone(&rows))),
        Arc::new(ElementExtractSequence::<_, 0>::new(rows)),
        false,
    )
}

/// The three ways to construct a series
pub enum SeriesSource<I, V> {
    /// A bare list of values, keyed by whatever `keys` generates
    Values {
        /// The values
        values: Vec<V>,
        /// Generator for the key stream; the zip cuts it to the values
        keys: fn() -> SeqRef<I>,
    },
    /// Any subset of values, index and pairs
    Config(SeriesConfig<I, V>),
    /// A list of (index, value) pairs
    Pairs(Vec<(I, V)>),
}

impl<I: Ordinal, V> SeriesSource<I, V> {
    /// A bare list of values keyed 0, 1, 2, ...
    pub fn values(values: Vec<V>) -> Self {
        Self::Values {
            values,
            keys: positions::<I>,
        }
    }
}

impl<I, V> From<SeriesConfig<I, V>> for SeriesSource<I, V> {
    fn from(config: SeriesConfig<I, V>) -> Self {
        Self::Config(config)
    }
}

impl<I: Ordinal, V> From<Vec<V>> for SeriesSource<I, V> {
    fn from(values: Vec<V>) -> Self {
        Self::values(values)
    }
}

impl<I: Element, V: Element> Series<I, V> {
    /// Construct from whichever source variant applies
    pub fn from_source(source: impl Into<SeriesSource<I, V>>) -> Result<Self> {
        match source.into() {
            SeriesSource::Values { values, keys } => {
                debug!(len = values.len(), "series from values");
                Ok(Series::aligned(keys(), values.into_sequence()))
            }
            SeriesSource::Config(config) => config.build(),
            SeriesSource::Pairs(pairs) => {
                debug!(len = pairs.len(), "series from pairs list");
                Ok(Series::from_pairs(pairs))
            }
        }
    }
}

impl<I: Element, V: Element> Series<I, V> {
    /// Construct from a configuration
    pub fn from_config(config: SeriesConfig<I, V>) -> Result<Self> {
        config.build()
    }
}

impl Series<Value, Value> {
    /// Construct from a JSON array of values or a configuration object
    ///
    /// A configuration field holding something other than an array fails
    /// with [`Error::InvalidArgument`] naming the field.
    pub fn from_json(config: Value) -> Result<Self> {
        match config {
            Value::Array(values) => Series::from_source(SeriesSource::values(values)),
            Value::Object(_) => {
                ParsedConfig::parse(config)?.series.build()
            }
            other => Err(Error::invalid_argument(
                "config",
                format!("expected an array or an object, got {}", json_kind(&other)),
            )),
        }
    }
}

/// Builder for a [`DataFrame`]
pub struct DataFrameConfig<I, R> {
    rows: SeriesConfig<I, R>,
    column_names: Option<Vec<String>>,
}

impl<I: Ordinal, R: Element> DataFrameConfig<I, R> {
    /// Start a configuration whose index defaults to 0, 1, 2, ...
    pub fn new() -> Self {
        Self {
            rows: SeriesConfig::new(),
            column_names: None,
        }
    }
}

impl<I: Ordinal, R: Element> Default for DataFrameConfig<I, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Element, R: Element> DataFrameConfig<I, R> {
    /// Start a configuration with no default index
    pub fn keyed() -> Self {
        Self {
            rows: SeriesConfig::keyed(),
            column_names: None,
        }
    }

    pub(crate) fn from_rows(rows: SeriesConfig<I, R>) -> Self {
        Self {
            rows,
            column_names: None,
        }
    }

    /// Set the row stream
    #[must_use]
    pub fn values(mut self, rows: impl IntoSequence<R>) -> Self {
        self.rows = self.rows.values(rows);
        self
    }

    /// Set the index stream
    #[must_use]
    pub fn index(mut self, index: impl IntoSequence<I>) -> Self {
        self.rows = self.rows.index(index);
        self
    }

    /// Set the pairs stream
    #[must_use]
    pub fn pairs(mut self, pairs: impl IntoSequence<(I, R)>) -> Self {
        self.rows = self.rows.pairs(pairs);
        self
    }

    /// Set the column names
    #[must_use]
    pub fn column_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Materialize the rows as soon as the frame is built
    #[must_use]
    pub fn baked(mut self, baked: bool) -> Self {
        self.rows = self.rows.baked(baked);
        self
    }

    /// Build the data frame
    pub fn build(self) -> Result<DataFrame<I, R>> {
        let rows = self.rows.build()?;
        Ok(DataFrame::from_series(
            rows,
            self.column_names.unwrap_or_default(),
        ))
    }
}

/// Keys a JSON configuration object may carry
const JSON_KEYS: [&str; 6] = [
    "values",
    "index",
    "pairs",
    "columnNames",
    "column_names",
    "baked",
];

/// A configuration object as it appears in JSON
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonConfig {
    values: Option<Value>,
    index: Option<Value>,
    pairs: Option<Value>,
    #[serde(alias = "column_names")]
    column_names: Option<Value>,
    baked: Option<Value>,
}

/// A type-checked JSON configuration
pub(crate) struct ParsedConfig {
    pub(crate) series: SeriesConfig<Value, Value>,
    /// `columnNames` if given, else the field names of the supplied rows
    pub(crate) column_names: Vec<String>,
}

impl ParsedConfig {
    /// Decode and type-check a configuration object
    pub(crate) fn parse(config: Value) -> Result<Self> {
        if let Some(key) = config
            .as_object()
            .and_then(|fields| fields.keys().find(|key| !JSON_KEYS.contains(&key.as_str())))
        {
            return Err(Error::invalid_argument(
                key.as_str(),
                "unrecognized configuration key",
            ));
        }
        let parsed: JsonConfig = serde_json::from_value(config)?;
        let values = json_array(parsed.values, "values")?;
        let index = json_array(parsed.index, "index")?;
        let pairs = json_array(parsed.pairs, "pairs")?
            .map(json_pairs)
            .transpose()?;
        let explicit_names = json_strings(parsed.column_names, "columnNames")?;
        let baked = json_bool(parsed.baked, "baked")?;

        let column_names = match (explicit_names, &values, &pairs) {
            (Some(names), _, _) => names,
            (None, Some(rows), _) => infer_column_names(rows),
            (None, None, Some(pairs)) => infer_column_names(pairs.iter().map(|(_, row)| row)),
            (None, None, None) => Vec::new(),
        };

        let mut series = SeriesConfig::new();
        if let Some(values) = values {
            series = series.values(values);
        }
        if let Some(index) = index {
            series = series.index(index);
        }
        if let Some(pairs) = pairs {
            series = series.pairs(pairs);
        }
        Ok(Self {
            series: series.baked(baked),
            column_names,
        })
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn json_array(value: Option<Value>, field: &str) -> Result<Option<Vec<Value>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(Error::invalid_argument(
            field,
            format!("expected an array, got {}", json_kind(&other)),
        )),
    }
}

fn json_pairs(items: Vec<Value>) -> Result<Vec<(Value, Value)>> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let malformed = || {
                Error::invalid_argument(
                    "pairs",
                    format!("element {position} is not an [index, value] pair"),
                )
            };
            match item {
                Value::Array(pair) => match <[Value; 2]>::try_from(pair) {
                    Ok([key, value]) => Ok((key, value)),
                    Err(_) => Err(malformed()),
                },
                _ => Err(malformed()),
            }
        })
        .collect()
}

fn json_strings(value: Option<Value>, field: &str) -> Result<Option<Vec<String>>> {
    let Some(items) = json_array(value, field)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            other => Err(Error::invalid_argument(
                field,
                format!("expected strings, got {}", json_kind(&other)),
            )),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn json_bool(value: Option<Value>, field: &str) -> Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(other) => Err(Error::invalid_argument(
            field,
            format!("expected a boolean, got {}", json_kind(&other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::transform::FilterSequence;

    #[test]
    fn values_and_index_are_zipped() {
        let series = SeriesConfig::keyed()
            .values(vec![1, 2, 3])
            .index(vec!["a", "b", "c"])
            .build()
            .unwrap();
        assert_eq!(series.to_pairs(), vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn pairs_only_derives_index_and_values() {
        let series = SeriesConfig::keyed()
            .pairs(vec![("x", 1), ("y", 2)])
            .build()
            .unwrap();
        assert_eq!(series.get_index().to_vec(), vec!["x", "y"]);
        assert_eq!(series.to_vec(), vec![1, 2]);
    }

    #[test]
    fn missing_index_counts_positions() {
        let series = SeriesConfig::<usize, _>::new()
            .values(vec!['p', 'q'])
            .build()
            .unwrap();
        assert_eq!(series.to_pairs(), vec![(0, 'p'), (1, 'q')]);
    }

    #[test]
    fn empty_configuration_is_empty() {
        let series = SeriesConfig::<usize, i32>::new().build().unwrap();
        assert!(series.is_empty());
        assert!(series.get_index().is_empty());
    }

    #[test]
    fn keyed_configuration_needs_index_or_pairs() {
        let err = SeriesConfig::<String, i32>::keyed()
            .values(vec![1])
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("index"));
    }

    #[test]
    fn baked_flag_materializes() {
        let series = SeriesConfig::<usize, _>::new()
            .values(vec![1, 2])
            .baked(true)
            .build()
            .unwrap();
        assert!(series.is_baked());
        assert_eq!(series.to_vec(), vec![1, 2]);
    }

    #[test]
    fn unbounded_values_are_rejected() {
        let err = SeriesConfig::<usize, usize>::new()
            .values(CountingSequence::new())
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("values"));
    }

    #[test]
    fn unbounded_values_are_truncated_by_index() {
        let series = SeriesConfig::keyed()
            .index(vec!["a", "b"])
            .values(CountingSequence::<u64>::new())
            .build()
            .unwrap();
        assert_eq!(series.to_vec(), vec![0, 1]);
        assert_eq!(series.to_pairs(), vec![("a", 0), ("b", 1)]);
    }

    #[test]
    fn index_disagreeing_with_pairs_is_rejected() {
        let err = SeriesConfig::keyed()
            .pairs(vec![("x", 1), ("y", 2)])
            .index(vec!["x"])
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("index"));
    }

    #[test_case(vec![1, 2, 3], 2 ; "values outrun pairs")]
    #[test_case(vec![1], 1 ; "values fall short of pairs")]
    fn values_of_unknown_length_stay_in_step_with_pairs(values: Vec<i32>, expected: usize) {
        let filtered: SeqRef<i32> =
            Arc::new(FilterSequence::new(values.into_sequence(), |_: &i32| true));
        let series = SeriesConfig::keyed()
            .pairs(vec![("a", 1), ("b", 2)])
            .values(filtered)
            .build()
            .unwrap();
        assert_eq!(series.to_vec().len(), expected);
        assert_eq!(series.get_index().to_vec().len(), expected);
        assert_eq!(series.to_pairs().len(), expected);
        assert_eq!(series.bake().to_pairs().len(), expected);
    }

    #[test]
    fn index_of_unknown_length_is_cut_to_pairs() {
        let keys: SeqRef<&str> = Arc::new(FilterSequence::new(
            vec!["p", "q", "r"].into_sequence(),
            |key: &&str| *key != "q",
        ));
        let series = SeriesConfig::keyed()
            .pairs(vec![("a", 1), ("b", 2), ("c", 3)])
            .index(keys)
            .build()
            .unwrap();
        assert_eq!(series.get_index().to_vec(), vec!["p", "r"]);
        assert_eq!(series.to_vec(), vec![1, 2]);
        assert_eq!(series.to_pairs(), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn source_variants_with_non_numeric_keys() {
        let from_pairs =
            Series::<&str, i32>::from_source(SeriesSource::Pairs(vec![("a", 1)])).unwrap();
        assert_eq!(from_pairs.to_pairs(), vec![("a", 1)]);

        let from_config = Series::<String, i32>::from_source(
            SeriesConfig::keyed().index(vec!["k".to_string()]).values(vec![5]),
        )
        .unwrap();
        assert_eq!(from_config.to_pairs(), vec![("k".to_string(), 5)]);

        let source: SeriesSource<char, i32> = SeriesSource::Values {
            values: vec![1, 2, 3],
            keys: || vec!['x', 'y'].into_sequence(),
        };
        let from_values = Series::from_source(source).unwrap();
        assert_eq!(from_values.to_pairs(), vec![('x', 1), ('y', 2)]);
    }

    #[test]
    fn source_variants() {
        let from_values = Series::<usize, i32>::from_source(vec![7, 8]).unwrap();
        assert_eq!(from_values.to_pairs(), vec![(0, 7), (1, 8)]);

        let from_pairs =
            Series::<i64, char>::from_source(SeriesSource::Pairs(vec![(10, 'a')])).unwrap();
        assert_eq!(from_pairs.get_index().to_vec(), vec![10]);

        let from_config =
            Series::<u32, bool>::from_source(SeriesConfig::new().values(vec![true])).unwrap();
        assert_eq!(from_config.to_pairs(), vec![(0, true)]);
    }

    #[test]
    fn json_array_is_values() {
        let series = Series::from_json(json!([10, 20, 30])).unwrap();
        assert_eq!(
            series.to_pairs(),
            vec![(json!(0), json!(10)), (json!(1), json!(20)), (json!(2), json!(30))]
        );
    }

    #[test]
    fn json_values_and_index() {
        let series =
            Series::from_json(json!({"values": [1, 2, 3], "index": ["a", "b", "c"]})).unwrap();
        assert_eq!(
            series.to_pairs(),
            vec![(json!("a"), json!(1)), (json!("b"), json!(2)), (json!("c"), json!(3))]
        );
    }

    #[test]
    fn json_pairs() {
        let series = Series::from_json(json!({"pairs": [["x", 1], ["y", 2]]})).unwrap();
        assert_eq!(series.get_index().to_vec(), vec![json!("x"), json!("y")]);
    }

    #[test_case(json!({"values": 42}), "values" ; "scalar values")]
    #[test_case(json!({"index": "abc"}), "index" ; "string index")]
    #[test_case(json!({"pairs": {"x": 1}}), "pairs" ; "object pairs")]
    #[test_case(json!({"pairs": [["x", 1, 2]]}), "pairs" ; "triple in pairs")]
    #[test_case(json!({"baked": "yes"}), "baked" ; "non boolean baked")]
    #[test_case(json!({"columnNames": [1]}), "columnNames" ; "numeric column name")]
    #[test_case(json!(42), "config" ; "scalar config")]
    fn json_field_errors_name_the_field(config: Value, field: &str) {
        let err = Series::from_json(config).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn json_unknown_key_is_named() {
        let err = Series::from_json(json!({"values": [1, 2], "comment": "x"})).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert_eq!(err.field(), Some("comment"));
    }

    #[test]
    fn json_snake_case_column_names_are_accepted() {
        let parsed = ParsedConfig::parse(json!({"values": [], "column_names": ["a"]})).unwrap();
        assert_eq!(parsed.column_names, vec!["a"]);
    }
}
