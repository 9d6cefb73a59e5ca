//! Column-oriented tables: a single-file [`Frame`] and the unified [`Dataset`].

use indexmap::IndexMap;
use riskscore_core::FieldValue;

/// Name under which rules and exports see each row's originating file.
pub const SOURCE_FILE_COLUMN: &str = "__source_file";

/// Typed columns read from one CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub columns: IndexMap<String, Vec<FieldValue>>,
    pub rows: usize,
}

impl Frame {
    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Unified table over every loaded file.
///
/// The schema is the union of all file schemas in first-seen order; rows of a
/// file lacking a column hold `Null` there. Each row remembers the file it
/// came from, readable as the text column [`SOURCE_FILE_COLUMN`]. A file
/// column of that name is replaced by the provenance. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: IndexMap<String, Vec<FieldValue>>,
    source_file: Vec<String>,
    source_column: Vec<FieldValue>,
}

impl Dataset {
    /// Build a dataset directly from columns, every row tagged with `source`.
    ///
    /// All columns must have the same length.
    pub fn from_columns(columns: Vec<(&str, Vec<FieldValue>)>, source: &str) -> Self {
        let frame = Frame {
            rows: columns.first().map(|(_, v)| v.len()).unwrap_or(0),
            columns: columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect(),
        };
        Self::concat(vec![(source.to_string(), frame)])
    }

    /// Concatenate frames with column-union (outer) semantics.
    pub fn concat(frames: Vec<(String, Frame)>) -> Self {
        let total: usize = frames.iter().map(|(_, f)| f.rows).sum();

        let mut columns: IndexMap<String, Vec<FieldValue>> = IndexMap::new();
        for (_, frame) in &frames {
            for name in frame.columns.keys() {
                if name != SOURCE_FILE_COLUMN && !columns.contains_key(name) {
                    columns.insert(name.clone(), Vec::with_capacity(total));
                }
            }
        }

        let mut source_file = Vec::with_capacity(total);
        for (source, mut frame) in frames {
            for (name, values) in columns.iter_mut() {
                match frame.columns.swap_remove(name) {
                    Some(mut own) => values.append(&mut own),
                    None => values.extend(std::iter::repeat(FieldValue::Null).take(frame.rows)),
                }
            }
            source_file.extend(std::iter::repeat(source).take(frame.rows));
        }

        let source_column = source_file
            .iter()
            .map(|s| FieldValue::Text(s.clone()))
            .collect();
        Self {
            columns,
            source_file,
            source_column,
        }
    }

    pub fn len(&self) -> usize {
        self.source_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_file.is_empty()
    }

    /// Column by name. [`SOURCE_FILE_COLUMN`] resolves to the provenance.
    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        if name == SOURCE_FILE_COLUMN {
            return Some(&self.source_column);
        }
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == SOURCE_FILE_COLUMN || self.columns.contains_key(name)
    }

    /// Data columns only; provenance is not listed.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[FieldValue])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Originating file name for every row.
    pub fn source_files(&self) -> &[String] {
        &self.source_file
    }
}
