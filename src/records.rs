//! Schema-checked record storage.
//!
//! A [`RecordSet`] is an ordered, immutable batch of samples. Insertion
//! order is temporal order. Every record shares one [`Schema`], fixed when
//! the set is built, so field presence is known up front and typed lookups
//! resolve column indices once per set instead of once per access.

use crate::Point3;
use crate::error::{FieldError, OptionExt, ParseError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric value, if this cell is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Which 3D field of a record a stage reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointSource {
    /// Tracked position of the user.
    #[default]
    Position,
    /// Gaze (dwell) point.
    Gaze,
}

/// Column names for the two 3D fields the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldMap {
    /// Position columns, x/y/z. Default: `xpos`, `ypos`, `zpos`
    pub position: [String; 3],
    /// Gaze columns, x/y/z. Default: `EtPositionX`, `EtPositionY`, `EtPositionZ`
    pub gaze: [String; 3],
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            position: ["xpos".into(), "ypos".into(), "zpos".into()],
            gaze: [
                "EtPositionX".into(),
                "EtPositionY".into(),
                "EtPositionZ".into(),
            ],
        }
    }
}

impl FieldMap {
    pub fn columns(&self, source: PointSource) -> &[String; 3] {
        match source {
            PointSource::Position => &self.position,
            PointSource::Gaze => &self.gaze,
        }
    }
}

/// Column layout shared by every record of a set.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    fields: FieldMap,
}

impl Schema {
    /// Create a schema from header names. Later duplicates shadow earlier ones.
    pub fn new(columns: Vec<String>, fields: FieldMap) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            index,
            fields,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn field_map(&self) -> &FieldMap {
        &self.fields
    }

    /// Resolve the x/y/z column indices for a point source.
    pub fn point_indices(&self, source: PointSource) -> Result<[usize; 3], FieldError> {
        let [x, y, z] = self.fields.columns(source);
        Ok([
            self.index_of(x).ok_or_missing_field(x)?,
            self.index_of(y).ok_or_missing_field(y)?,
            self.index_of(z).ok_or_missing_field(z)?,
        ])
    }
}

/// One captured sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<FieldValue>,
}

impl Record {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, idx: usize) -> Option<&FieldValue> {
        self.values.get(idx)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered, immutable collection of records.
///
/// Cloning and culling share the underlying records.
#[derive(Debug, Clone)]
pub struct RecordSet {
    schema: Arc<Schema>,
    records: Vec<Arc<Record>>,
}

impl RecordSet {
    /// Build a set, checking every record against the schema width.
    ///
    /// Line numbers in errors count the header as line 1.
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self, ParseError> {
        for (i, record) in records.iter().enumerate() {
            if record.len() != schema.len() {
                return Err(ParseError::FieldCountMismatch {
                    line: i as u64 + 2,
                    expected: schema.len(),
                    found: record.len(),
                });
            }
        }
        Ok(Self {
            schema: Arc::new(schema),
            records: records.into_iter().map(Arc::new).collect(),
        })
    }

    /// Build a set where each sample's position and gaze point coincide.
    pub fn from_points(points: &[Point3]) -> Self {
        let samples: Vec<(Point3, Point3)> = points.iter().map(|p| (*p, *p)).collect();
        Self::from_samples(&samples)
    }

    /// Build a set from `(position, gaze)` pairs using the default field map.
    pub fn from_samples(samples: &[(Point3, Point3)]) -> Self {
        let fields = FieldMap::default();
        let columns: Vec<String> = fields
            .position
            .iter()
            .chain(fields.gaze.iter())
            .cloned()
            .collect();
        let records = samples
            .iter()
            .map(|(pos, gaze)| {
                Arc::new(Record::new(
                    [pos.x, pos.y, pos.z, gaze.x, gaze.y, gaze.z]
                        .into_iter()
                        .map(FieldValue::Number)
                        .collect(),
                ))
            })
            .collect();
        Self {
            schema: Arc::new(Schema::new(columns, fields)),
            records,
        }
    }

    /// A new set over a selection of this set's records, sharing the schema.
    pub(crate) fn with_records(&self, records: Vec<Arc<Record>>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records,
        }
    }

    pub(crate) fn shared_records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx).map(|r| r.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().map(|r| r.as_ref())
    }

    /// Look up a field by column name.
    pub fn field<'a>(&self, record: &'a Record, name: &str) -> Result<&'a FieldValue, FieldError> {
        let idx = self.schema.index_of(name).ok_or_missing_field(name)?;
        record.get(idx).ok_or_missing_field(name)
    }

    /// Look up a numeric field by column name. Text is never coerced.
    pub fn number(&self, record: &Record, name: &str) -> Result<f64, FieldError> {
        let value = self.field(record, name)?;
        value.as_f64().ok_or_else(|| FieldError::NotNumeric {
            field: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn position(&self, record: &Record) -> Result<Point3, FieldError> {
        self.point(record, PointSource::Position)
    }

    pub fn gaze_position(&self, record: &Record) -> Result<Point3, FieldError> {
        self.point(record, PointSource::Gaze)
    }

    pub fn point(&self, record: &Record, source: PointSource) -> Result<Point3, FieldError> {
        let indices = self.schema.point_indices(source)?;
        self.point_at(record, source, indices)
    }

    /// Extract one 3D point per record, in order.
    pub fn points(&self, source: PointSource) -> Result<Vec<Point3>, FieldError> {
        let indices = self.schema.point_indices(source)?;
        self.records
            .iter()
            .map(|r| self.point_at(r, source, indices))
            .collect()
    }

    fn point_at(
        &self,
        record: &Record,
        source: PointSource,
        indices: [usize; 3],
    ) -> Result<Point3, FieldError> {
        let names = self.schema.field_map().columns(source);
        let mut coords = [0.0; 3];
        for axis in 0..3 {
            let name = &names[axis];
            let value = record.get(indices[axis]).ok_or_missing_field(name)?;
            coords[axis] = value.as_f64().ok_or_else(|| FieldError::NotNumeric {
                field: name.clone(),
                value: value.to_string(),
            })?;
        }
        Ok(Point3::new(coords[0], coords[1], coords[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_columns_resolve_to_last() {
        let schema = Schema::new(
            vec!["a".into(), "b".into(), "a".into()],
            FieldMap::default(),
        );
        assert_eq!(schema.index_of("a"), Some(2));
        assert_eq!(schema.index_of("b"), Some(1));
        assert_eq!(schema.index_of("c"), None);
    }

    #[test]
    fn test_with_records_shares_schema() {
        let set = RecordSet::from_points(&[Point3::new(1.0, 2.0, 3.0)]);
        let copy = set.with_records(set.shared_records().to_vec());
        assert!(Arc::ptr_eq(&set.schema, &copy.schema));
        assert!(Arc::ptr_eq(&set.records[0], &copy.records[0]));
    }
}
