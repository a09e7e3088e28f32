//! N-dimensional cartesian product over named axes.
use serde_json::Value;
use vmatrix_core::{Matrix, MatrixError, MatrixResult, MatrixRow};

/// Ordered collection of named axes, each with its own values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    axes: Vec<(String, Vec<Value>)>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a list-valued axis, replacing an existing axis of the same name.
    pub fn axis(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        let name = name.into();
        match self.axes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.axes.push((name, values)),
        }
        self
    }

    /// Add a single-valued axis.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.axis(name, vec![value.into()])
    }

    /// Append every axis of `other`, later axes winning on name clashes.
    pub fn merge(self, other: &Axes) -> Self {
        other
            .axes
            .iter()
            .fold(self, |acc, (name, values)| acc.axis(name.clone(), values.clone()))
    }

    /// Copy without the axes named in `names`.
    pub fn without(&self, names: &[&str]) -> Self {
        Self {
            axes: self
                .axes
                .iter()
                .filter(|(name, _)| !names.contains(&name.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Parse caller-supplied axes from a JSON object.
    ///
    /// Arrays become list axes, any other value a single-valued axis.
    pub fn from_json(value: &Value) -> MatrixResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            MatrixError::Config(format!("extra matrix axes must be a JSON object, got {}", value))
        })?;

        Ok(object.iter().fold(Self::new(), |axes, (name, value)| match value {
            Value::Array(values) => axes.axis(name.clone(), values.clone()),
            scalar => axes.value(name.clone(), scalar.clone()),
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.axes.iter().map(|(name, _)| name.as_str())
    }
}

/// Every combination of one value per axis, last axis varying fastest.
///
/// No axes yields a single empty row; an axis without values yields no rows.
pub fn cartesian_product(axes: &Axes) -> Matrix {
    let rows = axes.axes.iter().fold(vec![MatrixRow::new()], |rows, (name, values)| {
        rows.iter()
            .flat_map(|row| {
                values.iter().map(move |value| {
                    let mut next = row.clone();
                    next.insert(name.clone(), value.clone());
                    next
                })
            })
            .collect()
    });
    Matrix::from_rows(rows)
}

/// Drop rows structurally equal to an earlier row, keeping first occurrences.
pub fn deduplicate(rows: impl IntoIterator<Item = MatrixRow>) -> Matrix {
    let mut unique: Vec<MatrixRow> = Vec::new();
    for row in rows {
        if !unique.contains(&row) {
            unique.push(row);
        }
    }
    Matrix::from_rows(unique)
}

/// Keep only rows satisfying `predicate`.
pub fn filter<F>(matrix: Matrix, predicate: F) -> Matrix
where
    F: Fn(&MatrixRow) -> bool,
{
    matrix.into_iter().filter(|row| predicate(row)).collect()
}
