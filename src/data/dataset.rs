use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NnError, Result};
use crate::loss::Task;
use crate::math::rng::Mulberry32;

const LINEAR_POINTS: usize = 140;
const LOGIC_POINTS: usize = 180;

/// Identifier of one of the built-in synthetic datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetId {
    Linear,
    Xor,
    And,
    Or,
}

/// Static description of a dataset, independent of any sampled points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetDefinition {
    pub id: DatasetId,
    pub name: &'static str,
    pub task: Task,
    pub input_size: usize,
    pub output_size: usize,
    pub description: &'static str,
}

pub static DATASET_OPTIONS: [DatasetDefinition; 4] = [
    DatasetDefinition {
        id: DatasetId::Linear,
        name: "Linear Regression",
        task: Task::Regression,
        input_size: 1,
        output_size: 1,
        description: "y = 2x + 1 + noise",
    },
    DatasetDefinition {
        id: DatasetId::Xor,
        name: "XOR Classification",
        task: Task::Classification,
        input_size: 2,
        output_size: 1,
        description: "Nonlinear binary pattern",
    },
    DatasetDefinition {
        id: DatasetId::And,
        name: "AND Classification",
        task: Task::Classification,
        input_size: 2,
        output_size: 1,
        description: "Logical AND over two inputs",
    },
    DatasetDefinition {
        id: DatasetId::Or,
        name: "OR Classification",
        task: Task::Classification,
        input_size: 2,
        output_size: 1,
        description: "Logical OR over two inputs",
    },
];

impl DatasetId {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetId::Linear => "linear",
            DatasetId::Xor => "xor",
            DatasetId::And => "and",
            DatasetId::Or => "or",
        }
    }

    pub fn definition(&self) -> &'static DatasetDefinition {
        match self {
            DatasetId::Linear => &DATASET_OPTIONS[0],
            DatasetId::Xor => &DATASET_OPTIONS[1],
            DatasetId::And => &DATASET_OPTIONS[2],
            DatasetId::Or => &DATASET_OPTIONS[3],
        }
    }

    /// Boolean rule for the logic-gate datasets; `None` for `Linear`.
    fn gate(&self) -> Option<fn(bool, bool) -> bool> {
        match self {
            DatasetId::Linear => None,
            DatasetId::Xor => Some(xor),
            DatasetId::And => Some(and),
            DatasetId::Or => Some(or),
        }
    }
}

fn xor(a: bool, b: bool) -> bool { a != b }
fn and(a: bool, b: bool) -> bool { a && b }
fn or(a: bool, b: bool) -> bool { a || b }

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetId {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self> {
        DATASET_OPTIONS
            .iter()
            .map(|def| def.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| NnError::UnknownDataset(s.to_string()))
    }
}

/// One labelled sample.  `label` is only set for classification data and
/// always equals `y[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub label: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    pub description: String,
    pub task: Task,
    pub input_size: usize,
    pub output_size: usize,
    pub points: Vec<DataPoint>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Minimum and maximum of feature `index` over all points.
    pub fn feature_range(&self, index: usize) -> Option<(f64, f64)> {
        let mut values = self.points.iter().filter_map(|p| p.x.get(index).copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Generates the dataset `id` from `seed`.
///
/// Draw order is fixed: for `linear` each point consumes `x` then the noise
/// term; for the logic gates each point consumes `x1` then `x2`.
pub fn create_dataset(id: DatasetId, seed: u32) -> Dataset {
    let def = id.definition();
    let mut rng = Mulberry32::new(seed);

    let points = match id.gate() {
        None => (0..LINEAR_POINTS)
            .map(|_| {
                let x = rng.next_f64() * 2.0 - 1.0;
                let noise = (rng.next_f64() - 0.5) * 0.4;
                DataPoint { x: vec![x], y: vec![2.0 * x + 1.0 + noise], label: None }
            })
            .collect(),
        Some(gate) => (0..LOGIC_POINTS)
            .map(|_| {
                let x1 = rng.next_f64();
                let x2 = rng.next_f64();
                let label = gate(x1 > 0.5, x2 > 0.5) as u8;
                DataPoint { x: vec![x1, x2], y: vec![label as f64], label: Some(label) }
            })
            .collect(),
    };

    Dataset {
        id,
        name: def.name.to_string(),
        description: def.description.to_string(),
        task: def.task,
        input_size: def.input_size,
        output_size: def.output_size,
        points,
    }
}

/// Looks up a dataset by its string identifier and generates it.
pub fn create_dataset_by_name(name: &str, seed: u32) -> Result<Dataset> {
    Ok(create_dataset(name.parse()?, seed))
}
