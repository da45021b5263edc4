//! Time-series output of the calculation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Identifier of the model instance the calculation ran for.
    pub esdl_id: String,
    pub output_name: String,
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// Destination for published values, typically a time-series database.
pub trait TimeSeriesSink {
    fn record(&mut self, point: DataPoint) -> Result<()>;
}

/// Keeps every point in memory, in publication order.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    points: Vec<DataPoint>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest value recorded under `output_name`.
    pub fn latest(&self, output_name: &str) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|point| point.output_name == output_name)
            .map(|point| point.value)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl TimeSeriesSink for InMemorySink {
    fn record(&mut self, point: DataPoint) -> Result<()> {
        self.points.push(point);
        Ok(())
    }
}
