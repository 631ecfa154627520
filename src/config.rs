use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Parameters of the row clustering and gap search.
/// Attributes
/// ----------
/// row_tol_px : f64
///     Maximum distance in pixels between a box's vertical center and the
///     running mean of a row for the box to join that row.
/// gap_factor : f64
///     A gap must be at least `gap_factor` times the representative box
///     width of its row.
/// min_abs_gap : f64
///     Absolute floor in pixels for the gap threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowGapConfig {
    pub row_tol_px: f64,
    pub gap_factor: f64,
    pub min_abs_gap: f64,
}

impl Default for RowGapConfig {
    fn default() -> Self {
        Self {
            row_tol_px: 30.0,
            gap_factor: 1.4,
            min_abs_gap: 10.0,
        }
    }
}

impl RowGapConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_json(path.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        non_negative("row_tol_px", self.row_tol_px)?;
        non_negative("gap_factor", self.gap_factor)?;
        non_negative("min_abs_gap", self.min_abs_gap)
    }
}

/// Parameters of the evaluation and its bootstrap.
/// Attributes
/// ----------
/// iou_thr : f64
///     Minimum IoU for a prediction to count as a true positive.
/// iterations : usize
///     Number of bootstrap rounds.
/// seed : u64
///     Seed of the bootstrap random stream.
/// parallel : bool
///     Evaluate bootstrap rounds on the rayon pool. Results are identical
///     to the sequential run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub iou_thr: f64,
    pub iterations: usize,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            iou_thr: 0.3,
            iterations: 1000,
            seed: 123,
            parallel: false,
        }
    }
}

impl EvalConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        load_json(path.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.iou_thr) {
            return Err(Error::InvalidConfig(format!(
                "iou_thr must be within [0, 1], got {}", self.iou_thr
            )));
        }

        if self.iterations == 0 {
            return Err(Error::InvalidConfig("iterations must be at least 1".into()));
        }

        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be finite and >= 0, got {}", name, value)))
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;

    Ok(serde_json::from_str(&text)?)
}
