//! Wire shapes returned by the algorithm service and the reshaped run outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One of the five averaged cost series a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMetric {
    Total,
    Delay,
    Energy,
    Battery,
    Backup,
}

impl CostMetric {
    pub const ALL: [CostMetric; 5] = [
        CostMetric::Total,
        CostMetric::Delay,
        CostMetric::Energy,
        CostMetric::Battery,
        CostMetric::Backup,
    ];

    /// Field name in the service response.
    pub fn wire_key(&self) -> &'static str {
        match self {
            CostMetric::Total => "avg_total",
            CostMetric::Delay => "avg_delay",
            CostMetric::Energy => "avg_energy",
            CostMetric::Battery => "avg_battery",
            CostMetric::Backup => "avg_backup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CostMetric::Total => "Total Cost",
            CostMetric::Delay => "Delay Cost",
            CostMetric::Energy => "Energy Cost",
            CostMetric::Battery => "Battery Cost",
            CostMetric::Backup => "Backup Cost",
        }
    }
}

impl std::fmt::Display for CostMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_key())
    }
}

/// Response body of `/run_algorithm/{name}`. Absent fields decode as empty series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSeries {
    #[serde(default)]
    pub avg_total: Vec<f64>,
    #[serde(default)]
    pub avg_delay: Vec<f64>,
    #[serde(default)]
    pub avg_energy: Vec<f64>,
    #[serde(default)]
    pub avg_battery: Vec<f64>,
    #[serde(default)]
    pub avg_backup: Vec<f64>,
}

impl CostSeries {
    pub fn get(&self, metric: CostMetric) -> &[f64] {
        match metric {
            CostMetric::Total => &self.avg_total,
            CostMetric::Delay => &self.avg_delay,
            CostMetric::Energy => &self.avg_energy,
            CostMetric::Battery => &self.avg_battery,
            CostMetric::Backup => &self.avg_backup,
        }
    }

    /// Number of time slots covered (longest series).
    pub fn time_slots(&self) -> usize {
        CostMetric::ALL
            .iter()
            .map(|m| self.get(*m).len())
            .max()
            .unwrap_or(0)
    }

    pub fn final_value(&self, metric: CostMetric) -> Option<f64> {
        self.get(metric).last().copied()
    }
}

/// Response body of `/get_overview`: algorithm name -> its cost series.
pub type OverviewResponse = BTreeMap<String, CostSeries>;

/// One algorithm's line in a comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub algorithm: String,
    pub values: Vec<f64>,
}

/// Overview results regrouped per metric, each keyed by algorithm in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    metrics: BTreeMap<CostMetric, Vec<NamedSeries>>,
}

impl ComparisonResult {
    /// Turn "one record per algorithm" into "one record per metric".
    ///
    /// An algorithm the service left out of the response contributes empty series.
    pub fn reshape(selected: &[String], response: &OverviewResponse) -> Self {
        let empty = CostSeries::default();
        let mut metrics = BTreeMap::new();
        for metric in CostMetric::ALL {
            let lines = selected
                .iter()
                .map(|name| NamedSeries {
                    algorithm: name.clone(),
                    values: response.get(name).unwrap_or(&empty).get(metric).to_vec(),
                })
                .collect();
            metrics.insert(metric, lines);
        }
        Self { metrics }
    }

    pub fn metric(&self, metric: CostMetric) -> &[NamedSeries] {
        self.metrics.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn series(&self, metric: CostMetric, algorithm: &str) -> Option<&[f64]> {
        self.metric(metric)
            .iter()
            .find(|s| s.algorithm == algorithm)
            .map(|s| s.values.as_slice())
    }

    pub fn algorithms(&self) -> Vec<&str> {
        self.metric(CostMetric::Total)
            .iter()
            .map(|s| s.algorithm.as_str())
            .collect()
    }
}

/// Result of a finished run, tagged by how it was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "result", rename_all = "lowercase")]
pub enum RunOutcome {
    Single {
        algorithm: String,
        costs: CostSeries,
    },
    Comparison(ComparisonResult),
}

impl RunOutcome {
    pub fn title(&self) -> String {
        match self {
            RunOutcome::Single { algorithm, .. } => format!("Running {algorithm} algorithm result"),
            RunOutcome::Comparison(result) => {
                format!("Running {} algorithm result", result.algorithms().join(","))
            }
        }
    }
}
