//! Plotly chart specifications for run outcomes.

use plotly::{
    common::{Font, Mode, Title},
    layout::Axis,
    Layout, Plot, Scatter,
};

use crate::models::{ComparisonResult, CostMetric, CostSeries, RunOutcome};

const CHART_WIDTH: usize = 800;
const CHART_HEIGHT: usize = 600;
const X_AXIS_LABEL: &str = "Time slot";

/// Traces of the single-run area chart, bottom to top.
const STACKED_METRICS: [CostMetric; 3] = [CostMetric::Delay, CostMetric::Backup, CostMetric::Battery];

/// Comparison charts in display order: (metric, title, y-axis label).
const COMPARISON_CHARTS: [(CostMetric, &str, &str); 5] = [
    (CostMetric::Total, "Comparing Average Cost", "Time Average Cost"),
    (CostMetric::Delay, "Comparing Average Delay cost", "Time Average Delay Cost"),
    (CostMetric::Backup, "Comparing Average Backup Cost", "Time Average Backup Cost"),
    (CostMetric::Battery, "Comparing Average Battery Cost", "Time Average Battery Cost"),
    (CostMetric::Energy, "Comparing Average Energy Cost", "Time Average Energy Cost"),
];

/// A titled chart ready to hand to Plotly.
pub struct Chart {
    pub title: String,
    pub plot: Plot,
}

impl Chart {
    /// `{data, layout, config}` JSON, as `Plotly.newPlot` expects.
    pub fn to_json(&self) -> String {
        self.plot.to_json()
    }
}

fn axis_font() -> Font {
    Font::new()
        .family("Courier New, monospace")
        .size(18)
        .color("#7f7f7f")
}

fn layout(title: &str, y_label: &str) -> Layout {
    Layout::new()
        .width(CHART_WIDTH)
        .height(CHART_HEIGHT)
        .title(Title::from(title))
        .show_legend(true)
        .x_axis(Axis::new().title(Title::from(X_AXIS_LABEL).font(axis_font())))
        .y_axis(Axis::new().title(Title::from(y_label).font(axis_font())))
}

fn time_index(len: usize) -> Vec<usize> {
    (0..len).collect()
}

/// Stacked-area chart of delay, backup and battery cost for one algorithm.
pub fn stacked_costs(costs: &CostSeries) -> Chart {
    let title = "Average Costs Graph";
    let mut plot = Plot::new();
    plot.set_layout(layout(title, "Average Costs"));
    for metric in STACKED_METRICS {
        let values = costs.get(metric).to_vec();
        let trace = Scatter::new(time_index(values.len()), values)
            .name(metric.display_name())
            .stack_group("one");
        plot.add_trace(trace);
    }
    Chart {
        title: title.to_string(),
        plot,
    }
}

/// One line chart per metric, one line per algorithm.
pub fn comparison_charts(result: &ComparisonResult) -> Vec<Chart> {
    COMPARISON_CHARTS
        .iter()
        .map(|(metric, title, y_label)| {
            let mut plot = Plot::new();
            plot.set_layout(layout(title, y_label));
            for line in result.metric(*metric) {
                let trace = Scatter::new(time_index(line.values.len()), line.values.clone())
                    .name(line.algorithm.as_str())
                    .mode(Mode::Lines);
                plot.add_trace(trace);
            }
            Chart {
                title: title.to_string(),
                plot,
            }
        })
        .collect()
}

/// Charts for an outcome; the variant alone decides the layout.
pub fn render(outcome: &RunOutcome) -> Vec<Chart> {
    match outcome {
        RunOutcome::Single { costs, .. } => vec![stacked_costs(costs)],
        RunOutcome::Comparison(result) => comparison_charts(result),
    }
}

/// Standalone HTML page holding every chart of `outcome`.
pub fn to_html(outcome: &RunOutcome) -> String {
    let mut page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{}</title>\n\
         <script src=\"https://cdn.plot.ly/plotly-2.12.1.min.js\"></script>\n</head>\n<body>\n<h1>{}</h1>\n",
        outcome.title(),
        outcome.title()
    );
    for (i, chart) in render(outcome).iter().enumerate() {
        page.push_str(&format!(
            "<div id=\"chart-{i}\"></div>\n<script>\n(function() {{\n  const fig = {};\n  \
             Plotly.newPlot('chart-{i}', fig.data, fig.layout, fig.config);\n}})();\n</script>\n",
            chart.to_json()
        ));
    }
    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverviewResponse;
    use serde_json::Value;

    fn traces(chart: &Chart) -> Vec<Value> {
        let json: Value = serde_json::from_str(&chart.to_json()).unwrap();
        json["data"].as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn test_single_outcome_renders_one_stacked_chart() {
        let costs = CostSeries {
            avg_delay: vec![1.0, 2.0],
            avg_backup: vec![0.5, 0.25],
            ..Default::default()
        };
        let charts = render(&RunOutcome::Single {
            algorithm: "PPO".into(),
            costs,
        });
        assert_eq!(charts.len(), 1);
        let data = traces(&charts[0]);
        let names: Vec<_> = data.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Delay Cost", "Backup Cost", "Battery Cost"]);
        assert_eq!(data[0]["y"], serde_json::json!([1.0, 2.0]));
        // absent battery metric still yields a trace, just an empty one
        assert_eq!(data[2]["y"], serde_json::json!([]));
    }

    #[test]
    fn test_comparison_outcome_renders_five_charts() {
        let response: OverviewResponse = serde_json::from_str(
            r#"{"PPO": {"avg_total": [1, 2]}, "DQN": {"avg_total": [3, 4]}}"#,
        )
        .unwrap();
        let selected = vec!["PPO".to_string(), "DQN".to_string()];
        let outcome = RunOutcome::Comparison(ComparisonResult::reshape(&selected, &response));
        let charts = render(&outcome);
        let titles: Vec<_> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Comparing Average Cost",
                "Comparing Average Delay cost",
                "Comparing Average Backup Cost",
                "Comparing Average Battery Cost",
                "Comparing Average Energy Cost",
            ]
        );
        let total = traces(&charts[0]);
        assert_eq!(total.len(), 2);
        assert_eq!(total[1]["name"], "DQN");
        assert_eq!(total[1]["y"], serde_json::json!([3.0, 4.0]));
    }

    #[test]
    fn test_html_embeds_every_chart() {
        let outcome = RunOutcome::Comparison(ComparisonResult::default());
        let html = to_html(&outcome);
        assert_eq!(html.matches("Plotly.newPlot").count(), 5);
    }
}
