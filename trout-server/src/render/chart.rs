///! Plotly line chart of total fish stocked per date

use serde::Serialize;
use trout_common::DateTotal;

use super::{element_id, script_json};

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub const CHART_TITLE: &str = "Total Stocked Trout by Date";

#[derive(Debug, Clone, Serialize)]
struct Trace {
    x: Vec<String>,
    y: Vec<u64>,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct AxisTitle {
    text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Axis {
    title: AxisTitle,
}

#[derive(Debug, Clone, Serialize)]
struct Margin {
    l: u32,
    r: u32,
    t: u32,
    b: u32,
}

#[derive(Debug, Clone, Serialize)]
struct Layout {
    title: AxisTitle,
    xaxis: Axis,
    yaxis: Axis,
    margin: Margin,
    autosize: bool,
}

/// Single-series line chart, x = date, y = total stocked fish
#[derive(Debug, Clone)]
pub struct StockingChart {
    id: String,
    trace: Trace,
    layout: Layout,
}

impl StockingChart {
    pub fn new(totals: &[DateTotal]) -> Self {
        let trace = Trace {
            x: totals.iter().map(|t| t.date.format("%Y-%m-%d").to_string()).collect(),
            y: totals.iter().map(|t| t.total).collect(),
            mode: "lines",
            kind: "scatter",
        };
        let layout = Layout {
            title: AxisTitle { text: CHART_TITLE },
            xaxis: Axis { title: AxisTitle { text: "Date" } },
            yaxis: Axis { title: AxisTitle { text: "Total Stocked Fish" } },
            margin: Margin { l: 50, r: 50, t: 50, b: 50 },
            autosize: true,
        };

        Self {
            id: element_id("chart"),
            trace,
            layout,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> usize {
        self.trace.x.len()
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<script src="{src}" charset="utf-8"></script>
<div id="{id}" class="plotly-graph-div" style="height:100%; width:100%;"></div>
<script>
Plotly.newPlot({id_json}, [{trace}], {layout}, {{"responsive": true}});
</script>
"#,
            src = PLOTLY_JS,
            id = self.id,
            id_json = script_json(&self.id),
            trace = script_json(&self.trace),
            layout = script_json(&self.layout),
        )
    }
}
