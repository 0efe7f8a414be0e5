///! HTML rendering
///!
///! - `map`: Leaflet map fragment with clustered and derby markers
///! - `chart`: Plotly line chart of fish stocked per date
///! - `page`: page templates filled by placeholder substitution

pub mod chart;
pub mod map;
pub mod page;

pub use chart::StockingChart;
pub use map::{LakeMap, MapMarker, MarkerLayer};
pub use page::{IndexPage, PageRenderer};

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// JSON safe to inline in a `<script>` block
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Element id unique to one rendered fragment
fn element_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::now_v7().simple())
}
