///! Page rendering from HTML templates
///!
///! Templates live in the configured template directory and carry
///! `{{PLACEHOLDER}}` markers that are filled in a single pass.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use trout_common::parse::title_case;
use trout_common::LakeRecord;

use super::{escape_html, LakeMap, StockingChart};
use crate::error::{AppError, AppResult};

const INDEX_TEMPLATE: &str = "index_template.html";
const FULLSCREEN_TEMPLATE: &str = "map_full_screen_template.html";

/// Everything shown on the index page
pub struct IndexPage<'a> {
    pub map: &'a LakeMap,
    pub chart: &'a StockingChart,
    pub derby_lakes: &'a BTreeSet<String>,
    pub most_recent: &'a [&'a LakeRecord],
    pub days: u32,
    pub data_updated: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct PageRenderer {
    template_dir: PathBuf,
}

impl PageRenderer {
    pub fn new(template_dir: impl AsRef<Path>) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    pub async fn render_index(&self, page: &IndexPage<'_>) -> AppResult<String> {
        let template = self.read_template(INDEX_TEMPLATE).await?;
        let data_updated = page
            .data_updated
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "never".to_string());

        let values = HashMap::from([
            ("FOLIUM_MAP", page.map.to_html()),
            ("CHART", page.chart.to_html()),
            ("DERBY_LAKES", derby_list_html(page.derby_lakes)),
            ("MOST_RECENT_STOCKED", most_recent_rows_html(page.most_recent)),
            ("DAYS", page.days.to_string()),
            ("DATA_UPDATED", data_updated),
        ]);
        Ok(fill_template(&template, &values))
    }

    pub async fn render_fullscreen(&self, map: &LakeMap) -> AppResult<String> {
        let template = self.read_template(FULLSCREEN_TEMPLATE).await?;
        let values = HashMap::from([("FOLIUM_MAP", map.to_html())]);
        Ok(fill_template(&template, &values))
    }

    async fn read_template(&self, name: &str) -> AppResult<String> {
        let path = self.template_dir.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AppError::Template {
                path: path.display().to_string(),
                source,
            })
    }
}

/// Replace every `{{KEY}}` with its value; unknown keys are left as they are.
pub fn fill_template(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match values.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn derby_list_html(derby_lakes: &BTreeSet<String>) -> String {
    derby_lakes
        .iter()
        .map(|name| format!("<li>{}</li>\n", escape_html(&title_case(name))))
        .collect()
}

fn most_recent_rows_html(lakes: &[&LakeRecord]) -> String {
    lakes
        .iter()
        .map(|lake| {
            format!(
                "<tr{}><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                if lake.derby_participant { r#" class="derby""# } else { "" },
                escape_html(&title_case(&lake.lake)),
                escape_html(&lake.date_text),
                escape_html(&lake.stocked_fish_text),
            )
        })
        .collect()
}
