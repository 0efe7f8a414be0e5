///! Lake map builder
///!
///! One marker per stocked lake. Derby participants get a red trophy marker
///! attached straight to the map so they stay visible at every zoom level;
///! every other lake goes into the marker cluster layer.

use serde::Serialize;
use trout_common::parse::{capitalize, title_case};
use trout_common::{centroid, LakeRecord};

use super::{element_id, escape_html, script_json};

/// Center of the blank map shown when there is no data (central Washington)
pub const DEFAULT_CENTER: (f64, f64) = (47.7511, -120.7401);
pub const DEFAULT_ZOOM: u8 = 7;
pub const POPUP_MAX_WIDTH: u32 = 400;

const LEAFLET_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/leaflet.markercluster@1.5.3/dist/MarkerCluster.css",
    "https://cdn.jsdelivr.net/npm/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css",
];
const CLUSTER_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";
const AWESOME_MARKERS_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet.awesome-markers@2.0.5/dist/leaflet.awesome-markers.css";
const AWESOME_MARKERS_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet.awesome-markers@2.0.5/dist/leaflet.awesome-markers.min.js";
const FONT_AWESOME_CSS: &str = "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.2.0/css/all.min.css";
const FULLSCREEN_CSS: &str = "https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.css";
const FULLSCREEN_JS: &str = "https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.min.js";

const OSM_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const TERRAIN_TILES: &str = "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png";
const TERRAIN_ATTRIBUTION: &str = "&copy; <a href=\"https://stadiamaps.com/\">Stadia Maps</a> &copy; <a href=\"https://stamen.com/\">Stamen Design</a> &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Where a marker is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerLayer {
    /// Straight on the map, never clustered
    Direct,
    /// Inside the marker cluster group
    Cluster,
}

/// Font Awesome marker icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub color: &'static str,
    pub icon: &'static str,
    pub prefix: &'static str,
}

impl MarkerIcon {
    pub const TROPHY: MarkerIcon = MarkerIcon { color: "red", icon: "trophy", prefix: "fa" };
    pub const INFO: MarkerIcon = MarkerIcon { color: "blue", icon: "info", prefix: "fa" };
}

#[derive(Debug, Clone, Serialize)]
pub struct MapMarker {
    /// `[latitude, longitude]`
    pub location: [f64; 2],
    pub tooltip: String,
    pub popup: String,
    pub icon: MarkerIcon,
    pub layer: MarkerLayer,
}

impl MapMarker {
    pub fn for_lake(lake: &LakeRecord) -> Self {
        let (icon, layer) = if lake.derby_participant {
            (MarkerIcon::TROPHY, MarkerLayer::Direct)
        } else {
            (MarkerIcon::INFO, MarkerLayer::Cluster)
        };

        Self {
            location: [lake.latitude, lake.longitude],
            tooltip: escape_html(&capitalize(&lake.lake)),
            popup: popup_html(lake),
            icon,
            layer,
        }
    }
}

fn popup_html(lake: &LakeRecord) -> String {
    let mut html = format!(
        r#"<h3>{}</h3><p style="color:red">Date Stocked: {}</p><p style="color:green">Stocked Amount: {}</p>"#,
        escape_html(&title_case(&lake.lake)),
        escape_html(&lake.date_text),
        escape_html(&lake.stocked_fish_text),
    );
    if !lake.directions.is_empty() {
        html.push_str(&format!(
            r#"<a style="color:blue" href="{}" target="_blank" rel="noopener">Directions via Googlemaps</a>"#,
            escape_html(&lake.directions)
        ));
    }
    html
}

/// A Leaflet map ready to be embedded in a page
#[derive(Debug, Clone)]
pub struct LakeMap {
    id: String,
    center: (f64, f64),
    zoom: u8,
    markers: Vec<MapMarker>,
    /// Terrain layer, layer control and fullscreen control
    decorated: bool,
}

impl LakeMap {
    /// Map of `lakes` centered on their mean position; blank map when empty.
    pub fn build(lakes: &[LakeRecord]) -> Self {
        let Some(center) = centroid(lakes) else {
            return Self::blank();
        };

        Self {
            id: element_id("map"),
            center,
            zoom: DEFAULT_ZOOM,
            markers: lakes.iter().map(MapMarker::for_lake).collect(),
            decorated: true,
        }
    }

    /// Map with no markers centered on [`DEFAULT_CENTER`]
    pub fn blank() -> Self {
        Self {
            id: element_id("map"),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            decorated: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn markers_in(&self, layer: MarkerLayer) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(move |m| m.layer == layer)
    }

    pub fn is_blank(&self) -> bool {
        !self.decorated
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str(&stylesheet(LEAFLET_CSS));
        html.push_str(&script_src(LEAFLET_JS));
        if self.decorated {
            for css in CLUSTER_CSS {
                html.push_str(&stylesheet(css));
            }
            html.push_str(&stylesheet(AWESOME_MARKERS_CSS));
            html.push_str(&stylesheet(FONT_AWESOME_CSS));
            html.push_str(&stylesheet(FULLSCREEN_CSS));
            html.push_str(&script_src(CLUSTER_JS));
            html.push_str(&script_src(AWESOME_MARKERS_JS));
            html.push_str(&script_src(FULLSCREEN_JS));
        }

        html.push_str(&format!(
            r#"<div class="folium-map" id="{}" style="width: 100%; height: 100%; min-height: 500px;"></div>"#,
            self.id
        ));
        html.push_str("<script>\n(function () {\n");
        html.push_str(&format!(
            "var map = L.map({}, {{center: [{}, {}], zoom: {}}});\n",
            script_json(&self.id),
            self.center.0,
            self.center.1,
            self.zoom
        ));
        html.push_str(&format!(
            "var base = L.tileLayer({}, {{attribution: {}, maxZoom: 18}}).addTo(map);\n",
            script_json(&OSM_TILES),
            script_json(&OSM_ATTRIBUTION)
        ));

        if self.decorated {
            html.push_str(&self.marker_script());
        }

        html.push_str("})();\n</script>\n");
        html
    }

    fn marker_script(&self) -> String {
        let mut js = String::new();
        js.push_str("var cluster = L.markerClusterGroup().addTo(map);\n");
        js.push_str(&format!("var markers = {};\n", script_json(&self.markers)));
        js.push_str(&format!(
            r#"markers.forEach(function (m) {{
  var icon = L.AwesomeMarkers.icon({{icon: m.icon.icon, markerColor: m.icon.color, prefix: m.icon.prefix, iconColor: "white"}});
  var marker = L.marker(m.location, {{icon: icon}});
  marker.bindTooltip(m.tooltip);
  marker.bindPopup(m.popup, {{maxWidth: {}}});
  marker.addTo(m.layer === "direct" ? map : cluster);
}});
"#,
            POPUP_MAX_WIDTH
        ));
        js.push_str(&format!(
            "var terrain = L.tileLayer({}, {{attribution: {}, maxZoom: 18}}).addTo(map);\n",
            script_json(&TERRAIN_TILES),
            script_json(&TERRAIN_ATTRIBUTION)
        ));
        js.push_str("L.control.layers({\"openstreetmap\": base, \"Stamen Terrain\": terrain}).addTo(map);\n");
        js.push_str(
            "L.control.fullscreen({position: \"topright\", title: \"Expand me\", titleCancel: \"Exit me\", forceSeparateButton: false}).addTo(map);\n",
        );
        js
    }
}

fn stylesheet(href: &str) -> String {
    format!("<link rel=\"stylesheet\" href=\"{}\"/>\n", href)
}

fn script_src(src: &str) -> String {
    format!("<script src=\"{}\"></script>\n", src)
}
