use crate::domain::render::{StylePalette, TrackStyle, ZoneStyle};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    pub tracks: TrackSourceSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub style: StyleSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Locations of the device registry and zone geometry feeds (paths or http(s) URLs).
#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    #[serde(default = "default_devices")]
    pub devices: String,
    #[serde(default = "default_zones")]
    pub zones: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            devices: default_devices(),
            zones: default_zones(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum TrackSourceSettings {
    File { root: PathBuf },
    Http { base_url: String },
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKey {
    /// Device hardware id (IMEI).
    #[default]
    Id,
    /// Registry display name.
    Name,
}

/// How a (device, day) pair maps to a track resource.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LayoutSettings {
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub device_key: DeviceKey,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            template: default_template(),
            device_key: DeviceKey::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleSettings {
    pub route_color: String,
    pub highlight_color: String,
    pub route_weight: f64,
    pub route_opacity: f64,
    pub zone_color: String,
    pub zone_weight: f64,
    pub zone_fill_opacity: f64,
    pub zone_dash: Option<String>,
}

impl Default for StyleSettings {
    fn default() -> Self {
        let palette = StylePalette::default();
        Self {
            route_color: palette.route.color,
            highlight_color: palette.highlight_color,
            route_weight: palette.route.weight,
            route_opacity: palette.route.opacity,
            zone_color: palette.zone.color,
            zone_weight: palette.zone.weight,
            zone_fill_opacity: palette.zone.fill_opacity,
            zone_dash: palette.zone.dash_array,
        }
    }
}

impl From<StyleSettings> for StylePalette {
    fn from(s: StyleSettings) -> Self {
        Self {
            route: TrackStyle {
                color: s.route_color,
                weight: s.route_weight,
                opacity: s.route_opacity,
            },
            highlight_color: s.highlight_color,
            zone: ZoneStyle {
                color: s.zone_color,
                weight: s.zone_weight,
                fill_opacity: s.zone_fill_opacity,
                dash_array: s.zone_dash,
            },
        }
    }
}

/// Selection applied at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct SelectionSettings {
    pub device: Option<String>,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            device: None,
            start: default_start(),
            end: default_end(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReportSettings {
    pub endpoint: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_devices() -> String {
    "data/vehicles.json".to_string()
}

fn default_zones() -> String {
    "data/zones.geojson".to_string()
}

fn default_template() -> String {
    "${device}/${date}.geojson".to_string()
}

fn default_start() -> String {
    "2023-01-01".to_string()
}

fn default_end() -> String {
    "2023-01-07".to_string()
}

/// Load `config/viewer.*` (optional) overlaid with `TRACK_VIEWER__*` environment variables.
pub fn load_viewer_config() -> anyhow::Result<ViewerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/viewer").required(false))
        .add_source(
            config::Environment::with_prefix("TRACK_VIEWER")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a resource path template. The template is scanned once,
/// so substituted values are never expanded again. Unknown placeholders are kept as written.
pub fn prepare_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("${") {
        result.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        match vars.get(&after[..close]) {
            Some(value) => result.push_str(value),
            None => result.push_str(&rest[open..open + close + 3]),
        }
        rest = &after[close + 1..];
    }

    result.push_str(rest);
    result
}
