//! Colors, display names and canvas settings shared by all charts.

use once_cell::sync::Lazy;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// matplotlib's tab10 palette, indexed like `C0`..`C9`
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistStyle {
    pub color: RGBColor,
    pub name: &'static str,
}

/// persistence strategy label (as printed by the benchmark) -> legend style
static PERSIST_STYLES: Lazy<BTreeMap<&'static str, PersistStyle>> = Lazy::new(|| {
    [
        ("persist_simple", 0, "Plain"),
        ("persist_counter", 1, "FliT adjacent"),
        ("persist_hash_12", 2, "FliT hashtable-4KB"),
        ("persist_hash_16", 3, "FliT hashtable-64KB"),
        ("persist_hash_20", 4, "FliT hashtable-1MB"),
        ("persist_hash_23", 0, "FliT hashtable-8MB"),
        ("persist_hash_26", 6, "FliT hashtable-64MB"),
        ("link_and_persist", 5, "Link-and-Persist"),
        ("Original", 7, "Non-Persistent"),
    ]
    .into_iter()
    .map(|(label, color, name)| {
        (
            label,
            PersistStyle {
                color: TAB10[color],
                name,
            },
        )
    })
    .collect()
});

/// Legend color and name for a strategy label, unknown labels get a palette
/// color derived from their position in the chart and keep their raw name
pub fn persist_style(label: &str, fallback_index: usize) -> (RGBColor, String) {
    match PERSIST_STYLES.get(label) {
        Some(style) => (style.color, style.name.to_owned()),
        None => (TAB10[fallback_index % TAB10.len()], label.to_owned()),
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
/// Canvas settings for rendered charts
pub struct ChartStyle {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_caption_size")]
    pub caption_size: u32,
    #[serde(default = "default_label_size")]
    pub label_size: u32,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            caption_size: default_caption_size(),
            label_size: default_label_size(),
            show_grid: default_show_grid(),
        }
    }
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

fn default_caption_size() -> u32 {
    28
}

fn default_label_size() -> u32 {
    20
}

fn default_show_grid() -> bool {
    true
}
