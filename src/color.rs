use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;

use crate::data::model::SalesDataset;

// ---------------------------------------------------------------------------
// Fixed palettes
// ---------------------------------------------------------------------------

/// Stack keys of the monthly sales chart.
pub const BODY_STYLE_PALETTE: [&str; 5] = ["#42a5f5", "#64b5f6", "#90caf9", "#bbdefb", "#e3f2fd"];

/// Qualitative palette for dealer regions.
pub const REGION_PALETTE: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Male bars and the SUV line.
pub const PRIMARY_HEX: &str = "#64b5f6";
/// Female bars and the Sedan line.
pub const SECONDARY_HEX: &str = "#b62727";

/// Parse a `#rrggbb` string; malformed input yields gray.
pub fn hex_color(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Bad palette colour '{hex}': {e}");
            Color32::GRAY
        }
    }
}

// ---------------------------------------------------------------------------
// Ordinal scale: category key → Color32
// ---------------------------------------------------------------------------

/// Assigns palette colours to keys in order, cycling when there are more
/// keys than colours.
#[derive(Debug, Clone, Default)]
pub struct OrdinalScale {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl OrdinalScale {
    pub fn new<'k>(keys: impl IntoIterator<Item = &'k String>, palette: &[&str]) -> Self {
        let colors: Vec<Color32> = palette.iter().map(|h| hex_color(h)).collect();
        let mapping = keys
            .into_iter()
            .zip(colors.iter().copied().cycle())
            .map(|(k, c)| (k.clone(), c))
            .collect();

        OrdinalScale {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Per-dataset chart colours
// ---------------------------------------------------------------------------

/// Colours shared by the legends, toggles and charts. Keys are taken from
/// the whole dataset so a series keeps its colour while filters change.
#[derive(Debug, Clone, Default)]
pub struct ChartColors {
    pub body_styles: OrdinalScale,
    pub regions: OrdinalScale,
    pub primary: Color32,
    pub secondary: Color32,
}

impl ChartColors {
    pub fn for_dataset(dataset: &SalesDataset) -> Self {
        ChartColors {
            body_styles: OrdinalScale::new(&dataset.body_styles, &BODY_STYLE_PALETTE),
            regions: OrdinalScale::new(&dataset.regions, &REGION_PALETTE),
            primary: hex_color(PRIMARY_HEX),
            secondary: hex_color(SECONDARY_HEX),
        }
    }
}
