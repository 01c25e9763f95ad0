//! Core logic for the phytospore project page: the decay calculator, the
//! hand-drawn chart, the procedural leaf icon and the web app manifest.
//!
//! Everything here is backend independent. The wasm front end draws the
//! produced [`Scene`]s on a `<canvas>`, the CLI draws them with plotters.

use thiserror::Error;

pub mod chart;
pub mod decay;
pub mod icon;
pub mod manifest;
pub mod scene;
pub mod ui;

pub use chart::{layout_chart, ChartStyle, LinearScale, Padding};
pub use decay::{
    clamp, compute_series, conclusion, format_number, parse_float, parse_int, table_rows,
    to_fixed4, CalcInput, Series, SeriesPoint, TableRow,
};
pub use icon::{leaf_icon, ICON_SIZES};
pub use manifest::{HeadLink, IconAsset, ManifestConfig, ManifestIcon, WebManifest};
pub use scene::{DrawOp, Font, Path, PathCmd, Point, Rgb, Scene, TextAlign};
pub use ui::{Modal, NavMenu};

#[derive(Error, Debug)]
pub enum PhytoError {
    #[error("invalid calculator input: {0}")]
    InvalidInput(String),
    #[error("series value at step {0} is not finite")]
    NonFinite(u32),
    #[error("cannot plot an empty series")]
    EmptySeries,
    #[error("invalid surface size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("invalid colour: {0}")]
    InvalidColor(String),
    #[error("failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Language of generated sentences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    Ru,
    En,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Ru
    }
}

impl Locale {
    /// Resolve a BCP 47 tag such as `en-GB`. Anything that is not English
    /// falls back to Russian, the language of the page.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("");
        if primary.eq_ignore_ascii_case("en") {
            Locale::En
        } else {
            Locale::Ru
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_from_tag() {
        assert_eq!(Locale::from_tag("en"), Locale::En);
        assert_eq!(Locale::from_tag("en-GB"), Locale::En);
        assert_eq!(Locale::from_tag("EN_us"), Locale::En);
        assert_eq!(Locale::from_tag("ru"), Locale::Ru);
        assert_eq!(Locale::from_tag(""), Locale::Ru);
        assert_eq!(Locale::from_tag("de"), Locale::Ru);
    }
}
