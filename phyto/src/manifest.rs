//! Web app manifest and the `<link>` tags that advertise icons in `<head>`.

use serde::{Deserialize, Serialize};

use crate::icon::{FAVICON_SIZES, TOUCH_ICON_SIZE};
use crate::PhytoError;

pub const MANIFEST_MIME: &str = "application/manifest+json";
pub const ICON_MIME: &str = "image/png";

/// Attribute marking links inserted by the generator, so a rerun can
/// replace them.
pub const GENERATED_ATTR: &str = "data-generated";
pub const GENERATED_VALUE: &str = "phyto";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestConfig {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name: "Фитоспоры — проект".to_string(),
            short_name: "Фитоспоры".to_string(),
            start_url: ".".to_string(),
            display: "standalone".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#2e8b57".to_string(),
        }
    }
}

/// A rendered square icon and where it can be fetched from (data URL,
/// object URL or relative file name).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconAsset {
    pub size: u32,
    pub href: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
    pub purpose: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

fn sizes_attr(size: u32) -> String {
    format!("{size}x{size}")
}

impl WebManifest {
    pub fn build(config: &ManifestConfig, icons: &[IconAsset]) -> Self {
        Self {
            name: config.name.clone(),
            short_name: config.short_name.clone(),
            start_url: config.start_url.clone(),
            display: config.display.clone(),
            background_color: config.background_color.clone(),
            theme_color: config.theme_color.clone(),
            icons: icons
                .iter()
                .map(|icon| ManifestIcon {
                    src: icon.href.clone(),
                    sizes: sizes_attr(icon.size),
                    mime: ICON_MIME.to_string(),
                    purpose: "any".to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, PhytoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, PhytoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadLink {
    pub rel: String,
    pub mime: Option<String>,
    pub sizes: Option<String>,
    pub href: String,
}

impl HeadLink {
    /// Attribute pairs in document order.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = vec![("rel", self.rel.as_str())];
        if let Some(mime) = &self.mime {
            attrs.push(("type", mime.as_str()));
        }
        if let Some(sizes) = &self.sizes {
            attrs.push(("sizes", sizes.as_str()));
        }
        attrs.push(("href", self.href.as_str()));
        attrs
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<link");
        for (name, value) in self.attributes() {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        out.push('>');
        out
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Favicon and touch icon links. Sizes missing from `icons` are skipped.
pub fn icon_links(icons: &[IconAsset]) -> Vec<HeadLink> {
    let find = |size: u32| icons.iter().find(|icon| icon.size == size);
    let mut links = Vec::new();
    for size in FAVICON_SIZES {
        if let Some(icon) = find(size) {
            links.push(HeadLink {
                rel: "icon".to_string(),
                mime: Some(ICON_MIME.to_string()),
                sizes: Some(sizes_attr(size)),
                href: icon.href.clone(),
            });
        }
    }
    if let Some(icon) = find(TOUCH_ICON_SIZE) {
        links.push(HeadLink {
            rel: "apple-touch-icon".to_string(),
            mime: None,
            sizes: Some(sizes_attr(TOUCH_ICON_SIZE)),
            href: icon.href.clone(),
        });
    }
    links
}

pub fn manifest_link(href: &str) -> HeadLink {
    HeadLink {
        rel: "manifest".to_string(),
        mime: None,
        sizes: None,
        href: href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::ICON_SIZES;
    use serde_json::Value;

    fn assets() -> Vec<IconAsset> {
        ICON_SIZES
            .iter()
            .map(|&size| IconAsset {
                size,
                href: format!("icon-{size}.png"),
            })
            .collect()
    }

    #[test]
    fn manifest_has_expected_shape() {
        let manifest = WebManifest::build(&ManifestConfig::default(), &assets());
        let json: Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(json["name"], "Фитоспоры — проект");
        assert_eq!(json["short_name"], "Фитоспоры");
        assert_eq!(json["start_url"], ".");
        assert_eq!(json["display"], "standalone");
        assert_eq!(json["background_color"], "#ffffff");
        assert_eq!(json["theme_color"], "#2e8b57");
        let icons = json["icons"].as_array().unwrap();
        assert_eq!(icons.len(), 4);
        assert_eq!(icons[2]["src"], "icon-180.png");
        assert_eq!(icons[2]["sizes"], "180x180");
        assert_eq!(icons[2]["type"], "image/png");
        assert_eq!(icons[2]["purpose"], "any");
    }

    #[test]
    fn config_overrides_merge_with_defaults() {
        let config: ManifestConfig =
            serde_json::from_str(r#"{"short_name": "Spores", "display": "browser"}"#).unwrap();
        assert_eq!(config.short_name, "Spores");
        assert_eq!(config.display, "browser");
        assert_eq!(config.name, ManifestConfig::default().name);
    }

    #[test]
    fn head_links_cover_favicons_and_touch_icon() {
        let links = icon_links(&assets());
        let html: Vec<String> = links.iter().map(HeadLink::to_html).collect();
        assert_eq!(
            html,
            vec![
                r#"<link rel="icon" type="image/png" sizes="16x16" href="icon-16.png">"#,
                r#"<link rel="icon" type="image/png" sizes="32x32" href="icon-32.png">"#,
                r#"<link rel="apple-touch-icon" sizes="180x180" href="icon-180.png">"#,
            ]
        );
        assert_eq!(
            manifest_link("manifest.webmanifest").to_html(),
            r#"<link rel="manifest" href="manifest.webmanifest">"#
        );
    }

    #[test]
    fn missing_sizes_skip_their_link() {
        let only_big = vec![IconAsset {
            size: 512,
            href: "big.png".into(),
        }];
        assert!(icon_links(&only_big).is_empty());
    }

    #[test]
    fn attribute_values_are_escaped() {
        let link = manifest_link("a\"b&c");
        assert_eq!(link.to_html(), r#"<link rel="manifest" href="a&quot;b&amp;c">"#);
    }
}
