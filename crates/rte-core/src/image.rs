//! Image attributes edited through the image context menu.
//!
//! Alignment, alt text, width, corner radius, link and source all live on the
//! image node and are rendered as HTML attributes and inline CSS, so every
//! menu action ends up as a plain content change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlign {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl ImageAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageAlign::None => "none",
            ImageAlign::Left => "left",
            ImageAlign::Center => "center",
            ImageAlign::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(ImageAlign::None),
            "left" => Some(ImageAlign::Left),
            "center" => Some(ImageAlign::Center),
            "right" => Some(ImageAlign::Right),
            _ => None,
        }
    }

    fn css(self) -> Option<&'static str> {
        match self {
            ImageAlign::None => None,
            ImageAlign::Left => Some("float:left;margin:0 1em 1em 0"),
            ImageAlign::Center => Some("display:block;margin-left:auto;margin-right:auto"),
            ImageAlign::Right => Some("float:right;margin:0 0 1em 1em"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ImageAttrs {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub align: ImageAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Upper bounds applied to menu input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_width_px: u32,
    pub max_radius_px: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_width_px: 4096,
            max_radius_px: 512,
        }
    }
}

/// One image-menu interaction. `None` leaves a field untouched; a zero
/// width/radius or an empty link clears the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub align: Option<ImageAlign>,
    pub width_px: Option<u32>,
    pub radius_px: Option<u32>,
    pub link: Option<String>,
}

impl ImageAttrs {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, patch: &ImagePatch, limits: ImageLimits) {
        if let Some(src) = &patch.src {
            if !src.trim().is_empty() {
                self.src = src.trim().to_string();
            }
        }
        if let Some(alt) = &patch.alt {
            self.alt = alt.clone();
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
        if let Some(w) = patch.width_px {
            self.width_px = (w > 0).then(|| w.min(limits.max_width_px));
        }
        if let Some(r) = patch.radius_px {
            self.radius_px = (r > 0).then(|| r.min(limits.max_radius_px));
        }
        if let Some(link) = &patch.link {
            let link = link.trim();
            self.link = (!link.is_empty()).then(|| link.to_string());
        }
    }

    /// Inline CSS for the `style` attribute, `None` when nothing is set.
    pub fn style_attr(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if let Some(w) = self.width_px {
            parts.push(format!("width:{w}px"));
        }
        if let Some(r) = self.radius_px {
            parts.push(format!("border-radius:{r}px"));
        }
        if let Some(css) = self.align.css() {
            parts.push(css.to_string());
        }
        (!parts.is_empty()).then(|| parts.join(";"))
    }

    /// Read width and radius back out of an inline `style` attribute.
    pub fn read_style(&mut self, style: &str) {
        for decl in style.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let px = value.trim().trim_end_matches("px").trim().parse::<u32>().ok();
            match prop.trim().to_ascii_lowercase().as_str() {
                "width" => self.width_px = px.filter(|v| *v > 0),
                "border-radius" => self.radius_px = px.filter(|v| *v > 0),
                _ => {}
            }
        }
    }
}
