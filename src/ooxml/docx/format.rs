//! Character formatting of a run.
//!
//! A [`Format`] is the content of a run's `<w:rPr>` element held as a value:
//! cloning it copies every property, and no two runs ever share one. Typed
//! accessors cover the properties the template engine reasons about (font
//! family, size, bold, italic, color, underline); everything else (styles,
//! highlight, language, revision marks) is carried along untouched.

use crate::ooxml::xml::Element;
use phf::phf_map;

/// Position of each run property in the `CT_RPr` schema sequence.
///
/// Word rejects run properties written out of order, so setters insert new
/// properties at their schema position.
static RUN_PROPERTY_ORDER: phf::Map<&'static str, u8> = phf_map! {
    "rStyle" => 0,
    "rFonts" => 1,
    "b" => 2,
    "bCs" => 3,
    "i" => 4,
    "iCs" => 5,
    "caps" => 6,
    "smallCaps" => 7,
    "strike" => 8,
    "dstrike" => 9,
    "outline" => 10,
    "shadow" => 11,
    "emboss" => 12,
    "imprint" => 13,
    "noProof" => 14,
    "snapToGrid" => 15,
    "vanish" => 16,
    "webHidden" => 17,
    "color" => 18,
    "spacing" => 19,
    "w" => 20,
    "kern" => 21,
    "position" => 22,
    "sz" => 23,
    "szCs" => 24,
    "highlight" => 25,
    "u" => 26,
    "effect" => 27,
    "bdr" => 28,
    "shd" => 29,
    "fitText" => 30,
    "vertAlign" => 31,
    "rtl" => 32,
    "cs" => 33,
    "em" => 34,
    "lang" => 35,
    "eastAsianLayout" => 36,
    "specVanish" => 37,
    "oMath" => 38,
    "rPrChange" => 39,
};

#[inline]
fn rank(local: &str) -> u8 {
    RUN_PROPERTY_ORDER.get(local).copied().unwrap_or(u8::MAX)
}

/// Character formatting shared by all text of one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Children of `<w:rPr>`, in document order
    properties: Vec<Element>,
}

impl Format {
    /// Create an empty format (inherit everything from styles).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a format from a `<w:rPr>` element.
    pub fn from_rpr(rpr: Option<&Element>) -> Self {
        Self {
            properties: rpr
                .map(|el| el.elements().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Serialize back into a `<w:rPr>` element; `None` when empty.
    pub fn to_rpr(&self) -> Option<Element> {
        if self.properties.is_empty() {
            return None;
        }
        let mut rpr = Element::new("w:rPr");
        for prop in &self.properties {
            rpr = rpr.with_child(prop.clone());
        }
        Some(rpr)
    }

    /// Check whether no direct formatting is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// All property elements in order.
    #[inline]
    pub fn properties(&self) -> &[Element] {
        &self.properties
    }

    /// Font family (`w:rFonts`: ascii, then hAnsi, cs, eastAsia).
    pub fn font(&self) -> Option<&str> {
        let fonts = self.property("rFonts")?;
        ["ascii", "hAnsi", "cs", "eastAsia"]
            .iter()
            .find_map(|slot| fonts.attr(slot))
    }

    /// Set the font family for Latin text (ascii and hAnsi slots).
    pub fn set_font(&mut self, name: &str) {
        let mut fonts = self
            .property("rFonts")
            .cloned()
            .unwrap_or_else(|| Element::new("w:rFonts"));
        fonts.set_attr("w:ascii", name);
        fonts.set_attr("w:hAnsi", name);
        self.upsert(fonts);
    }

    /// Font size in half-points (24 = 12pt).
    pub fn size(&self) -> Option<u32> {
        self.property("sz")?.attr("val")?.parse().ok()
    }

    /// Set the font size in half-points.
    pub fn set_size(&mut self, half_points: u32) {
        self.upsert(Element::new("w:sz").with_attr("w:val", half_points.to_string()));
    }

    /// Bold: `Some(true)`/`Some(false)` when set directly, `None` when inherited.
    pub fn bold(&self) -> Option<bool> {
        self.toggle("b")
    }

    /// Set bold directly.
    pub fn set_bold(&mut self, on: bool) {
        self.set_toggle("w:b", on);
    }

    /// Italic: `Some(true)`/`Some(false)` when set directly, `None` when inherited.
    pub fn italic(&self) -> Option<bool> {
        self.toggle("i")
    }

    /// Set italic directly.
    pub fn set_italic(&mut self, on: bool) {
        self.set_toggle("w:i", on);
    }

    /// Text color as hex RGB (e.g. "FF0000") or "auto".
    pub fn color(&self) -> Option<&str> {
        self.property("color")?.attr("val")
    }

    /// Set the text color as hex RGB.
    pub fn set_color(&mut self, rgb: &str) {
        self.upsert(Element::new("w:color").with_attr("w:val", rgb));
    }

    /// Underline style value (e.g. "single", "double"), if set.
    pub fn underline(&self) -> Option<&str> {
        self.property("u")?.attr("val")
    }

    /// Get a property element by local name.
    pub fn property(&self, local: &str) -> Option<&Element> {
        self.properties.iter().find(|p| p.is(local))
    }

    /// Toggle properties: present without `w:val` means on.
    fn toggle(&self, local: &str) -> Option<bool> {
        let prop = self.property(local)?;
        Some(match prop.attr("val") {
            None => true,
            Some(v) => matches!(v, "true" | "1" | "on"),
        })
    }

    fn set_toggle(&mut self, name: &str, on: bool) {
        let element = if on {
            Element::new(name)
        } else {
            Element::new(name).with_attr("w:val", "0")
        };
        self.upsert(element);
    }

    /// Replace a property with the same local name, or insert it at its schema position.
    fn upsert(&mut self, element: Element) {
        if let Some(slot) = self
            .properties
            .iter_mut()
            .find(|p| p.local_name() == element.local_name())
        {
            *slot = element;
            return;
        }
        let new_rank = rank(element.local_name());
        let pos = self
            .properties
            .iter()
            .position(|p| rank(p.local_name()) > new_rank)
            .unwrap_or(self.properties.len());
        self.properties.insert(pos, element);
    }
}
