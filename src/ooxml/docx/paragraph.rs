/// Paragraph and Run structures for Word documents.
use crate::ooxml::docx::format::Format;
use crate::ooxml::xml::{Element, Node};

/// Attribute local names that must stay unique across a document part.
const UNIQUE_ID_ATTRS: [&str; 2] = ["paraId", "textId"];

/// A paragraph in a Word document.
///
/// Represents a `<w:p>` element: the paragraph properties plus the inline
/// content in document order. Inline content is either a text [`Run`] or an
/// opaque element (hyperlink, bookmark, drawing or field run, proofing mark)
/// that is carried through untouched.
///
/// # Example
///
/// ```rust,ignore
/// for para in document.body().paragraphs() {
///     println!("Paragraph text: {}", para.text());
///     for run in para.runs() {
///         println!("  Run: {} (bold: {:?})", run.text(), run.format().bold());
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    /// Attributes of `<w:p>` (rsids, paraId)
    attrs: Vec<(String, String)>,
    /// `<w:pPr>` element, if present
    properties: Option<Element>,
    /// Inline content in document order
    content: Vec<Inline>,
}

/// One inline item of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A run holding only text, tabs and line breaks
    Run(Run),
    /// Anything else, kept verbatim
    Other(Element),
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding a single run.
    pub fn with_text(text: impl Into<String>, format: Format) -> Self {
        Self {
            content: vec![Inline::Run(Run::new(text, format))],
            ..Self::default()
        }
    }

    /// Build a paragraph from a `<w:p>` element.
    ///
    /// Runs between a field's `begin` and `end` markers (instruction and
    /// cached result, e.g. a PAGE number) are kept opaque so the field
    /// survives any rewrite of the paragraph text.
    pub fn from_element(element: Element) -> Self {
        let mut properties = None;
        let mut content = Vec::new();
        let mut field_depth = 0usize;

        for node in element.children {
            let Node::Element(child) = node else {
                // Whitespace between elements carries no content
                continue;
            };
            if child.is("pPr") {
                properties = Some(child);
            } else if child.is("r") {
                let in_field = field_depth > 0;
                match field_char(&child) {
                    Some("begin") => field_depth += 1,
                    Some("end") => field_depth = field_depth.saturating_sub(1),
                    _ => {},
                }
                match Run::from_element(&child) {
                    Some(run) if !in_field => content.push(Inline::Run(run)),
                    _ => content.push(Inline::Other(child)),
                }
            } else {
                content.push(Inline::Other(child));
            }
        }

        Self {
            attrs: element.attrs,
            properties,
            content,
        }
    }

    /// Serialize into a `<w:p>` element.
    pub fn to_element(&self) -> Element {
        let mut p = Element::new("w:p");
        p.attrs = self.attrs.clone();
        if let Some(ppr) = &self.properties {
            p = p.with_child(ppr.clone());
        }
        for inline in &self.content {
            p = p.with_child(match inline {
                Inline::Run(run) => run.to_element(),
                Inline::Other(el) => el.clone(),
            });
        }
        p
    }

    /// Get the visible text of this paragraph.
    ///
    /// Concatenates the text of all text runs in order. Text inside opaque
    /// inlines is not part of it: hyperlinks, content controls (`w:sdt`),
    /// smart tags and field results are carried through unchanged, so
    /// placeholders inside them are never substituted.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.runs().map(|r| r.text.len()).sum());
        for run in self.runs() {
            text.push_str(&run.text);
        }
        text
    }

    /// Iterate over the text runs.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|i| match i {
            Inline::Run(r) => Some(r),
            Inline::Other(_) => None,
        })
    }

    /// Iterate mutably over the text runs.
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.content.iter_mut().filter_map(|i| match i {
            Inline::Run(r) => Some(r),
            Inline::Other(_) => None,
        })
    }

    /// Get the n-th text run mutably.
    pub fn run_mut(&mut self, index: usize) -> Option<&mut Run> {
        self.runs_mut().nth(index)
    }

    /// Number of text runs.
    pub fn run_count(&self) -> usize {
        self.runs().count()
    }

    /// All inline content, including opaque items.
    pub fn inlines(&self) -> &[Inline] {
        &self.content
    }

    /// Paragraph properties (`<w:pPr>`), if any.
    pub fn properties(&self) -> Option<&Element> {
        self.properties.as_ref()
    }

    /// Append a text run.
    pub fn push_run(&mut self, run: Run) {
        self.content.push(Inline::Run(run));
    }

    /// Replace all text runs with a single run.
    ///
    /// The new run takes the place of the first text run and keeps that
    /// run's attributes; opaque inlines stay where they are. A paragraph
    /// without text runs gets the run appended.
    pub fn collapse(&mut self, text: String, format: Format) {
        let first = self
            .content
            .iter()
            .position(|i| matches!(i, Inline::Run(_)));

        let Some(first) = first else {
            self.content.push(Inline::Run(Run::new(text, format)));
            return;
        };

        let attrs = match &self.content[first] {
            Inline::Run(run) => run.attrs.clone(),
            Inline::Other(_) => Vec::new(),
        };
        let mut collapsed = Run::new(text, format);
        collapsed.attrs = attrs;

        let mut index = 0;
        self.content.retain(|i| {
            let keep = index == first || !matches!(i, Inline::Run(_));
            index += 1;
            keep
        });
        // Elements before `first` are all opaque, so it kept its position
        self.content[first] = Inline::Run(collapsed);
    }

    /// Replace the text with a single run, using the first run's format.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let format = self
            .runs()
            .next()
            .map(|r| r.format.clone())
            .unwrap_or_default();
        self.collapse(text.into(), format);
    }

    /// Copy this paragraph's properties and first-run format into a new
    /// paragraph holding `text`.
    pub(crate) fn clone_with_text(&self, text: &str) -> Self {
        let format = self
            .runs()
            .next()
            .map(|r| r.format.clone())
            .unwrap_or_default();
        let mut paragraph = Self {
            attrs: without_unique_ids(&self.attrs),
            properties: self.properties.clone(),
            content: Vec::new(),
        };
        if !text.is_empty() {
            paragraph.push_run(Run::new(text, format));
        }
        paragraph
    }
}

/// `fldCharType` of a run holding a complex field marker.
fn field_char(run: &Element) -> Option<&str> {
    run.child("fldChar")?.attr("fldCharType")
}

/// A text run within a paragraph.
///
/// Represents a `<w:r>` element whose content is only text, tabs and line
/// breaks. Tabs appear in [`Run::text`] as `'\t'` and line breaks as `'\n'`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    /// Attributes of `<w:r>` (rsids)
    attrs: Vec<(String, String)>,
    /// Character formatting
    format: Format,
    /// Visible text
    text: String,
}

impl Run {
    /// Create a run with the given text and format.
    pub fn new(text: impl Into<String>, format: Format) -> Self {
        Self {
            attrs: Vec::new(),
            format,
            text: text.into(),
        }
    }

    /// Parse a `<w:r>` element; `None` when it holds more than text.
    pub fn from_element(element: &Element) -> Option<Self> {
        let mut format = Format::new();
        let mut text = String::new();

        for child in element.elements() {
            match child.local_name() {
                "rPr" => format = Format::from_rpr(Some(child)),
                "t" => text.push_str(&child.text()),
                "tab" => text.push('\t'),
                "cr" => text.push('\n'),
                "br" => match child.attr("type") {
                    None | Some("textWrapping") => text.push('\n'),
                    // Page and column breaks keep the run opaque
                    Some(_) => return None,
                },
                "lastRenderedPageBreak" => {},
                _ => return None,
            }
        }

        Some(Self {
            attrs: element.attrs.clone(),
            format,
            text,
        })
    }

    /// Serialize into a `<w:r>` element.
    pub fn to_element(&self) -> Element {
        let mut r = Element::new("w:r");
        r.attrs = self.attrs.clone();
        if let Some(rpr) = self.format.to_rpr() {
            r = r.with_child(rpr);
        }

        let mut pending = String::new();
        for ch in self.text.chars() {
            match ch {
                '\t' | '\n' => {
                    flush_text(&mut r, &mut pending);
                    r = r.with_child(Element::new(if ch == '\t' { "w:tab" } else { "w:br" }));
                },
                _ => pending.push(ch),
            }
        }
        flush_text(&mut r, &mut pending);
        r
    }

    /// Get the text of this run.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text of this run, keeping its format.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the byte range `range` of the text with `with`.
    pub fn splice(&mut self, range: std::ops::Range<usize>, with: &str) {
        self.text.replace_range(range, with);
    }

    /// Length of the text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check whether the run has no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character formatting of this run.
    #[inline]
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Mutable character formatting of this run.
    #[inline]
    pub fn format_mut(&mut self) -> &mut Format {
        &mut self.format
    }
}

fn flush_text(run: &mut Element, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let t = Element::new("w:t")
        .with_attr("xml:space", "preserve")
        .with_text(std::mem::take(pending));
    run.children.push(Node::Element(t));
}

/// Copy attributes, leaving out ids that must not be duplicated.
pub(crate) fn without_unique_ids(attrs: &[(String, String)]) -> Vec<(String, String)> {
    attrs
        .iter()
        .filter(|(k, _)| {
            let local = k.rsplit(':').next().unwrap_or(k);
            !UNIQUE_ID_ATTRS.contains(&local)
        })
        .cloned()
        .collect()
}
