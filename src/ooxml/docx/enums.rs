/// Enumerations for Word document elements.
use std::fmt;

/// Specifies one of the three header/footer slots of a section.
///
/// Corresponds to the VBA `WdHeaderFooterIndex` enumeration.
///
/// # Examples
///
/// ```rust
/// use docmint::ooxml::docx::enums::WdHeaderFooter;
///
/// assert_eq!(WdHeaderFooter::from_xml("first"), Some(WdHeaderFooter::FirstPage));
/// assert_eq!(WdHeaderFooter::Primary.to_xml(), "default");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum WdHeaderFooter {
    /// Header/footer for odd pages or all pages if no even header/footer.
    #[default]
    Primary = 1,
    /// Header/footer for first page of section.
    FirstPage = 2,
    /// Header/footer for even pages of recto/verso section.
    EvenPage = 3,
}

impl WdHeaderFooter {
    /// Convert the header/footer index to its XML attribute value.
    #[inline]
    pub const fn to_xml(self) -> &'static str {
        match self {
            Self::Primary => "default",
            Self::FirstPage => "first",
            Self::EvenPage => "even",
        }
    }

    /// Parse header/footer index from XML attribute value.
    ///
    /// Returns `None` if the value is not recognized.
    #[inline]
    pub fn from_xml(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Primary),
            "first" => Some(Self::FirstPage),
            "even" => Some(Self::EvenPage),
            _ => None,
        }
    }
}

impl fmt::Display for WdHeaderFooter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "Primary"),
            Self::FirstPage => write!(f, "First Page"),
            Self::EvenPage => write!(f, "Even Page"),
        }
    }
}

/// Whether a header/footer part is a header or a footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl fmt::Display for HeaderFooterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Footer => write!(f, "footer"),
        }
    }
}
