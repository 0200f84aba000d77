/// Table, Row, and Cell structures for Word documents.
use crate::ooxml::docx::paragraph::{Paragraph, without_unique_ids};
use crate::ooxml::docx::story::{Block, Story};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xml::{Element, Node};

/// Vertical merge state for table cells.
///
/// In OOXML, vertical merging uses the `<w:vMerge>` element:
/// - `restart`: Starts a new vertical merge (first cell in the merge)
/// - `continue`: Continues a vertical merge from the cell above (no `val` attribute or `val="continue"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMergeState {
    /// Starts a vertical merge (`<w:vMerge w:val="restart"/>`)
    Restart,
    /// Continues a vertical merge from above (`<w:vMerge/>` or `<w:vMerge w:val="continue"/>`)
    Continue,
}

/// A table in a Word document.
///
/// Represents a `<w:tbl>` element. Tables contain rows, which contain cells,
/// which contain a nested [`Story`].
///
/// # Example
///
/// ```rust,ignore
/// for table in document.body().tables() {
///     println!("Table with {} rows", table.row_count());
///     for (row_idx, row) in table.rows().iter().enumerate() {
///         for (col_idx, cell) in row.cells().iter().enumerate() {
///             println!("Cell [{},{}]: {}", row_idx, col_idx, cell.text());
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    attrs: Vec<(String, String)>,
    /// Elements before the first row (`w:tblPr`, `w:tblGrid`, bookmarks)
    leading: Vec<Element>,
    rows: Vec<Row>,
    /// Non-row elements after the first row
    trailing: Vec<Element>,
}

impl Table {
    /// Build a table from a `<w:tbl>` element.
    pub fn from_element(element: Element) -> Self {
        let mut table = Self {
            attrs: element.attrs,
            ..Self::default()
        };
        for node in element.children {
            let Node::Element(child) = node else { continue };
            if child.is("tr") {
                table.rows.push(Row::from_element(child));
            } else if table.rows.is_empty() {
                table.leading.push(child);
            } else {
                table.trailing.push(child);
            }
        }
        table
    }

    /// Serialize into a `<w:tbl>` element.
    pub fn to_element(&self) -> Element {
        let mut tbl = Element::new("w:tbl");
        tbl.attrs = self.attrs.clone();
        let children = self
            .leading
            .iter()
            .cloned()
            .chain(self.rows.iter().map(Row::to_element))
            .chain(self.trailing.iter().cloned());
        tbl.children = children.map(Node::Element).collect();
        tbl
    }

    /// Get the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of grid columns.
    ///
    /// Taken from `<w:tblGrid>`; tables without a grid report the widest row.
    pub fn column_count(&self) -> usize {
        let grid = self
            .leading
            .iter()
            .find(|e| e.is("tblGrid"))
            .map(|g| g.elements().filter(|c| c.is("gridCol")).count())
            .unwrap_or(0);
        if grid > 0 {
            grid
        } else {
            self.rows.iter().map(Row::column_span).max().unwrap_or(0)
        }
    }

    /// All rows in order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All rows, mutably.
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Get a row by index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Get a cell at the specified row and column index.
    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&Cell> {
        self.rows.get(row_idx)?.cells.get(col_idx)
    }

    /// Append a row at the end.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Insert a row so that it ends up at `index`.
    pub fn insert_row(&mut self, index: usize, row: Row) -> Result<()> {
        if index > self.rows.len() {
            return Err(self.out_of_range(index));
        }
        self.rows.insert(index, row);
        Ok(())
    }

    /// Detach the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.rows.remove(index))
    }

    /// Move the row at `from` so that it ends up at position `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        let row = self.remove_row(from)?;
        if to > self.rows.len() {
            // Put it back before failing so the table is unchanged
            self.rows.insert(from, row);
            return Err(self.out_of_range(to));
        }
        self.rows.insert(to, row);
        Ok(())
    }

    /// Text of the table: rows separated by newlines.
    pub fn text(&self) -> String {
        self.rows.iter().map(Row::text).collect::<Vec<_>>().join("\n")
    }

    fn out_of_range(&self, index: usize) -> OoxmlError {
        OoxmlError::RowOutOfRange {
            index,
            len: self.rows.len(),
        }
    }
}

/// A row in a table.
///
/// Represents a `<w:tr>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    attrs: Vec<(String, String)>,
    /// Non-cell children (`w:tblPrEx`, `w:trPr`), written before the cells
    properties: Vec<Element>,
    cells: Vec<Cell>,
}

impl Row {
    /// Build a row from a `<w:tr>` element.
    pub fn from_element(element: Element) -> Self {
        let mut row = Self {
            attrs: element.attrs,
            ..Self::default()
        };
        for node in element.children {
            let Node::Element(child) = node else { continue };
            if child.is("tc") {
                row.cells.push(Cell::from_element(child));
            } else {
                row.properties.push(child);
            }
        }
        row
    }

    /// Serialize into a `<w:tr>` element.
    pub fn to_element(&self) -> Element {
        let mut tr = Element::new("w:tr");
        tr.attrs = self.attrs.clone();
        tr.children = self
            .properties
            .iter()
            .cloned()
            .chain(self.cells.iter().map(Cell::to_element))
            .map(Node::Element)
            .collect();
        tr
    }

    /// Get the number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of grid columns covered by the cells of this row.
    pub fn column_span(&self) -> usize {
        self.cells.iter().map(Cell::grid_span).sum()
    }

    /// All cells in order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells, mutably.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cell texts joined with single spaces.
    pub fn text(&self) -> String {
        self.cells.iter().map(Cell::text).collect::<Vec<_>>().join(" ")
    }

    /// Check whether this row repeats as a header row (`w:tblHeader`).
    pub fn is_header(&self) -> bool {
        self.properties
            .iter()
            .filter(|p| p.is("trPr"))
            .filter_map(|p| p.child("tblHeader"))
            .any(|h| !matches!(h.attr("val"), Some("0" | "false" | "off")))
    }

    /// Create a row with this row's structure and formatting, holding `values`.
    ///
    /// Cell `i` gets `values[i]`; cells without a value are left empty and
    /// surplus values are ignored, so the cell count always matches. The
    /// header-row flag is not carried over.
    pub fn derive(&self, values: &[String]) -> Self {
        let properties = self
            .properties
            .iter()
            .map(|p| {
                let mut p = p.clone();
                if p.is("trPr") {
                    p.children
                        .retain(|n| !matches!(n, Node::Element(e) if e.is("tblHeader")));
                }
                p
            })
            .collect();
        Self {
            attrs: without_unique_ids(&self.attrs),
            properties,
            cells: self
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| cell.derive(values.get(i).map(String::as_str).unwrap_or("")))
                .collect(),
        }
    }
}

/// A cell in a table row.
///
/// Represents a `<w:tc>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    attrs: Vec<(String, String)>,
    /// `<w:tcPr>` element, if present
    properties: Option<Element>,
    content: Story,
}

impl Cell {
    /// Build a cell from a `<w:tc>` element.
    pub fn from_element(element: Element) -> Self {
        let mut properties = None;
        let mut rest = Vec::with_capacity(element.children.len());
        for node in element.children {
            match node {
                Node::Element(child) if child.is("tcPr") => properties = Some(child),
                other => rest.push(other),
            }
        }
        Self {
            attrs: element.attrs,
            properties,
            content: Story::from_nodes(rest),
        }
    }

    /// Serialize into a `<w:tc>` element.
    pub fn to_element(&self) -> Element {
        let mut tc = Element::new("w:tc");
        tc.attrs = self.attrs.clone();
        if let Some(tcpr) = &self.properties {
            tc.children.push(Node::Element(tcpr.clone()));
        }
        tc.children.extend(self.content.to_nodes());
        if self.content.paragraphs().next().is_none() {
            // A cell must end with a paragraph
            tc.children.push(Node::Element(Paragraph::new().to_element()));
        }
        tc
    }

    /// Get the grid span (horizontal merge/colspan) of this cell.
    ///
    /// Returns the number of columns this cell spans. A value of 1 (default) means no merge.
    /// This corresponds to the `<w:gridSpan>` element in OOXML.
    pub fn grid_span(&self) -> usize {
        self.properties
            .as_ref()
            .and_then(|p| p.child("gridSpan"))
            .and_then(|g| g.attr("val"))
            .and_then(|v| v.parse().ok())
            .unwrap_or(1)
    }

    /// Get the vertical merge (rowspan) state of this cell.
    pub fn v_merge(&self) -> Option<VMergeState> {
        let v_merge = self.properties.as_ref()?.child("vMerge")?;
        match v_merge.attr("val") {
            Some("restart") => Some(VMergeState::Restart),
            _ => Some(VMergeState::Continue),
        }
    }

    /// Get the text content of this cell.
    ///
    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// The blocks of this cell.
    pub fn content(&self) -> &Story {
        &self.content
    }

    /// The blocks of this cell, mutably.
    pub fn content_mut(&mut self) -> &mut Story {
        &mut self.content
    }

    /// Create a cell with this cell's properties holding a single paragraph.
    ///
    /// The paragraph copies the properties and first-run format of this
    /// cell's first paragraph. Vertical merges are not carried over.
    pub fn derive(&self, text: &str) -> Self {
        let properties = self.properties.as_ref().map(|p| {
            let mut p = p.clone();
            p.children
                .retain(|n| !matches!(n, Node::Element(e) if e.is("vMerge")));
            p
        });
        let paragraph = match self.content.paragraphs().next() {
            Some(first) => first.clone_with_text(text),
            None => Paragraph::with_text(text, Default::default()),
        };
        let mut content = Story::new();
        content.push(Block::Paragraph(paragraph));
        Self {
            attrs: without_unique_ids(&self.attrs),
            properties,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xml::parse;

    fn row_xml(cells: &[&str]) -> String {
        let cells: String = cells
            .iter()
            .map(|c| format!(r#"<w:tc><w:tcPr><w:tcW w:w="2000"/></w:tcPr><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{c}</w:t></w:r></w:p></w:tc>"#))
            .collect();
        format!(r#"<w:tr w14:paraId="0A0B0C0D"><w:trPr><w:cantSplit/></w:trPr>{cells}</w:tr>"#)
    }

    fn table(rows: &[&[&str]]) -> Table {
        let rows: String = rows.iter().map(|r| row_xml(r)).collect();
        let xml = format!(
            r#"<w:tbl xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml"><w:tblPr/><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>{rows}</w:tbl>"#
        );
        Table::from_element(parse(xml.as_bytes()).unwrap().root)
    }

    #[test]
    fn test_cell_text() {
        let t = table(&[&["Salary", "100"], &["Total", "100"]]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.cell(1, 0).unwrap().text(), "Total");
        assert_eq!(t.row(0).unwrap().text(), "Salary 100");
        assert_eq!(t.text(), "Salary 100\nTotal 100");
    }

    #[test]
    fn test_remove_row() {
        let mut t = table(&[&["a", "1"], &["b", "2"], &["c", "3"]]);
        let removed = t.remove_row(1).unwrap();
        assert_eq!(removed.text(), "b 2");
        assert_eq!(t.text(), "a 1\nc 3");
        assert!(matches!(
            t.remove_row(5),
            Err(OoxmlError::RowOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_move_row() {
        let mut t = table(&[&["a", "1"], &["b", "2"], &["c", "3"]]);
        t.move_row(2, 0).unwrap();
        assert_eq!(t.text(), "c 3\na 1\nb 2");
        assert!(t.move_row(0, 9).is_err());
        assert_eq!(t.text(), "c 3\na 1\nb 2");
    }

    #[test]
    fn test_derive_row_keeps_structure() {
        let t = table(&[&["Salary", "100"]]);
        let template = t.row(0).unwrap();
        let derived = template.derive(&["Transport".to_string()]);

        assert_eq!(derived.cell_count(), template.cell_count());
        assert_eq!(derived.text(), "Transport ");
        let xml = derived.to_element().to_xml_string();
        assert!(!xml.contains("paraId"));
        assert!(xml.contains("<w:cantSplit/>"));
        assert!(xml.contains(r#"<w:tcW w:w="2000"/>"#));
        assert!(xml.contains("<w:b/>"));
    }

    #[test]
    fn test_derive_drops_header_flag() {
        let xml = format!(
            r#"<w:tbl xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:tblGrid/><w:tr><w:trPr><w:cantSplit/><w:tblHeader/></w:trPr><w:tc><w:p><w:r><w:t>CONCEPT</w:t></w:r></w:p></w:tc></w:tr>{}</w:tbl>"#,
            r#"<w:tr><w:tc><w:p><w:r><w:t>TOTAL</w:t></w:r></w:p></w:tc></w:tr>"#
        );
        let t = Table::from_element(parse(xml.as_bytes()).unwrap().root);
        assert!(t.row(0).unwrap().is_header());
        assert!(!t.row(1).unwrap().is_header());

        let derived = t.row(0).unwrap().derive(&["TRANSPORT".to_string()]);
        assert!(!derived.is_header());
        let xml = derived.to_element().to_xml_string();
        assert!(xml.contains("<w:trPr><w:cantSplit/></w:trPr>"));
    }

    #[test]
    fn test_merges() {
        let xml = r#"<w:tc xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:tcPr><w:gridSpan w:val="2"/><w:vMerge w:val="restart"/></w:tcPr><w:p/></w:tc>"#;
        let cell = Cell::from_element(parse(xml.as_bytes()).unwrap().root);
        assert_eq!(cell.grid_span(), 2);
        assert_eq!(cell.v_merge(), Some(VMergeState::Restart));

        let derived = cell.derive("x");
        assert_eq!(derived.grid_span(), 2);
        assert_eq!(derived.v_merge(), None);
    }

    #[test]
    fn test_empty_cell_gets_paragraph() {
        let cell = Cell::default();
        let xml = cell.to_element().to_xml_string();
        assert!(xml.contains("<w:p/>"));
    }
}
