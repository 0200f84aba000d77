/// Block-level content shared by the body, table cells, headers and footers.
use crate::ooxml::docx::paragraph::Paragraph;
use crate::ooxml::docx::table::Table;
use crate::ooxml::opc::PackURI;
use crate::ooxml::xml::{Element, Node};
use smallvec::SmallVec;
use std::fmt;

/// One block-level item of a story.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A `<w:p>` element
    Paragraph(Paragraph),
    /// A `<w:tbl>` element
    Table(Table),
    /// Anything else (`w:sectPr`, content controls, bookmarks), kept verbatim
    Other(Element),
}

/// An ordered sequence of blocks.
///
/// The document body, every table cell and every header/footer part hold a
/// `Story`. Cells nest stories, so visitors recurse through tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Story {
    blocks: Vec<Block>,
}

impl Story {
    /// Create an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a story from the child nodes of a container element.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let blocks = nodes
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(el) if el.is("p") => Some(Block::Paragraph(Paragraph::from_element(el))),
                Node::Element(el) if el.is("tbl") => Some(Block::Table(Table::from_element(el))),
                Node::Element(el) => Some(Block::Other(el)),
                // Inter-element whitespace and comments
                _ => None,
            })
            .collect();
        Self { blocks }
    }

    /// Serialize back into child nodes.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.blocks
            .iter()
            .map(|block| {
                Node::Element(match block {
                    Block::Paragraph(p) => p.to_element(),
                    Block::Table(t) => t.to_element(),
                    Block::Other(el) => el.clone(),
                })
            })
            .collect()
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Top-level paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Top-level paragraphs, mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Top-level tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Top-level tables, mutably.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Text of the story: paragraphs and tables separated by newlines.
    pub fn text(&self) -> String {
        let mut parts = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => parts.push(p.text()),
                Block::Table(t) => parts.push(t.text()),
                Block::Other(_) => {},
            }
        }
        parts.join("\n")
    }

    /// Visit every paragraph, descending into table cells.
    pub fn for_each_paragraph_mut<F: FnMut(&mut Paragraph)>(&mut self, f: &mut F) {
        for block in &mut self.blocks {
            match block {
                Block::Paragraph(p) => f(p),
                Block::Table(t) => {
                    for row in t.rows_mut() {
                        for cell in row.cells_mut() {
                            cell.content_mut().for_each_paragraph_mut(f);
                        }
                    }
                },
                Block::Other(_) => {},
            }
        }
    }

    /// Visit every table, outer tables before the tables nested in their cells.
    pub fn for_each_table_mut<F: FnMut(&mut Table)>(&mut self, f: &mut F) {
        for table in self.tables_mut() {
            f(table);
            for row in table.rows_mut() {
                for cell in row.cells_mut() {
                    cell.content_mut().for_each_table_mut(f);
                }
            }
        }
    }

    /// Visit every paragraph with its location inside `origin`.
    pub fn visit_paragraphs<'a, F: FnMut(&Location, &'a Paragraph)>(&'a self, origin: &Location, f: &mut F) {
        let mut table_index = 0;
        for block in &self.blocks {
            match block {
                Block::Paragraph(p) => f(origin, p),
                Block::Table(t) => {
                    for (r, row) in t.rows().iter().enumerate() {
                        for (c, cell) in row.cells().iter().enumerate() {
                            let inner = origin.enter(table_index, r, c);
                            cell.content().visit_paragraphs(&inner, f);
                        }
                    }
                    table_index += 1;
                },
                Block::Other(_) => {},
            }
        }
    }
}

/// The story a paragraph belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryKind {
    Body,
    Header(PackURI),
    Footer(PackURI),
}

/// Position of one table cell: table index in its story, row and cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub table: usize,
    pub row: usize,
    pub cell: usize,
}

/// Where a paragraph lives: its story plus the chain of table cells around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub story: StoryKind,
    pub cells: SmallVec<[CellRef; 2]>,
}

impl Location {
    /// Top level of a story.
    pub fn new(story: StoryKind) -> Self {
        Self {
            story,
            cells: SmallVec::new(),
        }
    }

    fn enter(&self, table: usize, row: usize, cell: usize) -> Self {
        let mut inner = self.clone();
        inner.cells.push(CellRef { table, row, cell });
        inner
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.story {
            StoryKind::Body => write!(f, "body")?,
            StoryKind::Header(uri) => write!(f, "header({uri})")?,
            StoryKind::Footer(uri) => write!(f, "footer({uri})")?,
        }
        for c in &self.cells {
            write!(f, "/table[{}]/row[{}]/cell[{}]", c.table, c.row, c.cell)?;
        }
        Ok(())
    }
}
