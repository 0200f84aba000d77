//! Conditional row removal and insertion.

use crate::ooxml::docx::{Row, Table};
use crate::ooxml::error::Result;
use log::{debug, warn};

/// What a directive does to the row it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Detach the first row matching `include`
    Remove,
    /// Add a row holding `cells`, placed before the first row matching `anchor`
    InsertBefore { anchor: String, cells: Vec<String> },
}

/// A resolved row edit.
///
/// `include` selects the target row for removal and, for insertions,
/// identifies an already inserted row so that the edit is not repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDirective {
    pub include: String,
    pub exclude: Vec<String>,
    /// Only tables whose text contains this keyword are touched
    pub scope: Option<String>,
    pub action: RowAction,
}

impl RowDirective {
    /// Remove the row matching `include` unless it mentions one of `exclude`.
    pub fn remove(include: impl Into<String>, exclude: &[&str]) -> Self {
        Self {
            include: include.into(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            scope: None,
            action: RowAction::Remove,
        }
    }

    /// Insert a row before the row matching `anchor`.
    pub fn insert_before(include: impl Into<String>, anchor: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            include: include.into(),
            exclude: Vec::new(),
            scope: None,
            action: RowAction::InsertBefore {
                anchor: anchor.into(),
                cells,
            },
        }
    }

    /// Restrict the directive to tables containing `keyword`.
    pub fn in_tables_containing(mut self, keyword: impl Into<String>) -> Self {
        self.scope = Some(keyword.into());
        self
    }

    fn applies_to(&self, table: &Table) -> bool {
        match &self.scope {
            Some(keyword) => contains_ignore_case(&table.text(), keyword),
            None => true,
        }
    }
}

/// Where an inserted row ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Placed right before the anchor row, now at this index
    InsertedBefore(usize),
    /// No anchor row was found; the row stays last
    AppendedAtEnd,
}

/// Counts of the edits made to the tables of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowReport {
    pub removed: usize,
    pub inserted: usize,
    /// Insertions that fell back to the end of the table
    pub anchors_missing: usize,
}

impl RowReport {
    pub(crate) fn merge(&mut self, other: RowReport) {
        self.removed += other.removed;
        self.inserted += other.inserted;
        self.anchors_missing += other.anchors_missing;
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Find the first row whose text contains `include` and none of `exclude`.
///
/// Matching ignores case and runs over the row's cell texts joined by spaces.
pub fn find_row<S: AsRef<str>>(table: &Table, include: &str, exclude: &[S]) -> Option<usize> {
    if include.is_empty() {
        return None;
    }
    table.rows().iter().position(|row| {
        let text = row.text();
        contains_ignore_case(&text, include)
            && !exclude
                .iter()
                .any(|e| !e.as_ref().is_empty() && contains_ignore_case(&text, e.as_ref()))
    })
}

/// Detach the row at `index`.
pub fn remove_row(table: &mut Table, index: usize) -> Result<Row> {
    let row = table.remove_row(index)?;
    debug!("removed row {index}: {:?}", row.text());
    Ok(row)
}

/// Detach several rows, highest index first so the others stay valid.
///
/// Duplicate indices are removed once. Returns the number of rows removed.
pub fn remove_rows(table: &mut Table, indices: &[usize]) -> Result<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    for &index in &sorted {
        remove_row(table, index)?;
    }
    Ok(sorted.len())
}

/// Append a row holding `values` and move it before the row matching `anchor`.
///
/// The new row copies the structure and formatting of the nearest
/// non-header row above the anchor (or from the end when there is no
/// anchor), falling back to the first non-header row below it. When no row
/// matches the anchor, the new row is left at the end.
pub fn insert_row_before(table: &mut Table, anchor: &str, values: &[String]) -> Result<RowOutcome> {
    if table.row_count() == 0 {
        return Err(crate::ooxml::error::OoxmlError::InvalidStructure(
            "cannot insert into a table without rows".to_string(),
        ));
    }
    let anchor_index = find_row::<&str>(table, anchor, &[]);
    let preferred = match anchor_index {
        Some(i) => i.saturating_sub(1),
        None => table.row_count() - 1,
    };
    let rows = table.rows();
    let template_index = (0..=preferred)
        .rev()
        .find(|&i| !rows[i].is_header())
        .or_else(|| (preferred..rows.len()).find(|&i| !rows[i].is_header()))
        .unwrap_or(preferred);
    let template = &rows[template_index];

    if values.len() != template.cell_count() {
        warn!(
            "inserting {} value(s) into a row of {} cell(s)",
            values.len(),
            template.cell_count()
        );
    }
    let row = template.derive(values);
    table.push_row(row);

    let last = table.row_count() - 1;
    match anchor_index {
        Some(target) => {
            table.move_row(last, target)?;
            debug!("inserted row before {anchor:?} at {target}");
            Ok(RowOutcome::InsertedBefore(target))
        },
        None => {
            warn!("anchor row {anchor:?} not found, row appended at end of table");
            Ok(RowOutcome::AppendedAtEnd)
        },
    }
}

/// Apply every directive to one table: removals first, then insertions.
pub fn apply(table: &mut Table, directives: &[RowDirective]) -> Result<RowReport> {
    let mut report = RowReport::default();

    let removals: Vec<usize> = directives
        .iter()
        .filter(|d| d.action == RowAction::Remove && d.applies_to(table))
        .filter_map(|d| find_row(table, &d.include, &d.exclude))
        .collect();
    report.removed = remove_rows(table, &removals)?;

    for directive in directives {
        let RowAction::InsertBefore { anchor, cells } = &directive.action else {
            continue;
        };
        if !directive.applies_to(table) {
            continue;
        }
        if find_row(table, &directive.include, &directive.exclude).is_some() {
            debug!("row {:?} already present, not inserted", directive.include);
            continue;
        }
        report.inserted += 1;
        if insert_row_before(table, anchor, cells)? == RowOutcome::AppendedAtEnd {
            report.anchors_missing += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::fixtures;
    use crate::ooxml::xml::parse;

    fn table(rows: &[&[&str]]) -> Table {
        let xml = fixtures::table(rows).replacen(
            "<w:tbl>",
            r#"<w:tbl xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            1,
        );
        Table::from_element(parse(xml.as_bytes()).unwrap().root)
    }

    fn payroll() -> Table {
        table(&[
            &["CONCEPT", "DETAIL", "VALUE", "NOTE"],
            &["SALARY", "FULL MONTH", "2.000.000", ""],
            &["SECURITY BONUS", "FULL MONTH", "200.000", ""],
            &["EXTRA SHIFTS", "0 SHIFTS", "0", ""],
            &["TOTAL", "", "2.200.000", ""],
        ])
    }

    fn first_cells(table: &Table) -> Vec<String> {
        table.rows().iter().map(|r| r.cells()[0].text()).collect()
    }

    #[test]
    fn test_find_row_with_exclusions() {
        let t = table(&[&["BASE SALARY", "BONUS"], &["BONUS", "x"], &["TOTAL", "y"]]);
        assert_eq!(find_row(&t, "bonus", &["salary"]), Some(1));
        assert_eq!(find_row::<&str>(&t, "bonus", &[]), Some(0));
        assert_eq!(find_row::<&str>(&t, "missing", &[]), None);
        assert_eq!(find_row::<&str>(&t, "", &[]), None);
    }

    #[test]
    fn test_remove_matched_row() {
        let mut t = payroll();
        let before: Vec<String> = t.rows().iter().map(Row::text).collect();

        let report = apply(&mut t, &[RowDirective::remove("extra shifts", &[])]).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(t.row_count(), 4);
        assert_eq!(first_cells(&t), vec!["CONCEPT", "SALARY", "SECURITY BONUS", "TOTAL"]);

        let after: Vec<String> = t.rows().iter().map(Row::text).collect();
        let expected: Vec<String> = before.into_iter().filter(|r| !r.starts_with("EXTRA")).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_remove_rows_descending() {
        let mut t = payroll();
        assert_eq!(remove_rows(&mut t, &[1, 3, 1]).unwrap(), 2);
        assert_eq!(first_cells(&t), vec!["CONCEPT", "SECURITY BONUS", "TOTAL"]);
    }

    #[test]
    fn test_insert_before_anchor() {
        let mut t = payroll();
        apply(&mut t, &[RowDirective::remove("extra shifts", &[])]).unwrap();

        let cells: Vec<String> = ["TRANSPORT ALLOWANCE", "FULL MONTH", "45.000", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outcome = insert_row_before(&mut t, "total", &cells).unwrap();

        assert_eq!(outcome, RowOutcome::InsertedBefore(3));
        assert_eq!(t.row_count(), 5);
        assert_eq!(
            first_cells(&t),
            vec!["CONCEPT", "SALARY", "SECURITY BONUS", "TRANSPORT ALLOWANCE", "TOTAL"]
        );
        let inserted: Vec<String> = t.rows()[3].cells().iter().map(|c| c.text()).collect();
        assert_eq!(inserted, cells);
    }

    #[test]
    fn test_insert_without_anchor_appends() {
        let mut t = table(&[&["A", "1"], &["B", "2"]]);
        let outcome = insert_row_before(&mut t, "total", &["C".to_string(), "3".to_string()]).unwrap();
        assert_eq!(outcome, RowOutcome::AppendedAtEnd);
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.rows()[2].text(), "C 3");
    }

    #[test]
    fn test_insert_not_repeated() {
        let mut t = payroll();
        let directive = RowDirective::insert_before(
            "transport",
            "total",
            vec!["TRANSPORT ALLOWANCE".to_string(), "FULL MONTH".to_string(), "45.000".to_string(), String::new()],
        );
        let first = apply(&mut t, std::slice::from_ref(&directive)).unwrap();
        let second = apply(&mut t, std::slice::from_ref(&directive)).unwrap();
        assert_eq!(first.inserted, 1);
        assert_eq!(second.inserted, 0);
        assert_eq!(t.row_count(), 6);
    }

    #[test]
    fn test_scope_limits_tables() {
        let mut t = payroll();
        let directive = RowDirective::remove("salary", &[]).in_tables_containing("INVOICE");
        let report = apply(&mut t, &[directive]).unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(t.row_count(), 5);
    }

    #[test]
    fn test_missing_anchor_reported() {
        let mut t = table(&[&["A", "1"]]);
        let directive = RowDirective::insert_before("new", "nowhere", vec!["NEW".to_string(), "2".to_string()]);
        let report = apply(&mut t, &[directive]).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.anchors_missing, 1);
    }

    #[test]
    fn test_insert_after_header_row_copies_body_row() {
        let xml = fixtures::table(&[&["CONCEPT", "VALUE"], &["TOTAL", "100"]])
            .replacen(
                "<w:tbl>",
                r#"<w:tbl xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                1,
            )
            .replacen("<w:tr>", "<w:tr><w:trPr><w:tblHeader/></w:trPr>", 1)
            .replacen("<w:r><w:t", "<w:r><w:rPr><w:b/></w:rPr><w:t", 1);
        let mut t = Table::from_element(parse(xml.as_bytes()).unwrap().root);
        assert!(t.rows()[0].is_header());

        let outcome = insert_row_before(&mut t, "total", &["TRANSPORT".to_string(), "45".to_string()]).unwrap();
        assert_eq!(outcome, RowOutcome::InsertedBefore(1));

        let inserted = &t.rows()[1];
        assert_eq!(inserted.text(), "TRANSPORT 45");
        assert!(!inserted.is_header());
        let xml = inserted.to_element().to_xml_string();
        assert!(!xml.contains("tblHeader"));
        assert!(!xml.contains("<w:b/>"));
    }

    #[test]
    fn test_insert_into_empty_table_fails() {
        let mut t = Table::default();
        assert!(insert_row_before(&mut t, "total", &["x".to_string()]).is_err());
    }
}
