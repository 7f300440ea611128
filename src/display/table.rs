// Fixed-width text table rendering
// Author: Gabriel Demetrios Lafis

use super::Tabular;

const ELLIPSIS: char = '…';

/// Renders rows sharing one shape as a table whose columns all have the same fixed width
#[derive(Debug, Clone, Copy)]
pub struct TableFormatter {
    column_width: usize,
}

impl TableFormatter {
    pub fn new(column_width: usize) -> Self {
        TableFormatter {
            column_width: column_width.max(1),
        }
    }

    pub fn column_width(&self) -> usize {
        self.column_width
    }

    /// Render `rows`; an empty slice renders as `(empty)`
    pub fn render<T: Tabular>(&self, rows: &[T]) -> String {
        let first = match rows.first() {
            Some(first) => first,
            None => return "(empty)\n".to_string(),
        };

        let columns = Self::headers(first).len();
        let mut out = self.render_header(first);
        for row in rows {
            out.push_str(&self.line(&row.cells(), columns));
        }
        out.push_str(&self.separator(columns));
        out
    }

    /// Render only the header of a table shaped like `shape`
    pub fn render_header<T: Tabular>(&self, shape: &T) -> String {
        let headers = Self::headers(shape);
        let separator = self.separator(headers.len());
        let mut out = separator.clone();
        out.push_str(&self.line(&headers, headers.len()));
        out.push_str(&separator);
        out
    }

    fn headers<T: Tabular>(shape: &T) -> Vec<String> {
        shape.column_names().unwrap_or_else(|| {
            (0..shape.cells().len())
                .map(|i| format!("Field{}", i))
                .collect()
        })
    }

    /// Fit `content` into exactly `column_width` characters
    pub fn fit(&self, content: &str) -> String {
        let width = self.column_width;
        let length = content.chars().count();

        if length > width {
            let mut cell: String = content.chars().take(width - 1).collect();
            cell.push(ELLIPSIS);
            cell
        } else {
            let mut cell = content.to_string();
            cell.extend(std::iter::repeat(' ').take(width - length));
            cell
        }
    }

    fn separator(&self, columns: usize) -> String {
        let mut line = String::from("+");
        for _ in 0..columns {
            line.push_str(&"-".repeat(self.column_width));
            line.push('+');
        }
        line.push('\n');
        line
    }

    // Missing cells render blank, extra cells are dropped
    fn line(&self, cells: &[String], columns: usize) -> String {
        let mut line = String::from("|");
        for i in 0..columns {
            let content = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&self.fit(content));
            line.push('|');
        }
        line.push('\n');
        line
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(super::DEFAULT_COLUMN_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_cell_is_truncated_with_ellipsis() {
        let formatter = TableFormatter::new(5);
        assert_eq!(formatter.fit("abcdefgh"), "abcd…");
        assert_eq!(formatter.fit("abcde"), "abcde");
        assert_eq!(formatter.fit("ab"), "ab   ");
    }

    #[test]
    fn test_every_line_has_the_same_width() {
        let formatter = TableFormatter::new(6);
        let rendered = formatter.render(&[(1, "short"), (2, "a much longer value")]);
        let widths: Vec<usize> = rendered.lines().map(|l| l.chars().count()).collect();

        assert!(widths.iter().all(|&w| w == widths[0]));
        assert!(rendered.contains("|Field0|Field1|"));
        assert!(rendered.contains("a muc…"));
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<i64> = Vec::new();
        assert_eq!(TableFormatter::default().render(&rows), "(empty)\n");
    }
}
