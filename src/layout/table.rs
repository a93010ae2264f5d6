use crate::blocks::{BlockKind, ContentBlock, FontSpec, TableBlock};
use crate::layout::{Measure, TableLayout};
use crate::units::Mm;
use crate::PDFError;
use log::debug;

/// How far explicit column fractions may stray from summing to one
const FRACTION_TOLERANCE: f32 = 1e-3;

/// Horizontal padding inside every cell, on each side
pub const CELL_PADDING: Mm = Mm(1.0);

const CURRENCY_MARKS: [char; 3] = ['£', '$', '€'];

/// Check the explicit column fractions of a table, if it has any
pub fn validate_columns(table: &TableBlock) -> Result<(), PDFError> {
    let Some(fractions) = &table.column_widths else {
        return Ok(());
    };

    let columns = table.column_count();
    if fractions.len() != columns {
        return Err(PDFError::ColumnCountMismatch {
            columns,
            widths: fractions.len(),
        });
    }

    let sum: f32 = fractions.iter().sum();
    if (sum - 1.0).abs() > FRACTION_TOLERANCE {
        return Err(PDFError::ColumnWidthMismatch { sum });
    }
    Ok(())
}

/// Check every table in a block list before anything is drawn, so a bad
/// table never leaves a half-rendered document behind
pub fn validate_tables(blocks: &[ContentBlock]) -> Result<(), PDFError> {
    blocks
        .iter()
        .filter_map(|block| match &block.kind {
            BlockKind::Table(table) => Some(table),
            _ => None,
        })
        .try_for_each(validate_columns)
}

/// Parse a cell as a number, ignoring currency marks, thousands separators
/// and surrounding whitespace
fn parse_amount(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| !CURRENCY_MARKS.contains(c) && *c != ',')
        .collect();
    cleaned.trim().parse().ok()
}

/// A row summing the last column of the body rows (the heading row is
/// skipped, as are cells that are not numbers). The sum is printed with the
/// currency mark of the first body cell that carries one
pub fn total_row(rows: &[Vec<String>], columns: usize) -> Vec<String> {
    let body = rows.iter().skip(1).filter_map(|row| row.last());

    let mut mark = None;
    let mut sum = 0.0;
    for cell in body {
        if mark.is_none() {
            mark = cell.chars().find(|c| CURRENCY_MARKS.contains(c));
        }
        if let Some(amount) = parse_amount(cell) {
            sum += amount;
        }
    }

    let total = match mark {
        Some(mark) => format!("{mark}{sum:.2}"),
        None => format!("{sum:.2}"),
    };

    let mut row = vec![String::new(); columns.max(1)];
    if columns > 1 {
        row[0] = "Total".to_string();
    }
    if let Some(last) = row.last_mut() {
        *last = total;
    }
    row
}

/// Resolve the absolute width of every column of a table `width` wide.
///
/// Explicit fractions are scaled to the width. Without them, each column gets
/// a share proportional to its widest cell, and equal shares when every cell
/// is empty
pub fn resolve_columns<M: Measure + ?Sized>(
    table: &TableBlock,
    rows: &[Vec<String>],
    font: &FontSpec,
    heading_font: &FontSpec,
    width: Mm,
    measure: &M,
) -> Result<Vec<Mm>, PDFError> {
    validate_columns(table)?;
    let columns = table.column_count();

    if let Some(fractions) = &table.column_widths {
        return Ok(fractions.iter().map(|f| width * *f).collect());
    }

    let mut widest = vec![Mm(0.0); columns];
    for (r, row) in rows.iter().enumerate() {
        let font = if r == 0 { heading_font } else { font };
        for (c, cell) in row.iter().enumerate() {
            let cell_width = measure.text_width(font, cell)? + CELL_PADDING * 2.0;
            widest[c] = widest[c].max(cell_width);
        }
    }

    let total: Mm = widest.iter().copied().sum();
    if total <= Mm(0.0) {
        return Ok(vec![width / columns.max(1) as f32; columns]);
    }
    Ok(widest.into_iter().map(|w| width * (w / total)).collect())
}

/// Turn a table block into a fully resolved layout starting at `x` inside
/// `available` width
pub fn table_layout<M: Measure + ?Sized>(
    table: &TableBlock,
    default_font: &FontSpec,
    x: Mm,
    available: Mm,
    measure: &M,
) -> Result<TableLayout, PDFError> {
    let font = table.font.clone().unwrap_or_else(|| default_font.clone());
    let heading_font = font.clone().bold().coloured(table.heading_text_colour);
    let columns = table.column_count();

    let mut rows = table.rows.clone();
    if table.add_total {
        rows.push(total_row(&table.rows, columns));
    }

    let width = available * table.width.unwrap_or(1.0).clamp(0.0, 1.0);
    let widths = resolve_columns(table, &rows, &font, &heading_font, width, measure)?;
    debug!("table of {} rows, columns {:?}", rows.len(), widths);

    Ok(TableLayout {
        x,
        columns: widths,
        alignments: (0..columns).map(|c| table.column_alignment(c)).collect(),
        rows,
        font,
        heading_font,
        heading_fill: table.heading_colour,
        stripe_fill: table.striped_colour,
        line_height: table.row_line_height,
        cell_padding: CELL_PADDING,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mono;

    impl Measure for Mono {
        fn measure(&self, _: &FontSpec, _: &str, _: Mm, _: f32) -> Result<Mm, PDFError> {
            Ok(Mm(5.0))
        }

        fn text_width(&self, _: &FontSpec, text: &str) -> Result<Mm, PDFError> {
            Ok(Mm(text.chars().count() as f32))
        }

        fn line_advance(&self, _: &FontSpec, _: f32) -> Mm {
            Mm(5.0)
        }

        fn measure_table(&self, table: &TableLayout) -> Result<Mm, PDFError> {
            Ok(Mm(5.0) * table.rows.len() as f32)
        }
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let mut table = TableBlock::new(rows(&[&["a", "b"], &["1", "2"]]));
        table.column_widths = Some(vec![0.5, 0.5]);
        assert!(validate_columns(&table).is_ok());

        table.column_widths = Some(vec![0.5, 0.6]);
        match validate_columns(&table) {
            Err(PDFError::ColumnWidthMismatch { sum }) => assert!((sum - 1.1).abs() < 1e-6),
            other => panic!("expected a width mismatch, got {other:?}"),
        }

        table.column_widths = Some(vec![1.0]);
        assert!(matches!(
            validate_columns(&table),
            Err(PDFError::ColumnCountMismatch {
                columns: 2,
                widths: 1
            })
        ));
    }

    #[test]
    fn explicit_fractions_scale_to_width() {
        let mut table = TableBlock::new(rows(&[&["a", "b"]]));
        table.column_widths = Some(vec![0.25, 0.75]);
        let font = FontSpec::default();
        let widths = resolve_columns(&table, &table.rows, &font, &font, Mm(100.0), &Mono)
            .expect("valid fractions");
        assert_eq!(widths, vec![Mm(25.0), Mm(75.0)]);
    }

    #[test]
    fn auto_fit_follows_widest_cell() {
        // widest cells are 2 and 6 characters, plus 2mm padding each
        let table = TableBlock::new(rows(&[&["ab", "c"], &["d", "efghij"]]));
        let font = FontSpec::default();
        let widths = resolve_columns(&table, &table.rows, &font, &font, Mm(120.0), &Mono)
            .expect("no fractions to validate");
        assert!((widths[0].0 - 40.0).abs() < 1e-4);
        assert!((widths[1].0 - 80.0).abs() < 1e-4);
    }

    #[test]
    fn total_row_sums_last_column() {
        let data = rows(&[
            &["Item", "Price"],
            &["Tea", "£1,200.50"],
            &["Cake", "£3.25"],
            &["Note", "n/a"],
        ]);
        assert_eq!(total_row(&data, 2), vec!["Total", "£1203.75"]);
        assert_eq!(total_row(&rows(&[&["n"], &["2"], &["3"]]), 1), vec!["5.00"]);
    }

    #[test]
    fn layout_appends_total_and_bolds_heading() {
        let mut table = TableBlock::new(rows(&[&["Item", "Qty"], &["Pen", "4"]]));
        table.add_total = true;
        table.width = Some(0.5);
        let layout = table_layout(&table, &FontSpec::default(), Mm(10.0), Mm(200.0), &Mono)
            .expect("valid table");
        assert_eq!(layout.rows.len(), 3);
        assert!((layout.width().0 - 100.0).abs() < 1e-3);
        assert!(layout.heading_font.style.bold);
        assert!(!layout.font.style.bold);
    }
}
