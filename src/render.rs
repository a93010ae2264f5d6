//! Rendering whole letters: the body flow followed by a decoration pass over
//! every page.

use crate::blocks::{ContentBlock, PageNumberPosition, Template};
use crate::canvas::PdfCanvas;
use crate::layout::{validate_tables, Bands, Canvas, Cursor, LayoutEngine, TextStyle};
use crate::units::Mm;
use crate::PDFError;
use log::debug;
use std::path::Path;

/// Render `blocks` on the template's pages and return the PDF bytes
pub fn render(template: &Template, blocks: &[ContentBlock]) -> Result<Vec<u8>, PDFError> {
    let mut canvas = PdfCanvas::new(template);
    lay_out(template, blocks, &mut canvas)?;
    canvas.finish()
}

/// Render `blocks` on the template's pages into a PDF file at `path`
pub fn render_to_file<P: AsRef<Path>>(
    template: &Template,
    blocks: &[ContentBlock],
    path: P,
) -> Result<(), PDFError> {
    let bytes = render(template, blocks)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Lay out a complete letter on any canvas that has not started a page yet.
///
/// Every table is checked before the first page opens. The header and
/// footer are measured first so their bands can be kept clear while the body
/// flows, and drawn onto the finished pages afterwards, together with the
/// background image, page numbers and blocks pinned to particular pages
pub fn lay_out<C: Canvas>(
    template: &Template,
    blocks: &[ContentBlock],
    canvas: &mut C,
) -> Result<(), PDFError> {
    validate_tables(blocks)?;
    validate_tables(&template.header)?;
    validate_tables(&template.footer)?;

    let mut engine = LayoutEngine::new(canvas, template);
    let header = if template.has_header() {
        engine.measure_height(&template.header)?
    } else {
        Mm(0.0)
    };
    let footer = if template.has_footer() {
        engine.measure_height(&template.footer)?
    } else {
        Mm(0.0)
    };
    debug!("reserving {header} for the header and {footer} for the footer");

    let canvas = engine.canvas_mut();
    canvas.reserve_bands(Bands {
        header,
        header_pages: template.header_pages,
        footer,
        footer_pages: template.footer_pages,
    });
    canvas.add_page()?;
    canvas.set_font(&template.default_font)?;

    engine.run(blocks)?;
    decorate(&mut engine, template, blocks, footer)
}

fn decorate<C: Canvas>(
    engine: &mut LayoutEngine<'_, C>,
    template: &Template,
    blocks: &[ContentBlock],
    footer: Mm,
) -> Result<(), PDFError> {
    let total = engine.canvas().page_count();
    let page_height = engine.canvas().page_size().1;

    for page in 1..=total {
        debug!("decorating page {page} of {total}");
        engine.canvas_mut().select_page(page)?;

        if let Some(background) = &template.background_image {
            engine.canvas_mut().set_background(background)?;
        }
        if template.has_header() && template.header_pages.covers(page, total) {
            engine.place_band(&template.header, template.margins.top)?;
        }
        if template.has_footer() && template.footer_pages.covers(page, total) {
            let top = page_height - template.margins.bottom - footer;
            engine.place_band(&template.footer, top)?;
        }
        if template.page_numbers {
            number_page(engine.canvas_mut(), template, page, total)?;
        }

        engine.place_pinned(&template.header, page, total)?;
        engine.place_pinned(&template.footer, page, total)?;
        engine.place_pinned(blocks, page, total)?;
    }
    Ok(())
}

/// Print the page number centred vertically in the top or bottom margin
fn number_page<C: Canvas>(
    canvas: &mut C,
    template: &Template,
    page: usize,
    total: usize,
) -> Result<(), PDFError> {
    let font = &template.default_font;
    let text = template.page_number_text(page, total);
    let margins = template.margins;
    let (width, height) = canvas.page_size();
    let advance = canvas.line_advance(font, 1.2);

    let y = match template.page_number_position {
        PageNumberPosition::Top => (margins.top - advance) / 2.0,
        PageNumberPosition::Bottom => height - margins.bottom + (margins.bottom - advance) / 2.0,
    };
    let style = TextStyle {
        alignment: template.page_number_alignment,
        ..Default::default()
    };

    let cursor = canvas.cursor();
    let auto_break = canvas.auto_page_break();
    canvas.set_auto_page_break(false);
    canvas.set_cursor(Cursor::new(margins.left, y.max(Mm(0.0))));
    let result = canvas.draw_text(font, &text, &style, margins.content_width(width));
    canvas.set_cursor(cursor);
    canvas.set_auto_page_break(auto_break);
    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Align, PagePlacement, TableBlock, TextBlock};

    #[test]
    fn renders_a_letter() {
        let mut template = Template::default();
        template
            .header(vec![TextBlock::new("ACME Ltd").into()], PagePlacement::All)
            .page_numbers(PageNumberPosition::Bottom, Align::Right);
        let blocks: Vec<ContentBlock> = vec![
            TextBlock::new("Dear Customer,").into(),
            TextBlock::new(lipsum::lipsum(40)).into(),
        ];
        let bytes = render(&template, &blocks).expect("renders");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn bad_tables_fail_before_any_page() {
        let mut table = TableBlock::new(vec![vec!["a".into(), "b".into()]]);
        table.column_widths = Some(vec![0.5, 0.6]);
        let template = Template::default();
        let mut canvas = PdfCanvas::new(&template);
        let result = lay_out(&template, &[table.into()], &mut canvas);
        assert!(matches!(result, Err(PDFError::ColumnWidthMismatch { .. })));
        assert_eq!(canvas.page_count(), 0);
    }
}
