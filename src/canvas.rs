//! The PDF backend of the layout engine: a [Canvas] that draws onto the pages
//! of a [Document].
//!
//! Text is set with the single line-breaking rule of
//! [break_lines](crate::layout::break_lines), both when measuring and when
//! drawing, so dry runs agree with what ends up on the page. Fonts are loaded
//! lazily the first time a [FontSpec] names them, including from the `&self`
//! measurement calls, and are shared by every page.

use crate::blocks::{Align, FontSpec, ImageSource, Template};
use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::{Font, FontKey, LoadedFont};
use crate::image::Image;
use crate::layout::{
    break_lines, line_offset, spread_words, Bands, Canvas, Cursor, Margins, Measure, RectStyle,
    TableLayout, TextStyle,
};
use crate::page::{ImageLayout, Page, PageContents, SpanFont, SpanLayout};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::{Mm, Pt};
use crate::PDFError;
use id_arena::{Arena, Id};
use log::{debug, trace, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// How far the baseline sits below the middle of a line, as a fraction of the font size
const BASELINE_DROP: f32 = 0.3;

/// Underline position below the baseline and its thickness, as fractions of the font size
const UNDERLINE_DROP: f32 = 0.1;
const UNDERLINE_THICKNESS: f32 = 0.05;

/// Thickness of text block borders and table cell rules
const RULE: Mm = Mm(0.2);

/// Fonts loaded so far, keyed so that each face is only loaded once
#[derive(Default)]
struct FontStore {
    fonts: Arena<LoadedFont>,
    ids: HashMap<FontKey, Id<LoadedFont>>,
}

impl FontStore {
    fn resolve(&mut self, spec: &FontSpec) -> Result<Id<LoadedFont>, PDFError> {
        let key = FontKey::for_spec(spec);
        if let Some(id) = self.ids.get(&key) {
            return Ok(*id);
        }

        let font = match &key {
            FontKey::Builtin(font) => LoadedFont::Builtin(*font),
            FontKey::File(path) => LoadedFont::Embedded(Font::load(std::fs::read(path)?)?),
        };
        debug!("loaded font {key:?}");
        let id = self.fonts.alloc(font);
        self.ids.insert(key, id);
        Ok(id)
    }
}

/// Images are stored once per file, or once per shared bitmap
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ImageKey {
    Path(PathBuf),
    /// The address of the bitmap. The document keeps a clone of the `Arc`
    /// alive, so the address cannot be reused while the key exists
    Bitmap(usize),
}

impl ImageKey {
    fn for_source(source: &ImageSource) -> ImageKey {
        match source {
            ImageSource::Path(path) => ImageKey::Path(path.clone()),
            ImageSource::Bitmap(bitmap) => ImageKey::Bitmap(Arc::as_ptr(bitmap) as usize),
        }
    }
}

/// A line of text ready to be placed
struct SetLine {
    /// Runs of text with their offset from the left edge of the box
    runs: Vec<(String, Mm)>,
    /// Where an underline starts and ends, relative to the left edge of the box
    extent: (Mm, Mm),
}

/// A table row with every cell broken into lines
struct SetRow<'t> {
    spec: &'t FontSpec,
    font: SpanFont,
    advance: Mm,
    height: Mm,
    cells: Vec<Vec<SetLine>>,
}

/// The width of `text` on one line, including character spacing
fn width_in(font: &LoadedFont, spec: &FontSpec, text: &str) -> Result<Mm, PDFError> {
    let advance = font.text_advance(text)?;
    let glyphs = text.chars().filter(|ch| !ch.is_control()).count();
    Ok(Mm::from(Pt(advance / 1000.0 * spec.size)) + spec.spacing * glyphs as f32)
}

/// A [Canvas] writing to an in-memory PDF document. Call
/// [PdfCanvas::begin] to open the first page, and [PdfCanvas::finish] to get
/// the PDF bytes once everything has been drawn
pub struct PdfCanvas {
    document: Document,
    page_size: PageSize,
    margins: Margins,
    cursor: Cursor,
    /// The 1-based page being drawn on, 0 before the first page
    page: usize,
    auto_break: bool,
    bands: Bands,
    font: FontSpec,
    fonts: RefCell<FontStore>,
    images: HashMap<ImageKey, Id<Image>>,
}

impl PdfCanvas {
    pub fn new(template: &Template) -> PdfCanvas {
        let mut document = Document::default();
        if let Some(info) = &template.info {
            document.set_info(info.clone());
        }

        PdfCanvas {
            document,
            page_size: template.page_size,
            margins: template.margins,
            cursor: Cursor::new(template.margins.left, template.margins.top),
            page: 0,
            auto_break: true,
            bands: Bands::default(),
            font: template.default_font.clone(),
            fonts: RefCell::new(FontStore::default()),
            images: HashMap::new(),
        }
    }

    /// Open the first page and load the default font
    pub fn begin(&mut self) -> Result<(), PDFError> {
        self.add_page()?;
        let font = self.font.clone();
        self.set_font(&font)
    }

    /// Write the finished document out
    pub fn write<W: Write>(self, w: W) -> Result<(), PDFError> {
        let PdfCanvas {
            mut document,
            fonts,
            ..
        } = self;
        document.fonts = fonts.into_inner().fonts;
        document.write(w)
    }

    /// The finished document as PDF bytes
    pub fn finish(self) -> Result<Vec<u8>, PDFError> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// The top of the content area of the current page, below any header band
    fn content_top(&self) -> Mm {
        self.margins.top + self.bands.on_page(self.page).0
    }

    /// The bottom of the content area of the current page, above any footer band
    fn content_bottom(&self) -> Mm {
        self.page_size.1 - self.margins.bottom - self.bands.on_page(self.page).1
    }

    /// Whether something `height` tall starting at `y` has to move to a new
    /// page. Content at the very top of a page stays there even if it
    /// overflows, otherwise it would never be placed
    fn breaks_before(&self, y: Mm, height: Mm) -> bool {
        self.auto_break && y + height > self.content_bottom() && y > self.content_top()
    }

    fn pdf_y(&self, y: Mm) -> Pt {
        Pt::from(self.page_size.1) - Pt::from(y)
    }

    fn to_pdf(&self, at: Cursor) -> (Pt, Pt) {
        (Pt::from(at.x), self.pdf_y(at.y))
    }

    fn pdf_rect(&self, rect: Rect<Mm>) -> Rect {
        Rect {
            x1: Pt::from(rect.x1),
            y1: self.pdf_y(rect.y2),
            x2: Pt::from(rect.x2),
            y2: self.pdf_y(rect.y1),
        }
    }

    fn page_mut(&mut self) -> Result<&mut Page, PDFError> {
        self.document.page_mut(self.page)
    }

    fn span_font(&self, spec: &FontSpec) -> Result<SpanFont, PDFError> {
        let id = self.fonts.borrow_mut().resolve(spec)?;
        Ok(SpanFont {
            id,
            size: Pt(spec.size),
        })
    }

    /// Break `text` into lines `width` wide and position the runs of every line
    fn set_text(
        &self,
        spec: &FontSpec,
        text: &str,
        width: Mm,
        alignment: Align,
    ) -> Result<Vec<SetLine>, PDFError> {
        let mut store = self.fonts.borrow_mut();
        let id = store.resolve(spec)?;
        let font = &store.fonts[id];

        // surface missing glyphs before breaking, the breaker cannot fail
        width_in(font, spec, text)?;
        let width_of = |s: &str| width_in(font, spec, s).unwrap_or_default();

        let lines = break_lines(text, width, width_of)
            .iter()
            .map(|line| {
                let runs: Vec<(String, Mm)> = match alignment {
                    Align::Justify => spread_words(line, width, width_of)
                        .into_iter()
                        .map(|(word, x)| (word.to_string(), x))
                        .collect(),
                    _ => vec![(line.text.clone(), line_offset(alignment, line, width))],
                };
                let start = runs.first().map(|(_, x)| *x).unwrap_or_default();
                let end = runs
                    .last()
                    .map(|(run, x)| *x + width_of(run))
                    .unwrap_or_default();
                SetLine {
                    runs,
                    extent: (start, end),
                }
            })
            .collect();
        Ok(lines)
    }

    /// Add one set line to the current page with its box's left edge at `x`
    /// and the top of the line at `top`
    fn place_line(
        &mut self,
        line: &SetLine,
        spec: &FontSpec,
        font: SpanFont,
        x: Mm,
        top: Mm,
        advance: Mm,
    ) -> Result<(), PDFError> {
        let size = Mm::from(Pt(spec.size));
        let baseline = top + advance / 2.0 + size * BASELINE_DROP;

        let spans: Vec<SpanLayout> = line
            .runs
            .iter()
            .filter(|(run, _)| !run.is_empty())
            .map(|(run, offset)| SpanLayout {
                text: run.clone(),
                font,
                colour: spec.colour,
                spacing: Pt::from(spec.spacing),
                coords: self.to_pdf(Cursor::new(x + *offset, baseline)),
            })
            .collect();
        self.page_mut()?.add_spans(spans);

        let (start, end) = line.extent;
        if spec.style.underline && end > start {
            let y = baseline + size * UNDERLINE_DROP;
            self.draw_line(
                Cursor::new(x + start, y),
                Cursor::new(x + end, y),
                size * UNDERLINE_THICKNESS,
                spec.colour,
            );
        }
        Ok(())
    }

    /// Paint the fill and borders of the part of a text block that landed on
    /// the current page. The fill goes underneath the text, which was added
    /// from content index `first` onwards
    fn frame_text(
        &mut self,
        style: &TextStyle,
        first: usize,
        area: Rect<Mm>,
    ) -> Result<(), PDFError> {
        if area.height() <= Mm(0.0) {
            return Ok(());
        }

        if let Some(fill) = style.fill {
            let rect = self.pdf_rect(area);
            let page = self.page_mut()?;
            let first = first.min(page.contents.len());
            page.contents.insert(
                first,
                PageContents::Rect {
                    rect,
                    stroke: None,
                    fill: Some(fill),
                },
            );
        }

        let corners = [
            Cursor::new(area.x1, area.y1),
            Cursor::new(area.x2, area.y1),
            Cursor::new(area.x2, area.y2),
            Cursor::new(area.x1, area.y2),
        ];
        let sides = [
            (style.border.top, corners[0], corners[1]),
            (style.border.right, corners[1], corners[2]),
            (style.border.bottom, corners[3], corners[2]),
            (style.border.left, corners[0], corners[3]),
        ];
        for (_, from, to) in sides.into_iter().filter(|(drawn, _, _)| *drawn) {
            self.draw_line(from, to, RULE, style.border_colour);
        }
        Ok(())
    }

    fn set_table<'t>(&self, table: &'t TableLayout) -> Result<Vec<SetRow<'t>>, PDFError> {
        let mut rows = Vec::with_capacity(table.rows.len());
        for (r, row) in table.rows.iter().enumerate() {
            let spec = if r == 0 {
                &table.heading_font
            } else {
                &table.font
            };
            let advance = self.line_advance(spec, table.line_height);

            let mut cells = Vec::with_capacity(table.columns.len());
            for (c, column) in table.columns.iter().enumerate() {
                let text = row.get(c).map(String::as_str).unwrap_or_default();
                let alignment = table.alignments.get(c).copied().unwrap_or_default();
                let inner = *column - table.cell_padding * 2.0;
                cells.push(self.set_text(spec, text, inner, alignment)?);
            }

            let lines = cells.iter().map(Vec::len).max().unwrap_or_default().max(1);
            rows.push(SetRow {
                spec,
                font: self.span_font(spec)?,
                advance,
                height: advance * lines as f32,
                cells,
            });
        }
        Ok(rows)
    }

    fn draw_row(
        &mut self,
        table: &TableLayout,
        row: &SetRow<'_>,
        fill: Option<Colour>,
        y: Mm,
    ) -> Result<(), PDFError> {
        let mut x = table.x;
        for (column, lines) in table.columns.iter().zip(&row.cells) {
            let cell = Rect::from_size(x, y, *column, row.height);
            self.draw_rect(
                cell,
                RectStyle {
                    stroke: Some(colours::BLACK),
                    fill,
                },
            );
            for (i, line) in lines.iter().enumerate() {
                let top = y + row.advance * i as f32;
                self.place_line(
                    line,
                    row.spec,
                    row.font,
                    x + table.cell_padding,
                    top,
                    row.advance,
                )?;
            }
            x += *column;
        }
        Ok(())
    }

    fn image_id(&mut self, source: &ImageSource) -> Result<Id<Image>, PDFError> {
        let key = ImageKey::for_source(source);
        if let Some(id) = self.images.get(&key) {
            return Ok(*id);
        }
        let id = self.document.add_image(Image::load(source)?);
        debug!("loaded image {key:?}");
        self.images.insert(key, id);
        Ok(id)
    }
}

impl Measure for PdfCanvas {
    fn measure(
        &self,
        font: &FontSpec,
        text: &str,
        width: Mm,
        line_height: f32,
    ) -> Result<Mm, PDFError> {
        let lines = self.set_text(font, text, width, Align::Left)?.len();
        let height = self.line_advance(font, line_height) * lines as f32;
        trace!("measured {lines} lines ({height}) at {width}");
        Ok(height)
    }

    fn text_width(&self, font: &FontSpec, text: &str) -> Result<Mm, PDFError> {
        let mut store = self.fonts.borrow_mut();
        let id = store.resolve(font)?;
        width_in(&store.fonts[id], font, text)
    }

    fn line_advance(&self, font: &FontSpec, line_height: f32) -> Mm {
        Mm::from(Pt(font.size * line_height))
    }

    fn measure_table(&self, table: &TableLayout) -> Result<Mm, PDFError> {
        Ok(self.set_table(table)?.iter().map(|row| row.height).sum())
    }
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> (Mm, Mm) {
        self.page_size
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    fn add_page(&mut self) -> Result<(), PDFError> {
        self.document.add_page(Page::new(self.page_size));
        self.page = self.document.page_count();
        self.cursor = Cursor::new(self.margins.left, self.content_top());
        debug!("started page {}", self.page);
        Ok(())
    }

    fn current_page(&self) -> usize {
        self.page
    }

    fn page_count(&self) -> usize {
        self.document.page_count()
    }

    fn select_page(&mut self, page: usize) -> Result<(), PDFError> {
        if page == 0 || page > self.document.page_count() {
            return Err(PDFError::PageMissing(page));
        }
        self.page = page;
        self.cursor = Cursor::new(self.margins.left, self.content_top());
        Ok(())
    }

    fn auto_page_break(&self) -> bool {
        self.auto_break
    }

    fn set_auto_page_break(&mut self, enabled: bool) {
        self.auto_break = enabled;
    }

    fn ensure_space(&mut self, height: Mm) -> Result<(), PDFError> {
        if self.breaks_before(self.cursor.y, height) {
            self.add_page()?;
        }
        Ok(())
    }

    fn reserve_bands(&mut self, bands: Bands) {
        self.bands = bands;
    }

    fn set_font(&mut self, font: &FontSpec) -> Result<(), PDFError> {
        self.fonts.borrow_mut().resolve(font)?;
        self.font = font.clone();
        Ok(())
    }

    fn draw_text(
        &mut self,
        font: &FontSpec,
        text: &str,
        style: &TextStyle,
        width: Mm,
    ) -> Result<Cursor, PDFError> {
        let lines = self.set_text(font, text, width, style.alignment)?;
        let span_font = self.span_font(font)?;
        let advance = self.line_advance(font, style.line_height);

        let x = self.cursor.x;
        let mut y = self.cursor.y;
        let mut top = y;
        let mut first = self.page_mut()?.contents.len();

        for line in &lines {
            if self.breaks_before(y, advance) {
                self.frame_text(style, first, Rect::from_size(x, top, width, y - top))?;
                self.add_page()?;
                y = self.cursor.y;
                top = y;
                first = self.page_mut()?.contents.len();
            }
            self.place_line(line, font, span_font, x, y, advance)?;
            y += advance;
        }
        self.frame_text(style, first, Rect::from_size(x, top, width, y - top))?;

        self.cursor = Cursor::new(self.margins.left, y);
        Ok(self.cursor)
    }

    fn draw_line(&mut self, from: Cursor, to: Cursor, thickness: Mm, colour: Colour) {
        let (from, to) = (self.to_pdf(from), self.to_pdf(to));
        match self.page_mut() {
            Ok(page) => page.add_line(from, to, Pt::from(thickness), colour),
            Err(_) => warn!("no page to draw a line on"),
        }
    }

    fn draw_rect(&mut self, rect: Rect<Mm>, style: RectStyle) {
        let rect = self.pdf_rect(rect);
        match self.page_mut() {
            Ok(page) => page.add_rect(rect, style.stroke, style.fill),
            Err(_) => warn!("no page to draw a rectangle on"),
        }
    }

    fn draw_image(
        &mut self,
        source: &ImageSource,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    ) -> Result<(), PDFError> {
        let image_id = self.image_id(source)?;
        let position = self.pdf_rect(Rect::from_size(x, y, width, height));
        self.page_mut()?.add_image(ImageLayout { image_id, position });
        Ok(())
    }

    fn draw_table(&mut self, table: &TableLayout) -> Result<Cursor, PDFError> {
        let rows = self.set_table(table)?;
        let mut y = self.cursor.y;

        for (r, row) in rows.iter().enumerate() {
            if self.breaks_before(y, row.height) {
                self.add_page()?;
                y = self.cursor.y;
                if let (true, Some(heading)) = (r > 0, rows.first()) {
                    self.draw_row(table, heading, Some(table.heading_fill), y)?;
                    y += heading.height;
                }
            }

            let fill = match r {
                0 => Some(table.heading_fill),
                _ if r % 2 == 0 => table.stripe_fill,
                _ => None,
            };
            self.draw_row(table, row, fill, y)?;
            y += row.height;
        }
        debug!("table of {} rows ends at {y} on page {}", rows.len(), self.page);

        self.cursor = Cursor::new(self.margins.left, y);
        Ok(self.cursor)
    }

    fn set_background(&mut self, source: &ImageSource) -> Result<(), PDFError> {
        let image_id = self.image_id(source)?;
        self.page_mut()?.background = Some(image_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Border, ContentBlock, FontFamily, PagePlacement, QrBlock, TextBlock};
    use crate::layout::CELL_PADDING;
    use crate::pagesize;

    fn courier() -> FontSpec {
        FontSpec::new(FontFamily::Courier, 10.0)
    }

    fn canvas(size: PageSize) -> PdfCanvas {
        let mut template = Template::default();
        template.page_size(size).margins(Margins::all(Mm(10.0)));
        let mut canvas = PdfCanvas::new(&template);
        canvas.begin().expect("builtin fonts load");
        canvas
    }

    fn contents(canvas: &PdfCanvas, page: usize) -> &[PageContents] {
        let id = canvas.document.page_order[page - 1];
        &canvas.document.pages[id].contents
    }

    #[test]
    fn courier_metrics() {
        let canvas = canvas(pagesize::A4);
        // 600/1000 of 10pt per character
        let width = canvas.text_width(&courier(), "abcde").expect("builtin");
        assert!((width.0 - Mm::from(Pt(30.0)).0).abs() < 1e-4);
        let advance = canvas.line_advance(&courier(), 1.2);
        assert!((advance.0 - Mm::from(Pt(12.0)).0).abs() < 1e-4);
    }

    #[test]
    fn drawing_advances_by_the_measured_height() {
        let mut canvas = canvas(pagesize::A4);
        let text = lipsum::lipsum(60);
        let width = Mm(80.0);
        let measured = canvas.measure(&courier(), &text, width, 1.2).expect("builtin");

        let start = canvas.cursor();
        let end = canvas
            .draw_text(&courier(), &text, &TextStyle::default(), width)
            .expect("fits on the page");
        assert!((end.y - start.y - measured).0.abs() < 1e-3);
        assert_eq!(end.x, Mm(10.0));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn long_text_breaks_pages() {
        let mut canvas = canvas(pagesize::A6);
        let text = lipsum::lipsum(400);
        canvas
            .draw_text(&courier(), &text, &TextStyle::default(), Mm(85.0))
            .expect("draws");
        assert!(canvas.page_count() > 1);
        assert_eq!(canvas.current_page(), canvas.page_count());
        assert!(canvas.cursor().y <= Mm(148.0 - 10.0));
    }

    #[test]
    fn header_band_pushes_content_down() {
        let mut canvas = canvas(pagesize::A4);
        canvas.reserve_bands(Bands {
            header: Mm(20.0),
            header_pages: crate::blocks::PagePlacement::All,
            ..Default::default()
        });
        canvas.add_page().expect("new page");
        assert_eq!(canvas.cursor(), Cursor::new(Mm(10.0), Mm(30.0)));
    }

    #[test]
    fn fill_goes_under_the_text() {
        let mut canvas = canvas(pagesize::A4);
        let style = TextStyle {
            fill: Some(colours::LIGHT_GREY),
            border: Border::ALL,
            ..Default::default()
        };
        canvas
            .draw_text(&courier(), "boxed in", &style, Mm(50.0))
            .expect("draws");
        let contents = contents(&canvas, 1);
        assert!(matches!(contents[0], PageContents::Rect { .. }));
        assert!(matches!(contents[1], PageContents::Text(_)));
        let borders = contents
            .iter()
            .filter(|c| matches!(c, PageContents::Line { .. }))
            .count();
        assert_eq!(borders, 4);
    }

    #[test]
    fn table_height_matches_measurement() {
        let mut canvas = canvas(pagesize::A4);
        let table = TableLayout {
            x: Mm(10.0),
            columns: vec![Mm(40.0), Mm(20.0)],
            alignments: vec![Align::Left, Align::Right],
            rows: vec![
                vec!["Item".into(), "Cost".into()],
                vec!["A rather long description of the item".into(), "£10".into()],
                vec!["Short".into()],
            ],
            font: courier(),
            heading_font: courier().bold(),
            heading_fill: colours::LIGHT_GREY,
            stripe_fill: Some(colours::LIGHT_GREY),
            line_height: 1.2,
            cell_padding: CELL_PADDING,
        };
        let measured = canvas.measure_table(&table).expect("builtin");
        let advance = canvas.line_advance(&courier(), 1.2);
        // the description wraps onto three lines of a 38mm cell
        assert!((measured - advance * 5.0).0.abs() < 1e-3);

        let start = canvas.cursor().y;
        let end = canvas.draw_table(&table).expect("draws");
        assert!((end.y - start - measured).0.abs() < 1e-3);
    }

    #[test]
    fn missing_pages_are_errors() {
        let mut canvas = canvas(pagesize::A4);
        assert!(canvas.select_page(1).is_ok());
        assert!(matches!(canvas.select_page(2), Err(PDFError::PageMissing(2))));
        assert!(matches!(canvas.select_page(0), Err(PDFError::PageMissing(0))));
    }

    #[test]
    fn bitmaps_are_stored_once() {
        let mut canvas = canvas(pagesize::A4);
        let source = ImageSource::Bitmap(Arc::new(image::DynamicImage::new_rgb8(4, 4)));
        for x in [Mm(10.0), Mm(50.0)] {
            canvas
                .draw_image(&source, x, Mm(10.0), Mm(20.0), Mm(20.0))
                .expect("bitmaps load");
        }
        assert_eq!(canvas.document.images.len(), 1);
        assert_eq!(contents(&canvas, 1).len(), 2);
    }

    #[test]
    fn repeated_qr_codes_are_stored_once() {
        let payload = "https://example.com/track/12345";
        let mut template = Template::default();
        template.page_size(pagesize::A6).header(
            vec![QrBlock {
                size: Mm(20.0),
                ..QrBlock::new(payload)
            }
            .into()],
            PagePlacement::All,
        );
        let blocks: Vec<ContentBlock> = vec![
            TextBlock::new(lipsum::lipsum(600)).into(),
            QrBlock::new(payload).into(),
        ];

        let mut canvas = PdfCanvas::new(&template);
        crate::lay_out(&template, &blocks, &mut canvas).expect("lays out");
        assert!(canvas.page_count() > 2);
        assert_eq!(canvas.document.images.len(), 1);
    }

    #[test]
    fn finishes_as_pdf() {
        let mut canvas = canvas(pagesize::A5);
        canvas
            .draw_text(&courier(), "Dear Sir or Madam,", &TextStyle::default(), Mm(100.0))
            .expect("draws");
        let bytes = canvas.finish().expect("writes");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
