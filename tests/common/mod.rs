#![allow(dead_code)]

use letter_flow::blocks::{FontSpec, ImageSource, Template};
use letter_flow::layout::{
    break_lines, Bands, Canvas, Cursor, Margins, Measure, RectStyle, TableLayout, TextStyle,
};
use letter_flow::{Colour, Mm, PDFError, Rect};

/// Every character of every font is 1mm wide
pub fn mono(text: &str) -> Mm {
    Mm(text.chars().count() as f32)
}

/// What a [Recorder] was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Page(usize),
    Select(usize),
    Text { text: String, at: Cursor, width: Mm },
    Line { from: Cursor, to: Cursor },
    Rect(Rect<Mm>),
    Image { x: Mm, y: Mm, width: Mm, height: Mm },
    Table { at: Cursor, columns: Vec<Mm> },
    Background,
}

/// A canvas with fixed metrics that records every drawing call instead of
/// drawing. Lines are `line` tall whatever the font
pub struct Recorder {
    pub page_size: (Mm, Mm),
    pub margins: Margins,
    pub cursor: Cursor,
    pub page: usize,
    pub pages: usize,
    pub auto_break: bool,
    pub bands: Bands,
    pub line: Mm,
    pub ops: Vec<Op>,
}

impl Recorder {
    pub fn new(template: &Template) -> Recorder {
        Recorder {
            page_size: template.page_size,
            margins: template.margins,
            cursor: Cursor::new(template.margins.left, template.margins.top),
            page: 0,
            pages: 0,
            auto_break: true,
            bands: Bands::default(),
            line: Mm(5.0),
            ops: Vec::new(),
        }
    }

    /// A recorder with its first page open
    pub fn started(template: &Template) -> Recorder {
        let mut recorder = Recorder::new(template);
        recorder.add_page().expect("recorders never fail");
        recorder.ops.clear();
        recorder
    }

    pub fn with_line(mut self, line: Mm) -> Recorder {
        self.line = line;
        self
    }

    fn top(&self) -> Mm {
        self.margins.top + self.bands.on_page(self.page).0
    }

    fn bottom(&self) -> Mm {
        self.page_size.1 - self.margins.bottom - self.bands.on_page(self.page).1
    }

    fn breaks_before(&self, y: Mm, height: Mm) -> bool {
        self.auto_break && y + height > self.bottom() && y > self.top()
    }

    pub fn texts(&self) -> Vec<(String, Cursor, Mm)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, at, width } => Some((text.clone(), *at, *width)),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(Mm, Mm, Mm, Mm)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Image {
                    x,
                    y,
                    width,
                    height,
                } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect()
    }
}

impl Measure for Recorder {
    fn measure(&self, _: &FontSpec, text: &str, width: Mm, _: f32) -> Result<Mm, PDFError> {
        Ok(self.line * break_lines(text, width, mono).len() as f32)
    }

    fn text_width(&self, _: &FontSpec, text: &str) -> Result<Mm, PDFError> {
        Ok(mono(text))
    }

    fn line_advance(&self, _: &FontSpec, _: f32) -> Mm {
        self.line
    }

    fn measure_table(&self, table: &TableLayout) -> Result<Mm, PDFError> {
        Ok(self.line * table.rows.len() as f32)
    }
}

impl Canvas for Recorder {
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
        self.pages += 1;
        self.page = self.pages;
        self.cursor = Cursor::new(self.margins.left, self.top());
        self.ops.push(Op::Page(self.page));
        Ok(())
    }

    fn current_page(&self) -> usize {
        self.page
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn select_page(&mut self, page: usize) -> Result<(), PDFError> {
        if page == 0 || page > self.pages {
            return Err(PDFError::PageMissing(page));
        }
        self.page = page;
        self.cursor = Cursor::new(self.margins.left, self.top());
        self.ops.push(Op::Select(page));
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

    fn set_font(&mut self, _: &FontSpec) -> Result<(), PDFError> {
        Ok(())
    }

    fn draw_text(
        &mut self,
        _: &FontSpec,
        text: &str,
        _: &TextStyle,
        width: Mm,
    ) -> Result<Cursor, PDFError> {
        self.ops.push(Op::Text {
            text: text.to_string(),
            at: self.cursor,
            width,
        });

        let mut y = self.cursor.y;
        for _ in break_lines(text, width, mono) {
            if self.breaks_before(y, self.line) {
                self.add_page()?;
                y = self.cursor.y;
            }
            y += self.line;
        }
        self.cursor = Cursor::new(self.margins.left, y);
        Ok(self.cursor)
    }

    fn draw_line(&mut self, from: Cursor, to: Cursor, _: Mm, _: Colour) {
        self.ops.push(Op::Line { from, to });
    }

    fn draw_rect(&mut self, rect: Rect<Mm>, _: RectStyle) {
        self.ops.push(Op::Rect(rect));
    }

    fn draw_image(
        &mut self,
        _: &ImageSource,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    ) -> Result<(), PDFError> {
        self.ops.push(Op::Image {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_table(&mut self, table: &TableLayout) -> Result<Cursor, PDFError> {
        self.ops.push(Op::Table {
            at: self.cursor,
            columns: table.columns.clone(),
        });

        let mut y = self.cursor.y;
        for _ in &table.rows {
            if self.breaks_before(y, self.line) {
                self.add_page()?;
                y = self.cursor.y;
            }
            y += self.line;
        }
        self.cursor = Cursor::new(self.margins.left, y);
        Ok(self.cursor)
    }

    fn set_background(&mut self, _: &ImageSource) -> Result<(), PDFError> {
        self.ops.push(Op::Background);
        Ok(())
    }
}
