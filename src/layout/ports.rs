//! The two capabilities the layout engine needs from a rendering backend.
//!
//! [Measure] answers "how tall would this be" without drawing anything;
//! [Canvas] draws, owns the cursor and margins, and manages pages. The
//! engine only ever talks to these traits, so it can be driven by the PDF
//! canvas in this crate or by any other backend (tests use a recording one).

use crate::blocks::{Align, Border, FontSpec, ImageSource, PagePlacement};
use crate::colour::Colour;
use crate::layout::Margins;
use crate::rect::Rect;
use crate::units::Mm;
use crate::PDFError;

/// A position on the current page, measured in millimetres from the top-left
/// corner, with y growing down the page
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Cursor {
    pub x: Mm,
    pub y: Mm,
}

impl Cursor {
    pub fn new(x: Mm, y: Mm) -> Cursor {
        Cursor { x, y }
    }
}

/// Space reserved inside the top and bottom margins for the header and footer
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bands {
    pub header: Mm,
    pub header_pages: PagePlacement,
    pub footer: Mm,
    pub footer_pages: PagePlacement,
}

impl Bands {
    /// The space reserved at the (top, bottom) of the 1-based `page`. The total
    /// page count is unknown while the body is laid out, so a band for the last
    /// page is reserved on every page
    pub fn on_page(&self, page: usize) -> (Mm, Mm) {
        let header = if self.header_pages.may_cover(page) {
            self.header
        } else {
            Mm(0.0)
        };
        let footer = if self.footer_pages.may_cover(page) {
            self.footer
        } else {
            Mm(0.0)
        };
        (header, footer)
    }
}

/// How a block of text is set inside its box
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub alignment: Align,
    /// Line advance as a multiple of the font size
    pub line_height: f32,
    pub border: Border,
    pub border_colour: Colour,
    pub fill: Option<Colour>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            alignment: Align::Left,
            line_height: 1.2,
            border: Border::NONE,
            border_colour: Colour::default(),
            fill: None,
        }
    }
}

/// How a rectangle is painted
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RectStyle {
    pub stroke: Option<Colour>,
    pub fill: Option<Colour>,
}

/// A fully resolved table, ready to be streamed onto pages
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub x: Mm,
    /// Absolute width of every column
    pub columns: Vec<Mm>,
    pub alignments: Vec<Align>,
    /// The heading row first, then the body rows
    pub rows: Vec<Vec<String>>,
    pub font: FontSpec,
    pub heading_font: FontSpec,
    pub heading_fill: Colour,
    pub stripe_fill: Option<Colour>,
    pub line_height: f32,
    /// Inner horizontal padding of every cell
    pub cell_padding: Mm,
}

impl TableLayout {
    pub fn width(&self) -> Mm {
        self.columns.iter().copied().sum()
    }
}

/// Dry-run text measurement.
///
/// Implementations must be pure: measuring the same font, text and width twice
/// yields the same result and never draws anything or moves a cursor. They
/// must break lines exactly like the matching [Canvas::draw_text] does.
pub trait Measure {
    /// The height `text` would occupy if drawn in a box `width` wide
    fn measure(
        &self,
        font: &FontSpec,
        text: &str,
        width: Mm,
        line_height: f32,
    ) -> Result<Mm, PDFError>;

    /// The width of `text` set on a single line
    fn text_width(&self, font: &FontSpec, text: &str) -> Result<Mm, PDFError>;

    /// The advance from one line to the next
    fn line_advance(&self, font: &FontSpec, line_height: f32) -> Mm;

    /// The height a table would occupy if drawn without page breaks
    fn measure_table(&self, table: &TableLayout) -> Result<Mm, PDFError>;
}

/// The drawing surface of a paginated document.
///
/// The canvas owns the authoritative cursor: drawing text or tables moves it,
/// and may start new pages when automatic page breaking is on. Callers must
/// read the cursor back after drawing rather than assume where it ended up.
pub trait Canvas: Measure {
    /// The (width, height) of the pages
    fn page_size(&self) -> (Mm, Mm);

    fn cursor(&self) -> Cursor;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Set the margins used for wrapping text and for automatic page breaks
    fn set_margins(&mut self, margins: Margins);

    /// Start a new page and move the cursor to its top-left content corner
    fn add_page(&mut self) -> Result<(), PDFError>;

    /// The 1-based number of the page being drawn on
    fn current_page(&self) -> usize;

    fn page_count(&self) -> usize;

    /// Switch drawing to an existing 1-based page, for decorating finished pages
    fn select_page(&mut self, page: usize) -> Result<(), PDFError>;

    /// Whether drawing below the bottom margin starts a new page
    fn auto_page_break(&self) -> bool;

    fn set_auto_page_break(&mut self, enabled: bool);

    /// Start a new page when automatic page breaking is on and `height` does
    /// not fit between the cursor and the bottom of the content area
    fn ensure_space(&mut self, height: Mm) -> Result<(), PDFError>;

    /// Keep space clear inside the margins for headers and footers
    fn reserve_bands(&mut self, bands: Bands);

    /// Set the font used by subsequent text and measurement defaults
    fn set_font(&mut self, font: &FontSpec) -> Result<(), PDFError>;

    /// Draw `text` as a multi-line block `width` wide starting at the cursor,
    /// breaking lines at word boundaries and pages at the bottom margin.
    /// Returns the cursor after the block: at the left margin, just below it
    fn draw_text(
        &mut self,
        font: &FontSpec,
        text: &str,
        style: &TextStyle,
        width: Mm,
    ) -> Result<Cursor, PDFError>;

    /// Stroke a straight line. Does not move the cursor
    fn draw_line(&mut self, from: Cursor, to: Cursor, thickness: Mm, colour: Colour);

    /// Paint a rectangle. Does not move the cursor
    fn draw_rect(&mut self, rect: Rect<Mm>, style: RectStyle);

    /// Place an image with its top-left corner at (x, y). Does not move the cursor
    fn draw_image(
        &mut self,
        source: &ImageSource,
        x: Mm,
        y: Mm,
        width: Mm,
        height: Mm,
    ) -> Result<(), PDFError>;

    /// Stream a table onto the pages starting at the cursor, breaking pages
    /// between rows and repeating the heading row. Returns the cursor below it
    fn draw_table(&mut self, table: &TableLayout) -> Result<Cursor, PDFError>;

    /// Paint an image underneath everything on the current page, covering it
    fn set_background(&mut self, source: &ImageSource) -> Result<(), PDFError>;
}
