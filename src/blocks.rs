//! Content block descriptors and the document template.
//!
//! Blocks are plain data: they are constructed (and validated) by the caller
//! and borrowed read-only by the layout engine for the duration of a render.
//! Fonts and images named by a block are resolved by the canvas, never by the
//! block itself.

use crate::colour::{colours, Colour};
use crate::info::Info;
use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::units::Mm;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Horizontal alignment of text, tables and floats. Floats treat
/// [Align::Justify] the same as [Align::Left]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// The family of a font: one of the four standard families every PDF reader
/// ships with, or a TrueType / OpenType file to embed
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Courier,
    Times,
    #[default]
    Helvetica,
    /// Arial is metrically compatible with Helvetica and is rendered as such
    Arial,
    File(PathBuf),
}

/// Emphasis applied to a font
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontStyle {
    pub const NONE: FontStyle = FontStyle {
        bold: false,
        italic: false,
        underline: false,
    };

    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
        underline: false,
    };
}

/// Everything needed to set text: family, style, size in points, colour and
/// extra spacing between characters
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    /// Size in points
    pub size: f32,
    pub colour: Colour,
    /// Extra space inserted after every character
    pub spacing: Mm,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family: FontFamily::Helvetica,
            style: FontStyle::NONE,
            size: 11.0,
            colour: colours::BLACK,
            spacing: Mm(0.0),
        }
    }
}

impl FontSpec {
    pub fn new(family: FontFamily, size: f32) -> FontSpec {
        FontSpec {
            family,
            size,
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> FontSpec {
        self.style.bold = true;
        self
    }

    pub fn coloured<C: Into<Colour>>(mut self, colour: C) -> FontSpec {
        self.colour = colour.into();
        self
    }
}

/// Which sides of a text block get a border line
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Border {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Border {
    pub const NONE: Border = Border {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub const ALL: Border = Border {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn is_none(&self) -> bool {
        *self == Border::NONE
    }
}

/// The pages a header, footer or pinned block appears on
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PagePlacement {
    First,
    Last,
    All,
    #[default]
    None,
    /// Only the page that is current when the block is dispatched
    Current,
}

impl PagePlacement {
    /// Whether the 1-based `page` of `total` pages is covered by this placement
    pub fn covers(&self, page: usize, total: usize) -> bool {
        match self {
            PagePlacement::First => page == 1,
            PagePlacement::Last => page == total,
            PagePlacement::All => true,
            PagePlacement::None | PagePlacement::Current => false,
        }
    }

    /// Whether space may have to be reserved on `page` before the total page
    /// count is known
    pub fn may_cover(&self, page: usize) -> bool {
        match self {
            PagePlacement::First => page == 1,
            PagePlacement::Last | PagePlacement::All => true,
            PagePlacement::None | PagePlacement::Current => false,
        }
    }
}

/// Where page numbers are printed
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PageNumberPosition {
    #[default]
    Top,
    Bottom,
}

/// How a [BoxBlock] is painted
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum BoxStyle {
    #[default]
    Border,
    Background,
    BorderBackground,
}

/// An explicit position for a block that does not take part in the flow.
/// Coordinates are measured from the top-left corner of the content area, or
/// of the page itself when `no_margin` is set
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FixedPosition {
    pub x: Mm,
    pub y: Mm,
    pub no_margin: bool,
    pub on_pages: PagePlacement,
}

impl FixedPosition {
    /// A position on the page that is current when the block is dispatched
    pub fn at(x: Mm, y: Mm) -> FixedPosition {
        FixedPosition {
            x,
            y,
            no_margin: false,
            on_pages: PagePlacement::Current,
        }
    }

    pub fn on_pages(mut self, pages: PagePlacement) -> FixedPosition {
        self.on_pages = pages;
        self
    }

    pub fn without_margin(mut self) -> FixedPosition {
        self.no_margin = true;
        self
    }
}

/// Whether a block is placed at the running cursor or at an explicit position
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum PlacementMode {
    #[default]
    Flowed,
    Positioned(FixedPosition),
}

/// A paragraph of text, broken into lines at word boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    /// Falls back to the template's default font when `None`
    pub font: Option<FontSpec>,
    /// Line advance as a multiple of the font size
    pub line_height: f32,
    pub alignment: Align,
    pub border: Border,
    pub border_colour: Colour,
    /// Background fill behind the whole block
    pub fill: Option<Colour>,
    /// Place this text below an active float instead of beside it
    pub ignore_wrap: bool,
    /// Width of a positioned text block; `None` extends it to the right margin
    pub width: Option<Mm>,
}

impl Default for TextBlock {
    fn default() -> Self {
        TextBlock {
            text: String::new(),
            font: None,
            line_height: 1.2,
            alignment: Align::Left,
            border: Border::NONE,
            border_colour: colours::BLACK,
            fill: None,
            ignore_wrap: false,
            width: None,
        }
    }
}

impl TextBlock {
    pub fn new<S: ToString>(text: S) -> TextBlock {
        TextBlock {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

/// A table of strings; the first row is the heading row
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
    pub font: Option<FontSpec>,
    /// Row line advance as a multiple of the font size
    pub row_line_height: f32,
    /// One alignment per column, or a single alignment shared by all columns
    pub alignment: Vec<Align>,
    /// Fill for every other body row
    pub striped_colour: Option<Colour>,
    pub heading_colour: Colour,
    pub heading_text_colour: Colour,
    /// Fraction of the available width the table spans; `None` spans all of it
    pub width: Option<f32>,
    /// Fractions of the table width per column, summing to 1; `None` auto-fits
    pub column_widths: Option<Vec<f32>>,
    /// Append a row summing the last column
    pub add_total: bool,
}

impl Default for TableBlock {
    fn default() -> Self {
        TableBlock {
            rows: Vec::new(),
            font: None,
            row_line_height: 1.2,
            alignment: vec![Align::Left],
            striped_colour: None,
            heading_colour: colours::WHITE,
            heading_text_colour: colours::BLACK,
            width: None,
            column_widths: None,
            add_total: false,
        }
    }
}

impl TableBlock {
    pub fn new(rows: Vec<Vec<String>>) -> TableBlock {
        TableBlock {
            rows,
            ..Default::default()
        }
    }

    /// The number of columns, taken from the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or_default()
    }

    /// The alignment of the given column
    pub fn column_alignment(&self, column: usize) -> Align {
        self.alignment
            .get(column)
            .or_else(|| self.alignment.first())
            .copied()
            .unwrap_or_default()
    }
}

/// A horizontal rule made of `height` stacked 1mm strokes
#[derive(Debug, Clone, PartialEq)]
pub struct LineBlock {
    /// Number of stacked 1mm strokes
    pub height: u32,
    /// `None` spans the margins
    pub width: Option<Mm>,
    /// Blank space above and below the strokes
    pub padding: Mm,
    pub colour: Colour,
}

impl Default for LineBlock {
    fn default() -> Self {
        LineBlock {
            height: 1,
            width: None,
            padding: Mm(0.0),
            colour: colours::BLACK,
        }
    }
}

/// Blank vertical space
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineBreakBlock {
    /// `None` repeats the height of the last placed line
    pub height: Option<Mm>,
}

/// Where an image's pixels come from
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bitmap(Arc<DynamicImage>),
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ImageSource::Path(a), ImageSource::Path(b)) => a == b,
            (ImageSource::Bitmap(a), ImageSource::Bitmap(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An image drawn at the cursor. Left or right aligned images may let
/// subsequent text flow beside them
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub source: ImageSource,
    /// Physical (width, height)
    pub size: (Mm, Mm),
    pub alignment: Align,
    pub wrap_text: bool,
}

impl ImageBlock {
    pub fn new(source: ImageSource, size: (Mm, Mm)) -> ImageBlock {
        ImageBlock {
            source,
            size,
            alignment: Align::Left,
            wrap_text: false,
        }
    }
}

/// A square QR code drawn at the cursor, with the same float behaviour as images
#[derive(Debug, Clone, PartialEq)]
pub struct QrBlock {
    pub payload: String,
    /// Edge length of the square symbol
    pub size: Mm,
    pub alignment: Align,
    pub wrap_text: bool,
}

impl QrBlock {
    pub fn new<S: ToString>(payload: S) -> QrBlock {
        QrBlock {
            payload: payload.to_string(),
            size: Mm(50.0),
            alignment: Align::Left,
            wrap_text: false,
        }
    }
}

/// A bordered and/or filled rectangle; always positioned
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBlock {
    pub width: Mm,
    pub height: Mm,
    pub style: BoxStyle,
    pub border_colour: Colour,
    pub background_colour: Colour,
}

impl BoxBlock {
    pub fn new(width: Mm, height: Mm, style: BoxStyle) -> BoxBlock {
        BoxBlock {
            width,
            height,
            style,
            border_colour: colours::BLACK,
            background_colour: colours::WHITE,
        }
    }
}

/// The kinds of content the layout engine knows how to place
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Text(TextBlock),
    Table(TableBlock),
    Line(LineBlock),
    LineBreak(LineBreakBlock),
    Image(ImageBlock),
    QrCode(QrBlock),
    Box(BoxBlock),
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Text(_) => "text",
            BlockKind::Table(_) => "table",
            BlockKind::Line(_) => "line",
            BlockKind::LineBreak(_) => "line break",
            BlockKind::Image(_) => "image",
            BlockKind::QrCode(_) => "qr code",
            BlockKind::Box(_) => "box",
        }
    }
}

/// A block of content together with how it is placed
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub placement: PlacementMode,
}

impl ContentBlock {
    /// A block placed at the running cursor
    pub fn flowed(kind: BlockKind) -> ContentBlock {
        ContentBlock {
            kind,
            placement: PlacementMode::Flowed,
        }
    }

    /// A block placed at an explicit position
    pub fn positioned(kind: BlockKind, position: FixedPosition) -> ContentBlock {
        ContentBlock {
            kind,
            placement: PlacementMode::Positioned(position),
        }
    }
}

macro_rules! flowed_from {
    ($block:ident, $variant:ident) => {
        impl From<$block> for ContentBlock {
            fn from(block: $block) -> ContentBlock {
                ContentBlock::flowed(BlockKind::$variant(block))
            }
        }
    };
}

flowed_from!(TextBlock, Text);
flowed_from!(TableBlock, Table);
flowed_from!(LineBlock, Line);
flowed_from!(LineBreakBlock, LineBreak);
flowed_from!(ImageBlock, Image);
flowed_from!(QrBlock, QrCode);

/// The template for a letter: everything except the body content. It's akin
/// to headed paper: page size, margins, default font, header and footer
/// content, page numbering and document information
#[derive(Debug, Clone)]
pub struct Template {
    pub page_size: PageSize,
    pub margins: Margins,
    /// Used for any text that does not specify its own font
    pub default_font: FontSpec,
    pub header: Vec<ContentBlock>,
    pub header_pages: PagePlacement,
    pub footer: Vec<ContentBlock>,
    pub footer_pages: PagePlacement,
    /// Drawn underneath the content of every page, stretched to the page size
    pub background_image: Option<ImageSource>,
    pub page_numbers: bool,
    pub page_number_position: PageNumberPosition,
    pub page_number_alignment: Align,
    /// `{page}` and `{total}` are replaced by the page number and page count
    pub page_number_format: String,
    /// Space kept between a float and the text flowing beside it
    pub float_gap: Mm,
    pub info: Option<Info>,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            page_size: pagesize::A4,
            margins: Margins::all(Mm(10.0)),
            default_font: FontSpec::default(),
            header: Vec::new(),
            header_pages: PagePlacement::None,
            footer: Vec::new(),
            footer_pages: PagePlacement::None,
            background_image: None,
            page_numbers: false,
            page_number_position: PageNumberPosition::Top,
            page_number_alignment: Align::Center,
            page_number_format: "Page {page} of {total}".to_string(),
            float_gap: Mm(2.0),
            info: None,
        }
    }
}

impl Template {
    /// Create a new template with an A4 page, 10mm margins and 11pt Helvetica
    pub fn new() -> Template {
        Template::default()
    }

    pub fn page_size(&mut self, page_size: PageSize) -> &mut Self {
        self.page_size = page_size;
        self
    }

    pub fn margins(&mut self, margins: Margins) -> &mut Self {
        self.margins = margins;
        self
    }

    pub fn default_font(&mut self, font: FontSpec) -> &mut Self {
        self.default_font = font;
        self
    }

    /// Set the header content and the pages it appears on
    pub fn header(&mut self, blocks: Vec<ContentBlock>, pages: PagePlacement) -> &mut Self {
        self.header = blocks;
        self.header_pages = pages;
        self
    }

    /// Set the footer content and the pages it appears on
    pub fn footer(&mut self, blocks: Vec<ContentBlock>, pages: PagePlacement) -> &mut Self {
        self.footer = blocks;
        self.footer_pages = pages;
        self
    }

    pub fn background_image(&mut self, source: ImageSource) -> &mut Self {
        self.background_image = Some(source);
        self
    }

    /// Turn on page numbering at the given position and alignment
    pub fn page_numbers(&mut self, position: PageNumberPosition, alignment: Align) -> &mut Self {
        self.page_numbers = true;
        self.page_number_position = position;
        self.page_number_alignment = alignment;
        self
    }

    pub fn page_number_format<S: ToString>(&mut self, format: S) -> &mut Self {
        self.page_number_format = format.to_string();
        self
    }

    pub fn float_gap(&mut self, gap: Mm) -> &mut Self {
        self.float_gap = gap;
        self
    }

    pub fn info(&mut self, info: Info) -> &mut Self {
        self.info = Some(info);
        self
    }

    /// Whether the header is printed on any page
    pub fn has_header(&self) -> bool {
        !self.header.is_empty() && self.header_pages != PagePlacement::None
    }

    /// Whether the footer is printed on any page
    pub fn has_footer(&self) -> bool {
        !self.footer.is_empty() && self.footer_pages != PagePlacement::None
    }

    /// The page number text for the 1-based `page` of `total`
    pub fn page_number_text(&self, page: usize, total: usize) -> String {
        self.page_number_format
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_placement_coverage() {
        assert!(PagePlacement::First.covers(1, 3));
        assert!(!PagePlacement::First.covers(2, 3));
        assert!(PagePlacement::Last.covers(3, 3));
        assert!(!PagePlacement::Last.covers(1, 3));
        assert!(PagePlacement::Last.may_cover(1));
        assert!(!PagePlacement::None.covers(1, 1));
        assert!(!PagePlacement::Current.may_cover(1));
    }

    #[test]
    fn table_alignment_falls_back_to_shared() {
        let mut table = TableBlock::new(vec![vec!["a".into(), "b".into(), "c".into()]]);
        table.alignment = vec![Align::Right];
        assert_eq!(table.column_alignment(2), Align::Right);
        table.alignment = vec![Align::Left, Align::Center];
        assert_eq!(table.column_alignment(1), Align::Center);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn page_number_placeholders() {
        let template = Template::default();
        assert_eq!(template.page_number_text(2, 5), "Page 2 of 5");
    }
}
