use crate::units::Mm;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PDFError {
    /// The float-wrap region was begun twice or ended without being begun.
    /// This is a programming error in the caller of the flow state
    #[error("float wrap misuse: {0}")]
    LayoutState(&'static str),

    /// The dispatcher was handed a block that has no placement routine in its
    /// placement mode
    #[error("no placement routine for a {mode} {kind} block")]
    UnreachableVariant {
        kind: &'static str,
        mode: &'static str,
    },

    /// Explicit table column fractions must sum to exactly one
    #[error("table column widths sum to {sum}, expected 1.0")]
    ColumnWidthMismatch { sum: f32 },

    /// Explicit table column fractions must have one entry per column
    #[error("table has {columns} columns but {widths} column widths were given")]
    ColumnCountMismatch { columns: usize, widths: usize },

    /// A float was asked to narrow the margins beyond the page
    #[error("a float of width {width} does not fit between the margins")]
    FloatTooWide { width: Mm },

    /// The requested page does not exist in the document
    #[error("page {0} does not exist")]
    PageMissing(usize),

    /// The font has neither the requested glyph nor any replacement glyph
    #[error("font has no glyph for {0:?} and no replacement glyph")]
    FontMissingGlyphs(char),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// [qrcode] could not encode the payload
    QrCode(#[from] qrcode::types::QrError),
}
