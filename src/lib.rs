//! Flow layout for letters and other block-structured documents, rendered
//! to PDF.
//!
//! A letter is an ordered list of [ContentBlock](blocks::ContentBlock)s laid
//! onto the pages described by a [Template](blocks::Template). Blocks flow
//! down the page one after the other, breaking onto new pages as needed, and
//! text can wrap beside floated images and QR codes. See [layout] for the
//! engine itself and [render] for the one-call entry point.

pub mod blocks;

mod canvas;
pub use canvas::*;

mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

pub mod qr;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod render;
pub use render::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
