//! Flow layout: placing content blocks down a page one after the other.
//!
//! The [LayoutEngine] walks an ordered list of [ContentBlock](crate::blocks::ContentBlock)s
//! and places each one at a running cursor held in a [FlowState]. Left or
//! right aligned images and QR codes can start a float-wrap region, which
//! narrows the margins so that following text runs beside the float until
//! the cursor passes its bottom edge.
//!
//! The engine never draws directly. It talks to a backend through two
//! traits: [Measure] for dry-run measurements and [Canvas] for drawing,
//! pages and the authoritative cursor. [PdfCanvas](crate::PdfCanvas) is the
//! backend that writes PDF files.
//!
//! # Example
//!
//! ```
//! use letter_flow::blocks::{ImageBlock, ImageSource, TextBlock, Template, Align};
//! use letter_flow::layout::LayoutEngine;
//! use letter_flow::{Mm, PdfCanvas};
//! use std::sync::Arc;
//!
//! let template = Template::default();
//! let mut canvas = PdfCanvas::new(&template);
//! canvas.begin().expect("first page opens");
//!
//! let logo = image::DynamicImage::new_rgb8(40, 40);
//! let mut float = ImageBlock::new(ImageSource::Bitmap(Arc::new(logo)), (Mm(30.0), Mm(30.0)));
//! float.alignment = Align::Right;
//! float.wrap_text = true;
//!
//! let blocks = vec![float.into(), TextBlock::new("Runs beside the logo").into()];
//! let mut engine = LayoutEngine::new(&mut canvas, &template);
//! engine.run(&blocks).expect("blocks lay out");
//! assert!(engine.flow().wrap().is_some());
//! ```

mod engine;
mod flow;
mod margins;
mod ports;
mod table;
mod text;

pub use engine::*;
pub use flow::*;
pub use margins::*;
pub use ports::*;
pub use table::*;
pub use text::*;
