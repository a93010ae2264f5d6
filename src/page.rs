use crate::colour::Colour;
use crate::font::LoadedFont;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use crate::PDFError;
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Ref, Str};

/// Width of box and cell borders
const BORDER_WIDTH: Pt = Pt(0.567);

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<LoadedFont>,
    pub size: Pt,
}

/// A run of text on one line, all in one font and colour
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Extra space after every character
    pub spacing: Pt,
    /// The start of the baseline, in PDF space
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        colour: Colour,
    },
    Rect {
        rect: Rect,
        stroke: Option<Colour>,
        fill: Option<Colour>,
    },
}

/// A single page of a document. Everything on it is positioned in PDF space:
/// points, measured from the bottom-left corner
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Stretched over the whole page, underneath everything else
    pub background: Option<Id<Image>>,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize) -> Page {
        Page {
            media_box: Rect::from_size(Pt(0.0), Pt(0.0), size.0.into(), size.1.into()),
            background: None,
            contents: Vec::default(),
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.add_spans(vec![span]);
    }

    pub fn add_spans(&mut self, spans: Vec<SpanLayout>) {
        if !spans.is_empty() {
            self.contents.push(PageContents::Text(spans));
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), width: Pt, colour: Colour) {
        self.contents.push(PageContents::Line {
            from,
            to,
            width,
            colour,
        });
    }

    pub fn add_rect(&mut self, rect: Rect, stroke: Option<Colour>, fill: Option<Colour>) {
        if stroke.is_some() || fill.is_some() {
            self.contents.push(PageContents::Rect { rect, stroke, fill });
        }
    }

    fn render_image(content: &mut Content, image_id: Id<Image>, position: &Rect) {
        content.save_state();
        content.transform([
            position.width().0,
            0.0,
            0.0,
            position.height().0,
            position.x1.0,
            position.y1.0,
        ]);
        content.x_object(Name(format!("I{}", image_id.index()).as_bytes()));
        content.restore_state();
    }

    fn render_spans(
        content: &mut Content,
        spans: &[SpanLayout],
        fonts: &Arena<LoadedFont>,
    ) -> Result<(), PDFError> {
        content.save_state();
        for span in spans {
            let font = &fonts[span.font.id];
            content.begin_text();
            content.set_font(
                Name(format!("F{}", span.font.id.index()).as_bytes()),
                span.font.size.0,
            );
            span.colour.apply_fill(content);
            content.set_char_spacing(span.spacing.0);
            content.next_line(span.coords.0 .0, span.coords.1 .0);
            content.show(Str(&font.encode(&span.text)?));
            content.end_text();
        }
        content.restore_state();
        Ok(())
    }

    fn render(&self, fonts: &Arena<LoadedFont>) -> Result<Vec<u8>, PDFError> {
        let mut content = Content::new();

        if let Some(background) = self.background {
            Page::render_image(&mut content, background, &self.media_box);
        }

        for page_content in self.contents.iter() {
            match page_content {
                PageContents::Text(spans) => Page::render_spans(&mut content, spans, fonts)?,
                PageContents::Image(image) => {
                    Page::render_image(&mut content, image.image_id, &image.position)
                }
                PageContents::Line {
                    from,
                    to,
                    width,
                    colour,
                } => {
                    content.save_state();
                    content.set_line_width(width.0);
                    colour.apply_stroke(&mut content);
                    content.move_to(from.0 .0, from.1 .0);
                    content.line_to(to.0 .0, to.1 .0);
                    content.stroke();
                    content.restore_state();
                }
                PageContents::Rect { rect, stroke, fill } => {
                    content.save_state();
                    content.set_line_width(BORDER_WIDTH.0);
                    if let Some(fill) = fill {
                        fill.apply_fill(&mut content);
                    }
                    if let Some(stroke) = stroke {
                        stroke.apply_stroke(&mut content);
                    }
                    content.rect(rect.x1.0, rect.y1.0, rect.width().0, rect.height().0);
                    match (fill, stroke) {
                        (Some(_), Some(_)) => content.fill_nonzero_and_stroke(),
                        (Some(_), None) => content.fill_nonzero(),
                        _ => content.stroke(),
                    };
                    content.restore_state();
                }
            }
        }

        Ok(content.finish())
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        page_tree: Ref,
        fonts: &Arena<LoadedFont>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(PDFError::PageMissing(page_index + 1))?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(page_tree);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (font_id, _) in fonts.iter() {
            if let Some(font_ref) = refs.get(RefType::Font(font_id.index())) {
                resource_fonts.pair(Name(format!("F{}", font_id.index()).as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (image_id, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(image_id.index())) {
                resource_xobjects
                    .pair(Name(format!("I{}", image_id.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = self.render(fonts)?;
        let compressed = compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        Ok(())
    }
}
