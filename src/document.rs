use crate::{
    font::LoadedFont,
    image::Image,
    info::Info,
    page::Page,
    refs::{ObjectReferences, RefType},
    PDFError,
};
use id_arena::{Arena, Id};
use log::debug;
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Arena<LoadedFont>,
    pub images: Arena<Image>,
}

impl Document {
    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// The page at the 1-based position `number`
    pub fn page_mut(&mut self, number: usize) -> Result<&mut Page, PDFError> {
        let id = number
            .checked_sub(1)
            .and_then(|index| self.page_order.get(index))
            .copied()
            .ok_or(PDFError::PageMissing(number))?;
        self.pages.get_mut(id).ok_or(PDFError::PageMissing(number))
    }

    /// Add an image to the document. Images are stored once and may be drawn
    /// on any number of pages
    pub fn add_image(&mut self, image: Image) -> Id<Image> {
        self.images.alloc(image)
    }

    /// Write the entire document to the writer. The document is rendered in
    /// memory first and written out in one go
    pub fn write<W: Write>(self, mut w: W) -> Result<(), PDFError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (id, font) in fonts.iter() {
            font.write(&mut refs, id, &mut writer);
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages
                .get(*id)
                .ok_or(PDFError::PageMissing(page_index + 1))?;
            page.write(
                &mut refs,
                page_index,
                page_tree_id,
                &fonts,
                &images,
                &mut writer,
            )?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        debug!(
            "writing {} pages, {} fonts, {} images",
            page_order.len(),
            fonts.len(),
            images.len()
        );
        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn pages_are_numbered_from_one() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::A4));
        doc.add_page(Page::new(pagesize::A5));
        assert_eq!(doc.page_count(), 2);
        assert!(doc.page_mut(0).is_err());
        assert!(doc.page_mut(2).is_ok());
        assert!(matches!(doc.page_mut(3), Err(PDFError::PageMissing(3))));
    }

    #[test]
    fn writes_a_pdf() {
        let mut doc = Document::default();
        doc.add_page(Page::new(pagesize::LETTER));
        let mut bytes = Vec::new();
        doc.write(&mut bytes).expect("can write to a vec");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
