use crate::blocks::ImageSource;
use crate::refs::{ObjectReferences, RefType};
use crate::PDFError;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;
use std::sync::Arc;

enum Pixels {
    /// An RGB JPEG file, embedded as it is
    Jpeg(Vec<u8>),
    Bitmap(Arc<DynamicImage>),
}

/// A raster image stored once in a document and drawn on any number of pages
pub struct Image {
    pixels: Pixels,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    grey: bool,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn load(source: &ImageSource) -> Result<Image, PDFError> {
        match source {
            ImageSource::Path(path) => Image::from_disk(path),
            ImageSource::Bitmap(bitmap) => Ok(Image::from_bitmap(bitmap.clone())),
        }
    }

    pub fn from_disk<P: AsRef<Path>>(path: P) -> Result<Image, PDFError> {
        let path = path.as_ref();
        let is_tga = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("tga"))
            .unwrap_or(false);

        let data = std::fs::read(path)?;
        let format = if is_tga {
            ImageFormat::Tga
        } else {
            image::guess_format(&data)?
        };
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: image.width(),
                height: image.height(),
                pixels: Pixels::Jpeg(data),
            }),
            _ => Ok(Image::from_bitmap(Arc::new(image))),
        }
    }

    pub fn from_bitmap(image: Arc<DynamicImage>) -> Image {
        Image {
            width: image.width(),
            height: image.height(),
            pixels: Pixels::Bitmap(image),
        }
    }

    fn encode(&self) -> EncodeOutput {
        match &self.pixels {
            Pixels::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                grey: false,
                mask: None,
            },
            Pixels::Bitmap(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<_> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let grey = image.color() == ColorType::L8;
                let bytes = if grey {
                    compress_to_vec_zlib(image.to_luma8().as_raw(), level)
                } else {
                    compress_to_vec_zlib(image.to_rgb8().as_raw(), level)
                };

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    grey,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        if encoded.grey {
            image.color_space().device_gray();
        } else {
            image.color_space().device_rgb();
        }
        image.bits_per_component(8);

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // the transparency mask, if the image has an alpha channel
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
