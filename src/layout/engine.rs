use crate::blocks::*;
use crate::layout::{
    table_layout, Canvas, Cursor, FlowState, MeasuredLine, RectStyle, TextStyle, WrapDirection,
    WrapState,
};
use crate::rect::Rect;
use crate::units::Mm;
use crate::{qr, PDFError};
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::Arc;

/// Thickness of a single stroke of a [LineBlock]
const STROKE: Mm = Mm(1.0);

/// Line height used for line breaks before any text has been placed
const DEFAULT_LINE_HEIGHT: f32 = 1.2;

/// A floated object: something drawn at the cursor that text may flow beside
enum Float<'b> {
    Image(&'b ImageSource),
    Qr(&'b str),
}

fn text_style(block: &TextBlock) -> TextStyle {
    TextStyle {
        alignment: block.alignment,
        line_height: block.line_height,
        border: block.border,
        border_colour: block.border_colour,
        fill: block.fill,
    }
}

fn unreachable(kind: &BlockKind, mode: &'static str) -> PDFError {
    PDFError::UnreachableVariant {
        kind: kind.name(),
        mode,
    }
}

/// Places content blocks onto a [Canvas], one after the other.
///
/// The engine owns the [FlowState] of a single render and borrows the canvas
/// and template for its duration. Every placement routine takes a `dry` flag:
/// a dry placement measures instead of drawing and only moves the engine's own
/// cursor, which is how [LayoutEngine::measure_height] answers "how tall would
/// this content be".
///
/// After every real draw the cursor is read back from the canvas, since the
/// canvas may have started a new page part way through a block.
///
/// QR codes are encoded once per payload and the same bitmap is handed to the
/// canvas every time, so a code repeated on every page is stored once.
pub struct LayoutEngine<'a, C: Canvas> {
    canvas: &'a mut C,
    template: &'a Template,
    flow: FlowState,
    qr_codes: HashMap<String, ImageSource>,
}

impl<'a, C: Canvas> LayoutEngine<'a, C> {
    pub fn new(canvas: &'a mut C, template: &'a Template) -> LayoutEngine<'a, C> {
        LayoutEngine {
            canvas,
            template,
            flow: FlowState::new(template.margins),
            qr_codes: HashMap::new(),
        }
    }

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    pub fn canvas(&self) -> &C {
        &*self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut *self.canvas
    }

    /// Lay out `blocks` in order, starting at the canvas cursor.
    ///
    /// If a block fails, no float-wrap region is left active: the original
    /// margins are back in effect on both the flow and the canvas
    pub fn run(&mut self, blocks: &[ContentBlock]) -> Result<(), PDFError> {
        self.sync_flow();
        let result = blocks
            .iter()
            .try_for_each(|block| self.dispatch(block, false));
        if result.is_err() {
            self.clear_wrap();
        }
        result
    }

    /// The height `blocks` would occupy if laid out from the current cursor,
    /// including the bottom of a float that text is still flowing beside.
    /// Nothing is drawn and the flow state is left exactly as it was
    pub fn measure_height(&mut self, blocks: &[ContentBlock]) -> Result<Mm, PDFError> {
        let saved = self.flow.clone();
        let start = self.flow.cursor.y;
        let result = blocks
            .iter()
            .try_for_each(|block| self.dispatch(block, true))
            .map(|_| {
                let float_bottom = self.flow.wrap().map(|wrap| wrap.boundary_y);
                let end = float_bottom.map_or(self.flow.cursor.y, |y| y.max(self.flow.cursor.y));
                end - start
            });
        self.flow = saved;
        trace!("measured {} blocks at {:?}", blocks.len(), result.as_ref().ok());
        result
    }

    /// Lay out a header or footer band on the canvas's current page, starting
    /// at `top`, without page breaks
    pub fn place_band(&mut self, blocks: &[ContentBlock], top: Mm) -> Result<(), PDFError> {
        let auto_break = self.canvas.auto_page_break();
        self.canvas.set_auto_page_break(false);

        self.flow.advance_page(self.canvas.current_page());
        self.flow.cursor.y = top;
        self.sync_canvas();
        let result = blocks
            .iter()
            .try_for_each(|block| self.dispatch(block, false));

        self.clear_wrap();
        self.canvas.set_auto_page_break(auto_break);
        result
    }

    /// Draw the positioned blocks of `blocks` that are pinned to the 1-based
    /// `page` of `total` onto the canvas's current page
    pub fn place_pinned(
        &mut self,
        blocks: &[ContentBlock],
        page: usize,
        total: usize,
    ) -> Result<(), PDFError> {
        for block in blocks {
            if let PlacementMode::Positioned(position) = &block.placement {
                if position.on_pages.covers(page, total) {
                    self.place_positioned(&block.kind, position)?;
                }
            }
        }
        Ok(())
    }

    /// Place a single block. Positioned blocks pinned to other pages than the
    /// current one are left for [LayoutEngine::place_pinned]
    pub fn dispatch(&mut self, block: &ContentBlock, dry: bool) -> Result<(), PDFError> {
        trace!("dispatch {} block (dry: {dry})", block.kind.name());
        match &block.placement {
            PlacementMode::Flowed => self.place_flowed(&block.kind, dry),
            PlacementMode::Positioned(position) => match &block.kind {
                BlockKind::Table(_) | BlockKind::LineBreak(_) => {
                    Err(unreachable(&block.kind, "positioned"))
                }
                _ if dry || position.on_pages != PagePlacement::Current => Ok(()),
                kind => self.place_positioned(kind, position),
            },
        }
    }

    fn place_flowed(&mut self, kind: &BlockKind, dry: bool) -> Result<(), PDFError> {
        if self.flow.wrap_expired() {
            self.end_wrap(false, dry)?;
        }

        match kind {
            BlockKind::Text(text) => self.place_text(text, dry),
            BlockKind::Table(table) => self.place_table(table, dry),
            BlockKind::Line(line) => self.place_line(line, dry),
            BlockKind::LineBreak(line_break) => self.place_line_break(line_break, dry),
            BlockKind::Image(image) => self.place_float(
                Float::Image(&image.source),
                image.size,
                image.alignment,
                image.wrap_text,
                dry,
            ),
            BlockKind::QrCode(code) => self.place_float(
                Float::Qr(&code.payload),
                (code.size, code.size),
                code.alignment,
                code.wrap_text,
                dry,
            ),
            BlockKind::Box(_) => Err(unreachable(kind, "flowed")),
        }
    }

    /// The bitmap of the QR code for `payload`, encoding it on first use
    fn qr_bitmap(&mut self, payload: &str) -> Result<ImageSource, PDFError> {
        if let Some(bitmap) = self.qr_codes.get(payload) {
            return Ok(bitmap.clone());
        }
        let bitmap = ImageSource::Bitmap(Arc::new(qr::encode(payload)?));
        self.qr_codes.insert(payload.to_string(), bitmap.clone());
        Ok(bitmap)
    }

    fn content_width(&self) -> Mm {
        self.flow
            .current_margins()
            .content_width(self.canvas.page_size().0)
    }

    /// Push the flow's margins and cursor to the canvas before drawing
    fn sync_canvas(&mut self) {
        self.canvas.set_margins(*self.flow.current_margins());
        self.canvas.set_cursor(self.flow.cursor);
    }

    /// Read the cursor back from the canvas after drawing, following it onto a
    /// new page if it moved to one. Flowed content always resumes at the left
    /// margin
    fn sync_flow(&mut self) {
        let page = self.canvas.current_page();
        if page != self.flow.page() {
            self.flow.advance_page(page);
            self.canvas.set_margins(*self.flow.current_margins());
        }
        let y = self.canvas.cursor().y;
        self.flow.cursor = Cursor::new(self.flow.current_margins().left, y);
    }

    /// End the active wrap, optionally moving the cursor below the float
    fn end_wrap(&mut self, below_float: bool, dry: bool) -> Result<WrapState, PDFError> {
        let wrap = self.flow.end_wrap()?;
        self.flow.cursor.x = self.flow.current_margins().left;
        if below_float {
            self.flow.cursor.y = self.flow.cursor.y.max(wrap.boundary_y);
        }
        if !dry {
            self.sync_canvas();
        }
        Ok(wrap)
    }

    /// Drop any wrap without checks and put the original margins back in effect
    fn clear_wrap(&mut self) {
        self.flow.abandon_wrap();
        self.canvas.set_margins(*self.flow.current_margins());
    }

    fn place_text(&mut self, block: &TextBlock, dry: bool) -> Result<(), PDFError> {
        if block.text.trim().is_empty() {
            return Ok(());
        }

        let template = self.template;
        let font = block.font.as_ref().unwrap_or(&template.default_font);
        let style = text_style(block);

        if block.ignore_wrap && self.flow.wrap().is_some() {
            self.end_wrap(true, dry)?;
        }

        match self.flow.wrap().copied() {
            None => self.place_text_block(font, &block.text, &style, dry),
            Some(wrap) => self.place_text_beside(font, &block.text, &style, wrap, dry),
        }
    }

    /// Place text as one block at the current margin width, leaving line
    /// breaking to the canvas
    fn place_text_block(
        &mut self,
        font: &FontSpec,
        text: &str,
        style: &TextStyle,
        dry: bool,
    ) -> Result<(), PDFError> {
        let width = self.content_width();
        if dry {
            let height = self.canvas.measure(font, text, width, style.line_height)?;
            self.flow.cursor.y += height;
            self.flow.cursor.x = self.flow.current_margins().left;
        } else {
            self.sync_canvas();
            self.canvas.draw_text(font, text, style, width)?;
            self.sync_flow();
        }
        self.flow.last_line_height = Some(self.canvas.line_advance(font, style.line_height));
        Ok(())
    }

    /// Place as many words as fit beside the active float at the narrowed
    /// width, then the rest below the float at full width
    fn place_text_beside(
        &mut self,
        font: &FontSpec,
        text: &str,
        style: &TextStyle,
        wrap: WrapState,
        dry: bool,
    ) -> Result<(), PDFError> {
        let width = self.content_width();
        let start_y = self.flow.cursor.y;
        let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();

        let mut fitted: Option<MeasuredLine> = None;
        let mut fitted_words = 0;
        let mut exceeded = false;
        for count in 1..=words.len() {
            let candidate = words[..count].join(" ");
            let height = self
                .canvas
                .measure(font, &candidate, width, style.line_height)?;
            if start_y + height > wrap.boundary_y {
                exceeded = true;
                break;
            }
            fitted = Some(MeasuredLine {
                text: candidate,
                height,
            });
            fitted_words = count;
        }

        if let Some(line) = fitted {
            trace!(
                "{fitted_words} of {} words fit beside float in {}",
                words.len(),
                line.height
            );
            self.place_text_block(font, &line.text, style, dry)?;
        }

        if exceeded {
            // a page break while drawing the fitted words has already dropped the wrap
            if self.flow.wrap().is_some() {
                self.end_wrap(true, dry)?;
            }
            let rest = words[fitted_words..].join(" ");
            self.place_text_block(font, &rest, style, dry)?;
        }
        Ok(())
    }

    fn place_float(
        &mut self,
        float: Float<'_>,
        (width, height): (Mm, Mm),
        alignment: Align,
        wrap_text: bool,
        dry: bool,
    ) -> Result<(), PDFError> {
        let source = match (dry, float) {
            (true, _) => None,
            (false, Float::Image(source)) => Some(source.clone()),
            (false, Float::Qr(payload)) => Some(self.qr_bitmap(payload)?),
        };

        if !dry {
            self.sync_canvas();
            self.canvas.ensure_space(height)?;
            self.sync_flow();
        }

        let page_width = self.canvas.page_size().0;
        let margins = *self.flow.current_margins();
        let x = match alignment {
            Align::Left | Align::Justify => margins.left,
            Align::Right => page_width - margins.right - width,
            Align::Center => (page_width - width) / 2.0,
        };
        let y = self.flow.cursor.y;

        let direction = match alignment {
            _ if !wrap_text => None,
            Align::Left | Align::Justify => Some(WrapDirection::Left),
            Align::Right => Some(WrapDirection::Right),
            Align::Center => None,
        };

        if let Some(direction) = direction {
            let narrow_by = width + self.template.float_gap;
            let remaining = self
                .flow
                .original_margins()
                .narrowed(direction, narrow_by)
                .content_width(page_width);
            if remaining <= Mm(0.0) {
                return Err(PDFError::FloatTooWide { width });
            }
            let boundary_x = match direction {
                WrapDirection::Left => x + width,
                WrapDirection::Right => x,
            };
            self.flow
                .begin_wrap(y + height, boundary_x, direction, narrow_by)?;
        }

        if let Some(source) = &source {
            debug!("float {width}x{height} at ({x}, {y})");
            self.canvas.draw_image(source, x, y, width, height)?;
        }

        // text flows beside a wrapping float from its top edge
        if direction.is_none() {
            self.flow.cursor.y = y + height;
        }
        self.flow.cursor.x = self.flow.current_margins().left;
        if !dry {
            self.sync_canvas();
        }
        Ok(())
    }

    fn place_table(&mut self, table: &TableBlock, dry: bool) -> Result<(), PDFError> {
        let margins = *self.flow.current_margins();
        let layout = table_layout(
            table,
            &self.template.default_font,
            margins.left,
            self.content_width(),
            &*self.canvas,
        )?;

        if dry {
            self.flow.cursor.y += self.canvas.measure_table(&layout)?;
            self.flow.cursor.x = margins.left;
        } else {
            self.sync_canvas();
            self.canvas.draw_table(&layout)?;
            self.sync_flow();
        }
        Ok(())
    }

    /// Stroke the rule of a line block with its top edge at `top`. Strokes do
    /// not move the cursor
    fn draw_strokes(&mut self, line: &LineBlock, x: Mm, top: Mm, width: Mm) {
        for i in 0..line.height {
            let y = top + Mm(i as f32 + 0.5);
            self.canvas
                .draw_line(Cursor::new(x, y), Cursor::new(x + width, y), STROKE, line.colour);
        }
    }

    fn place_line(&mut self, line: &LineBlock, dry: bool) -> Result<(), PDFError> {
        let strokes = STROKE * line.height as f32;
        if !dry {
            self.sync_canvas();
            self.canvas.ensure_space(line.padding * 2.0 + strokes)?;
            self.sync_flow();
        }

        let x = self.flow.current_margins().left;
        let width = line.width.unwrap_or_else(|| self.content_width());
        let top = self.flow.cursor.y + line.padding;
        if !dry {
            self.draw_strokes(line, x, top, width);
        }

        self.flow.cursor = Cursor::new(x, top + strokes + line.padding);
        if !dry {
            self.canvas.set_cursor(self.flow.cursor);
        }
        Ok(())
    }

    fn place_line_break(&mut self, line_break: &LineBreakBlock, dry: bool) -> Result<(), PDFError> {
        let height = match (line_break.height, self.flow.last_line_height) {
            (Some(height), _) => height,
            (None, Some(last)) => last,
            (None, None) => self
                .canvas
                .line_advance(&self.template.default_font, DEFAULT_LINE_HEIGHT),
        };

        self.flow.cursor.y += height;
        self.flow.cursor.x = self.flow.current_margins().left;
        if !dry {
            self.canvas.set_cursor(self.flow.cursor);
        }
        Ok(())
    }

    /// Draw a positioned block immediately, leaving the cursor, the flow and
    /// automatic page breaking as they were
    fn place_positioned(
        &mut self,
        kind: &BlockKind,
        position: &FixedPosition,
    ) -> Result<(), PDFError> {
        let margins = self.template.margins;
        let (x, y) = if position.no_margin {
            (position.x, position.y)
        } else {
            (margins.left + position.x, margins.top + position.y)
        };

        let cursor = self.canvas.cursor();
        let auto_break = self.canvas.auto_page_break();
        self.canvas.set_auto_page_break(false);
        let result = self.draw_positioned(kind, x, y);
        self.canvas.set_cursor(cursor);
        self.canvas.set_auto_page_break(auto_break);
        result
    }

    fn draw_positioned(&mut self, kind: &BlockKind, x: Mm, y: Mm) -> Result<(), PDFError> {
        let template = self.template;
        // positioned blocks without a width run to the right margin
        let to_margin = self.canvas.page_size().0 - template.margins.right - x;

        match kind {
            BlockKind::Text(text) => {
                let font = text.font.as_ref().unwrap_or(&template.default_font);
                self.canvas.set_cursor(Cursor::new(x, y));
                self.canvas
                    .draw_text(font, &text.text, &text_style(text), text.width.unwrap_or(to_margin))?;
                Ok(())
            }
            BlockKind::Image(image) => {
                self.canvas
                    .draw_image(&image.source, x, y, image.size.0, image.size.1)
            }
            BlockKind::QrCode(code) => {
                let bitmap = self.qr_bitmap(&code.payload)?;
                self.canvas.draw_image(&bitmap, x, y, code.size, code.size)
            }
            BlockKind::Line(line) => {
                self.draw_strokes(line, x, y + line.padding, line.width.unwrap_or(to_margin));
                Ok(())
            }
            BlockKind::Box(shape) => {
                let style = match shape.style {
                    BoxStyle::Border => RectStyle {
                        stroke: Some(shape.border_colour),
                        fill: None,
                    },
                    BoxStyle::Background => RectStyle {
                        stroke: None,
                        fill: Some(shape.background_colour),
                    },
                    BoxStyle::BorderBackground => RectStyle {
                        stroke: Some(shape.border_colour),
                        fill: Some(shape.background_colour),
                    },
                };
                self.canvas
                    .draw_rect(Rect::from_size(x, y, shape.width, shape.height), style);
                Ok(())
            }
            BlockKind::Table(_) | BlockKind::LineBreak(_) => Err(unreachable(kind, "positioned")),
        }
    }
}
