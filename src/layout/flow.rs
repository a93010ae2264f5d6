use crate::layout::{Cursor, Margins, WrapDirection};
use crate::units::Mm;
use crate::PDFError;
use log::debug;

/// An active float-wrap region: until the cursor passes `boundary_y`, flowed
/// text is narrowed so that it runs beside the float instead of over it
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WrapState {
    /// The y coordinate below which the float no longer constrains the width
    pub boundary_y: Mm,
    /// The x coordinate of the float's edge that text flows along
    pub boundary_x: Mm,
    pub direction: WrapDirection,
}

/// A dry-run measurement of a run of words, kept while accumulating the words
/// that fit beside a float
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLine {
    pub text: String,
    pub height: Mm,
}

/// The mutable state threaded through every placement of a single render: the
/// cursor, the template's original margins, the margins currently in effect,
/// and at most one active float-wrap region.
///
/// A fresh value is built for every document, so concurrent renders never
/// share layout state.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub cursor: Cursor,
    original: Margins,
    current: Margins,
    wrap: Option<WrapState>,
    page: usize,
    /// The advance of the last line placed, used by line breaks without a height
    pub last_line_height: Option<Mm>,
}

impl FlowState {
    /// Create flow state for a document with the given margins, with the cursor
    /// at the top-left corner of the content area
    pub fn new(margins: Margins) -> FlowState {
        FlowState {
            cursor: Cursor::new(margins.left, margins.top),
            original: margins,
            current: margins,
            wrap: None,
            page: 0,
            last_line_height: None,
        }
    }

    pub fn original_margins(&self) -> &Margins {
        &self.original
    }

    pub fn current_margins(&self) -> &Margins {
        &self.current
    }

    pub fn wrap(&self) -> Option<&WrapState> {
        self.wrap.as_ref()
    }

    /// The 1-based page the flow is on, 0 before the first page is opened
    pub fn page(&self) -> usize {
        self.page
    }

    /// Replace the margins currently in effect; the original margins are untouched
    pub fn set_margins(&mut self, margins: Margins) {
        self.current = margins;
    }

    /// Return the current margins to the original margins. Idempotent
    pub fn restore_margins(&mut self) {
        self.current = self.original;
    }

    /// Start a float-wrap region, narrowing the current margins by `narrow_by` on
    /// the float's side. Only one region may be active at a time
    pub fn begin_wrap(
        &mut self,
        boundary_y: Mm,
        boundary_x: Mm,
        direction: WrapDirection,
        narrow_by: Mm,
    ) -> Result<(), PDFError> {
        if self.wrap.is_some() {
            return Err(PDFError::LayoutState(
                "a float-wrap region is already active",
            ));
        }

        debug!("begin {direction:?} wrap down to y={boundary_y}, edge at x={boundary_x}");
        self.wrap = Some(WrapState {
            boundary_y,
            boundary_x,
            direction,
        });
        self.current = self.original.narrowed(direction, narrow_by);
        Ok(())
    }

    /// End the active float-wrap region and restore the original margins
    pub fn end_wrap(&mut self) -> Result<WrapState, PDFError> {
        let wrap = self
            .wrap
            .take()
            .ok_or(PDFError::LayoutState("no float-wrap region is active"))?;
        debug!("end wrap at y={}", self.cursor.y);
        self.restore_margins();
        Ok(wrap)
    }

    /// Whether the cursor has moved past the bottom of the active wrap region
    pub fn wrap_expired(&self) -> bool {
        self.wrap
            .as_ref()
            .map(|wrap| self.cursor.y >= wrap.boundary_y)
            .unwrap_or(false)
    }

    /// Drop any active wrap without complaint, leaving the original margins in
    /// effect. Used when a failure aborts the render part way through a block
    pub fn abandon_wrap(&mut self) {
        if self.wrap.take().is_some() {
            debug!("abandoning float wrap");
        }
        self.restore_margins();
    }

    /// Move onto the given page. Wrap regions are scoped to the page their float
    /// is on, so any active region is dropped and the cursor returns to the top
    /// margin
    pub fn advance_page(&mut self, page: usize) {
        debug!("flow advancing to page {page}");
        self.abandon_wrap();
        self.page = page;
        self.cursor = Cursor::new(self.original.left, self.original.top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FlowState {
        FlowState::new(Margins::trbl(Mm(10.0), Mm(12.0), Mm(15.0), Mm(20.0)))
    }

    #[test]
    fn begin_wrap_narrows_one_side() {
        let mut flow = state();
        flow.begin_wrap(Mm(50.0), Mm(62.0), WrapDirection::Left, Mm(44.0))
            .expect("no wrap active");
        assert_eq!(flow.current_margins().left, Mm(64.0));
        assert_eq!(flow.current_margins().right, Mm(12.0));
        assert_eq!(flow.wrap().map(|w| w.boundary_y), Some(Mm(50.0)));
    }

    #[test]
    fn nested_wrap_is_a_state_error() {
        let mut flow = state();
        flow.begin_wrap(Mm(50.0), Mm(62.0), WrapDirection::Left, Mm(44.0))
            .expect("no wrap active");
        let err = flow
            .begin_wrap(Mm(60.0), Mm(100.0), WrapDirection::Right, Mm(30.0))
            .unwrap_err();
        assert!(matches!(err, PDFError::LayoutState(_)));
        // the first region is untouched
        assert_eq!(flow.wrap().map(|w| w.boundary_y), Some(Mm(50.0)));
    }

    #[test]
    fn double_end_is_a_state_error() {
        let mut flow = state();
        flow.begin_wrap(Mm(50.0), Mm(150.0), WrapDirection::Right, Mm(44.0))
            .expect("no wrap active");
        flow.end_wrap().expect("wrap was active");
        assert!(matches!(flow.end_wrap(), Err(PDFError::LayoutState(_))));
    }

    #[test]
    fn restore_margins_is_idempotent_and_exact() {
        let mut flow = state();
        let original = *flow.original_margins();
        flow.restore_margins();
        assert_eq!(*flow.current_margins(), original);

        for i in 0..5 {
            flow.begin_wrap(Mm(50.0), Mm(60.0), WrapDirection::Left, Mm(3.3 * i as f32))
                .expect("no wrap active");
            flow.set_margins(Margins::all(Mm(0.1 * i as f32)));
            flow.end_wrap().expect("wrap was active");
        }
        flow.set_margins(Margins::all(Mm(1.0)));
        flow.restore_margins();
        flow.restore_margins();

        let current = flow.current_margins();
        assert_eq!(current.left.to_bits(), original.left.to_bits());
        assert_eq!(current.right.to_bits(), original.right.to_bits());
        assert_eq!(current.top.to_bits(), original.top.to_bits());
        assert_eq!(current.bottom.to_bits(), original.bottom.to_bits());
    }

    #[test]
    fn wrap_expires_when_cursor_passes_boundary() {
        let mut flow = state();
        flow.begin_wrap(Mm(50.0), Mm(60.0), WrapDirection::Left, Mm(40.0))
            .expect("no wrap active");
        flow.cursor.y = Mm(49.9);
        assert!(!flow.wrap_expired());
        flow.cursor.y = Mm(50.0);
        assert!(flow.wrap_expired());
    }

    #[test]
    fn page_advance_clears_wrap() {
        let mut flow = state();
        flow.begin_wrap(Mm(50.0), Mm(60.0), WrapDirection::Left, Mm(40.0))
            .expect("no wrap active");
        flow.cursor.y = Mm(30.0);
        flow.advance_page(2);
        assert!(flow.wrap().is_none());
        assert_eq!(flow.current_margins(), flow.original_margins());
        assert_eq!(flow.cursor, Cursor::new(Mm(20.0), Mm(10.0)));
        assert_eq!(flow.page(), 2);
    }
}
