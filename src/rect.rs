use crate::units::*;
use std::ops::{Add, Sub};

/// A rectangle, specified by two opposite corners. Rectangles in PDF space are
/// in [Pt] with the first corner at the lower left; rectangles handed to a
/// [Canvas](crate::layout::Canvas) are in [Mm] with the first corner at the top left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect<U = Pt> {
    /// The x-coordinate of the first corner.
    pub x1: U,
    /// The y-coordinate of the first corner.
    pub y1: U,
    /// The x-coordinate of the second corner.
    pub x2: U,
    /// The y-coordinate of the second corner.
    pub y2: U,
}

impl<U: Copy + Add<Output = U> + Sub<Output = U>> Rect<U> {
    /// Create a rectangle from its first corner and its size
    pub fn from_size(x: U, y: U, width: U, height: U) -> Rect<U> {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> U {
        self.x2 - self.x1
    }

    pub fn height(&self) -> U {
        self.y2 - self.y1
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<&Rect> for pdf_writer::Rect {
    fn from(r: &Rect) -> Self {
        (*r).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_round_trips() {
        let r = Rect::from_size(Mm(10.0), Mm(20.0), Mm(30.0), Mm(5.0));
        assert_eq!(r.x2, Mm(40.0));
        assert_eq!(r.width(), Mm(30.0));
        assert_eq!(r.height(), Mm(5.0));
    }
}
