use crate::units::Mm;

/// Which side of the page a float hugs; text flows along the opposite side
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WrapDirection {
    Left,
    Right,
}

/// Margins are used when laying out blocks on a page. Nothing stops a block from
/// drawing outside of them; they are guidelines for the flow layout. The
/// layout engine keeps two copies: the template's original margins and the
/// current margins, which a text-wrapping float narrows on one side
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Mm, right: Mm, bottom: Mm, left: Mm) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Mm>>(value: D) -> Margins {
        let value: Mm = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Mm, horizontal: Mm) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::all(Mm(0.0))
    }

    /// Margins with the side named by `direction` pushed inwards by `by`,
    /// leaving room for a float of that width
    pub fn narrowed(&self, direction: WrapDirection, by: Mm) -> Margins {
        match direction {
            WrapDirection::Left => Margins {
                left: self.left + by,
                ..*self
            },
            WrapDirection::Right => Margins {
                right: self.right + by,
                ..*self
            },
        }
    }

    /// The horizontal space between the left and right margins on a page of the given width
    pub fn content_width(&self, page_width: Mm) -> Mm {
        page_width - self.left - self.right
    }
}
