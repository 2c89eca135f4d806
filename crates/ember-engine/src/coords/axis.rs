/// Axis selector used by centering helpers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Both,
}

impl Axis {
    #[inline]
    pub fn has_x(self) -> bool {
        matches!(self, Axis::X | Axis::Both)
    }

    #[inline]
    pub fn has_y(self) -> bool {
        matches!(self, Axis::Y | Axis::Both)
    }
}
