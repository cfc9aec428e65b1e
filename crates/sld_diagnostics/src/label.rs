//! Labels that annotate plane locations within a diagnostic.

use serde::{Deserialize, Serialize};
use sld_geom::Point;

/// A secondary location within a diagnostic, e.g. the obstacle a wire hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// The location this label annotates.
    pub location: Point,
    /// The message displayed next to the location.
    pub message: String,
}

impl Label {
    /// Creates a label at `location`.
    pub fn new(location: Point, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_label() {
        let label = Label::new(Point::new(40.0, 0.0), "enters INV1 here");
        assert_eq!(label.location, Point::new(40.0, 0.0));
        assert_eq!(label.message, "enters INV1 here");
    }
}
