//! Page geometry and fit-and-center placement.

use super::ImageRecord;
use serde::{Deserialize, Serialize};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Widest page the deck may use (11 inches).
pub const MAX_PAGE_WIDTH: f64 = 11.0 * POINTS_PER_INCH;

/// Tallest page the deck may use (8.5 inches).
pub const MAX_PAGE_HEIGHT: f64 = 8.5 * POINTS_PER_INCH;

/// Fixed page size of the whole document, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width in points
    pub width: f64,

    /// Page height in points
    pub height: f64,
}

impl PageGeometry {
    /// Derive the page size from an image aspect ratio.
    ///
    /// Landscape images take the full 11in width; portrait and square
    /// images take the full 8.5in height.
    pub fn from_aspect_ratio(aspect: f64) -> Self {
        if aspect > 1.0 {
            let width = MAX_PAGE_WIDTH;
            Self {
                width,
                height: width / aspect,
            }
        } else {
            let height = MAX_PAGE_HEIGHT;
            Self {
                width: height * aspect,
                height,
            }
        }
    }

    /// Derive the page size from the first image of a deck.
    pub fn from_record(record: &ImageRecord) -> Self {
        Self::from_aspect_ratio(record.aspect_ratio)
    }

    /// `width / height` of the page.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Scale an image of the given aspect ratio to the largest size that
    /// fits the page, then center it.
    pub fn place(&self, image_aspect: f64) -> Placement {
        let (draw_width, draw_height) = if image_aspect > self.aspect_ratio() {
            (self.width, self.width / image_aspect)
        } else {
            (self.height * image_aspect, self.height)
        };

        Placement {
            draw_width,
            draw_height,
            x: (self.width - draw_width) / 2.0,
            y: (self.height - draw_height) / 2.0,
        }
    }

    /// Place a record on the page.
    pub fn place_record(&self, record: &ImageRecord) -> Placement {
        self.place(record.aspect_ratio)
    }
}

/// Where an image is drawn on its page. Origin is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Drawn width in points
    pub draw_width: f64,
    /// Drawn height in points
    pub draw_height: f64,
    /// Left offset in points
    pub x: f64,
    /// Bottom offset in points
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_landscape_geometry() {
        let page = PageGeometry::from_aspect_ratio(800.0 / 600.0);
        assert!(approx(page.width, 792.0));
        assert!(approx(page.height, 594.0));
    }

    #[test]
    fn test_portrait_and_square_geometry() {
        let page = PageGeometry::from_aspect_ratio(0.75);
        assert!(approx(page.height, 612.0));
        assert!(approx(page.width, 459.0));

        let square = PageGeometry::from_aspect_ratio(1.0);
        assert!(approx(square.width, 612.0));
        assert!(approx(square.height, 612.0));
    }

    #[test]
    fn test_place_matching_aspect_fills_page() {
        let page = PageGeometry::from_aspect_ratio(800.0 / 600.0);
        let p = page.place(800.0 / 600.0);
        assert!(approx(p.draw_width, page.width));
        assert!(approx(p.draw_height, page.height));
        assert!(approx(p.x, 0.0));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn test_place_portrait_on_landscape_page() {
        let page = PageGeometry::from_aspect_ratio(800.0 / 600.0);
        let p = page.place(600.0 / 800.0);
        assert!(approx(p.draw_height, 594.0));
        assert!(approx(p.draw_width, 445.5));
        assert!(approx(p.x, 173.25));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn test_place_panorama_on_portrait_page() {
        let page = PageGeometry::from_aspect_ratio(0.5);
        let p = page.place(4.0);
        assert!(approx(p.draw_width, page.width));
        assert!(approx(p.draw_height, page.width / 4.0));
        assert!(approx(p.x, 0.0));
        assert!(p.y > 0.0);
    }

    #[test]
    fn test_placement_invariants() {
        let aspects = [0.1, 0.5, 0.75, 1.0, 1.25, 16.0 / 9.0, 3.0, 12.0];
        for &first in &aspects {
            let page = PageGeometry::from_aspect_ratio(first);
            assert!(page.width <= MAX_PAGE_WIDTH + EPS);
            assert!(page.height <= MAX_PAGE_WIDTH + EPS);
            for &aspect in &aspects {
                let p = page.place(aspect);
                assert!(p.draw_width <= page.width + EPS);
                assert!(p.draw_height <= page.height + EPS);
                assert!(p.x >= -EPS && p.y >= -EPS);
                assert!((p.draw_width / p.draw_height - aspect).abs() < 1e-9 * aspect.max(1.0));
            }
        }
    }
}
