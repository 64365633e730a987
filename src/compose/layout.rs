//! Slide geometry: where images and text regions land on a 10 × 7.5 inch
//! slide, in EMU (914 400 per inch, the native OOXML length unit).
//!
//! Side alignments use fixed region templates. Top/bottom alignments size
//! the image from the actual rendered line count so a short section gets a
//! proportionally larger image. Every function here is total: any line
//! count ≥ 0 produces an in-range placement, out-of-range values clamp.

use super::style::ImageAlign;

pub const EMU_PER_INCH: i64 = 914_400;

pub const SLIDE_WIDTH: i64 = 10 * EMU_PER_INCH;
pub const SLIDE_HEIGHT: i64 = (7.5 * EMU_PER_INCH as f64) as i64;

/// Height reserved for the slide title across all content layouts.
pub const TITLE_HEIGHT: i64 = inches(1.2);

/// Image height bounds for stacked layouts. The floor keeps a zero-line
/// slide from collapsing the image; the ceiling keeps it on the page.
pub const IMAGE_MIN_HEIGHT: i64 = inches(1.5);
pub const IMAGE_MAX_HEIGHT_TOP: i64 = inches(3.5);
pub const IMAGE_MAX_HEIGHT_BOTTOM: i64 = inches(3.0);

pub const fn inches(v: f64) -> i64 {
    (v * EMU_PER_INCH as f64) as i64
}

/// Position + size of one rectangular region, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Region {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Region {
            left: inches(left),
            top: inches(top),
            width: inches(width),
            height: inches(height),
        }
    }
}

/// Fixed region pair for side-by-side layouts: (image, content).
pub fn side_regions(align: ImageAlign) -> (Region, Region) {
    match align {
        ImageAlign::Left => (
            Region::new(0.3, 1.4, 4.2, 5.8),
            Region::new(4.7, 1.4, 5.0, 5.9),
        ),
        // Right and any non-side value fed here: image on the right.
        _ => (
            Region::new(5.7, 1.4, 4.2, 5.8),
            Region::new(0.5, 1.4, 5.0, 5.9),
        ),
    }
}

/// Estimated vertical footprint of `line_count` rendered text lines:
/// a fixed base plus a per-line allowance.
fn text_space(line_count: usize) -> i64 {
    inches(0.5) + line_count as i64 * inches(0.35)
}

/// Compute image placement for a content slide.
///
/// For side alignments the pre-defined secondary region is reused
/// verbatim. For top/bottom the height is clamped into
/// [`IMAGE_MIN_HEIGHT`, ceiling] and positioned before or after the
/// estimated text block.
pub fn image_placement(line_count: usize, align: ImageAlign, page_height: i64) -> Region {
    match align {
        ImageAlign::Left | ImageAlign::Right => side_regions(align).0,
        ImageAlign::Top => {
            let available = page_height - TITLE_HEIGHT - text_space(line_count) - inches(0.5);
            Region {
                left: inches(1.5),
                top: TITLE_HEIGHT,
                width: inches(7.0),
                height: available.min(IMAGE_MAX_HEIGHT_TOP).max(IMAGE_MIN_HEIGHT),
            }
        }
        ImageAlign::Bottom => {
            let top = TITLE_HEIGHT + text_space(line_count) + inches(0.3);
            let available = page_height - top - inches(0.4);
            Region {
                left: inches(1.5),
                top,
                width: inches(7.0),
                height: available.min(IMAGE_MAX_HEIGHT_BOTTOM).max(IMAGE_MIN_HEIGHT),
            }
        }
    }
}

/// Title region shared by all content slides.
pub fn title_region() -> Region {
    Region {
        left: inches(0.5),
        top: inches(0.25),
        width: SLIDE_WIDTH - inches(1.0),
        height: TITLE_HEIGHT - inches(0.3),
    }
}

/// Content (text) region for a stacked layout, laid out around the image
/// placement so the two never overlap.
pub fn stacked_content_region(align: ImageAlign, image: Option<&Region>) -> Region {
    match (align, image) {
        (ImageAlign::Top, Some(img)) => {
            let top = img.top + img.height + inches(0.2);
            Region {
                left: inches(0.75),
                top,
                width: inches(8.5),
                height: (SLIDE_HEIGHT - top - inches(0.3)).max(inches(1.0)),
            }
        }
        // Bottom alignment and the no-image case: text starts under the
        // title in the default position.
        _ => Region {
            left: inches(0.75),
            top: inches(1.4),
            width: inches(8.5),
            height: SLIDE_HEIGHT - inches(1.4) - inches(0.4),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_height_stays_in_range() {
        for align in [ImageAlign::Top, ImageAlign::Bottom] {
            let ceiling = match align {
                ImageAlign::Top => IMAGE_MAX_HEIGHT_TOP,
                _ => IMAGE_MAX_HEIGHT_BOTTOM,
            };
            for lines in 0..=50 {
                let p = image_placement(lines, align, SLIDE_HEIGHT);
                assert!(p.height >= IMAGE_MIN_HEIGHT, "{align:?} {lines} lines: {}", p.height);
                assert!(p.height <= ceiling, "{align:?} {lines} lines: {}", p.height);
                assert!(p.top >= TITLE_HEIGHT, "{align:?} {lines} lines: top {}", p.top);
            }
        }
    }

    #[test]
    fn zero_lines_top_alignment_uses_floor_offset() {
        let p = image_placement(0, ImageAlign::Top, SLIDE_HEIGHT);
        assert_eq!(p.top, TITLE_HEIGHT);
        // 7.5 - 1.2 - 0.5 - 0.5 = 5.3in available, clamped to the ceiling.
        assert_eq!(p.height, IMAGE_MAX_HEIGHT_TOP);
    }

    #[test]
    fn many_lines_bottom_alignment_clamps_to_floor() {
        let p = image_placement(50, ImageAlign::Bottom, SLIDE_HEIGHT);
        assert_eq!(p.height, IMAGE_MIN_HEIGHT);
    }

    #[test]
    fn side_placement_reuses_template_region() {
        let p = image_placement(3, ImageAlign::Left, SLIDE_HEIGHT);
        assert_eq!(p, side_regions(ImageAlign::Left).0);
    }

    #[test]
    fn stacked_content_clears_top_image() {
        let img = image_placement(2, ImageAlign::Top, SLIDE_HEIGHT);
        let content = stacked_content_region(ImageAlign::Top, Some(&img));
        assert!(content.top >= img.top + img.height);
    }
}
