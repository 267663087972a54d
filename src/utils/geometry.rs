//! Page layout predicates over block bounding boxes.

use crate::types::Block;

/// Horizontal tolerance around the page centre, as a fraction of page width.
const CENTER_TOLERANCE: f64 = 0.01;

/// Whether a block is horizontally centred and narrower than half the page.
///
/// Blocks without a bounding box are never centred.
pub fn detect_block_center_aligned(block: &Block, page_width: f64) -> bool {
    let Some(bbox) = block.box_style else {
        return false;
    };

    let center = bbox.left + bbox.width / 2.0;
    let centered = (center - page_width / 2.0).abs() < page_width * CENTER_TOLERANCE;
    let narrow = bbox.width * 2.0 < page_width;
    centered && narrow
}

/// Whether a block's bottom edge falls in the middle third of the page.
///
/// Blocks without a bounding box are never in the middle.
pub fn detect_block_center_of_page(block: &Block, page_height: f64) -> bool {
    let Some(bbox) = block.box_style else {
        return false;
    };

    let bottom = bbox.top + bbox.height;
    (page_height / 3.0..=page_height * 2.0 / 3.0).contains(&bottom)
}
