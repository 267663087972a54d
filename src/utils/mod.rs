//! Small helpers shared by the ingestion pipeline.

mod chunks;
mod geometry;
mod numeric;
mod text;

pub use chunks::chunks;
pub use geometry::{detect_block_center_aligned, detect_block_center_of_page};
pub use numeric::{is_arabic_number, is_integer};
pub use text::{is_word_boundary, kangxi_to_cjk, normalize_kangxi_radicals};
