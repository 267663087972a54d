//! Fixed-size list chunking.

/// Split a slice into consecutive chunks of `size` items; the last may be shorter.
///
/// A `size` of zero yields no chunks.
pub fn chunks<T>(items: &[T], size: usize) -> impl Iterator<Item = &[T]> {
    let items = if size == 0 { &items[..0] } else { items };
    items.chunks(size.max(1))
}
