//! Stack of currently open headers.

use tracing::debug;

use crate::types::LevelLink;

#[derive(Debug, Clone)]
struct OpenHeader {
    block_idx: usize,
    block_text: String,
    level: u32,
}

/// Open headers from outermost (bottom) to innermost (top).
///
/// Levels strictly increase from bottom to top: pushing a header first pops
/// every entry at the same or a deeper level.
#[derive(Debug, Clone, Default)]
pub struct HeaderStack {
    entries: Vec<OpenHeader>,
}

impl HeaderStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a header, closing siblings and deeper headers first.
    pub fn push(&mut self, block_idx: usize, block_text: &str, level: u32) {
        while let Some(top) = self.entries.last() {
            if top.level < level {
                break;
            }
            debug!(level = top.level, text = %top.block_text, "Closing header");
            self.entries.pop();
        }

        debug!(level, text = %block_text, "Opening header");
        self.entries.push(OpenHeader {
            block_idx,
            block_text: block_text.to_string(),
            level,
        });
    }

    /// Open headers as level links, innermost first.
    pub fn chain(&self) -> Vec<LevelLink> {
        self.entries
            .iter()
            .rev()
            .map(|h| LevelLink {
                block_idx: h.block_idx,
                block_text: h.block_text.clone(),
            })
            .collect()
    }

    /// Level of the innermost open header.
    pub fn innermost_level(&self) -> Option<u32> {
        self.entries.last().map(|h| h.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(stack: &HeaderStack) -> Vec<u32> {
        stack.entries.iter().map(|h| h.level).collect()
    }

    #[test]
    fn test_nested_push() {
        let mut stack = HeaderStack::new();
        stack.push(0, "Part", 1);
        stack.push(1, "Chapter", 2);
        stack.push(2, "Section", 3);
        assert_eq!(levels(&stack), vec![1, 2, 3]);

        let chain = stack.chain();
        assert_eq!(chain[0].block_text, "Section");
        assert_eq!(chain[2].block_text, "Part");
    }

    #[test]
    fn test_sibling_replaces() {
        let mut stack = HeaderStack::new();
        stack.push(0, "A", 1);
        stack.push(1, "A.1", 2);
        stack.push(2, "A.2", 2);
        assert_eq!(levels(&stack), vec![1, 2]);
        assert_eq!(stack.chain()[0].block_idx, 2);
    }

    #[test]
    fn test_shallower_pops_to_root() {
        let mut stack = HeaderStack::new();
        for (idx, level) in [1, 2, 3, 2, 1].into_iter().enumerate() {
            stack.push(idx, &format!("H{idx}"), level);
        }
        assert_eq!(levels(&stack), vec![1]);
        assert_eq!(stack.chain()[0].block_idx, 4);
    }

    #[test]
    fn test_skipped_levels() {
        let mut stack = HeaderStack::new();
        stack.push(0, "Top", 1);
        stack.push(1, "Deep", 4);
        stack.push(2, "Mid", 2);
        assert_eq!(levels(&stack), vec![1, 2]);
        assert_eq!(stack.innermost_level(), Some(2));
    }
}
