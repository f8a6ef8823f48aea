//! In-memory scroll container, used for trace replay and tests.

use crate::section::{ScrollContainer, SectionNode};

#[derive(Debug, Clone)]
pub struct MemoryContainer {
    nodes: Vec<SectionNode>,
    viewport_height: f64,
    offset: f64,
}

impl MemoryContainer {
    pub fn new(nodes: Vec<SectionNode>, viewport_height: f64) -> Self {
        Self {
            nodes,
            viewport_height,
            offset: 0.0,
        }
    }

    /// Sections that are each exactly one viewport tall
    pub fn full_page(identifiers: &[&str], viewport_height: f64) -> Self {
        let nodes = identifiers
            .iter()
            .enumerate()
            .map(|(i, id)| SectionNode::new(*id, i as f64 * viewport_height, viewport_height))
            .collect();
        Self::new(nodes, viewport_height)
    }

    /// Stack sections of the given heights
    pub fn stacked(sections: &[(&str, f64)], viewport_height: f64) -> Self {
        let mut offset = 0.0;
        let mut nodes = Vec::with_capacity(sections.len());
        for (id, height) in sections {
            nodes.push(SectionNode::new(*id, offset, *height));
            offset += height;
        }
        Self::new(nodes, viewport_height)
    }

    pub fn push_section(&mut self, node: SectionNode) {
        self.nodes.push(node);
    }

    /// Move the container as a user would, without the controller's involvement
    pub fn scroll_by(&mut self, delta: f64) {
        let target = self.offset + delta;
        self.set_scroll_offset(target);
    }

    /// Largest reachable offset; the last section can always reach the top
    pub fn max_offset(&self) -> f64 {
        let Some(last) = self.nodes.iter().filter(|n| n.offset.is_finite()).last() else {
            return 0.0;
        };
        let content = last.offset + last.height.max(0.0);
        (content - self.viewport_height).max(last.offset).max(0.0)
    }
}

impl ScrollContainer for MemoryContainer {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = offset.clamp(0.0, self.max_offset());
        }
    }

    fn section_nodes(&self) -> Vec<SectionNode> {
        self.nodes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_clamped() {
        let mut container = MemoryContainer::full_page(&["a", "b", "c"], 100.0);
        container.set_scroll_offset(1_000.0);
        assert_eq!(container.scroll_offset(), 200.0);
        container.scroll_by(-500.0);
        assert_eq!(container.scroll_offset(), 0.0);
        container.set_scroll_offset(f64::NAN);
        assert_eq!(container.scroll_offset(), 0.0);
    }

    #[test]
    fn test_short_last_section_still_reachable() {
        let container = MemoryContainer::stacked(&[("a", 300.0), ("b", 20.0)], 100.0);
        assert_eq!(container.max_offset(), 300.0);
    }
}
