//! Section registry: the live, ordered list of navigable sections.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One marker element as measured by the host at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    /// Anchor used for fragment deep links
    #[serde(default)]
    pub identifier: Option<String>,
    /// Distance from the scroll origin to the start of the section
    pub offset: f64,
    /// Measured height of the section
    pub height: f64,
}

impl SectionNode {
    pub fn new(identifier: impl Into<String>, offset: f64, height: f64) -> Self {
        Self {
            identifier: Some(identifier.into()),
            offset,
            height,
        }
    }

    pub fn anonymous(offset: f64, height: f64) -> Self {
        Self {
            identifier: None,
            offset,
            height,
        }
    }
}

/// A navigable section, indexed by document order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub index: usize,
    pub identifier: String,
    pub offset: f64,
    pub height: f64,
}

/// Host binding for the scrollable element that owns the sections.
///
/// Every method reflects the live layout; implementations must not cache
/// measurements across resizes or content changes.
pub trait ScrollContainer {
    /// Current scroll offset
    fn scroll_offset(&self) -> f64;

    /// Height of the visible area
    fn viewport_height(&self) -> f64;

    /// Move the container. Implementations clamp to their own scroll range.
    fn set_scroll_offset(&mut self, offset: f64);

    /// Section markers in document order, measured now
    fn section_nodes(&self) -> Vec<SectionNode>;
}

/// Query the container for its sections.
///
/// Malformed nodes (non-finite geometry, or an offset that moves backwards)
/// are skipped so that the returned list always has strictly increasing
/// offsets. An empty result turns navigation into a no-op.
pub fn list_sections<C: ScrollContainer + ?Sized>(container: &C) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for node in container.section_nodes() {
        if !node.offset.is_finite() || !node.height.is_finite() || node.height < 0.0 {
            warn!(?node, "Skipping section with malformed geometry");
            continue;
        }
        if let Some(prev) = sections.last() {
            if node.offset <= prev.offset {
                warn!(
                    identifier = ?node.identifier,
                    offset = node.offset,
                    previous = prev.offset,
                    "Skipping section that overlaps its predecessor"
                );
                continue;
            }
        }

        let index = sections.len();
        let identifier = node
            .identifier
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("section-{}", index));

        sections.push(Section {
            index,
            identifier,
            offset: node.offset,
            height: node.height,
        });
    }

    sections
}

/// Find the first section carrying `identifier`
pub fn find_by_identifier<'a>(sections: &'a [Section], identifier: &str) -> Option<&'a Section> {
    sections.iter().find(|s| s.identifier == identifier)
}

/// Highest valid index, `None` when there are no sections
#[inline]
pub fn last_index(sections: &[Section]) -> Option<usize> {
    sections.len().checked_sub(1)
}
