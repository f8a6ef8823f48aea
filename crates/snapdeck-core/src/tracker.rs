//! Position tracker: which section is the viewport resting on?

use crate::config::SectionLayout;
use crate::section::Section;

/// Compute the index of the section the viewport is resting on.
///
/// Returns `None` only when there are no sections. The result is always a
/// valid index into `sections`.
pub fn current_index_for(
    sections: &[Section],
    scroll_offset: f64,
    viewport_height: f64,
    layout: SectionLayout,
) -> Option<usize> {
    let last = sections.len().checked_sub(1)?;
    let offset = if scroll_offset.is_finite() {
        scroll_offset.max(0.0)
    } else {
        0.0
    };

    let index = match layout {
        SectionLayout::FullPage if viewport_height.is_finite() && viewport_height > 0.0 => {
            (offset / viewport_height).round() as usize
        }
        _ => nearest_offset(sections, offset),
    };

    Some(index.min(last))
}

/// Nearest-offset rule: the section whose start is closest to `offset`.
/// Ties go to the earlier section.
fn nearest_offset(sections: &[Section], offset: f64) -> usize {
    // Offsets are strictly increasing, so the first section starting after
    // `offset` and its predecessor are the only candidates.
    let after = sections.partition_point(|s| s.offset <= offset);
    match after {
        0 => 0,
        n if n == sections.len() => n - 1,
        n => {
            let below = &sections[n - 1];
            let above = &sections[n];
            if above.offset - offset < offset - below.offset {
                above.index
            } else {
                below.index
            }
        }
    }
}

/// Signed distance from `scroll_offset` to the start of `section`
#[inline]
pub fn distance_to(section: &Section, scroll_offset: f64) -> f64 {
    section.offset - scroll_offset
}
