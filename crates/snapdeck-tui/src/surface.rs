use snapdeck_core::deck::Deck;
use snapdeck_core::{ScrollContainer, SectionLayout, SectionNode};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows taken by the section header (title line plus a blank line)
pub const HEADER_ROWS: u16 = 2;
/// Columns of horizontal padding on each side of the section text
pub const PADDING_COLS: u16 = 1;

/// Part of a section that falls inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSlice {
    /// Section index
    pub index: usize,
    /// First viewport row covered by the slice
    pub top: u16,
    /// Number of rows covered
    pub rows: u16,
    /// Rows of the section scrolled above the viewport
    pub skip: u16,
}

/// One terminal row of a section body after wrapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub text: String,
    /// Row belongs to a `#` heading line (marker already stripped)
    pub heading: bool,
}

/// A deck laid out as a vertical stack of sections in the terminal.
///
/// Section geometry is derived from the current size on every query, so a
/// resize is visible to the controller immediately.
#[derive(Debug, Clone)]
pub struct DeckSurface {
    deck: Deck,
    layout: SectionLayout,
    width: u16,
    height: u16,
    offset: f64,
}

impl DeckSurface {
    pub fn new(deck: Deck, layout: SectionLayout, width: u16, height: u16) -> Self {
        Self {
            deck,
            layout,
            width,
            height,
            offset: 0.0,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn layout(&self) -> SectionLayout {
        self.layout
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let max = self.max_offset();
        self.offset = self.offset.min(max);
    }

    /// Scroll by whole rows, as a mouse drag or nudge key would
    pub fn scroll_rows(&mut self, rows: i32) {
        let target = self.offset.round() + rows as f64;
        self.set_scroll_offset(target);
    }

    /// Columns available to section text inside the padding
    pub fn text_width(&self) -> u16 {
        self.width.saturating_sub(PADDING_COLS * 2)
    }

    /// Body rows of a section as they are drawn at the current width
    pub fn body_rows(&self, index: usize) -> Vec<BodyRow> {
        self.deck
            .sections
            .get(index)
            .map(|s| body_rows(&s.body, self.text_width()))
            .unwrap_or_default()
    }

    /// Height in rows of every section at the current size
    pub fn section_heights(&self) -> Vec<u16> {
        match self.layout {
            SectionLayout::FullPage => vec![self.height.max(1); self.deck.len()],
            SectionLayout::Variable => (0..self.deck.len())
                .map(|index| {
                    // header + wrapped body + trailing blank
                    let body = self.body_rows(index).len().max(1);
                    let rows = HEADER_ROWS as usize + body + 1;
                    rows.min(u16::MAX as usize) as u16
                })
                .collect(),
        }
    }

    /// Largest offset; the last section can always be scrolled to the top
    pub fn max_offset(&self) -> f64 {
        let heights = self.section_heights();
        let Some(last) = heights.last() else {
            return 0.0;
        };
        let total: f64 = heights.iter().map(|h| *h as f64).sum();
        let last_offset = total - *last as f64;
        (total - self.height as f64).max(last_offset).max(0.0)
    }

    /// Sections intersecting the viewport, top to bottom
    pub fn visible_slices(&self) -> Vec<VisibleSlice> {
        let offset = self.offset.round() as i64;
        let bottom = offset + self.height as i64;
        let mut slices = Vec::new();
        let mut top = 0i64;

        for (index, height) in self.section_heights().into_iter().enumerate() {
            let end = top + height as i64;
            let start = top.max(offset);
            let stop = end.min(bottom);
            if stop > start {
                slices.push(VisibleSlice {
                    index,
                    top: (start - offset) as u16,
                    rows: (stop - start) as u16,
                    skip: (start - top) as u16,
                });
            }
            if end >= bottom {
                break;
            }
            top = end;
        }

        slices
    }
}

impl ScrollContainer for DeckSurface {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn viewport_height(&self) -> f64 {
        self.height as f64
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = offset.clamp(0.0, self.max_offset());
        }
    }

    fn section_nodes(&self) -> Vec<SectionNode> {
        let mut offset = 0.0;
        self.deck
            .sections
            .iter()
            .zip(self.section_heights())
            .map(|(section, height)| {
                let node = SectionNode {
                    identifier: section.identifier.clone(),
                    offset,
                    height: height as f64,
                };
                offset += height as f64;
                node
            })
            .collect()
    }
}

/// Split a section body into display rows at `width` columns.
///
/// Heading lines lose their `#` marker before wrapping so that the row
/// count matches what is drawn.
pub fn body_rows(body: &str, width: u16) -> Vec<BodyRow> {
    let mut rows = Vec::new();
    for line in body.lines() {
        let (text, heading) = match line.strip_prefix('#') {
            Some(_) => (line.trim_start_matches('#').trim_start(), true),
            None => (line, false),
        };
        rows.extend(
            wrap_line(text, width as usize)
                .into_iter()
                .map(|text| BodyRow { text, heading }),
        );
    }
    rows
}

/// Greedy word wrap respecting unicode widths (CJK = 2 columns).
///
/// Words wider than a whole row are broken between characters. An empty
/// line still takes one row.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_whitespace() {
        let word_width = word.width();
        let gap = usize::from(!current.is_empty());

        if current_width + gap + word_width <= max_width {
            if gap > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= max_width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(1);
            if current_width + ch_width > max_width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Deck {
        Deck::parse("--- #a\n# A\nshort\n--- #b\n# B\none\ntwo\nthree\n--- #c\nend").unwrap()
    }

    #[test]
    fn test_full_page_geometry() {
        let surface = DeckSurface::new(deck(), SectionLayout::FullPage, 40, 10);
        let nodes = surface.section_nodes();
        let offsets: Vec<f64> = nodes.iter().map(|n| n.offset).collect();
        assert_eq!(offsets, vec![0.0, 10.0, 20.0]);
        assert_eq!(nodes[1].identifier.as_deref(), Some("b"));
        assert_eq!(surface.max_offset(), 20.0);
    }

    #[test]
    fn test_resize_changes_live_offsets() {
        let mut surface = DeckSurface::new(deck(), SectionLayout::FullPage, 40, 10);
        surface.set_scroll_offset(20.0);
        surface.resize(40, 6);
        assert_eq!(surface.section_nodes()[2].offset, 12.0);
        assert_eq!(surface.scroll_offset(), 12.0);
    }

    #[test]
    fn test_variable_geometry() {
        let surface = DeckSurface::new(deck(), SectionLayout::Variable, 40, 5);
        // header + wrapped body + trailing blank
        assert_eq!(surface.section_heights(), vec![2 + 2 + 1, 2 + 4 + 1, 2 + 1 + 1]);
        // last section (offset 12) can reach the top even though it is short
        assert_eq!(surface.max_offset(), 12.0);
    }

    #[test]
    fn test_visible_slices_straddle_sections() {
        let mut surface = DeckSurface::new(deck(), SectionLayout::FullPage, 40, 10);
        surface.set_scroll_offset(4.0);
        let slices = surface.visible_slices();
        assert_eq!(
            slices,
            vec![
                VisibleSlice {
                    index: 0,
                    top: 0,
                    rows: 6,
                    skip: 4,
                },
                VisibleSlice {
                    index: 1,
                    top: 6,
                    rows: 4,
                    skip: 0,
                },
            ]
        );
    }

    #[test]
    fn test_scroll_rows_clamps() {
        let mut surface = DeckSurface::new(deck(), SectionLayout::FullPage, 40, 10);
        surface.scroll_rows(-3);
        assert_eq!(surface.scroll_offset(), 0.0);
        surface.scroll_rows(100);
        assert_eq!(surface.scroll_offset(), 20.0);
    }

    #[test]
    fn test_wrap_line_breaks_at_words() {
        assert_eq!(wrap_line("aaaa bbbbbb cccc", 10), vec!["aaaa", "bbbbbb", "cccc"]);
        assert_eq!(wrap_line("abcdefghij", 10), vec!["abcdefghij"]);
        assert_eq!(wrap_line("", 10), vec![""]);
        assert_eq!(wrap_line("   ", 10), vec![""]);
    }

    #[test]
    fn test_wrap_line_splits_long_words() {
        assert_eq!(wrap_line("ab abcdefghijkl", 5), vec!["ab", "abcde", "fghij", "kl"]);
        assert_eq!(wrap_line("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_variable_height_counts_word_wrapped_rows() {
        // 43 columns of text: 5 rows if broken anywhere, 7 when broken at words
        let deck =
            Deck::parse("--- #a\naaaa bbbbbb cccc dddddd eeee ffffff ENDWORD\n--- #b\nb").unwrap();
        let surface = DeckSurface::new(deck, SectionLayout::Variable, 12, 20);
        assert_eq!(surface.text_width(), 10);
        assert_eq!(surface.body_rows(0).len(), 7);
        assert_eq!(surface.section_heights(), vec![2 + 7 + 1, 2 + 1 + 1]);
        assert_eq!(surface.section_nodes()[1].offset, 10.0);
    }

    #[test]
    fn test_body_rows_strip_heading_marker() {
        let rows = body_rows("## Our team\nfour people", 40);
        assert_eq!(
            rows,
            vec![
                BodyRow {
                    text: "Our team".into(),
                    heading: true,
                },
                BodyRow {
                    text: "four people".into(),
                    heading: false,
                },
            ]
        );
    }
}
