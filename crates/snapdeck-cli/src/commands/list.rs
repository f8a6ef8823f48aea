use std::path::Path;

use anyhow::Result;

use snapdeck_core::deck::Deck;
use snapdeck_core::section::list_sections;
use snapdeck_core::SectionLayout;
use snapdeck_tui::DeckSurface;

pub fn run(deck_path: &Path, width: u16, height: u16, layout: SectionLayout) -> Result<()> {
    let deck = Deck::load(deck_path)?;
    let surface = DeckSurface::new(deck, layout, width, height);
    let sections = list_sections(&surface);

    println!(
        "Sections ({}) at {}x{}, {:?} layout:\n",
        sections.len(),
        width,
        height,
        layout
    );

    for section in &sections {
        let title = surface
            .deck()
            .sections
            .get(section.index)
            .map(|s| s.display_title(section.index))
            .unwrap_or_default();
        println!(
            "  {:>3}  {:<20} offset {:>6}  height {:>4}  {}",
            section.index, section.identifier, section.offset, section.height, title
        );
    }

    Ok(())
}
