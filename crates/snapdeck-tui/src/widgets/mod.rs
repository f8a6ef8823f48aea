mod indicator;
mod section_view;
mod status_bar;

pub use indicator::IndicatorWidget;
pub use section_view::SectionViewWidget;
pub use status_bar::StatusBarWidget;
