pub mod animator;
pub mod arbiter;
pub mod config;
pub mod controller;
pub mod deck;
pub mod error;
pub mod memory;
pub mod publisher;
pub mod scroll;
pub mod section;
pub mod tracker;

pub use config::{AppConfig, NavigationConfig, ScrollConfig, SectionLayout};
pub use controller::{ControllerSettings, SectionController};
pub use error::{Error, Result};
pub use publisher::NavSnapshot;
pub use section::{ScrollContainer, Section, SectionNode};
