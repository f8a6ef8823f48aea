//! Smooth transition primitives for section navigation
//!
//! # Layers
//!
//! ## Atomic
//! - `timing` - Time calculation utilities (progress, interpolation)
//!
//! ## Molecular
//! - `animation` - Offset animator with a cubic ease-out settle
//!
//! # Usage
//!
//! ```ignore
//! use snapdeck_core::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new(config);
//! animator.scroll_to(0.0, 480.0, now);
//!
//! // In the event loop, step each frame and apply the offset
//! let frame = animator.update(Instant::now());
//! ```

// Atomic
pub mod timing;

// Molecular
pub mod animation;

pub use animation::{Frame, ScrollAnimator};
pub use timing::ScrollConfigExt;
