//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod progress;
pub mod range;
pub mod status;

pub use detail::{DetailPanel, DetailSection};
pub use filter::{FilterBar, FilterChip};
pub use progress::FetchBar;
pub use range::RangeSlider;
pub use status::StatusIndicator;
