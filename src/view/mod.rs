//! Display state for a built tree
//!
//! Sorting, expansion, search filtering and selection. Nothing here draws to
//! the terminal; see `ui` for that.

pub mod icons;
pub mod navigator;
pub mod outline;
pub mod render;
pub mod search;

pub use navigator::TreeNavigator;
pub use outline::outline;
pub use render::{RenderOptions, RenderedNode, RenderedTree, ToggleError};
pub use search::SearchOutcome;
