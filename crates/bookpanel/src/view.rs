pub mod projection;
pub mod search;
pub mod window;

pub use projection::{project, Row};
pub use search::{evaluate, expand_to_matches};
pub use window::visible_range;
