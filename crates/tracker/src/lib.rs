// Core tracker library modules

pub mod collection;
pub mod duration;
pub mod model;
pub mod pacing;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use model::{InputError, VideoInput, VideoRecord};
pub use store::LocalStore;
pub use view::{SortDirection, SortField, VideoFilter, ViewState};
