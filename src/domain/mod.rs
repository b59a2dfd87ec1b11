pub mod community;
pub mod mode;
pub mod post;

pub use community::CommunityInfo;
pub use mode::{PostMode, SearchSort, TimeWindow};
pub use post::{sort_by_score, PostRecord, COLUMNS, DELETED_AUTHOR};
