//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an executor for statements that must join a caller's
//! transaction) as the first argument.

pub mod category_repo;
pub mod video_category_repo;
pub mod video_class_repo;
pub mod video_group_repo;
pub mod video_repo;
pub mod video_url_repo;

pub use category_repo::CategoryRepo;
pub use video_category_repo::VideoCategoryRepo;
pub use video_class_repo::VideoClassRepo;
pub use video_group_repo::VideoGroupRepo;
pub use video_repo::VideoRepo;
pub use video_url_repo::VideoUrlRepo;
