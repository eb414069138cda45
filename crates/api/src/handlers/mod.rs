pub mod category;
pub mod video;
pub mod video_class;
