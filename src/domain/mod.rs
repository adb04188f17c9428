pub mod article;
pub mod feed;
pub mod raw;

pub use article::{parse_timestamp, Article, PLACEHOLDER_LINK, UNTITLED};
pub use feed::FeedDescriptor;
pub use raw::RawItem;
