pub mod activity_feed;
pub mod log_book;

pub use activity_feed::{ActivityFeed, DEFAULT_FEED_CAPACITY};
pub use log_book::{LogBook, DEFAULT_LOG_CAPACITY};
