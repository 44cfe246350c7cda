pub mod search;
pub mod traits;
pub mod webdav;

pub use search::SearchClient;
pub use traits::{DirectoryLister, SearchProvider};
pub use webdav::WebDavClient;
