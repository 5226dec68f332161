//! Client-side widget state. Rendering lives in the host application; these
//! types only hold view state and talk to the host through [`host::HostApi`].

pub mod host;
pub mod rating;
pub mod tweet;

pub use self::host::{HostApi, MemoryHost, TreeNode, TreeRef};
pub use self::rating::StarRating;
pub use self::tweet::{HttpTweetApi, TweetApi, TweetComposer};
