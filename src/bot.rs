mod dingtalk;
pub use dingtalk::{DingTalk, Dispatch};

mod github;
pub use github::handle_github_event;

mod message_builder;
pub use message_builder::Notification;

pub(crate) mod utils;
