//! In-process document stores for users and messages

pub mod messages;
pub mod users;

pub use messages::MessageStore;
pub use users::UserStore;
