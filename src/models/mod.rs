pub mod alert;
pub mod alert_book;
pub mod reply;

pub use alert::{Alert, AlertAction, AlertId};
pub use alert_book::AlertBook;
pub use reply::{BotReply, ReplyAction};
