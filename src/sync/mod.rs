pub mod comments;
pub mod feed;
pub mod interaction;
pub mod notices;
pub mod optimistic;
pub mod poller;
pub mod unread;

// 重新导出常用类型
pub use comments::{build_comment_tree, CommentService};
pub use feed::{DropdownState, NotificationFeed};
pub use interaction::InteractionService;
pub use notices::{Notice, NoticeLevel, NoticeQueue};
pub use optimistic::{optimistic, InFlightTable};
pub use poller::{PollerHandle, UnreadPoller};
pub use unread::UnreadBadge;
