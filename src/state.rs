use crate::{
    api::ApiClient,
    config::Config,
    error::Result,
    session::SessionStore,
    sync::{
        CommentService, InteractionService, NotificationFeed, NoticeQueue, PollerHandle,
        UnreadBadge, UnreadPoller,
    },
};
use std::sync::Arc;
use std::time::Duration;

/// 客户端的共享状态
/// 组合根：配置、会话、API客户端与各同步服务都在这里接线，
/// 其他地方不直接构造服务。
pub struct ClientState {
    /// 应用配置
    pub config: Config,

    /// 会话存储
    pub session: Arc<SessionStore>,

    /// REST客户端
    pub api: Arc<ApiClient>,

    /// 提示消息队列
    pub notices: Arc<NoticeQueue>,

    /// 未读通知角标
    pub badge: Arc<UnreadBadge>,

    /// 交互状态服务
    pub interactions: InteractionService,

    /// 评论服务
    pub comments: CommentService,

    /// 通知面板
    pub feed: NotificationFeed,
}

impl ClientState {
    pub fn new(config: Config) -> Result<Self> {
        let session = match &config.session_file {
            Some(path) => Arc::new(SessionStore::with_persistence(path)),
            None => Arc::new(SessionStore::new()),
        };
        // 启动时从持久化存储恢复上次会话
        session.restore()?;

        let api = Arc::new(ApiClient::new(&config, session.clone())?);
        let notices = Arc::new(NoticeQueue::new());
        let badge = Arc::new(UnreadBadge::new());

        let interactions = InteractionService::new(api.clone(), notices.clone());
        let comments = CommentService::new(api.clone(), notices.clone(), &config);
        let feed = NotificationFeed::new(
            api.clone(),
            notices.clone(),
            badge.clone(),
            config.notification_page_limit,
        );

        Ok(Self {
            config,
            session,
            api,
            notices,
            badge,
            interactions,
            comments,
            feed,
        })
    }

    /// 挂载通知铃铛时启动未读轮询。
    /// 返回的句柄归调用方所有：卸载时必须 stop() 或丢弃它，两者都会取消定时器。
    pub fn start_unread_poller(&self) -> PollerHandle {
        UnreadPoller::new(
            self.api.clone(),
            self.badge.clone(),
            Duration::from_secs(self.config.unread_poll_interval_secs),
        )
        .start()
    }

    /// 登出：清除会话与本地镜像状态
    pub fn teardown_session(&self) -> Result<()> {
        self.session.logout()?;
        self.interactions.clear();
        self.badge.reset();
        Ok(())
    }
}
