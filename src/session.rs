use crate::error::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 当前登录用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// 一次登录会话：凭证 + 用户身份
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

/// 显式的会话对象，应用启动时从持久化存储恢复，
/// 只能通过 login/refresh/logout 三个转换函数变更。
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
    persist_path: Option<PathBuf>,
}

impl SessionStore {
    /// 仅内存会话（测试和无持久化场景）
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
            persist_path: None,
        }
    }

    /// 带文件持久化的会话存储
    pub fn with_persistence(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(None),
            persist_path: Some(path.into()),
        }
    }

    /// 应用启动时调用：从磁盘恢复上次的会话。
    /// 文件缺失不是错误；文件损坏时丢弃并告警。
    pub fn restore(&self) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };

        if !path.exists() {
            debug!("No persisted session at {}", path.display());
            return Ok(());
        }

        let raw = fs::read_to_string(path)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                debug!("Restored session for user {}", session.user.username);
                *self.inner.write() = Some(session);
            }
            Err(e) => {
                warn!("Discarding corrupt persisted session: {}", e);
                let _ = fs::remove_file(path);
            }
        }

        Ok(())
    }

    pub fn login(&self, session: Session) -> Result<()> {
        debug!("Session opened for user {}", session.user.username);
        self.persist(Some(&session))?;
        *self.inner.write() = Some(session);
        Ok(())
    }

    /// 仅替换凭证，用户身份不变。未登录时拒绝。
    pub fn refresh(&self, token: String) -> Result<()> {
        let mut guard = self.inner.write();
        let session = guard
            .as_mut()
            .ok_or_else(|| crate::error::AppError::unauthorized("No active session to refresh"))?;
        session.token = token;
        let snapshot = session.clone();
        drop(guard);
        self.persist(Some(&snapshot))
    }

    pub fn logout(&self) -> Result<()> {
        *self.inner.write() = None;
        self.persist(None)
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    fn persist(&self, session: Option<&Session>) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };

        match session {
            Some(session) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, serde_json::to_string_pretty(session)?)?;
            }
            None => {
                if path.exists() {
                    fs::remove_file(path)?;
                }
            }
        }

        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
