//! 会话注册表
//!
//! 进程级的在途会话表，按会话标识符索引。纯内存、随进程生存：
//! 进程重启会丢掉所有在途会话（可接受——每个会话对应一个同样会
//! 随之消失的交互式浏览器窗口）。
//!
//! 注册表是整个系统里唯一的共享可变结构，注册/查询/删除之间通过
//! 一把互斥锁保持原子。条目只会按创建时发出的精确标识符访问，
//! 不需要更细粒度的锁。所有访问都在闭包里完成，锁绝不跨 await 持有。
//!
//! 对存储的记录类型保持泛型，便于在没有浏览器的环境下单测。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{AppError, AppResult};

/// 会话注册表
pub struct SessionRegistry<S> {
    sessions: Mutex<HashMap<String, S>>,
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, S>> {
        // 锁内不会 panic，毒化只可能来自测试断言；直接恢复内部数据
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 注册会话
    ///
    /// 标识符冲突时返回 `Duplicate` 错误，已有条目保持原样。
    pub fn register(&self, id: &str, session: S) -> AppResult<()> {
        let mut sessions = self.lock();
        if sessions.contains_key(id) {
            return Err(AppError::duplicate_session(id));
        }
        sessions.insert(id.to_string(), session);
        Ok(())
    }

    /// 在锁内读取会话
    ///
    /// 标识符未注册（过期、未知或已关闭）时返回 `NotFound` 错误，
    /// 这是预期内的结果，与内部错误严格区分。
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&S) -> T) -> AppResult<T> {
        let sessions = self.lock();
        match sessions.get(id) {
            Some(session) => Ok(f(session)),
            None => Err(AppError::session_not_found(id)),
        }
    }

    /// 在锁内更新会话
    pub fn update_session<T>(&self, id: &str, f: impl FnOnce(&mut S) -> T) -> AppResult<T> {
        let mut sessions = self.lock();
        match sessions.get_mut(id) {
            Some(session) => Ok(f(session)),
            None => Err(AppError::session_not_found(id)),
        }
    }

    /// 删除会话，返回被移除的条目
    ///
    /// 幂等：条目不存在时返回 None，不是错误。
    pub fn remove(&self, id: &str) -> Option<S> {
        self.lock().remove(id)
    }

    /// 当前在途会话数量
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, SessionError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FakeSession {
        id: String,
        status: &'static str,
    }

    #[test]
    fn test_register_lookup_remove_round_trip() {
        let registry = SessionRegistry::new();
        let session = FakeSession {
            id: "abc123".to_string(),
            status: "waiting_for_human",
        };

        registry.register("abc123", session.clone()).unwrap();
        let looked_up = registry.with_session("abc123", |s| s.clone()).unwrap();
        assert_eq!(looked_up, session);

        assert!(registry.remove("abc123").is_some());

        let err = registry.with_session("abc123", |s| s.clone()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Session(SessionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = SessionRegistry::new();
        registry.register("dup", 1u32).unwrap();

        let err = registry.register("dup", 2u32).unwrap_err();
        assert!(matches!(
            err,
            AppError::Session(SessionError::Duplicate { .. })
        ));

        // 冲突不得破坏注册表：原条目保持不变
        assert_eq!(registry.with_session("dup", |v| *v).unwrap(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry: SessionRegistry<u32> = SessionRegistry::new();
        assert!(registry.remove("missing").is_none());
        assert!(registry.remove("missing").is_none());
    }

    #[test]
    fn test_update_session_mutates_in_place() {
        let registry = SessionRegistry::new();
        registry
            .register(
                "s1",
                FakeSession {
                    id: "s1".to_string(),
                    status: "initializing",
                },
            )
            .unwrap();

        registry
            .update_session("s1", |s| s.status = "completed")
            .unwrap();
        assert_eq!(
            registry.with_session("s1", |s| s.status).unwrap(),
            "completed"
        );
    }

    #[test]
    fn test_lookup_unknown_id_is_not_found() {
        let registry: SessionRegistry<u32> = SessionRegistry::new();
        let err = registry.with_session("nope", |v| *v).unwrap_err();
        assert!(err.is_session_not_found());
    }
}
