use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 会话相关错误
    Session(SessionError),
    /// 持久化错误
    Persistence(PersistenceError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Session(e) => write!(f, "会话错误: {}", e),
            AppError::Persistence(e) => write!(f, "持久化错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Session(e) => Some(e),
            AppError::Persistence(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 浏览器配置失败
    ConfigurationFailed {
        message: String,
    },
    /// 启动浏览器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败（初始页面加载失败或超时，对该次会话启动是致命的）
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConfigurationFailed { message } => {
                write!(f, "浏览器配置失败: {}", message)
            }
            BrowserError::LaunchFailed { source } => {
                write!(f, "启动浏览器失败: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            BrowserError::ConfigurationFailed { .. } => None,
        }
    }
}

/// 会话相关错误
#[derive(Debug)]
pub enum SessionError {
    /// 会话不存在（过期、未知或已关闭的标识符，属于调用方可纠正的错误）
    NotFound {
        id: String,
    },
    /// 会话标识符冲突（概率可忽略，但必须检查，不得破坏注册表）
    Duplicate {
        id: String,
    },
    /// 结果捕获失败（人工未在窗口期内完成流程，或结果标记未出现）
    CaptureTimeout {
        id: String,
        detail: String,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound { id } => write!(f, "会话不存在: {}", id),
            SessionError::Duplicate { id } => write!(f, "会话标识符冲突: {}", id),
            SessionError::CaptureTimeout { id, detail } => {
                write!(f, "会话 {} 结果捕获失败: {}", id, detail)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// 持久化错误
#[derive(Debug)]
pub enum PersistenceError {
    /// 打开数据库失败
    OpenFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 事务执行失败（整个案件的写入已回滚）
    TransactionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 数据库工作线程已退出
    WorkerGone,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::OpenFailed { path, source } => {
                write!(f, "打开数据库失败 ({}): {}", path, source)
            }
            PersistenceError::TransactionFailed { source } => {
                write!(f, "事务执行失败: {}", source)
            }
            PersistenceError::WorkerGone => write!(f, "数据库工作线程已退出"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::OpenFailed { source, .. }
            | PersistenceError::TransactionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            PersistenceError::WorkerGone => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Persistence(PersistenceError::TransactionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON序列化失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    /// 创建页面创建错误
    pub fn page_creation_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(source),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建会话不存在错误
    pub fn session_not_found(id: impl Into<String>) -> Self {
        AppError::Session(SessionError::NotFound { id: id.into() })
    }

    /// 创建会话标识符冲突错误
    pub fn duplicate_session(id: impl Into<String>) -> Self {
        AppError::Session(SessionError::Duplicate { id: id.into() })
    }

    /// 创建结果捕获失败错误
    pub fn capture_timeout(id: impl Into<String>, detail: impl Into<String>) -> Self {
        AppError::Session(SessionError::CaptureTimeout {
            id: id.into(),
            detail: detail.into(),
        })
    }

    /// 创建持久化事务错误
    pub fn persistence_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Persistence(PersistenceError::TransactionFailed {
            source: Box::new(source),
        })
    }

    /// 是否为"会话不存在"错误（API 层据此返回 4xx）
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, AppError::Session(SessionError::NotFound { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
