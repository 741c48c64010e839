/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// EC 查询门户地址
    pub portal_url: String,
    /// 初始页面加载超时（秒）
    pub navigation_timeout_secs: u64,
    /// 结果捕获等待超时（秒），需要给人工解验证码留出充足时间
    pub capture_timeout_secs: u64,
    /// 结果标记轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 是否以无头模式启动浏览器（人工解验证码需要有界面，默认关闭）
    pub headless: bool,
    /// 浏览器可执行文件路径（为空时使用系统默认 Chrome）
    pub chrome_executable: Option<String>,
    /// HTTP 服务监听地址
    pub bind_addr: String,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 允许的 CORS 来源（逗号分隔；为空时允许所有来源）
    pub cors_origins: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_url: "https://registration.ec.ap.gov.in/ecSearch".to_string(),
            navigation_timeout_secs: 60,
            capture_timeout_secs: 120,
            poll_interval_ms: 500,
            headless: false,
            chrome_executable: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            database_path: "ec_capture.db".to_string(),
            cors_origins: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            portal_url: std::env::var("PORTAL_URL").unwrap_or(default.portal_url),
            navigation_timeout_secs: std::env::var("NAVIGATION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.navigation_timeout_secs),
            capture_timeout_secs: std::env::var("CAPTURE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.capture_timeout_secs),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_ms),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(default.bind_addr),
            database_path: std::env::var("DATABASE_PATH").unwrap_or(default.database_path),
            cors_origins: std::env::var("CORS_ORIGINS").ok(),
        }
    }
}
