//! 浏览器启动
//!
//! 每个会话启动一个独立的浏览器实例，互相之间没有共享页面状态。

use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};

/// 启动一个新的浏览器实例并创建空白页面
///
/// 默认以有界面模式启动：人工需要在打开的窗口里解验证码并提交表单。
/// 导航由调用方单独完成，便于把初始加载失败与启动失败区分开。
pub async fn launch_browser(config: &Config) -> AppResult<(Browser, Page)> {
    info!("🚀 启动浏览器 (headless: {})...", config.headless);

    let mut builder = BrowserConfig::builder();
    if config.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }
    if let Some(path) = &config.chrome_executable {
        builder = builder.chrome_executable(Path::new(path));
    }

    let browser_config = builder
        .args(vec![
            "--disable-gpu",           // 无头模式下必须禁用 GPU
            "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage", // 防止共享内存不足
        ])
        .build()
        .map_err(|message| {
            error!("浏览器配置失败: {}", message);
            AppError::Browser(BrowserError::ConfigurationFailed { message })
        })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::launch_failed(e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::page_creation_failed(e)
    })?;
    debug!("页面创建成功");

    Ok((browser, page))
}
