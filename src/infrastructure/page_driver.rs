//! 页面驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露驱动能力：导航、填表、等待选择器、
//! 批量提取。不认识 EC 记录 / 会话，不处理业务流程。

use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 页面驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 navigate / fill / select / wait / extract 能力
/// - 每个能力独立可失败，是否致命由调用方决定
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 在限定时间内导航到指定 URL
    ///
    /// 初始页面加载失败或超时返回导航错误。
    pub async fn navigate(&self, url: &str, limit: Duration) -> AppResult<()> {
        debug!("导航到: {} (超时 {:?})", url, limit);
        match timeout(limit, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::navigation_failed(url, e)),
            Err(elapsed) => Err(AppError::navigation_failed(url, elapsed)),
        }
    }

    /// 设置下拉框选中项并触发 change 事件
    ///
    /// 返回是否找到了目标元素；找不到不是错误。
    pub async fn select_option(&self, selector: &str, value: &str) -> AppResult<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            selector = js_string(selector),
            value = js_string(value),
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 填充输入框并触发 input 事件
    ///
    /// 返回是否找到了目标元素；找不到不是错误。
    pub async fn fill(&self, selector: &str, value: &str) -> AppResult<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            selector = js_string(selector),
            value = js_string(value),
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 轮询等待选择器出现
    ///
    /// 返回 Ok(true) 表示出现，Ok(false) 表示超时未出现。
    /// 页面被外部关闭时轮询会立刻以 Err 结束，不会一直挂到超时。
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        limit: Duration,
        poll_interval: Duration,
    ) -> AppResult<bool> {
        let deadline = Instant::now() + limit;
        let js_code = format!(
            "document.querySelector({}) !== null",
            js_string(selector)
        );

        loop {
            if self.eval_as::<bool>(js_code.clone()).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(poll_interval).await;
        }
    }

    /// 读取首个匹配元素的属性值
    ///
    /// 元素或属性缺失时返回 None，不视为错误。
    pub async fn extract_attribute(
        &self,
        selector: &str,
        attr: &str,
    ) -> AppResult<Option<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return null;
                return el[{attr}] ?? el.getAttribute({attr});
            }})()
            "#,
            selector = js_string(selector),
            attr = js_string(attr),
        );
        self.eval_as::<Option<String>>(js_code).await
    }
}

/// 把 Rust 字符串安全地嵌入 JS 源码（带引号的字面量）
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
