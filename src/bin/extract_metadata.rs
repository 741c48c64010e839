//! 门户元数据快照工具
//!
//! 一次性离线抓取门户的 区 → SRO 选项层级，写成静态查找文件
//! `data/locations.json`。不属于运行时核心，手动按需执行：
//!
//! ```bash
//! cargo run --bin extract_metadata
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ec_search_capture::utils::logging;
use ec_search_capture::{browser, Config, PageDriver};

const DISTRICT_SELECT: &str = "#districtCode";
const SRO_SELECT: &str = "#sroCode";
const OUTPUT_PATH: &str = "data/locations.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationOption {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct DistrictMetadata {
    id: String,
    name: String,
    sros: Vec<LocationOption>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    // 有界面启动，便于观察抓取进度
    let mut config = Config::from_env();
    config.headless = false;

    let (mut browser, page) = browser::launch_browser(&config).await?;
    let driver = PageDriver::new(page);

    let result = extract(&driver, &config).await;

    if let Err(e) = browser.close().await {
        warn!("关闭浏览器时出错: {}", e);
    }

    result
}

async fn extract(driver: &PageDriver, config: &Config) -> Result<()> {
    info!("正在导航到 EC 查询门户...");
    driver
        .navigate(
            &config.portal_url,
            Duration::from_secs(config.navigation_timeout_secs),
        )
        .await?;

    // 等待区下拉框就绪
    let ready = driver
        .wait_for_selector(
            DISTRICT_SELECT,
            Duration::from_secs(30),
            Duration::from_millis(config.poll_interval_ms),
        )
        .await?;
    anyhow::ensure!(ready, "区下拉框 {} 未出现", DISTRICT_SELECT);

    let districts = read_options(driver, DISTRICT_SELECT).await?;
    info!("✓ 找到 {} 个区", districts.len());

    let mut full_data = Vec::new();

    for district in districts {
        info!("处理区: {} ({})...", district.name, district.id);

        driver.select_option(DISTRICT_SELECT, &district.id).await?;

        // SRO 下拉框由 AJAX 填充，给它一点时间
        tokio::time::sleep(Duration::from_secs(1)).await;

        let sros = read_options(driver, SRO_SELECT).await?;
        info!("  -> 找到 {} 个 SRO", sros.len());

        full_data.push(DistrictMetadata {
            id: district.id,
            name: district.name,
            sros,
        });
    }

    if let Some(parent) = std::path::Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("创建输出目录失败: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&full_data)?;
    std::fs::write(OUTPUT_PATH, json)
        .with_context(|| format!("写入 {} 失败", OUTPUT_PATH))?;

    info!("✅ 抓取完成！已保存到 {}", OUTPUT_PATH);
    Ok(())
}

/// 读取下拉框的全部有效选项（过滤掉 "Select" 占位项）
async fn read_options(driver: &PageDriver, selector: &str) -> Result<Vec<LocationOption>> {
    let js_code = format!(
        r#"
        Array.from(document.querySelectorAll('{selector} option'))
            .filter(o => o.value && o.value !== '0')
            .map(o => ({{ id: o.value, name: o.innerText.trim() }}))
        "#,
        selector = selector,
    );
    let options = driver.eval_as::<Vec<LocationOption>>(js_code).await?;
    Ok(options)
}
