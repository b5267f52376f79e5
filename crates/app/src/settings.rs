use config::{Config, ConfigError, Environment, File};
use kasen_core::config::AppConfig;
use std::path::Path;

/// 未显式指定时查找的配置文件名（不含扩展名）。
pub const DEFAULT_CONFIG_FILE: &str = "kasen";

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 叠加配置文件：显式路径必须存在，否则尝试可选的 `kasen.{toml,json,...}`。
/// 3. 叠加 `KASEN_` 前缀的环境变量，层级以 `__` 分隔（如 `KASEN_CHART__SYMBOL`）。
///
/// # Errors
/// 文件缺失（显式路径）、格式错误或类型不匹配时返回 `ConfigError`。
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(file)
        .add_source(
            Environment::with_prefix("KASEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
