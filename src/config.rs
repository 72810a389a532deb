//! Application configuration module / 应用配置模块
//!
//! Manages configuration loaded from config.json.
//! Creates a default config file on first run / 首次运行时创建默认配置文件

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// S3 endpoint configuration / S3端点配置
    pub s3: S3Settings,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// S3 endpoint configuration / S3端点配置
///
/// The credential triple seeds the in-memory credential store at startup.
/// Leaving all three empty selects ambient credentials (env vars, profile,
/// instance role). Credentials set at runtime via POST /api/s3/auth replace
/// the in-memory value only and are not written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Settings {
    /// Endpoint URL, e.g. http://localhost:9000 for MinIO / 端点地址
    #[serde(default)]
    pub endpoint_url: String,
    /// Access key ID / 访问密钥ID
    #[serde(default)]
    pub client_id: String,
    /// Secret access key / 私有访问密钥
    #[serde(default)]
    pub client_secret: String,
    /// Region, e.g. us-east-1 / 区域
    #[serde(default = "default_region")]
    pub region: String,
    /// Force path-style addressing (required by MinIO) / 强制路径风格
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            region: default_region(),
            force_path_style: false,
        }
    }
}

impl AppConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8180);
        assert_eq!(config.get_bind_address(), "0.0.0.0:8180");
        assert_eq!(config.s3.region, "us-east-1");
        assert!(config.s3.endpoint_url.is_empty());
        assert!(!config.s3.force_path_style);
    }

    #[test]
    fn test_parse_partial_config() {
        // Fields missing from an existing config file fall back to defaults
        let config: AppConfig = serde_json::from_str(
            r#"{"server": {"host": "127.0.0.1", "port": 9000}, "s3": {"endpoint_url": "http://localhost:9000"}}"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.s3.endpoint_url, "http://localhost:9000");
        assert_eq!(config.s3.region, "us-east-1");
        assert!(config.s3.client_id.is_empty());
    }
}
