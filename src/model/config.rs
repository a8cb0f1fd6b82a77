use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// TauLayer 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// 身份提供方（Supabase 兼容）项目 URL，缺失时启动失败
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// 身份提供方匿名密钥，缺失时启动失败
    #[serde(default)]
    pub supabase_anon_key: Option<String>,

    /// 魔法链接回跳地址（未配置时由请求方提供）
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_redirect_url: Option<String>,

    /// 事务邮件服务商 API Key（可选，缺失时 /send 返回失败响应）
    #[serde(default)]
    pub resend_api_key: Option<String>,

    /// 事务邮件服务商 API 地址
    #[serde(default = "default_email_endpoint")]
    pub email_endpoint: String,

    /// 注册邮件的发件人
    #[serde(default = "default_relay_from")]
    pub relay_from: String,

    /// 注册邮件的收件人（团队收件箱）
    #[serde(default = "default_relay_to")]
    pub relay_to: String,

    /// 演示数据集的基础种子（与刷新计数器异或得到实际种子）
    #[serde(default = "default_dataset_seed")]
    pub dataset_seed: u64,

    /// 过滤输入防抖延迟（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// 设置项（YAML 文本）的持久化文件路径
    #[serde(default = "default_settings_path")]
    pub settings_path: String,

    /// 出站 HTTP 超时（秒）
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_email_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_relay_from() -> String {
    "TauLayer <onboarding@taulayer.dev>".to_string()
}

fn default_relay_to() -> String {
    "team@taulayer.dev".to_string()
}

fn default_dataset_seed() -> u64 {
    0x7461_756c_6179_6572 // "taulayer" 的字节
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_settings_path() -> String {
    "settings.json".to_string()
}

fn default_http_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            supabase_url: None,
            supabase_anon_key: None,
            auth_redirect_url: None,
            resend_api_key: None,
            email_endpoint: default_email_endpoint(),
            relay_from: default_relay_from(),
            relay_to: default_relay_to(),
            dataset_seed: default_dataset_seed(),
            debounce_ms: default_debounce_ms(),
            settings_path: default_settings_path(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 应用环境变量覆盖（部署环境以环境变量为准）
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => tracing::warn!("PORT 环境变量无效，保留 {}", self.port),
            }
        }
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            if !url.trim().is_empty() {
                self.supabase_url = Some(url);
            }
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            if !key.trim().is_empty() {
                self.supabase_anon_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("RESEND_API_KEY") {
            if !key.trim().is_empty() {
                self.resend_api_key = Some(key);
            }
        }
    }

    /// 启动前校验
    ///
    /// 身份提供方连接参数缺失视为致命错误，直接终止初始化，
    /// 而不是降级运行。邮件服务商密钥缺失仅在发送时报错。
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.supabase_url.as_deref().unwrap_or("").trim().is_empty() {
            anyhow::bail!("缺少身份提供方配置 supabaseUrl（或 SUPABASE_URL 环境变量）");
        }
        if self
            .supabase_anon_key
            .as_deref()
            .unwrap_or("")
            .trim()
            .is_empty()
        {
            anyhow::bail!("缺少身份提供方配置 supabaseAnonKey（或 SUPABASE_ANON_KEY 环境变量）");
        }
        Ok(())
    }

}
