//! HTTP Client 构建模块
//!
//! 出站请求（身份提供方、邮件服务商）共用同一构建逻辑

use std::time::Duration;

use reqwest::Client;

/// 服务端出站请求的 User-Agent
const USER_AGENT: &str = concat!("taulayer-rs/", env!("CARGO_PKG_VERSION"));

/// 构建 HTTP Client
///
/// * `timeout_secs` - 整个请求的超时时间（秒）
pub fn build_client(timeout_secs: u64) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client(30).is_ok());
    }

    #[test]
    fn test_build_client_short_timeout() {
        assert!(build_client(1).is_ok());
    }
}
