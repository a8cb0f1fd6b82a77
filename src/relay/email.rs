//! 事务邮件发送
//!
//! 通过邮件服务商的 HTTP API 单次投递，不重试、不排队、不落盘。

use serde::Serialize;

use crate::common::escape_html;

use super::types::SignupPayload;

/// 服务商发送请求体
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// 事务邮件发送器
pub struct EmailSender {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
    to: String,
}

impl EmailSender {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            from: from.into(),
            to: to.into(),
        }
    }

    /// 单次发送；任何非 2xx 都作为错误返回
    pub async fn send(&self, subject: &str, html: &str) -> anyhow::Result<()> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("邮件服务商 API Key 未配置"))?;

        let body = SendEmailRequest {
            from: &self.from,
            to: [self.to.as_str()],
            subject,
            html,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let resp_body = resp.text().await.unwrap_or_default();
            anyhow::bail!("邮件服务商返回 HTTP {} — {}", status, resp_body);
        }

        tracing::info!("注册邮件已投递: {} -> {}", subject, self.to);
        Ok(())
    }
}

/// 根据注册表单构建邮件标题和 HTML 正文
///
/// 所有用户输入都经过 HTML 转义
pub fn build_signup_email(payload: &SignupPayload) -> (String, String) {
    let subject = format!("New TauLayer sign-up: {}", payload.full_name);

    let optional = |v: &Option<String>| -> String {
        match v.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => escape_html(s),
            _ => "Not provided".to_string(),
        }
    };

    let html = format!(
        "<h2>New sign-up request</h2>\
         <table>\
         <tr><td><b>Name</b></td><td>{name}</td></tr>\
         <tr><td><b>Email</b></td><td>{email}</td></tr>\
         <tr><td><b>Company</b></td><td>{company}</td></tr>\
         <tr><td><b>Role</b></td><td>{role}</td></tr>\
         <tr><td><b>Use case</b></td><td>{use_case}</td></tr>\
         </table>",
        name = escape_html(&payload.full_name),
        email = escape_html(&payload.email),
        company = optional(&payload.company_name),
        role = optional(&payload.role),
        use_case = optional(&payload.use_case),
    );

    (subject, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SignupPayload {
        SignupPayload {
            full_name: "Ada <Lovelace>".to_string(),
            email: "ada@taulayer.dev".to_string(),
            company_name: Some("Analytical & Engines".to_string()),
            role: None,
            use_case: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_email_subject_and_escaping() {
        let (subject, html) = build_signup_email(&payload());
        assert_eq!(subject, "New TauLayer sign-up: Ada <Lovelace>");
        // 正文中的用户输入必须被转义
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(html.contains("Analytical &amp; Engines"));
    }

    #[test]
    fn test_missing_optional_fields_render_placeholder() {
        let (_, html) = build_signup_email(&payload());
        // role 缺失、use_case 为空白，都显示占位文案
        assert_eq!(html.matches("Not provided").count(), 2);
    }

    #[tokio::test]
    async fn test_send_without_api_key_fails() {
        let sender = EmailSender::new(
            reqwest::Client::new(),
            "https://api.resend.com/emails",
            None,
            "TauLayer <x@taulayer.dev>",
            "team@taulayer.dev",
        );
        assert!(sender.send("subject", "<p>hi</p>").await.is_err());
    }
}
