//! 设置持久化
//!
//! 仪表盘设置对话框保存的是一段 YAML 文本，服务端只作为
//! 单键的不透明键值条目存取，加载时不做任何 schema 校验。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 固定的条目键名
pub const SETTINGS_KEY: &str = "taulayer.dashboard.settings";

/// 持久化的设置条目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSettings {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    /// 原样保存的 YAML 文本，不校验
    pub yaml: String,
}

/// 文件后端的设置存储
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 读取上次保存的条目；文件不存在时返回 None
    pub fn load(&self) -> anyhow::Result<Option<SavedSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("读取设置文件失败: {}", self.path.display()))?;
        let saved: SavedSettings = serde_json::from_str(&content).context("解析设置条目失败")?;
        Ok(Some(saved))
    }

    /// 覆盖保存 YAML 文本，返回写入的条目
    pub fn save(&self, yaml: String) -> anyhow::Result<SavedSettings> {
        let saved = SavedSettings {
            key: SETTINGS_KEY.to_string(),
            saved_at: Utc::now(),
            yaml,
        };
        let content = serde_json::to_string_pretty(&saved).context("序列化设置条目失败")?;
        fs::write(&self.path, content)
            .with_context(|| format!("写入设置文件失败: {}", self.path.display()))?;
        Ok(saved)
    }
}
