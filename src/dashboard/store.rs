//! 演示数据集存储
//!
//! 数据集不落盘：按刷新代次惰性重新生成并缓存在内存里，
//! 同一代次内的多次读取返回相同数据。

use chrono::Utc;
use parking_lot::RwLock;

use super::generate::generate_dataset;
use super::model::RequestRecord;

pub struct DashboardStore {
    base_seed: u64,
    /// (刷新代次, 该代次的数据集)
    cached: RwLock<Option<(u64, Vec<RequestRecord>)>>,
}

impl DashboardStore {
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            cached: RwLock::new(None),
        }
    }

    /// 获取指定刷新代次的数据集；代次变化时重新生成
    pub fn dataset(&self, generation: u64) -> Vec<RequestRecord> {
        {
            let cached = self.cached.read();
            if let Some((cached_gen, rows)) = cached.as_ref() {
                if *cached_gen == generation {
                    return rows.clone();
                }
            }
        }

        let rows = generate_dataset(self.base_seed ^ generation, Utc::now());
        tracing::debug!("重新生成演示数据集：generation={}", generation);
        *self.cached.write() = Some((generation, rows.clone()));
        rows
    }
}
