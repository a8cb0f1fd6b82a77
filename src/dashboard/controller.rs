//! 控制面板状态控制器
//!
//! 持有共享的过滤/排序状态；文本过滤按字段独立防抖后提交，
//! 防抖定时器是显式可取消的任务，与视图生命周期解耦。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::view::{FilterSortState, SortDirection, SortField, SortKey};

/// 防抖的目标字段
#[derive(Debug, Clone, Copy)]
enum FilterField {
    UserId,
    Prompt,
}

/// 过滤/排序控制器
///
/// 同一字段同一时刻最多存在一个待提交任务；新的输入会取消并
/// 取代旧任务，不同字段的定时器互不影响。
pub struct FilterController {
    shared: Arc<RwLock<FilterSortState>>,
    debounce: Duration,
    pending_user: Mutex<Option<JoinHandle<()>>>,
    pending_prompt: Mutex<Option<JoinHandle<()>>>,
    /// 手动刷新计数器，单调递增；数据集按计数器重新生成
    refresh_counter: AtomicU64,
}

impl FilterController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            shared: Arc::new(RwLock::new(FilterSortState::default())),
            debounce,
            pending_user: Mutex::new(None),
            pending_prompt: Mutex::new(None),
            refresh_counter: AtomicU64::new(0),
        }
    }

    /// 当前已提交状态的快照
    pub fn state(&self) -> FilterSortState {
        self.shared.read().clone()
    }

    /// 输入 user_id 过滤串（防抖提交）
    pub fn set_user_id_filter(&self, value: String) {
        self.schedule_commit(FilterField::UserId, value);
    }

    /// 输入短描述过滤串（防抖提交）
    pub fn set_prompt_filter(&self, value: String) {
        self.schedule_commit(FilterField::Prompt, value);
    }

    fn schedule_commit(&self, field: FilterField, value: String) {
        let shared = self.shared.clone();
        let delay = self.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = shared.write();
            match field {
                FilterField::UserId => state.user_id_filter = value,
                FilterField::Prompt => state.prompt_filter = value,
            }
        });

        let slot = match field {
            FilterField::UserId => &self.pending_user,
            FilterField::Prompt => &self.pending_prompt,
        };
        // 后到的输入取代尚未提交的旧任务
        if let Some(old) = slot.lock().replace(handle) {
            old.abort();
        }
    }

    /// 新增或替换排序键：字段不存在时追加，存在时仅替换方向
    pub fn upsert_sort_key(&self, field: SortField, direction: SortDirection) {
        let mut state = self.shared.write();
        match state.sort_keys.iter_mut().find(|k| k.field == field) {
            Some(key) => key.direction = direction,
            None => state.sort_keys.push(SortKey { field, direction }),
        }
    }

    /// 移除排序键；字段不存在时无操作
    pub fn remove_sort_key(&self, field: SortField) {
        self.shared.write().sort_keys.retain(|k| k.field != field);
    }

    /// 翻转指定字段的方向；返回是否找到该字段
    pub fn toggle_sort_key(&self, field: SortField) -> bool {
        let mut state = self.shared.write();
        match state.sort_keys.iter_mut().find(|k| k.field == field) {
            Some(key) => {
                key.direction = key.direction.toggled();
                true
            }
            None => false,
        }
    }

    /// 手动刷新：递增计数器并返回新值
    pub fn refresh(&self) -> u64 {
        self.refresh_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 当前刷新计数
    pub fn refresh_count(&self) -> u64 {
        self.refresh_counter.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试用的短防抖窗口，留足调度余量
    const TEST_DEBOUNCE: Duration = Duration::from_millis(40);

    #[tokio::test]
    async fn test_filter_commits_after_debounce() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        controller.set_user_id_filter("abc".to_string());

        // 防抖窗口内还未提交
        assert_eq!(controller.state().user_id_filter, "");

        tokio::time::sleep(TEST_DEBOUNCE * 4).await;
        assert_eq!(controller.state().user_id_filter, "abc");
    }

    #[tokio::test]
    async fn test_later_input_supersedes_pending() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        controller.set_user_id_filter("a".to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.set_user_id_filter("ab".to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.set_user_id_filter("abc".to_string());

        tokio::time::sleep(TEST_DEBOUNCE * 4).await;
        // 只有最后一次输入生效
        assert_eq!(controller.state().user_id_filter, "abc");
    }

    #[tokio::test]
    async fn test_fields_debounce_independently() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        controller.set_user_id_filter("user".to_string());
        controller.set_prompt_filter("sql".to_string());

        tokio::time::sleep(TEST_DEBOUNCE * 4).await;
        let state = controller.state();
        assert_eq!(state.user_id_filter, "user");
        assert_eq!(state.prompt_filter, "sql");
    }

    #[tokio::test]
    async fn test_sort_key_upsert_append_and_replace() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        // 默认自带 timestamp desc
        assert_eq!(controller.state().sort_keys.len(), 1);

        controller.upsert_sort_key(SortField::EstimatedCostUsd, SortDirection::Asc);
        let state = controller.state();
        assert_eq!(state.sort_keys.len(), 2);
        assert_eq!(state.sort_keys[1].field, SortField::EstimatedCostUsd);

        // 已存在的字段只替换方向，不改变位置
        controller.upsert_sort_key(SortField::EstimatedCostUsd, SortDirection::Desc);
        let state = controller.state();
        assert_eq!(state.sort_keys.len(), 2);
        assert_eq!(state.sort_keys[1].direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn test_sort_key_remove_and_toggle() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        controller.upsert_sort_key(SortField::QualityPct, SortDirection::Asc);

        assert!(controller.toggle_sort_key(SortField::QualityPct));
        assert_eq!(
            controller.state().sort_keys.last().unwrap().direction,
            SortDirection::Desc
        );

        controller.remove_sort_key(SortField::QualityPct);
        assert!(controller.state().sort_keys.iter().all(|k| k.field != SortField::QualityPct));

        // 不存在的字段翻转返回 false
        assert!(!controller.toggle_sort_key(SortField::QualityPct));
    }

    #[tokio::test]
    async fn test_refresh_counter_monotonic() {
        let controller = FilterController::new(TEST_DEBOUNCE);
        assert_eq!(controller.refresh_count(), 0);
        assert_eq!(controller.refresh(), 1);
        assert_eq!(controller.refresh(), 2);
        assert_eq!(controller.refresh_count(), 2);
    }
}
