// ==========================================
// 生产预测核心 - 日需求序列
// ==========================================
// 红线: 长度恒为窗口天数 N, 缺失日期补 0.0, 不允许跳日
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 固定长度的日需求序列（旧 → 新）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDemandSeries {
    start_date: NaiveDate,
    values: Vec<f64>,
}

impl DailyDemandSeries {
    /// 以全 0 初始化 N 天窗口
    pub fn zeros(start_date: NaiveDate, window_days: usize) -> Self {
        Self {
            start_date,
            values: vec![0.0; window_days],
        }
    }

    /// 窗口起始日（含）
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// 窗口最后一天（空序列时返回 None）
    pub fn end_date(&self) -> Option<NaiveDate> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.start_date + Duration::days(self.values.len() as i64 - 1))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 按日期累加（窗口外日期忽略,返回是否命中）
    pub fn add(&mut self, date: NaiveDate, value: f64) -> bool {
        match self.index_of(date) {
            Some(idx) => {
                self.values[idx] += value;
                true
            }
            None => false,
        }
    }

    /// 序列中的 (日期, 值) 对
    pub fn iter_days(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (self.start_date + Duration::days(i as i64), *v))
    }

    fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start_date).num_days();
        if offset < 0 || offset as usize >= self.values.len() {
            return None;
        }
        Some(offset as usize)
    }

    /// 逐日变换（用于直销口径的 max(0, ·) 截断）
    pub(crate) fn map_values(&mut self, f: impl Fn(f64) -> f64) {
        for v in self.values.iter_mut() {
            *v = f(*v);
        }
    }
}
