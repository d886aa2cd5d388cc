// ==========================================
// 生产预测核心 - 时钟抽象
// ==========================================
// 职责: "今天/明天" 由注入时钟决定,引擎不读全局时间
// ==========================================

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// 当前日期/时间来源
pub trait Clock: Send + Sync {
    /// 当前日期（本地日历日）
    fn today(&self) -> NaiveDate;

    /// 当前时间（本地）
    fn now(&self) -> NaiveDateTime;

    fn yesterday(&self) -> NaiveDate {
        self.today() - Duration::days(1)
    }

    fn tomorrow(&self) -> NaiveDate {
        self.today() + Duration::days(1)
    }
}

/// 系统本地时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 固定时钟（测试 / 历史回放）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// 固定在某日 08:00
    pub fn at_date(date: NaiveDate) -> Self {
        Self {
            now: date.and_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
