// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持印尼语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use chrono::{Datelike, NaiveDate};

use crate::domain::types::DepletionEstimate;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"id" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数,使用当前语言）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数,显式指定语言）
///
/// # 示例
/// ```no_run
/// use jirangan_planner::i18n::t_with_args;
/// let msg = t_with_args("production.manual_override_cleared", "id", &[("date", "2026-10-16")]);
/// ```
pub fn t_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key, locale = locale).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 长日期格式: "16 Oktober 2026" / "16 October 2026"
///
/// 显式传入语言,不依赖全局 locale
pub fn format_long_date(date: NaiveDate, locale: &str) -> String {
    let month_key = format!("date.month_{}", date.month());
    let month = rust_i18n::t!(month_key.as_str(), locale = locale);
    format!("{} {} {}", date.day(), month, date.year())
}

/// 原料耗尽预估的展示文本
pub fn depletion_label(estimate: &DepletionEstimate, locale: &str) -> String {
    match estimate.date() {
        Some(date) => format_long_date(date, locale),
        None => rust_i18n::t!("common.not_applicable", locale = locale).to_string(),
    }
}
