// ==========================================
// 生产预测核心 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 人工设定/取消设定总量必须留痕
// ==========================================

mod core;
mod queries;


pub use core::ActionLogRepository;
