// ==========================================
// 生产预测核心 - 命令行入口
// ==========================================
// 用法:
//   jirangan-planner [--db <path>] <command> [args...]
//
// 命令:
//   plan [YYYY-MM-DD]                  对账并输出某日生产计划（默认今日）
//   refresh                            对账今日与明日
//   set-total <id> <total> [actor]     人工设定生产总量
//   clear-total <id> [actor]           取消人工设定
//   materials [search]                 原料列表 + 耗尽预估
//   recap <year> <month>               月度生产汇总
//   config [get <key> | set <key> <v>] 查看/写入预测配置（无参数输出快照）
//
// 结果以 JSON 输出到 stdout, 日志输出到 stderr
// ==========================================

use chrono::NaiveDate;
use jirangan_planner::app::{get_default_db_path, AppState};
use jirangan_planner::config::config_keys;
use jirangan_planner::db::DATE_FMT;
use jirangan_planner::engine::Clock;
use jirangan_planner::{logging, SystemClock};
use serde::Serialize;
use std::error::Error;

const DEFAULT_ACTOR: &str = "cli";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Plan(Option<NaiveDate>),
    Refresh,
    SetTotal { id: i64, total: f64, actor: String },
    ClearTotal { id: i64, actor: String },
    Materials(Option<String>),
    Recap { year: i32, month: u32 },
    ConfigShow,
    ConfigGet(String),
    ConfigSet { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    db_path: Option<String>,
    command: Command,
}

fn usage() -> String {
    "用法: jirangan-planner [--db <path>] <plan [date] | refresh | set-total <id> <total> [actor] | clear-total <id> [actor] | materials [search] | recap <year> <month> | config [get <key> | set <key> <value>]>".to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FMT)
        .map_err(|_| format!("无效日期 (期望 YYYY-MM-DD): {}", raw))
}

fn parse_num<T: std::str::FromStr>(raw: Option<String>, name: &str) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("缺少参数: {}\n{}", name, usage()))?;
    raw.trim()
        .parse::<T>()
        .map_err(|_| format!("参数{}格式错误: {}", name, raw))
}

fn parse_config_key(raw: Option<String>) -> Result<String, String> {
    let key = raw.ok_or_else(|| format!("缺少参数: key\n{}", usage()))?;
    if !config_keys::ALL.contains(&key.as_str()) {
        return Err(format!(
            "未知配置键: {} (可用: {})",
            key,
            config_keys::ALL.join(", ")
        ));
    }
    Ok(key)
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, String> {
    let mut args = args.into_iter().peekable();
    let mut db_path = None;

    if args.peek().map(String::as_str) == Some("--db") {
        args.next();
        db_path = Some(args.next().ok_or("--db 缺少路径")?);
    }

    let command = match args.next().as_deref() {
        Some("plan") => Command::Plan(args.next().map(|s| parse_date(&s)).transpose()?),
        Some("refresh") => Command::Refresh,
        Some("set-total") => Command::SetTotal {
            id: parse_num(args.next(), "id")?,
            total: parse_num(args.next(), "total")?,
            actor: args.next().unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        },
        Some("clear-total") => Command::ClearTotal {
            id: parse_num(args.next(), "id")?,
            actor: args.next().unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
        },
        Some("materials") => Command::Materials(args.next()),
        Some("recap") => Command::Recap {
            year: parse_num(args.next(), "year")?,
            month: parse_num(args.next(), "month")?,
        },
        Some("config") => match args.next().as_deref() {
            None => Command::ConfigShow,
            Some("get") => Command::ConfigGet(parse_config_key(args.next())?),
            Some("set") => Command::ConfigSet {
                key: parse_config_key(args.next())?,
                value: args.next().ok_or_else(|| format!("缺少参数: value\n{}", usage()))?,
            },
            Some(_) => return Err(usage()),
        },
        _ => return Err(usage()),
    };

    Ok(Invocation { db_path, command })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    if std::env::var("JIRANGAN_LOG_FORMAT").as_deref() == Ok("json") {
        logging::init_json();
    } else {
        logging::init();
    }

    let invocation = parse_args(std::env::args().skip(1))?;
    let db_path = invocation.db_path.unwrap_or_else(get_default_db_path);

    tracing::debug!("{} v{}", jirangan_planner::APP_NAME, jirangan_planner::VERSION);
    let state = AppState::new(db_path)?;

    match invocation.command {
        Command::Plan(date) => {
            let date = date.unwrap_or_else(|| SystemClock.today());
            print_json(&state.production_api.get_production_plan(date)?)?;
        }
        Command::Refresh => {
            let clock = SystemClock;
            let records = vec![
                state.production_api.reconcile_production(clock.today())?,
                state.production_api.reconcile_production(clock.tomorrow())?,
            ];
            print_json(&records)?;
        }
        Command::SetTotal { id, total, actor } => {
            print_json(&state.production_api.set_manual_total(id, total, &actor)?)?;
        }
        Command::ClearTotal { id, actor } => {
            print_json(&state.production_api.clear_manual_override(id, &actor)?)?;
        }
        Command::Materials(search) => {
            print_json(
                &state
                    .material_api
                    .list_materials_with_depletion(search.as_deref())?,
            )?;
        }
        Command::Recap { year, month } => {
            print_json(&state.production_api.monthly_recap(year, month)?)?;
        }
        Command::ConfigShow => {
            let snapshot: serde_json::Value =
                serde_json::from_str(&state.config_manager.get_config_snapshot()?)?;
            print_json(&snapshot)?;
        }
        Command::ConfigGet(key) => {
            let value = state.config_manager.get_global_config_value(&key)?;
            print_json(&serde_json::json!({ "key": key, "value": value }))?;
        }
        Command::ConfigSet { key, value } => {
            state.config_manager.set_global_config_value(&key, value.trim())?;
            tracing::info!(config_key = %key, value = %value, "配置已写入");
            print_json(&serde_json::json!({ "key": key, "value": value.trim() }))?;
        }
    }

    Ok(())
}
