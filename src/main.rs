// ==========================================
// 材料跟踪系统 - 命令行入口
// ==========================================
// 用法: procurement-kpi <archivo> [nombre]
// 流程: 初始化日志 → 加载配置 → 打开存储 → 处理文件 → 输出报告 JSON
// ==========================================

use anyhow::{bail, Context, Result};
use procurement_kpi::api::project_name_for;
use procurement_kpi::app::AppState;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    procurement_kpi::logging::init();

    let mut args = std::env::args().skip(1);
    let file = match args.next() {
        Some(f) => PathBuf::from(f),
        None => bail!("Uso: procurement-kpi <archivo> [nombre]"),
    };
    let name = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| project_name_for(&file));

    tracing::info!("==================================================");
    tracing::info!("{} v{}", procurement_kpi::APP_NAME, procurement_kpi::VERSION);
    tracing::info!("==================================================");

    let state = AppState::from_env()?;
    tracing::info!(db_path = %state.db_path, "使用数据库");

    let project = state.dashboard_api.process_file(&file, &name).await?;

    let json = serde_json::to_string_pretty(&project.report)
        .context("no se pudo serializar el reporte")?;
    println!("{}", json);

    tracing::info!(project_id = %project.project_id, "处理完成");
    Ok(())
}
