use dotenvy::dotenv;
use tracing::{error, info, warn};

use service::runtime::{bind_models, open_store};

fn init_logging() {
    // 提前加载 .env，使得 RUST_LOG / CONFIG_PATH / STORE_PATH 生效
    dotenv().ok();
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    info!(service = "inspect", event = "logger_init", "tracing subscriber initialized");
}

async fn run(cfg: configs::AppConfig) -> anyhow::Result<()> {
    if cfg.models.is_empty() {
        warn!(service = "inspect", event = "no_models", "no models configured; nothing to bind");
    }
    let store = open_store(&cfg.store, &cfg.models).await?;
    let services = bind_models(&store, &cfg.models)?;

    for svc in &services {
        let count = svc.count(None).await?;
        let newest = svc
            .find_many(models::FindManyArgs::default().order_by(models::json::OrderBy::desc("id")).take(1))
            .await?;
        let newest_id = newest.first().and_then(|r| r.get("id")).cloned().unwrap_or(serde_json::Value::Null);
        info!(service = "inspect", event = "model_summary", model = %svc.model(), count, newest_id = %newest_id, "collection bound");
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    init_logging();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "inspect", event = "config_invalid", error = %e, "failed to load config");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 单线程运行时足够：所有操作都是顺序委托
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "inspect", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "inspect",
        event = "start",
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        models = cfg.models.len(),
        "inspect starting"
    );

    match rt.block_on(run(cfg)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "inspect", event = "run_failed", error = %e, "inspection failed");
            std::process::ExitCode::FAILURE
        }
    }
}
