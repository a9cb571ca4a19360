//! 采集桥接进程：订阅批次报文，按白名单过滤后写入 InfluxDB。

mod ingest;

use coha_config::AppConfig;
use coha_pipeline::Pipeline;
use coha_sink::InfluxSink;
use coha_telemetry::init_tracing;
use domain::AllowList;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 初始化结构化日志
    init_tracing();
    // 配置文件 + 环境变量
    let config = AppConfig::load()?;
    match &config.source {
        Some(path) => info!("config loaded from {}", path.display()),
        None => info!("config loaded from environment"),
    }

    let allow_list = AllowList::new(config.filter_pass.clone());
    if allow_list.is_empty() {
        warn!("FilterPass is empty, every record will be filtered out");
    }
    info!(
        filter_pass = allow_list.len(),
        measurement = %config.measurement,
        "pipeline configured"
    );

    let sink = InfluxSink::new(ingest::influx_config(&config))?;
    info!(
        "influx sink: {} org={} bucket={}",
        config.influx_url, config.influx_organisation, config.influx_bucket
    );

    let mut source = ingest::connect_source(&config).await?;
    let pipeline = Pipeline::new(allow_list, Arc::new(sink), config.measurement.clone());

    // 单循环：接收 → 处理 → flush，直到进程被终止
    pipeline.run(source.as_mut()).await;
    Ok(())
}
