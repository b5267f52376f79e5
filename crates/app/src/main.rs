use kasen_alert::LogSink;
use kasen_chart::{ChartContext, ChartSession};
use kasen_core::alert::entity::AlertTriggered;
use kasen_core::common::time::RealTimeProvider;
use kasen_core::market::entity::PricePoint;
use kasen_drawing::LinearViewport;
use kasen_market::{
    FeedConnection, LineFeed, ReplayProducer, ReplaySettings, SourceEvent, SourceSwitch,
    decode_tick,
};
use kasen_store::FileStore;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod settings;

// 生产者与会话之间的通道容量
const CHANNEL_CAPACITY: usize = 256;
// 无宿主图表时的默认视口尺寸
const VIEW_WIDTH: f64 = 1200.0;
const VIEW_HEIGHT: f64 = 600.0;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
///
/// # Logic
/// 1. 分层加载配置（默认值 ← 配置文件 ← 环境变量），初始化日志。
/// 2. 实例化基础设施层（FileStore、LogSink、系统时钟）并打开图表会话。
/// 3. 根据 `replay.source` 选择数据源：回放文件或标准输入的实时报文。
/// 4. 消费生产者事件，每个数据点向标准输出写一行 JSON。
/// 5. 数据源结束或收到退出信号后保存绘图并退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = settings::load(config_path.as_deref())?;
    let _guard = init_tracing(&config.log.level);
    info!(
        "Kasen starting for {} {}",
        config.chart.symbol, config.chart.timeframe
    );

    // 2. 基础设施与应用服务
    if !kasen_store::config::set_root_dir(PathBuf::from(&config.storage.data_dir)) {
        warn!("Storage root already set, ignoring {}", config.storage.data_dir);
    }
    let ctx = ChartContext {
        store: Arc::new(FileStore::new()?),
        sink: Arc::new(LogSink),
        clock: Arc::new(RealTimeProvider),
    };
    let viewport = LinearViewport::new(VIEW_WIDTH, VIEW_HEIGHT);
    let mut session = ChartSession::open(&config, ctx, viewport).await;

    // 3. 数据源
    let (mut switch, mut rx) = SourceSwitch::new(CHANNEL_CAPACITY);
    match &config.replay.source {
        Some(path) => {
            let points = read_history(Path::new(path)).await?;
            let settings = ReplaySettings::from(&config.replay);
            switch.start_replay(ReplayProducer::new(points, settings));
        }
        None => {
            let feed = Arc::new(LineFeed::new(BufReader::new(tokio::io::stdin())));
            switch
                .go_live(FeedConnection::new(feed, session.key().clone()))
                .await?;
        }
    }

    // 4. 事件循环
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let ended = matches!(event, SourceEvent::Ended(_));
                let point = match &event {
                    SourceEvent::Point(p) => Some(*p),
                    _ => None,
                };
                // 只有被接受的数据点才输出快照
                let fired = session.handle(event).await;
                if let (Some(point), Some(fired)) = (point, fired) {
                    println!("{}", snapshot(&session, &point, &fired));
                }
                if ended {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // 5. 收尾
    switch.stop();
    session.close().await?;
    info!("Kasen stopped");
    Ok(())
}

/// 日志写入标准错误（非阻塞），标准输出留给数据行。
fn init_tracing(level: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    guard
}

/// # Summary
/// 读取回放文件，每行一个 JSON 报文。
///
/// # Logic
/// 非 JSON 或字段非法的行记录 warn 后跳过。
async fn read_history(path: &Path) -> Result<Vec<PricePoint>, std::io::Error> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut points = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let decoded = serde_json::from_str::<Value>(line)
            .map_err(|e| e.to_string())
            .and_then(|raw| decode_tick(&raw).map_err(|e| e.to_string()));
        match decoded {
            Ok(point) => points.push(point),
            Err(e) => warn!("{}:{} skipped: {}", path.display(), idx + 1, e),
        }
    }
    info!("Loaded {} replay points from {}", points.len(), path.display());
    Ok(points)
}

/// 单个数据点处理后的输出行：最新收盘、各序列最新值与新触发的告警。
fn snapshot(session: &ChartSession, point: &PricePoint, fired: &[AlertTriggered]) -> Value {
    let series: Map<String, Value> = session
        .series()
        .iter()
        .filter_map(|s| s.last_value().map(|v| (s.id.clone(), json!(v))))
        .collect();
    json!({
        "symbol": session.key().symbol,
        "time": point.time,
        "close": point.close,
        "series": series,
        "alerts": fired,
    })
}
