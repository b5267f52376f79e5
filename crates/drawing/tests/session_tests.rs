use async_trait::async_trait;
use kasen_core::common::{ChartKey, TimeFrame};
use kasen_core::config::DrawingConfig;
use kasen_core::drawing::entity::Tool;
use kasen_core::store::error::StoreError;
use kasen_core::store::port::KvStore;
use kasen_drawing::{DrawingEvent, DrawingSession, LinearViewport};
use kasen_store::MemStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn viewport() -> LinearViewport {
    LinearViewport::new(100.0, 100.0).with_ranges((0.0, 100.0), (0.0, 100.0))
}

async fn click(session: &mut DrawingSession, x: f64, y: f64, vp: &LinearViewport) {
    session.dispatch(DrawingEvent::PointerDown { x, y }, vp).await;
    session.dispatch(DrawingEvent::PointerUp { x, y }, vp).await;
}

/// 可切换写入失败的存储
struct FlakyStore {
    inner: MemStore,
    failing: AtomicBool,
}

#[async_trait]
impl KvStore for FlakyStore {
    async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("disk full".to_string()));
        }
        self.inner.set_raw(key, value).await
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get_raw(key).await
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.inner.del(key).await
    }
}

#[tokio::test]
async fn test_drawings_round_trip_through_store() {
    let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
    let key = ChartKey::new("EUR/USD", TimeFrame::Minute5);
    let vp = viewport();

    let mut session = DrawingSession::open(store.clone(), key.clone(), DrawingConfig::default()).await;
    session.dispatch(DrawingEvent::SelectTool(Some(Tool::Rectangle)), &vp).await;
    click(&mut session, 10.0, 10.0, &vp).await;
    click(&mut session, 40.0, 40.0, &vp).await;
    session.dispatch(DrawingEvent::SelectTool(Some(Tool::Hline)), &vp).await;
    click(&mut session, 20.0, 70.0, &vp).await;
    assert_eq!(session.annotations().len(), 2);
    assert!(!session.is_dirty());

    let reopened = DrawingSession::open(store, key, DrawingConfig::default()).await;
    assert_eq!(reopened.annotations(), session.annotations());
}

#[tokio::test]
async fn test_switch_key_loads_other_collection() {
    let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
    let eur = ChartKey::new("EUR/USD", TimeFrame::Minute5);
    let btc = ChartKey::new("BTCUSDT", TimeFrame::Hour1);
    let vp = viewport();

    let mut session = DrawingSession::open(store, eur.clone(), DrawingConfig::default()).await;
    session.dispatch(DrawingEvent::SelectTool(Some(Tool::Vline)), &vp).await;
    click(&mut session, 50.0, 50.0, &vp).await;
    session.dispatch(DrawingEvent::SelectTool(Some(Tool::Fib)), &vp).await;
    click(&mut session, 10.0, 10.0, &vp).await;
    assert!(session.state().draft().is_some());

    session.switch_key(btc).await;
    assert!(session.annotations().is_empty());
    assert!(session.state().draft().is_none());

    session.switch_key(eur).await;
    assert_eq!(session.annotations().len(), 1);
    assert_eq!(session.annotations()[0].tool, Tool::Vline);
}

#[tokio::test]
async fn test_corrupt_payload_loads_empty() {
    let store = Arc::new(MemStore::new());
    let key = ChartKey::new("EUR/USD", TimeFrame::Minute1);
    store.set_raw(&key.drawings_key(), "not json".to_string()).await.unwrap();

    let session = DrawingSession::open(store, key, DrawingConfig::default()).await;
    assert!(session.annotations().is_empty());
}

#[tokio::test]
async fn test_incomplete_saved_drawings_are_dropped() {
    let store = Arc::new(MemStore::new());
    let key = ChartKey::new("EUR/USD", TimeFrame::Minute1);
    let payload = r#"[
        {"id":"a","tool":"trendline","points":[{"time":1.0,"price":2.0},{"time":3.0,"price":4.0}]},
        {"id":"b","tool":"channel","points":[{"time":1.0,"price":2.0}]}
    ]"#;
    store.set_raw(&key.drawings_key(), payload.to_string()).await.unwrap();

    let session = DrawingSession::open(store, key, DrawingConfig::default()).await;
    assert_eq!(session.annotations().len(), 1);
    assert_eq!(session.annotations()[0].tool, Tool::Line);
}

#[tokio::test]
async fn test_failed_save_is_retried_on_next_mutation() {
    let flaky = Arc::new(FlakyStore {
        inner: MemStore::new(),
        failing: AtomicBool::new(true),
    });
    let key = ChartKey::new("EUR/USD", TimeFrame::Minute5);
    let vp = viewport();

    let mut session = DrawingSession::open(flaky.clone(), key.clone(), DrawingConfig::default()).await;
    session.dispatch(DrawingEvent::SelectTool(Some(Tool::Hline)), &vp).await;
    click(&mut session, 10.0, 10.0, &vp).await;
    assert_eq!(session.annotations().len(), 1);
    assert!(session.is_dirty());
    assert!(flaky.get_raw(&key.drawings_key()).await.unwrap().is_none());

    flaky.failing.store(false, Ordering::SeqCst);
    click(&mut session, 10.0, 30.0, &vp).await;
    assert!(!session.is_dirty());

    let saved = flaky.get_raw(&key.drawings_key()).await.unwrap().unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&saved).unwrap();
    assert_eq!(parsed.len(), 2);
}
