use kasen_core::common::{ChartKey, TimeFrame};
use kasen_core::market::entity::PricePoint;
use kasen_core::market::port::PriceFeed;
use kasen_market::{
    FeedConnection, LineFeed, ReplayProducer, ReplaySettings, SourceEvent, SourceKind,
    SourceSwitch,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;

fn key() -> ChartKey {
    ChartKey::new("EUR/USD", TimeFrame::Minute1)
}

fn points(n: i64) -> Vec<PricePoint> {
    (0..n)
        .map(|i| PricePoint::flat(i * 60, 1.0 + i as f64))
        .collect()
}

#[tokio::test]
async fn test_live_feed_skips_malformed_ticks() -> anyhow::Result<()> {
    let input = concat!(
        r#"{"time":60,"open":1,"high":2,"low":0.5,"close":1.5}"#,
        "\n",
        "not json\n",
        r#"{"time":120,"open":"1.5","high":2,"low":1,"close":null}"#,
        "\n",
        "\n",
        r#"{"time":180.9,"open":"1.5","high":"2.5","low":"1.25","close":"2"}"#,
        "\n",
    );
    let feed: Arc<dyn PriceFeed> = Arc::new(LineFeed::new(BufReader::new(input.as_bytes())));
    let (mut switch, mut rx) = SourceSwitch::new(16);
    switch.go_live(FeedConnection::new(feed, key())).await?;
    assert_eq!(switch.mode(), Some(SourceKind::Live));

    let mut received = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            SourceEvent::Point(p) => received.push(p),
            SourceEvent::Ended(kind) => {
                assert_eq!(kind, SourceKind::Live);
                break;
            }
            SourceEvent::Reset(_) => panic!("live feed never resets"),
        }
    }

    assert_eq!(received.len(), 2);
    assert_eq!(received[0], PricePoint::new(60, 1.0, 2.0, 0.5, 1.5));
    assert_eq!(received[1].time, 180);
    assert_eq!(received[1].close, 2.0);
    Ok(())
}

#[tokio::test]
async fn test_line_feed_subscribes_once() {
    let feed = LineFeed::new(BufReader::new(&b""[..]));
    assert!(feed.subscribe(&key()).await.is_ok());
    assert!(feed.subscribe(&key()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_replay_resets_then_paces_points() {
    let settings = ReplaySettings {
        speed: 2,
        cursor: Some(2),
    };
    let (mut switch, mut rx) = SourceSwitch::new(16);
    switch.start_replay(ReplayProducer::new(points(5), settings));
    assert_eq!(switch.mode(), Some(SourceKind::Replay));

    match rx.recv().await {
        Some(SourceEvent::Reset(seed)) => assert_eq!(seed, points(3)),
        other => panic!("expected reset, got {:?}", other),
    }

    let started = tokio::time::Instant::now();
    match rx.recv().await {
        Some(SourceEvent::Point(p)) => assert_eq!(p.time, 180),
        other => panic!("expected point, got {:?}", other),
    }
    assert!(started.elapsed() >= Duration::from_millis(500));

    match rx.recv().await {
        Some(SourceEvent::Point(p)) => assert_eq!(p.time, 240),
        other => panic!("expected point, got {:?}", other),
    }
    assert_eq!(rx.recv().await, Some(SourceEvent::Ended(SourceKind::Replay)));
    assert_eq!(switch.replay().map(|r| r.position()), Some(4));
}

#[tokio::test(start_paused = true)]
async fn test_switching_stops_previous_producer() {
    let (mut switch, mut rx) = SourceSwitch::new(16);
    switch.start_replay(ReplayProducer::new(points(100), ReplaySettings::default().to_start()));
    assert!(matches!(rx.recv().await, Some(SourceEvent::Reset(_))));

    switch.start_replay(ReplayProducer::new(points(3), ReplaySettings::default()));
    // 旧回放的 Point 可能已在通道中，跳过直到新回放的 Reset
    loop {
        match rx.recv().await {
            Some(SourceEvent::Reset(seed)) => {
                assert_eq!(seed.len(), 3);
                break;
            }
            Some(SourceEvent::Point(_)) => continue,
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(rx.recv().await, Some(SourceEvent::Ended(SourceKind::Replay)));

    switch.stop();
    assert_eq!(switch.mode(), None);
}
