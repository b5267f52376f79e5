use kasen_core::indicator::entity::{DerivedSeries, IndicatorKind, IndicatorSpec};
use kasen_core::market::entity::PricePoint;
use kasen_indicator::compute;

fn series(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .zip(1_i64..)
        .map(|(c, t)| PricePoint::new(t * 60, *c, c + 0.5, c - 0.5, *c))
        .collect()
}

fn wave(n: i32) -> Vec<f64> {
    (0..n).map(|i| 100.0 + (f64::from(i) * 0.7).sin() * 5.0 + f64::from(i) * 0.1).collect()
}

#[test]
fn sma_of_constant_is_constant() -> anyhow::Result<()> {
    let points = series(&[7.5; 30]);
    let spec = IndicatorSpec::new("sma", IndicatorKind::Sma).with_length(10);
    let DerivedSeries::Line(values) = compute(&spec, &points)? else {
        anyhow::bail!("sma must produce a single line");
    };
    assert!(values[..9].iter().all(Option::is_none));
    for v in &values[9..] {
        assert_eq!(*v, Some(7.5));
    }
    Ok(())
}

#[test]
fn ema_converges_to_constant_input() -> anyhow::Result<()> {
    let mut closes = vec![10.0; 5];
    closes.extend(vec![20.0; 200]);
    let spec = IndicatorSpec::new("ema", IndicatorKind::Ema).with_length(10);
    let DerivedSeries::Line(values) = compute(&spec, &series(&closes))? else {
        anyhow::bail!("ema must produce a single line");
    };
    assert!(values.iter().all(Option::is_some));
    let last = values.last().copied().flatten().unwrap_or(f64::NAN);
    assert!((last - 20.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn rsi_stays_within_bounds() -> anyhow::Result<()> {
    let spec = IndicatorSpec::new("rsi", IndicatorKind::Rsi);
    let DerivedSeries::Line(values) = compute(&spec, &series(&wave(120)))? else {
        anyhow::bail!("rsi must produce a single line");
    };
    assert!(values[..=14].iter().all(Option::is_none));
    for v in values.iter().flatten() {
        assert!((0.0..=100.0).contains(v));
    }
    Ok(())
}

#[test]
fn bollinger_bands_are_ordered() -> anyhow::Result<()> {
    let spec = IndicatorSpec::new("bb", IndicatorKind::Bollinger);
    let DerivedSeries::Bands {
        basis,
        upper,
        lower,
    } = compute(&spec, &series(&wave(80)))?
    else {
        anyhow::bail!("bollinger must produce bands");
    };
    for i in 19..80 {
        let (Some(b), Some(u), Some(l)) = (basis[i], upper[i], lower[i]) else {
            anyhow::bail!("band undefined at {}", i);
        };
        assert!(l <= b && b <= u);
    }
    Ok(())
}

#[test]
fn macd_histogram_is_macd_minus_signal() -> anyhow::Result<()> {
    let spec = IndicatorSpec::new("macd", IndicatorKind::Macd);
    let DerivedSeries::Macd {
        macd,
        signal,
        histogram,
    } = compute(&spec, &series(&wave(100)))?
    else {
        anyhow::bail!("macd must produce three lines");
    };
    for i in 0..100 {
        if let (Some(m), Some(s), Some(h)) = (macd[i], signal[i], histogram[i]) {
            assert!((h - (m - s)).abs() < 1e-12);
        }
    }
    Ok(())
}

#[test]
fn bb_alias_decodes_to_bollinger() -> anyhow::Result<()> {
    let spec: IndicatorSpec = serde_json::from_str(r#"{"id":"x","type":"bb","length":5}"#)?;
    assert_eq!(spec.kind, IndicatorKind::Bollinger);
    assert_eq!(spec.length_or_default(), 5);
    Ok(())
}
