mod support;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use market_dashboard_wasm::domain::errors::AppError;
use market_dashboard_wasm::domain::market::Symbol;
use market_dashboard_wasm::infrastructure::http::ApiResponse;
use market_dashboard_wasm::infrastructure::ui::Region;
use support::*;

#[test]
fn late_analysis_for_previous_symbol_is_discarded() {
    let transport = GatedTransport::new();
    let view = RecordingView::new();
    let controller = controller(transport.clone(), view.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    for symbol in ["ETH/USDT", "SOL/USDT"] {
        let controller = controller.clone();
        spawner
            .spawn_local(async move { controller.select_symbol(Symbol::from(symbol)).await })
            .unwrap();
        pool.run_until_stalled();
    }
    assert_eq!(
        transport.pending_paths(),
        vec![
            "/api/analyze?symbol=ETH/USDT&timeframe=1d",
            "/api/analyze?symbol=SOL/USDT&timeframe=1d"
        ]
    );

    // newer answer lands first, then the stale one
    transport.answer(1, Ok(ApiResponse::new(200, r#"{"symbol":"SOL/USDT"}"#)));
    pool.run_until_stalled();
    transport.answer(0, Ok(ApiResponse::new(200, r#"{"symbol":"ETH/USDT"}"#)));
    pool.run_until_stalled();

    let renders = view.renders();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].0, Region::Analysis);
    assert!(renders[0].1.contains("SOL/USDT"));
    assert!(!renders[0].1.contains("ETH/USDT"));
}

#[test]
fn stale_failure_does_not_notify() {
    let transport = GatedTransport::new();
    let view = RecordingView::new();
    let controller = controller(transport.clone(), view.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    for _ in 0..2 {
        let controller = controller.clone();
        spawner.spawn_local(async move { controller.load_realtime_data().await }).unwrap();
        pool.run_until_stalled();
    }

    transport.answer(0, Err(AppError::Network("timeout".into())));
    pool.run_until_stalled();
    assert!(view.notifications().is_empty());

    transport.answer(0, Ok(ApiResponse::new(200, r#"{"price":1.0}"#)));
    pool.run_until_stalled();
    assert_eq!(view.rendered_regions(), vec![Region::PriceCards]);
    assert!(view.notifications().is_empty());
}
