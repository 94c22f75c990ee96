use pricewatch_browser::{BrowserEngine, PageActions};
use pricewatch_core::BrowserConfig;
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_engine_launch() {
    let engine = BrowserEngine::launch(&BrowserConfig::default()).await;
    assert!(engine.is_ok(), "Failed to launch browser engine");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_navigation_and_content() {
    let engine = BrowserEngine::launch(&BrowserConfig::default())
        .await
        .unwrap();
    let session = engine.new_session().await.unwrap();

    session.navigate("https://example.com").await.unwrap();
    session
        .wait_for_selector("h1", Duration::from_secs(5))
        .await
        .unwrap();

    let html = session.content().await.unwrap();
    assert!(html.contains("Example Domain"));

    engine.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_sessions_are_independent_tabs() {
    let engine = BrowserEngine::launch(&BrowserConfig::default())
        .await
        .unwrap();
    let first = engine.new_session().await.unwrap();
    let second = engine.new_session().await.unwrap();

    first.navigate("https://example.com").await.unwrap();
    assert!(!second.element_exists("h1").await.unwrap());

    engine.close().await.unwrap();
}
