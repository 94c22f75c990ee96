use pricewatch_core::{Decimal, LocaleSpec, MatchMode, PriceReplacement, RawRecord};
use pricewatch_scanner::{FilterQuery, ScanOrchestrator, SourceStatus};
use pricewatch_source::{AdapterError, SourceAdapter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What a fake source does when searched.
enum Behavior {
    Listings(Vec<RawRecord>),
    Fail,
    Panic,
    Hang,
}

struct FakeSource {
    name: String,
    locale: LocaleSpec,
    replacement: Option<PriceReplacement>,
    delay: Duration,
    behavior: Behavior,
    searches: AtomicUsize,
    gauge: Option<Arc<InFlight>>,
}

/// Sources currently inside `search`, and the most seen at once.
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeSource {
    fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            locale: LocaleSpec::pt_br(),
            replacement: None,
            delay: Duration::ZERO,
            behavior,
            searches: AtomicUsize::new(0),
            gauge: None,
        }
    }

    fn listing(name: &str, listings: &[(&str, &str)]) -> Self {
        Self::new(
            name,
            Behavior::Listings(
                listings
                    .iter()
                    .map(|(description, price)| RawRecord::new(*description, *price))
                    .collect(),
            ),
        )
    }

    fn with_locale(mut self, locale: LocaleSpec) -> Self {
        self.locale = locale;
        self
    }

    fn with_replacement(mut self, from: &str, to: &str) -> Self {
        self.replacement = Some(PriceReplacement::new(from, to));
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn with_gauge(mut self, gauge: &Arc<InFlight>) -> Self {
        self.gauge = Some(Arc::clone(gauge));
        self
    }

    fn shared(self) -> Arc<dyn SourceAdapter> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl SourceAdapter for FakeSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn locale(&self) -> &LocaleSpec {
        &self.locale
    }

    fn price_replacement(&self) -> Option<&PriceReplacement> {
        self.replacement.as_ref()
    }

    async fn search(&self, _query: &str) -> Result<(), AdapterError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if let Some(gauge) = &self.gauge {
            let now = gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
            gauge.peak.fetch_max(now, Ordering::SeqCst);
        }
        tokio::time::sleep(self.delay).await;
        if let Some(gauge) = &self.gauge {
            gauge.current.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn extract(&self) -> Result<Vec<RawRecord>, AdapterError> {
        match &self.behavior {
            Behavior::Listings(records) => Ok(records.clone()),
            Behavior::Fail => Err(AdapterError::SelectorsOutdated {
                source_name: self.name.clone(),
                reason: "results container not found".to_string(),
            }),
            Behavior::Panic => panic!("adapter bug"),
            Behavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

fn price(text: &str) -> Decimal {
    text.parse().expect("valid decimal")
}

fn rows(result: &pricewatch_scanner::ResultSet) -> Vec<(String, Decimal, String)> {
    result
        .records()
        .iter()
        .map(|r| {
            (
                r.description().to_string(),
                r.price(),
                r.source_name().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_equal_prices_keep_adapter_order() {
    // A finishes last but is still ranked first among equal prices
    let a = FakeSource::listing(
        "A",
        &[("Smart TV 55 4K", "R$ 100,00"), ("Smart TV 55 LED", "R$ 50,00")],
    )
    .with_delay(Duration::from_millis(50));
    let b = FakeSource::listing("B", &[("Smart TV 55 QLED", "R$ 50,00")]);

    let orchestrator = ScanOrchestrator::new(vec![a.shared(), b.shared()]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");
    let result = orchestrator.scan(&query).await;

    let prices: Vec<(Decimal, String)> = rows(&result)
        .into_iter()
        .map(|(_, price, source)| (price, source))
        .collect();
    assert_eq!(
        prices,
        vec![
            (price("50.00"), "A".to_string()),
            (price("50.00"), "B".to_string()),
            (price("100.00"), "A".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_one_failing_source_does_not_abort_scan() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::listing("A", &[("Smart TV 55 4K", "R$ 2.999,90")]).shared(),
        FakeSource::new("B", Behavior::Fail).shared(),
        FakeSource::listing("C", &[("Smart TV 55 OLED", "R$ 4.500,00")]).shared(),
    ]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert_eq!(result.len(), 2);
    assert!(!result.all_sources_failed());
    assert!(matches!(
        result.sources()[1].status,
        SourceStatus::Failed { .. }
    ));
    assert_eq!(result.failed_sources().count(), 1);
}

#[tokio::test]
async fn test_panicking_source_is_reported_as_failed() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::new("Broken", Behavior::Panic).shared(),
        FakeSource::listing("Good", &[("Smart TV 55 4K", "R$ 1.999,00")]).shared(),
    ]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert_eq!(result.len(), 1);
    match &result.sources()[0].status {
        SourceStatus::Failed { error } => assert!(error.contains("panicked")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_source_timeout() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::new("Slow", Behavior::Hang).shared(),
        FakeSource::listing("Fast", &[("Smart TV 55 4K", "R$ 1.999,00")]).shared(),
    ])
    .with_source_timeout(Duration::from_millis(50));
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert_eq!(result.len(), 1);
    match &result.sources()[0].status {
        SourceStatus::Failed { error } => assert!(error.contains("did not respond")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_every_source_failing_is_empty_not_error() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::new("A", Behavior::Fail).shared(),
        FakeSource::new("B", Behavior::Fail).shared(),
    ]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert!(result.is_empty());
    assert!(result.all_sources_failed());
}

#[tokio::test]
async fn test_nothing_relevant_is_not_all_failed() {
    let orchestrator = ScanOrchestrator::new(vec![FakeSource::listing(
        "A",
        &[("Geladeira Frost Free 400L", "R$ 3.000,00")],
    )
    .shared()]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert!(result.is_empty());
    assert!(!result.all_sources_failed());
    assert_eq!(result.candidates(), 1);
}

#[tokio::test]
async fn test_cancellation_keeps_finished_sources() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::listing("Fast", &[("Smart TV 55 4K", "R$ 1.999,00")]).shared(),
        FakeSource::new("Stuck", Behavior::Hang).shared(),
    ]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let result = orchestrator.scan_with_cancel(&query, cancel).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.records()[0].source_name(), "Fast");
    assert_eq!(result.sources()[1].status, SourceStatus::Cancelled);
}

#[tokio::test]
async fn test_scan_deadline_keeps_finished_sources() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::new("Stuck", Behavior::Hang).shared(),
        FakeSource::listing("Fast", &[("Smart TV 55 4K", "R$ 1.999,00")]).shared(),
    ])
    .with_scan_timeout(Some(Duration::from_millis(100)));
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.sources()[0].status, SourceStatus::Cancelled);
    assert!(result.sources()[1].succeeded());
}

#[tokio::test]
async fn test_sources_with_different_locales() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::listing("Loja BR", &[("Smart TV 55 4K", "R$ 1.234,56")]).shared(),
        FakeSource::listing("Shop US", &[("Smart TV 55 4K", "$1,234.50")])
            .with_locale(LocaleSpec::en_us())
            .shared(),
        FakeSource::listing("Loja Centavos", &[("Smart TV 55 4K", "R$ 1.234\n99")])
            .with_replacement("\n", ",")
            .shared(),
    ]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    let prices: Vec<Decimal> = result.records().iter().map(|r| r.price()).collect();
    assert_eq!(prices, vec![price("1234.50"), price("1234.56"), price("1234.99")]);
}

#[tokio::test]
async fn test_unparsable_prices_are_dropped() {
    let orchestrator = ScanOrchestrator::new(vec![FakeSource::listing(
        "A",
        &[("Smart TV 55 4K", "Indisponível"), ("Smart TV 55 LED", "R$ 999,00")],
    )
    .shared()]);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    assert_eq!(result.len(), 1);
    assert_eq!(result.candidates(), 1);
    assert_eq!(
        result.sources()[0].status,
        SourceStatus::Completed { records: 1 }
    );
}

#[tokio::test]
async fn test_filter_terms_applied_across_sources() {
    let orchestrator = ScanOrchestrator::new(vec![
        FakeSource::listing(
            "A",
            &[("Smart TV 55 4K OLED", "R$ 5.000,00"), ("Suporte Smart TV 55", "R$ 90,00")],
        )
        .shared(),
        FakeSource::listing("B", &[("Smart TV 55 4K", "R$ 2.500,00")]).shared(),
    ]);

    let all = orchestrator
        .scan_terms(
            "smart tv 55",
            &["suporte".to_string()],
            &["4k".to_string(), "oled".to_string()],
            MatchMode::All,
        )
        .await
        .expect("valid terms");
    assert_eq!(all.len(), 1);
    assert_eq!(all.records()[0].source_name(), "A");

    let any = orchestrator
        .scan_terms(
            "smart tv 55",
            &["suporte".to_string()],
            &["4k".to_string(), "oled".to_string()],
            MatchMode::Any,
        )
        .await
        .expect("valid terms");
    let sources: Vec<&str> = any.records().iter().map(|r| r.source_name()).collect();
    assert_eq!(sources, vec!["B", "A"]);
}

#[tokio::test]
async fn test_bad_terms_fail_before_any_source_runs() {
    let source = Arc::new(FakeSource::listing("A", &[("Smart TV 55", "R$ 1,00")]));
    let orchestrator = ScanOrchestrator::new(vec![source.clone() as Arc<dyn SourceAdapter>]);

    let result = orchestrator.scan_terms("  ", &[], &[], MatchMode::All).await;

    assert!(result.is_err());
    assert_eq!(source.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let gauge = Arc::new(InFlight::default());
    let sources: Vec<Arc<dyn SourceAdapter>> = (0..5)
        .map(|i| {
            FakeSource::listing(&format!("S{i}"), &[("Smart TV 55 4K", "R$ 10,00")])
                .with_delay(Duration::from_millis(20))
                .with_gauge(&gauge)
                .shared()
        })
        .collect();

    let orchestrator = ScanOrchestrator::new(sources).with_max_concurrent_sources(2);
    let query = FilterQuery::target_only("smart tv 55").expect("valid query");

    let result = orchestrator.scan(&query).await;

    let names: Vec<String> = rows(&result).into_iter().map(|(_, _, s)| s).collect();
    assert_eq!(names, vec!["S0", "S1", "S2", "S3", "S4"]);
    assert_eq!(gauge.peak.load(Ordering::SeqCst), 2);
}
