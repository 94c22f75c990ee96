use pricewatch_core::{Decimal, SourceId};
use pricewatch_source::{
    normalize_records, ListingParser, SearchMethod, SourceLoader, SourceRegistry,
};
use std::path::PathBuf;

fn bundled_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join(pricewatch_source::loader::DEFAULT_DIR_NAME)
}

#[test]
fn test_every_bundled_definition_is_valid() {
    let loader = SourceLoader::new(bundled_dir()).expect("bundled definitions directory");
    let definitions = loader.load_all().expect("load bundled definitions");

    assert_eq!(definitions.len(), 10);
    for definition in &definitions {
        definition
            .validate()
            .unwrap_or_else(|e| panic!("{} is invalid: {e}", definition.id()));
        assert_eq!(definition.source.locale.tag(), "pt_BR");
    }
}

#[test]
fn test_bundled_registry_lookups() {
    let loader = SourceLoader::new(bundled_dir()).expect("bundled definitions directory");
    let registry = SourceRegistry::load_from(&loader).expect("load registry");

    let amazon = registry
        .get(&SourceId::new("amazon-br").expect("valid source ID"))
        .expect("amazon definition");
    assert_eq!(amazon.name(), "Amazon");

    let ponto_frio = registry
        .get(&SourceId::new("ponto-frio").expect("valid source ID"))
        .expect("ponto frio definition");
    assert!(matches!(
        ponto_frio.search,
        SearchMethod::UrlTemplate { .. }
    ));

    let google = registry
        .get(&SourceId::new("google-shopping").expect("valid source ID"))
        .expect("google shopping definition");
    assert!(google.listing.seller.is_some());
}

#[test]
fn test_amazon_split_price_markup_normalizes() {
    let loader = SourceLoader::new(bundled_dir()).expect("bundled definitions directory");
    let registry = SourceRegistry::load_from(&loader).expect("load registry");
    let amazon = registry
        .get(&SourceId::new("amazon-br").expect("valid source ID"))
        .expect("amazon definition");

    let html = r#"
        <div class="s-main-slot">
            <div class="celwidget">
                <h2><span class="a-size-medium">Smart TV 55" 4K UHD</span></h2>
                <span class="a-price">
                    <span class="a-offscreen">R$&nbsp;1.299,00</span>
                    <span aria-hidden="true"><span class="a-price-symbol">R$</span><span class="a-price-whole">1.299<span class="a-price-decimal">,</span></span><span class="a-price-fraction">00</span></span>
                </span>
            </div>
        </div>
    "#;

    let parser = ListingParser::new(&amazon.listing, amazon.name()).expect("compile selectors");
    let raw = parser.parse(html).expect("parse amazon results");
    assert_eq!(raw.len(), 1);

    let records = normalize_records(
        amazon.name(),
        &amazon.source.locale,
        amazon.source.price_replacement.as_ref(),
        raw,
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price(), "1299.00".parse::<Decimal>().unwrap());
    assert_eq!(records[0].source_name(), "Amazon");
}
