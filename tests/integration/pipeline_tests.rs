//! Pipeline behavior through the public API

use listing_scraper::pipeline::{coerce_fields, dedup_by_key, validate_records};
use listing_scraper::sites::parser_for;
use listing_scraper::{
    DataPipeline, ListingFilter, NormalizedRecord, PageRequest, PipelineContext, RawRecord, Site,
    WarningKind,
};

fn raw_book(title: &str, price: Option<&str>) -> RawRecord {
    let mut record = RawRecord::new()
        .with("title", title)
        .with("rating", "Five")
        .with("in_stock", "In stock (3 available)")
        .with("category", "poetry");
    record.insert_opt("price", price);
    record
}

#[test]
fn test_batch_of_five_with_one_invalid() {
    let batch = vec![
        raw_book("Olio", Some("£23.88")),
        raw_book("Shakespeare's Sonnets", Some("£20.66")),
        raw_book("The Black Maria", None),
        raw_book("Set Me Free", Some("£17.46")),
        raw_book("Starving Hearts", Some("£13.99")),
    ];

    let mut ctx = PipelineContext::new(Site::Books, ListingFilter::Category("poetry_23".into()), None);
    let records = DataPipeline::standard().process(batch, &mut ctx);

    assert_eq!(records.len(), 4);
    assert_eq!(ctx.warnings.len(), 1);
    assert_eq!(ctx.warnings[0].kind, WarningKind::RecordValidation);
    assert!(ctx.warnings[0].message.contains("The Black Maria"));
}

#[test]
fn test_dedup_stage_is_idempotent() {
    let batch: Vec<RawRecord> = ["Olio", "Olio", "Set Me Free", "Olio", "Set Me Free"]
        .iter()
        .map(|title| raw_book(title, Some("£10.00")))
        .collect();

    let mut ctx = PipelineContext::new(Site::Books, ListingFilter::All, None);
    let coerced = coerce_fields(batch, &mut ctx);
    let normalized = validate_records(coerced, &mut ctx);

    let once = dedup_by_key(normalized, &mut ctx);
    let twice = dedup_by_key(once.clone(), &mut ctx);

    assert_eq!(once.len(), 2);
    assert_eq!(once, twice);
}

#[test]
fn test_parser_output_feeds_pipeline() {
    let parser = parser_for(Site::Books);
    let request = PageRequest {
        site: Site::Books,
        filter: ListingFilter::Category("poetry_23".into()),
        page: 1,
    };

    let body = r#"
        <article class="product_pod">
          <p class="star-rating Three"></p>
          <h3><a href="olio_984/index.html" title="Olio">Olio</a></h3>
          <p class="price_color">£23.88</p>
          <p class="instock availability">In stock</p>
        </article>
        <div class="product"></div>
    "#;

    let mut raw = parser.parse(body);
    for record in &mut raw {
        parser.annotate(record, &request);
    }

    let mut ctx = PipelineContext::new(Site::Books, request.filter.clone(), None);
    let records = DataPipeline::standard().process(raw, &mut ctx);

    // The empty product block has no title and is dropped by validation
    assert_eq!(records.len(), 1);
    assert_eq!(ctx.warnings.len(), 1);
    match &records[0] {
        NormalizedRecord::Book(book) => {
            assert_eq!(book.title, "Olio");
            assert_eq!(book.rating, Some(3));
            assert_eq!(book.category, "poetry");
            assert_eq!(book.url.as_deref(), Some("olio_984/index.html"));
        }
        other => panic!("expected a book, got {:?}", other),
    }
}
