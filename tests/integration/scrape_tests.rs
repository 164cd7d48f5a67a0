//! End-to-end scrape runs
//!
//! Each test points the site base URLs at a mock server and checks the
//! records, warnings and request log of a full run.

use listing_scraper::config::{Config, ScrapingConfig, SitesConfig};
use listing_scraper::{
    scrape, ConfigError, ListingFilter, NormalizedRecord, RunStatus, ScrapeRequest, Site,
    WarningKind,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing every site at the mock server
fn create_test_config(server: &MockServer, max_retries: u32) -> Config {
    Config {
        scraping: ScrapingConfig {
            request_timeout: 5,
            request_delay: 0.0,
            max_retries,
            ..ScrapingConfig::default()
        },
        sites: SitesConfig {
            books_url: format!("{}/", server.uri()),
            quotes_url: format!("{}/", server.uri()),
            oscars_url: format!("{}/ajax/", server.uri()),
        },
        ..Config::default()
    }
}

/// Renders a catalogue page with one book per title
///
/// A `None` price leaves the price element out entirely.
fn books_page(books: &[(String, Option<&str>)], next: bool) -> String {
    let articles: String = books
        .iter()
        .map(|(title, price)| {
            let price = price
                .map(|p| format!(r#"<p class="price_color">{}</p>"#, p))
                .unwrap_or_default();
            format!(
                r#"<li><article class="product_pod">
                    <p class="star-rating Two"></p>
                    <h3><a href="../../{slug}/index.html" title="{title}">{title}</a></h3>
                    <div class="product_price">{price}
                      <p class="instock availability"><i class="icon-ok"></i> In stock</p>
                    </div>
                  </article></li>"#,
                slug = title.to_lowercase().replace(' ', "-"),
                title = title,
                price = price
            )
        })
        .collect();

    let pager = if next {
        r#"<ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>"#
    } else {
        r#"<ul class="pager"><li class="previous"><a href="index.html">previous</a></li></ul>"#
    };

    format!(
        r#"<html><body><ol class="row">{}</ol>{}</body></html>"#,
        articles, pager
    )
}

/// Renders a quotes page; tags are given comma-separated
fn quotes_page(quotes: &[(&str, &str, &str)], next: bool) -> String {
    let blocks: String = quotes
        .iter()
        .map(|(text, author, tags)| {
            let tags: String = tags
                .split(',')
                .filter(|t| !t.is_empty())
                .map(|t| format!(r#"<a class="tag" href="/tag/{t}/page/1/">{t}</a>"#, t = t))
                .collect();
            format!(
                r#"<div class="quote"><span class="text">“{}”</span>
                   <span>by <small class="author">{}</small></span>
                   <div class="tags">Tags: {}</div></div>"#,
                text, author, tags
            )
        })
        .collect();
    let pager = if next {
        r##"<nav><ul class="pager"><li class="next"><a href="#">Next</a></li></ul></nav>"##
    } else {
        ""
    };
    format!("<html><body>{}{}</body></html>", blocks, pager)
}

fn titles(records: &[NormalizedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| match record {
            NormalizedRecord::Book(book) => book.title.clone(),
            NormalizedRecord::Quote(quote) => quote.text.clone(),
            NormalizedRecord::OscarFilm(film) => film.title.clone(),
        })
        .collect()
}

#[tokio::test]
async fn test_mystery_two_pages_end_to_end() {
    let mock_server = MockServer::start().await;

    let page_one: Vec<(String, Option<&str>)> = (1..=20)
        .map(|i| (format!("Mystery Book {}", i), Some("£12.50")))
        .collect();
    let page_two: Vec<(String, Option<&str>)> = (21..=35)
        .map(|i| {
            let price = if i == 28 { None } else { Some("£9.99") };
            (format!("Mystery Book {}", i), price)
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/catalogue/category/books/mystery_3/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&page_one, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/catalogue/category/books/mystery_3/page-2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&page_two, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Must never be requested
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books/mystery_3/page-3.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&[], false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 3);
    let request =
        ScrapeRequest::new(Site::Books, ListingFilter::Category("mystery".into()), Some(2))
            .expect("valid request");

    let report = scrape(&config, &request).await.expect("scrape should run");

    assert_eq!(report.records.len(), 34);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::RecordValidation);
    assert!(report.warnings[0].message.contains("Mystery Book 28"));
    assert_eq!(report.pages_succeeded, 2);
    assert_eq!(report.pages_failed, 0);
    assert_eq!(report.status(), RunStatus::Partial);

    // First-seen order across pages, minus the dropped record
    let got = titles(&report.records);
    assert_eq!(got.first().map(String::as_str), Some("Mystery Book 1"));
    assert_eq!(got.last().map(String::as_str), Some("Mystery Book 35"));
    assert!(!got.contains(&"Mystery Book 28".to_string()));

    match &report.records[0] {
        NormalizedRecord::Book(book) => {
            assert_eq!(book.price, 12.5);
            assert_eq!(book.price_text, "£12.50");
            assert_eq!(book.rating, Some(2));
            assert!(book.in_stock);
            assert_eq!(book.category, "mystery");
        }
        other => panic!("expected a book, got {:?}", other),
    }

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_unbounded_run_stops_at_failed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[("First", "Ada Lovelace", "science")],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(&[], false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 2);
    let request = ScrapeRequest::new(Site::Quotes, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(titles(&report.records), vec!["First"]);
    assert_eq!(report.pages_succeeded, 1);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::PageFetch);
    assert_eq!(report.warnings[0].page, Some(2));
    assert_eq!(report.status(), RunStatus::Partial);
}

#[tokio::test]
async fn test_bounded_run_continues_past_failed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[("First", "Ada Lovelace", "science")],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[("Third", "Grace Hopper", "computing")],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Beyond the cap
    Mock::given(method("GET"))
        .and(path("/page/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(&[], false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Quotes, ListingFilter::All, Some(3)).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(titles(&report.records), vec!["First", "Third"]);
    assert_eq!(report.pages_succeeded, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.status(), RunStatus::Partial);
}

#[tokio::test]
async fn test_total_failure_is_reported_as_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 3);
    let request = ScrapeRequest::new(Site::Books, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.pages_succeeded, 0);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.status(), RunStatus::Failed);
    assert!(report.warnings[0].message.contains("after 3 attempt(s)"));
}

#[tokio::test]
async fn test_clean_run_is_complete() {
    let mock_server = MockServer::start().await;

    let books: Vec<(String, Option<&str>)> = vec![
        ("Sapiens".to_string(), Some("£54.23")),
        ("The Grand Design".to_string(), Some("£13.76")),
    ];
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books_1/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&books, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Books, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(titles(&report.records), vec!["Sapiens", "The Grand Design"]);
    assert!(report.warnings.is_empty());
    assert_eq!(report.status(), RunStatus::Complete);
    match &report.records[0] {
        NormalizedRecord::Book(book) => assert_eq!(book.category, "books"),
        other => panic!("expected a book, got {:?}", other),
    }
}

#[tokio::test]
async fn test_quotes_by_tag_filters_and_dedups() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/love/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[
                ("It is better to be hated for what you are", "André Gide", "love,life"),
                ("Off-topic quote", "Someone Else", "humor"),
            ],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tag/love/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[
                ("It is better to be hated for what you are", "André Gide", "love,life"),
                ("This life is what you make it", "Marilyn Monroe", "Love"),
            ],
            false,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Quotes, ListingFilter::Tag(" Love ".into()), None)
        .unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(
        titles(&report.records),
        vec![
            "It is better to be hated for what you are",
            "This life is what you make it"
        ]
    );
    assert!(report.warnings.is_empty());
    assert_eq!(report.status(), RunStatus::Complete);
}

#[tokio::test]
async fn test_oscars_walks_every_year() {
    let mock_server = MockServer::start().await;

    for year in 2010..=2015u16 {
        // The 2013 entry omits its year; the ceremony page supplies it
        let year_field = if year == 2013 {
            String::new()
        } else {
            format!(r#""year": {},"#, year)
        };
        let body = format!(
            r#"[{{"title": "Film {y}", {year_field} "awards": 2, "nominations": "7", "best_picture": {won}}}]"#,
            y = year,
            year_field = year_field,
            won = year % 2 == 0
        );

        Mock::given(method("GET"))
            .and(path("/ajax/"))
            .and(query_param("ajax", "true"))
            .and(query_param("year", year.to_string().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Oscars, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(report.records.len(), 6);
    assert_eq!(report.pages_succeeded, 6);
    assert_eq!(report.status(), RunStatus::Complete);

    let years: Vec<u16> = report
        .records
        .iter()
        .filter_map(|record| match record {
            NormalizedRecord::OscarFilm(film) => Some(film.year),
            _ => None,
        })
        .collect();
    assert_eq!(years, vec![2010, 2011, 2012, 2013, 2014, 2015]);

    match &report.records[2] {
        NormalizedRecord::OscarFilm(film) => {
            assert_eq!(film.title, "Film 2012");
            assert_eq!(film.nominations, 7);
            assert!(film.won);
        }
        other => panic!("expected a film, got {:?}", other),
    }
}

#[tokio::test]
async fn test_books_empty_page_mid_run_ends_listing() {
    let mock_server = MockServer::start().await;

    let books: Vec<(String, Option<&str>)> = vec![("Sharp Objects".to_string(), Some("£47.82"))];
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books_1/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&books, true)))
        .expect(1)
        .mount(&mock_server)
        .await;
    // Shows a next marker but no products
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books_1/page-2.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&[], true)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books_1/page-3.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&books, false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Books, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(titles(&report.records), vec!["Sharp Objects"]);
    assert_eq!(report.pages_succeeded, 2);
    assert_eq!(report.status(), RunStatus::Complete);
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_quotes_garbage_page_mid_run_ends_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[("A day without sunshine is like, you know, night", "Steve Martin", "humor")],
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><div class=\"quo</body>".to_string()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(&[], false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Quotes, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.pages_succeeded, 2);
    assert_eq!(report.status(), RunStatus::Complete);
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

/// Mounts one film per ceremony year, with custom bodies for some years
async fn mount_oscar_years(mock_server: &MockServer, overrides: &[(u16, &str)]) {
    for year in 2010..=2015u16 {
        let body = overrides
            .iter()
            .find(|(y, _)| *y == year)
            .map(|(_, body)| body.to_string())
            .unwrap_or_else(|| format!(r#"[{{"title": "Film {}", "year": {}}}]"#, year, year));

        Mock::given(method("GET"))
            .and(path("/ajax/"))
            .and(query_param("year", year.to_string().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(mock_server)
            .await;
    }
}

#[tokio::test]
async fn test_oscars_empty_year_does_not_end_walk() {
    let mock_server = MockServer::start().await;
    mount_oscar_years(&mock_server, &[(2011, "[]")]).await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Oscars, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(report.records.len(), 5);
    assert!(!titles(&report.records).contains(&"Film 2011".to_string()));
    assert_eq!(report.pages_succeeded, 6);
    assert_eq!(report.status(), RunStatus::Complete);
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_oscars_malformed_year_is_warned_and_skipped() {
    let mock_server = MockServer::start().await;
    mount_oscar_years(&mock_server, &[(2012, "<html>Service Unavailable</html>")]).await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Oscars, ListingFilter::All, None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(report.records.len(), 5);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::RecordParse);
    assert_eq!(report.warnings[0].page, Some(3));
    assert_eq!(report.status(), RunStatus::Partial);
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_oscars_single_year() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ajax/"))
        .and(query_param("year", "2014"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"title": "Birdman", "year": 2014, "awards": 4, "nominations": 9, "best_picture": true},
                {"title": "Whiplash", "year": 2014, "awards": 3, "nominations": 5}]"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, 1);
    let request = ScrapeRequest::new(Site::Oscars, ListingFilter::Year(2014), None).unwrap();
    let report = scrape(&config, &request).await.unwrap();

    assert_eq!(titles(&report.records), vec!["Birdman", "Whiplash"]);
    assert_eq!(report.pages_succeeded, 1);
}

#[tokio::test]
async fn test_independent_runs_share_nothing() {
    let books_server = MockServer::start().await;
    let quotes_server = MockServer::start().await;

    let books: Vec<(String, Option<&str>)> = vec![("Dune".to_string(), Some("£5.00"))];
    Mock::given(method("GET"))
        .and(path("/catalogue/category/books/science-fiction_16/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(books_page(&books, false)))
        .expect(1)
        .mount(&books_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(quotes_page(
            &[("Stay hungry", "Steve Jobs", "life")],
            false,
        )))
        .expect(1)
        .mount(&quotes_server)
        .await;

    let books_config = create_test_config(&books_server, 1);
    let quotes_config = create_test_config(&quotes_server, 1);
    let books_request = ScrapeRequest::new(
        Site::Books,
        ListingFilter::Category("Science Fiction".into()),
        Some(1),
    )
    .unwrap();
    let quotes_request = ScrapeRequest::new(Site::Quotes, ListingFilter::All, Some(1)).unwrap();

    let (books_report, quotes_report) = tokio::join!(
        scrape(&books_config, &books_request),
        scrape(&quotes_config, &quotes_request)
    );

    assert_eq!(titles(&books_report.unwrap().records), vec!["Dune"]);
    assert_eq!(titles(&quotes_report.unwrap().records), vec!["Stay hungry"]);
}

#[test]
fn test_invalid_requests_are_rejected_before_fetching() {
    for cap in [0, -1, 51] {
        assert!(matches!(
            ScrapeRequest::new(Site::Books, ListingFilter::All, Some(cap)),
            Err(ConfigError::InvalidPageCap { .. })
        ));
    }

    assert!(matches!(
        ScrapeRequest::new(Site::Oscars, ListingFilter::Year(2020), None),
        Err(ConfigError::InvalidYear { .. })
    ));
    assert!(matches!(
        ScrapeRequest::new(Site::Quotes, ListingFilter::Category("mystery".into()), None),
        Err(ConfigError::Validation(_))
    ));
    assert!(matches!(
        ScrapeRequest::new(Site::Books, ListingFilter::Category("cookery".into()), None),
        Err(ConfigError::UnknownCategory(_))
    ));
}
