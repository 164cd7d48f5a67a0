//! Integration tests for listing-scraper
//!
//! These tests run complete scrapes against wiremock servers standing in for
//! the target sites.

mod pipeline_tests;
mod scrape_tests;
