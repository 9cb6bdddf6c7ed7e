//! Full pipeline run against a fixture provider: no network, a JSON deck
//! template on disk, and `cp` standing in for the PDF converter.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tickerdeck::config::Config;
use tickerdeck::external::market_data::{MarketDataError, MarketDataProvider};
use tickerdeck::models::calendar::CalendarEvent;
use tickerdeck::models::company::CompanyProfile;
use tickerdeck::models::deck::Deck;
use tickerdeck::models::esg::EsgSummary;
use tickerdeck::models::forecast::AnalystForecast;
use tickerdeck::models::fundamentals::FinancialTable;
use tickerdeck::models::news::NewsItem;
use tickerdeck::models::price_point::{PricePoint, PriceSeries};
use tickerdeck::services::report_service;

struct FixtureProvider;

#[async_trait]
impl MarketDataProvider for FixtureProvider {
    async fn fetch_company_profile(&self, _: &str) -> Result<CompanyProfile, MarketDataError> {
        Ok(CompanyProfile {
            fields: BTreeMap::from([
                ("shortName".to_string(), json!("ACME Corp")),
                ("sector".to_string(), json!("Industrials")),
                ("previousClose".to_string(), json!(100.0)),
                ("marketCap".to_string(), json!(55_000)),
            ]),
            description: "ACME makes everything, worldwide.".to_string(),
        })
    }

    async fn fetch_financials(&self, _: &str) -> Result<FinancialTable, MarketDataError> {
        let mut table = FinancialTable::new(4);
        table.push_row(
            "Total Revenue",
            vec![Some(12_345_000.0), Some(11_000_000.0), Some(10_000_000.0), None],
        );
        table.push_row(
            "EBITDA",
            vec![Some(5_000_000.0), Some(4_000_000.0), Some(3_000_000.0), Some(2_000_000.0)],
        );
        table.push_row(
            "EBIT",
            vec![Some(3_300_000.0), Some(2_200_000.0), Some(1_100_000.0), None],
        );
        table.push_row(
            "Diluted EPS",
            vec![None, Some(3.14159), Some(2.5), Some(1.567)],
        );
        table.push_row(
            "Net Debt",
            vec![Some(9_000_000.0), Some(10_000_000.0), Some(8_000_000.0), None],
        );
        Ok(table)
    }

    async fn fetch_price_history(&self, _: &str) -> Result<PriceSeries, MarketDataError> {
        // 12 calendar years of steady 10% growth, two observations per year.
        let points = (0..12)
            .flat_map(|i| {
                let close = 100.0 * 1.1_f64.powi(i);
                [
                    PricePoint {
                        date: NaiveDate::from_ymd_opt(2013 + i, 6, 15).unwrap(),
                        close: close * 0.97,
                    },
                    PricePoint {
                        date: NaiveDate::from_ymd_opt(2013 + i, 12, 30).unwrap(),
                        close,
                    },
                ]
            })
            .collect();
        Ok(PriceSeries::new(points))
    }

    async fn fetch_esg(&self, _: &str) -> Result<EsgSummary, MarketDataError> {
        Ok(EsgSummary {
            fields: BTreeMap::from([
                ("totalEsg".to_string(), json!(21.4)),
                ("ratingMonth".to_string(), json!(3)),
                ("ratingYear".to_string(), json!(2024)),
                ("highestControversy".to_string(), json!(2.0)),
                (
                    "relatedControversy".to_string(),
                    json!(["Customer Incidents", "Social Incidents"]),
                ),
            ]),
        })
    }

    async fn fetch_news(&self, _: &str) -> Result<Vec<NewsItem>, MarketDataError> {
        let mut items: Vec<NewsItem> = (0..11u32)
            .map(|i| NewsItem {
                title: format!("headline {i}"),
                published_at: Some(Utc.with_ymd_and_hms(2025, 3, i + 1, 9, 0, 0).unwrap()),
            })
            .collect();
        items.push(NewsItem {
            title: "undated headline".to_string(),
            published_at: None,
        });
        Ok(items)
    }

    async fn fetch_calendar(&self, _: &str) -> Result<Vec<CalendarEvent>, MarketDataError> {
        Ok(vec![
            CalendarEvent {
                name: "Earnings Date".to_string(),
                dates: vec![
                    NaiveDate::from_ymd_opt(2025, 7, 24).unwrap(),
                    NaiveDate::from_ymd_opt(2025, 7, 28).unwrap(),
                ],
            },
            CalendarEvent {
                name: "Ex-Dividend Date".to_string(),
                dates: vec![NaiveDate::from_ymd_opt(2025, 4, 22).unwrap()],
            },
            CalendarEvent {
                name: "Dividend Date".to_string(),
                dates: vec![NaiveDate::from_ymd_opt(2025, 4, 28).unwrap()],
            },
            CalendarEvent {
                name: "Extra Event".to_string(),
                dates: vec![NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()],
            },
        ])
    }

    async fn fetch_forecasts(&self, _: &str) -> Result<AnalystForecast, MarketDataError> {
        Ok(AnalystForecast {
            target_mean_price: Some(120.0),
            target_low_price: Some(90.0),
            target_high_price: Some(150.0),
            recommendation_mean: Some(2.1),
            recommendation_key: Some("buy".to_string()),
        })
    }
}

fn write_template(path: &PathBuf) {
    let template = json!({
        "slides": [
            {
                "shapes": [
                    { "text_frame": { "text": "shortName" } },
                    { "text_frame": { "text": "Overall: overall | 5Y: 5y | 3Y: 3y" } },
                    { "text_frame": { "text": "description" } },
                    { "table": { "cells": [
                        ["", "N", "N-1", "N-2"],
                        ["Revenue", "", "", ""],
                        ["EBITDA", "", "", ""],
                        ["EBIT", "", "", ""],
                        ["Net Debt / EBITDA", "", "", ""],
                        ["Diluted EPS", "", "", ""]
                    ] } }
                ]
            },
            {
                "shapes": [
                    { "text_frame": { "text": "total-esg" } },
                    { "text_frame": { "text": "month" } },
                    { "text_frame": { "text": "year" } },
                    { "text_frame": { "text": "level_contro" } },
                    { "text_frame": { "text": "related_contro" } },
                    { "text_frame": { "text": "news" } }
                ]
            },
            {
                "shapes": [
                    { "text_frame": { "text": "price_consensus" } },
                    { "text_frame": { "text": "reco_key" } },
                    { "text_frame": { "text": "upside_downside" } },
                    { "text_frame": { "text": "next_event1" } },
                    { "text_frame": { "text": "date_next_event1" } },
                    { "text_frame": { "text": "next_event2" } },
                    { "text_frame": { "text": "date_next_event2" } },
                    { "text_frame": { "text": "next_event3" } },
                    { "text_frame": { "text": "date_next_event3" } }
                ]
            }
        ]
    });
    fs::write(path, serde_json::to_string_pretty(&template).unwrap()).unwrap();
}

fn test_config(dir: &std::path::Path) -> Config {
    Config {
        template_path: dir.join("template.json"),
        output_dir: dir.to_path_buf(),
        output_deck: "{ticker}_report.json".to_string(),
        output_pdf: "{ticker}_report.pdf".to_string(),
        convert_cmd: "cp {input} {output}".to_string(),
        open_pdf: false,
        send_email: false,
        smtp_server: String::new(),
        smtp_port: 465,
        smtp_user: String::new(),
        smtp_password: String::new(),
        email_recipient: String::new(),
        email_subject: "Equity report {ticker}".to_string(),
        email_body: "Report for {ticker}.".to_string(),
    }
}

#[tokio::test]
async fn pipeline_produces_a_filled_deck_and_pdf() {
    let dir = tempfile::tempdir().unwrap();
    write_template(&dir.path().join("template.json"));
    let cfg = test_config(dir.path());

    let pdf = report_service::run_report(&cfg, &FixtureProvider, "ACME")
        .await
        .expect("pipeline should succeed");
    assert!(pdf.exists(), "converter output missing");

    let deck = Deck::load(&dir.path().join("ACME_report.json")).unwrap();

    // Slide 0: short name styled, ratios substituted inline, table filled.
    let title = deck.slides[0].shapes[0].text_frame.as_ref().unwrap();
    assert_eq!(title.text, "ACME Corp");
    assert_eq!(title.color.as_deref(), Some("FFFFFF"));

    let ratios = &deck.slides[0].shapes[1].text_frame.as_ref().unwrap().text;
    assert_eq!(ratios, "Overall: 10.00% | 5Y: 10.00% | 3Y: 10.00%");

    let table = deck.slides[0].shapes[3].table.as_ref().unwrap();
    assert_eq!(table.cells[1][1], "12,345"); // Revenue N
    assert_eq!(table.cells[1][3], "10,000"); // Revenue N-2
    assert_eq!(table.cells[2][1], "4,000"); // EBITDA N-1
    assert_eq!(table.cells[3][3], "N/A"); // EBIT N-3
    assert_eq!(table.cells[4][1], "2.5x"); // Net Debt / EBITDA N-1
    assert_eq!(table.cells[5][1], "3.14"); // Diluted EPS N-1

    // Chart picture appended to slide 0.
    let picture = deck.slides[0]
        .shapes
        .iter()
        .find_map(|s| s.picture.as_ref())
        .expect("chart picture should be embedded");
    assert!(picture.path.ends_with("ACME_chart.png"));

    // Slide 1: ESG fields and a news paragraph per item, capped at nine.
    assert_eq!(deck.slides[1].shapes[0].text_frame.as_ref().unwrap().text, "21.4");
    assert_eq!(
        deck.slides[1].shapes[4].text_frame.as_ref().unwrap().text,
        "Customer Incidents\nSocial Incidents"
    );
    let news = &deck.slides[1].shapes[5].text_frame.as_ref().unwrap().text;
    let lines: Vec<&str> = news.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "2025-03-01 - headline 0");

    // Slide 2: consensus, recommendation, upside, calendar entries.
    assert_eq!(
        deck.slides[2].shapes[0].text_frame.as_ref().unwrap().text,
        "low 90.0, mean 120.0, high 150.0"
    );
    assert_eq!(deck.slides[2].shapes[1].text_frame.as_ref().unwrap().text, "buy");
    assert_eq!(deck.slides[2].shapes[2].text_frame.as_ref().unwrap().text, "20.0%");
    assert_eq!(
        deck.slides[2].shapes[3].text_frame.as_ref().unwrap().text,
        "Earnings Date"
    );
    assert_eq!(
        deck.slides[2].shapes[4].text_frame.as_ref().unwrap().text,
        "2025-07-24"
    );
    // Only three calendar slots exist; the fourth fixture event is dropped.
    assert_eq!(
        deck.slides[2].shapes[7].text_frame.as_ref().unwrap().text,
        "Dividend Date"
    );
}

#[tokio::test]
async fn pipeline_fails_fast_on_a_template_missing_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let template = json!({
        "slides": [
            { "shapes": [ { "text_frame": { "text": "shortName" } } ] },
            { "shapes": [] },
            { "shapes": [] }
        ]
    });
    fs::write(
        dir.path().join("template.json"),
        serde_json::to_string(&template).unwrap(),
    )
    .unwrap();
    let cfg = test_config(dir.path());

    let err = report_service::run_report(&cfg, &FixtureProvider, "ACME")
        .await
        .expect_err("validation should reject the template");
    let message = err.to_string();
    assert!(message.contains("missing required placeholders"), "got: {message}");
    assert!(message.contains("description"), "got: {message}");
}
