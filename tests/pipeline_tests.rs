//! Research pipelines against in-memory catalog and marketplace fakes.

mod support;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use sedori::application::bulk_scan::BulkScanPipeline;
use sedori::application::cross_check::CrossCheckPipeline;
use sedori::application::export_hunt::{ExportHuntPipeline, PROFITABLE};
use sedori::application::gap_search::GapSearchPipeline;
use sedori::application::genre_research::{GenreResearchPipeline, STATUS_NOT_ORDERED};
use sedori::application::keyword_hunt::KeywordHuntPipeline;
use sedori::application::selection::SelectionPipeline;
use sedori::application::NoProgress;
use sedori::domain::fee::FlatFees;
use sedori::domain::{
    Candidate, Evaluator, ExportRow, FeeSchedule, GapRow, Genre, Jan, SelectionCriteria,
    ThresholdMode,
};

use support::{asin, listing, product, FakeCatalog, FakeMarketplace};

/// 10% referral plus 450 yen fulfillment.
fn flat() -> FeeSchedule {
    FeeSchedule::Flat(FlatFees::new(dec!(0.10), dec!(450)))
}

fn jan(raw: &str) -> Jan {
    Jan::parse(raw).expect("test JAN")
}

// --- selection

#[tokio::test]
async fn selection_keeps_profitable_candidates_and_counts_the_rest() {
    let catalog = FakeCatalog::default()
        .with_product(product("B00TEST001", "Good margin", dec!(5000)))
        .with_product(product("B00TEST002", "Thin margin", dec!(5000)))
        .failing_on("B00TEST003");
    let candidates = vec![
        Candidate::new(asin("B00TEST001"), Some(dec!(2000))),
        Candidate::new(asin("B00TEST002"), Some(dec!(4000))),
        Candidate::new(asin("B00TEST003"), Some(dec!(1000))),
        Candidate::new(asin("B00TEST004"), Some(dec!(1000))),
    ];

    let evaluator = Evaluator::new(SelectionCriteria::default(), flat());
    let report = SelectionPipeline::new(&catalog, evaluator)
        .run(&candidates, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.asin.as_str(), "B00TEST001");
    assert_eq!(row.referral_fee, dec!(500));
    assert_eq!(row.fulfillment_fee, dec!(450));
    assert_eq!(row.profit, dec!(2050));
    assert_eq!(row.roi, Some(dec!(1.02)));
    assert_eq!(row.amazon_url, "https://www.amazon.co.jp/dp/B00TEST001");

    assert_eq!(report.stats.examined, 4);
    assert_eq!(report.stats.accepted, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.rejected.get("profit_too_small"), Some(&1));
    assert_eq!(report.stats.rejected.get("not_on_keepa"), Some(&1));
}

// --- cross-check

#[tokio::test]
async fn cross_check_keeps_every_rakuten_hit() {
    let catalog = FakeCatalog::default()
        .with_product(product("B00TEST001", "Logicool G502 X", dec!(6000)))
        .with_product(product("B00TEST002", "Overpriced thing", dec!(1000)))
        .with_product(product("B00TEST003", "Nowhere on Rakuten", dec!(3000)));
    let marketplace = FakeMarketplace::default()
        .with_offer("Logicool G502 X", listing("g502", dec!(3000), dec!(500)))
        .with_offer("Overpriced thing", listing("over", dec!(3000), Decimal::ZERO));

    let asins = vec![asin("B00TEST001"), asin("B00TEST002"), asin("B00TEST003")];
    let report = CrossCheckPipeline::new(&catalog, &marketplace, flat(), 40)
        .run(&asins, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 2);
    let g502 = &report.rows[0];
    assert_eq!(g502.amazon_price, dec!(6000));
    assert_eq!(g502.rakuten_shipping, dec!(500));
    assert_eq!(g502.profit, dec!(1450));
    assert_eq!(g502.roi, Some(dec!(0.41)));
    assert_eq!(g502.shop_name, "test shop");

    assert!(report.rows[1].profit < Decimal::ZERO);
    assert_eq!(report.stats.rejected.get("not_on_rakuten"), Some(&1));
}

// --- bulk scan

#[tokio::test]
async fn bulk_scan_applies_market_gates_only() {
    let mut amazon_owned = product("B00TEST002", "Amazon sells this", dec!(2000));
    amazon_owned.buybox_is_amazon = true;
    let mut unranked = product("B00TEST003", "No rank", dec!(2000));
    unranked.avg_rank_90d = None;

    let catalog = FakeCatalog::default()
        .with_product(product("B00TEST001", "Open market", dec!(2500)))
        .with_product(amazon_owned)
        .with_product(unranked);
    let asins = vec![asin("B00TEST001"), asin("B00TEST002"), asin("B00TEST003")];

    let evaluator = Evaluator::new(SelectionCriteria::default(), flat());
    let report = BulkScanPipeline::new(&catalog, evaluator, 5)
        .run(&asins, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.reason, "OK");
    assert_eq!(row.expected_sell_price, Some(dec!(2500)));
    assert!(row.keepa_link.contains("B00TEST001"));
    assert_eq!(report.stats.rejected.get("amazon_buybox"), Some(&1));
    assert_eq!(report.stats.rejected.get("no_rank"), Some(&1));
}

// --- genre research

#[tokio::test]
async fn genre_research_sorts_by_profit() {
    let mut in_stock = product("B00TEST004", "Item D", dec!(9000));
    in_stock.amazon_current = Some(dec!(8800));

    let catalog = FakeCatalog::default()
        .with_keyword("送料無料 Item A", product("B00TEST001", "Item A", dec!(5000)))
        .with_keyword("Item B", product("B00TEST002", "Item B", dec!(6000)))
        .with_keyword("Item D", in_stock);
    let marketplace = FakeMarketplace::default().with_ranking(
        "100939",
        vec![
            listing("【送料無料】Item A", dec!(2000), Decimal::ZERO),
            listing("Item B", dec!(1000), Decimal::ZERO),
            listing("Item C", dec!(1000), Decimal::ZERO),
            listing("Item D", dec!(1000), Decimal::ZERO),
        ],
    );

    let criteria = SelectionCriteria {
        skip_when_amazon_in_stock: true,
        ..SelectionCriteria::default()
    };
    let genres = vec![Genre::new("100939", "美容・コスメ")];
    let report = GenreResearchPipeline::new(&catalog, &marketplace, Evaluator::new(criteria, flat()), 40)
        .run(&genres, &NoProgress)
        .await;

    let names: Vec<&str> = report.rows.iter().map(|r| r.item_name.as_str()).collect();
    assert_eq!(names, vec!["Item B", "Item A"]);
    assert_eq!(report.rows[0].profit, dec!(3950));
    assert_eq!(report.rows[0].status, STATUS_NOT_ORDERED);
    assert_eq!(report.rows[0].genre, "美容・コスメ");
    assert_eq!(report.rows[1].fees, dec!(950));

    assert!(catalog.searched().contains(&"送料無料 Item A".to_string()));
    assert_eq!(report.stats.rejected.get("not_on_keepa"), Some(&1));
    assert_eq!(report.stats.rejected.get("amazon_in_stock"), Some(&1));
}

#[tokio::test]
async fn genre_research_with_disabled_rakuten_is_empty() {
    let catalog = FakeCatalog::default();
    let marketplace = FakeMarketplace::disabled();
    let evaluator = Evaluator::new(SelectionCriteria::default(), flat());

    let report = GenreResearchPipeline::new(&catalog, &marketplace, evaluator, 40)
        .run(&Genre::defaults(), &NoProgress)
        .await;

    assert!(report.is_empty());
    assert_eq!(report.stats.examined, 0);
}

// --- export hunt

fn hunt_criteria() -> SelectionCriteria {
    SelectionCriteria {
        min_profit: dec!(300),
        min_roi: dec!(0.05),
        threshold_mode: ThresholdMode::Any,
        ..SelectionCriteria::default()
    }
}

fn export_row(title: &str, jan_code: Option<&str>, buybox: Option<Decimal>) -> ExportRow {
    ExportRow {
        title: title.to_string(),
        jan: jan_code.map(jan),
        buybox_price: buybox,
        ..ExportRow::default()
    }
}

#[tokio::test]
async fn export_hunt_prices_rows_by_jan() {
    let long_title = "エプソン 純正 インクカートリッジ カメ 6色パック KAM-6CL 増量タイプ";
    let mut profitable = export_row(long_title, Some("4988601012345"), Some(dec!(3000)));
    profitable.asin = Some(asin("B00TEST001"));

    let rows = vec![
        profitable,
        export_row("no jan", None, Some(dec!(3000))),
        export_row("no price", Some("4988601012399"), None),
        export_row("not stocked", Some("4988601012346"), Some(dec!(1000))),
        export_row("loss", Some("4988601012347"), Some(dec!(1000))),
    ];
    let marketplace = FakeMarketplace::default()
        .with_offer("4988601012345", listing("kame", dec!(1500), Decimal::ZERO))
        .with_offer("4988601012347", listing("loss", dec!(1500), Decimal::ZERO));

    let report = ExportHuntPipeline::new(&marketplace, Evaluator::new(hunt_criteria(), flat()))
        .run(&rows, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 1);
    let hit = &report.rows[0];
    assert_eq!(hit.verdict, PROFITABLE);
    assert_eq!(hit.title.chars().count(), 30);
    assert_eq!(hit.profit, dec!(750));
    assert_eq!(hit.roi, Some(dec!(0.50)));
    assert_eq!(hit.fulfillment_fee, dec!(450));
    assert_eq!(hit.amazon_url.as_deref(), Some("https://www.amazon.co.jp/dp/B00TEST001"));

    let rejected = &report.stats.rejected;
    assert_eq!(rejected.get("missing_jan"), Some(&1));
    assert_eq!(rejected.get("missing_amazon_price"), Some(&1));
    assert_eq!(rejected.get("not_on_rakuten"), Some(&1));
    assert_eq!(rejected.get("profit_too_small"), Some(&1));
    assert_eq!(report.stats.examined, 5);
}

#[tokio::test]
async fn export_hunt_report_uses_japanese_headers() {
    let rows = vec![export_row("item", Some("4988601012345"), Some(dec!(3000)))];
    let marketplace =
        FakeMarketplace::default().with_offer("4988601012345", listing("item", dec!(1500), Decimal::ZERO));
    let report = ExportHuntPipeline::new(&marketplace, Evaluator::new(hunt_criteria(), flat()))
        .run(&rows, &NoProgress)
        .await;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(&report.rows[0]).expect("serialize");
    let bytes = writer.into_inner().expect("flush");
    let header = String::from_utf8(bytes).expect("utf8");
    let header = header.lines().next().unwrap_or_default();

    assert!(header.starts_with("判定,商品名,ASIN,JAN,Amazon価格,楽天仕入"));
    assert!(header.contains("利益率(ROI)"));
}

// --- keyword hunt

#[tokio::test]
async fn keyword_hunt_only_asks_rakuten_after_market_gates() {
    let mut blocked = product("B00TEST003", "Amazon owned", dec!(5000));
    blocked.buybox_is_amazon = true;

    let catalog = FakeCatalog::default()
        .with_keyword("mouse", product("B00TEST001", "Gaming mouse", dec!(8000)))
        .with_keyword("ink", product("B00TEST002", "Ink pack", dec!(4000)))
        .with_keyword("blocked", blocked);
    let marketplace =
        FakeMarketplace::default().with_offer("mouse", listing("mouse", dec!(4000), Decimal::ZERO));

    let keywords: Vec<String> = ["mouse", "ink", "blocked", "missing"]
        .into_iter()
        .map(String::from)
        .collect();
    let report = KeywordHuntPipeline::new(&catalog, &marketplace, Evaluator::new(hunt_criteria(), flat()), 5)
        .run(&keywords, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 1);
    let hit = &report.rows[0];
    assert_eq!(hit.asin.as_str(), "B00TEST001");
    assert_eq!(hit.sell_price, dec!(8000));
    assert_eq!(hit.profit, dec!(2750));
    assert!(hit.keepa_url.contains("B00TEST001"));

    let asked: Vec<String> = marketplace
        .queried()
        .iter()
        .map(|q| q.keyword_text().to_string())
        .collect();
    assert_eq!(asked, vec!["mouse", "ink"]);

    let rejected = &report.stats.rejected;
    assert_eq!(rejected.get("amazon_buybox"), Some(&1));
    assert_eq!(rejected.get("not_on_rakuten"), Some(&1));
    assert_eq!(rejected.get("not_on_keepa"), Some(&1));
}

// --- gap search

fn gap_criteria() -> SelectionCriteria {
    SelectionCriteria {
        min_profit: dec!(200),
        min_roi: dec!(0.05),
        ..SelectionCriteria::default()
    }
}

#[tokio::test]
async fn gap_search_counts_points_as_discount() {
    let rows = vec![
        GapRow {
            jan: jan("4988601012345"),
            asin: Some(asin("B00TEST001")),
            keyword: "エプソン 純正 インク".into(),
            target_price: dec!(5000),
            url: None,
        },
        GapRow {
            jan: jan("4988601012346"),
            asin: None,
            keyword: "キヤノン 純正 インク".into(),
            target_price: dec!(2000),
            url: Some("https://www.amazon.co.jp/dp/B00TEST009".into()),
        },
        GapRow {
            jan: jan("4988601012347"),
            asin: None,
            keyword: "not stocked".into(),
            target_price: dec!(2000),
            url: None,
        },
    ];
    let marketplace = FakeMarketplace::default()
        .with_offer("4988601012345", listing("epson", dec!(3000), Decimal::ZERO))
        .with_offer("4988601012346", listing("canon", dec!(1000), Decimal::ZERO));

    let report = GapSearchPipeline::new(&marketplace, Evaluator::new(gap_criteria(), flat()), dec!(0.10))
        .run(&rows, &NoProgress)
        .await;

    assert_eq!(report.rows.len(), 2);
    let epson = &report.rows[0];
    assert_eq!(epson.rakuten_points, dec!(300));
    assert_eq!(epson.profit, dec!(1350));
    assert_eq!(epson.roi, Some(dec!(0.50)));
    assert_eq!(epson.amazon_url.as_deref(), Some("https://www.amazon.co.jp/dp/B00TEST001"));

    let canon = &report.rows[1];
    assert_eq!(canon.rakuten_points, dec!(100));
    assert_eq!(canon.profit, dec!(450));
    assert_eq!(canon.amazon_url.as_deref(), Some("https://www.amazon.co.jp/dp/B00TEST009"));

    assert!(marketplace.queried().iter().all(|q| q.max_price.is_none()));
    assert_eq!(report.stats.rejected.get("not_on_rakuten"), Some(&1));
}

#[tokio::test]
async fn gap_search_with_disabled_rakuten_finds_nothing() {
    let rows = vec![GapRow {
        jan: jan("4988601012345"),
        asin: None,
        keyword: String::new(),
        target_price: dec!(5000),
        url: None,
    }];
    let marketplace = FakeMarketplace::disabled();

    let report = GapSearchPipeline::new(&marketplace, Evaluator::new(gap_criteria(), flat()), dec!(0.10))
        .run(&rows, &NoProgress)
        .await;

    assert!(report.is_empty());
    assert_eq!(report.stats.rejected.get("not_on_rakuten"), Some(&1));
}
