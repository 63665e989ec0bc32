use serde_json::json;
use travel_quote_rs::{export_file_name, normalize, render_quote_html, CostSummary};

fn record() -> travel_quote_rs::TravelQuoteData {
    normalize(&json!({
        "quote_info": { "code": "QJ0060322200", "agency": "하나투어", "manager_note": "노옵션 확정", "quote_date": "2025-02-10" },
        "trip_summary": { "title": "방콕 & 파타야", "pax_adult": 2, "pax_child": 1, "period_text": "3박 5일", "start_date": "2025-03-01" },
        "cost": {
            "total_price": 799000,
            "shopping_conditions": "쇼핑 2회",
            "inclusions": ["왕복항공"],
            "details": [
                { "category": "호텔", "detail": "힐튼 3박", "currency": "USD", "amount": 300, "profit": 30 },
                { "category": "차량", "detail": "전용 차량", "currency": "THB", "amount": 9000 },
                { "category": "가이드", "detail": "가이드 팁", "amount": 60000 }
            ],
            "exchangeRates": { "USD": 1350, "THB": 38 }
        },
        "itinerary": [
            { "day": 1, "location": "방콕", "transport": "KE651", "activities": ["도착", "호텔 투숙"],
              "meals": { "dinner": "현지식" }, "hotel": "힐튼 방콕" }
        ]
    }))
}

#[test]
fn detailed_quote_shows_the_same_figures_as_the_summary() {
    let record = record();
    let summary = CostSummary::compute(&record);
    let html = render_quote_html(&record, true);

    assert_eq!(summary.totals.display(), "USD 330 + THB 9,000 + KRW 60,000");
    assert_eq!(summary.krw_total, 330 * 1350 + 9000 * 38 + 60_000);

    assert!(html.contains("총 합계 (Total Cost)"));
    assert!(html.contains("USD 330 + THB 9,000 + KRW 60,000"));
    assert!(html.contains("👥 성인 2명, 아동 1명 기준"));
    assert!(html.contains("1인당 약 USD 110 + THB 3,000 + KRW 20,000"));
    assert!(html.contains("원화 환산 ≈ KRW 847,500"));
    assert!(html.contains("1인당 약 KRW 282,500"));
    assert!(html.contains("1 USD = 1,350원, 1 THB = 38원"));
    assert!(html.contains("🛍️ 쇼핑/옵션 조건: 쇼핑 2회"));
    assert!(html.contains("담당자 코멘트"));
    assert!(html.contains("🏨 힐튼 방콕"));
    assert!(html.contains("방콕 &amp; 파타야"));
    assert!(html.contains("2025-02-10"));
}

#[test]
fn summary_only_quote_hides_the_breakdown() {
    let html = render_quote_html(&record(), false);
    assert!(!html.contains("총 합계 (Total Cost)"));
    assert!(html.contains("총 예상 견적 (1인 기준)"));
    assert!(html.contains("KRW 799,000"));
    assert_eq!(export_file_name(&record()), "Quote_QJ0060322200.html");
}
