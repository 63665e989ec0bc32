mod style;

use crate::core::costing::{normalize_currency_code, CostSummary};
use crate::format::{format_integer, format_number};
use crate::types::{ItineraryItem, TravelQuoteData};

const DEFAULT_TITLE: &str = "여행 견적서";
const EMPTY_INCLUSIONS: &str = "<li>담당자 문의</li>";
const EMPTY_EXCLUSIONS: &str = "<li>개인 경비</li>";

/// File name for the exported document: `Quote_{code}.html`, or `Quote_Draft.html`.
pub fn export_file_name(record: &TravelQuoteData) -> String {
    let code: String = record
        .quote_info
        .code
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    if code.is_empty() {
        "Quote_Draft.html".to_string()
    } else {
        format!("Quote_{code}.html")
    }
}

/// Render a standalone HTML quote. `show_details` adds the cost breakdown
/// when the record has cost lines.
///
/// Every money figure is taken from [`CostSummary`], never recomputed here.
pub fn render_quote_html(record: &TravelQuoteData, show_details: bool) -> String {
    let summary = CostSummary::compute(record);
    let info = &record.quote_info;
    let trip = &record.trip_summary;
    let cost = &record.cost;

    let title = if trip.title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        trip.title.as_str()
    };

    let mut html = String::with_capacity(16 * 1024);
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{DEFAULT_TITLE} - {code}</title>\n<style>{css}</style>\n</head>\n<body>\n<div class=\"container\">\n",
        code = escape(&info.code),
        css = style::QUOTE_CSS,
    ));

    html.push_str(&format!(
        "<div class=\"header\">\n<div class=\"header-badge\">{agency}</div>\n<h1>{title}</h1>\n<p>견적 번호: {code}</p>\n</div>\n",
        agency = escape(&info.agency),
        title = escape(title),
        code = escape(&info.code),
    ));

    html.push_str(&format!(
        "<div class=\"summary-grid\">\n\
         <div class=\"summary-item\"><h3>여행 기간</h3><p>{period}</p></div>\n\
         <div class=\"summary-item\"><h3>여행 인원</h3><p>성인 {adult}명, 아동 {child}명</p></div>\n\
         <div class=\"summary-item\"><h3>출발일</h3><p>{start}</p></div>\n</div>\n",
        period = escape(&trip.period_text),
        adult = summary.pax_adult,
        child = summary.pax_child,
        start = if trip.start_date.trim().is_empty() {
            "미정".to_string()
        } else {
            escape(&trip.start_date)
        },
    ));

    html.push_str("<div class=\"section cost-section\">\n<h2 class=\"section-title\">견적 포함 내역</h2>\n");
    if !cost.shopping_conditions.trim().is_empty() {
        html.push_str(&format!(
            "<div class=\"shopping-banner\">🛍️ 쇼핑/옵션 조건: {}</div>\n",
            escape(&cost.shopping_conditions)
        ));
    }
    html.push_str(&format!(
        "<div class=\"cost-grid\">\n\
         <div><h3 style=\"font-size:14px; color:#16a34a; margin-bottom:12px;\">포함 사항</h3><ul class=\"inclusion-list\">{inc}</ul></div>\n\
         <div><h3 style=\"font-size:14px; color:#ef4444; margin-bottom:12px;\">불포함 사항</h3><ul class=\"exclusion-list\">{exc}</ul></div>\n\
         </div>\n",
        inc = list_items(&cost.inclusions, EMPTY_INCLUSIONS),
        exc = list_items(&cost.exclusions, EMPTY_EXCLUSIONS),
    ));
    html.push_str(&format!(
        "<div class=\"price-tag\"><div class=\"price-label\">총 예상 견적 (1인 기준)</div><div class=\"price-value\">{} {}</div></div>\n</div>\n",
        escape(&cost.currency),
        format_integer(cost.total_price),
    ));

    if !info.manager_note.trim().is_empty() {
        html.push_str(&format!(
            "<div class=\"section note-section\"><div class=\"note-card\"><div class=\"note-title\">🧑‍💼 담당자 코멘트</div><div class=\"note-body\">{}</div></div></div>\n",
            escape(&info.manager_note)
        ));
    }

    html.push_str("<div class=\"section\">\n<h2 class=\"section-title\">상세 일정</h2>\n<div class=\"timeline\">\n");
    for day in &record.itinerary {
        html.push_str(&timeline_item(day));
    }
    html.push_str("</div>\n</div>\n");

    if show_details && !cost.details.is_empty() {
        html.push_str(&cost_details_section(record, &summary));
    }

    let issued = info
        .quote_date
        .as_deref()
        .map(|date| format!(" • {}", escape(date)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<div class=\"footer\">\n<p>생성된 견적서{issued}</p>\n<p>가격 및 예약 가능 여부는 변동될 수 있습니다.</p>\n</div>\n</div>\n\
         <button class=\"print-fab\" onclick=\"window.print()\">🖨️ 인쇄 / PDF 저장</button>\n</body>\n</html>\n"
    ));

    html
}

fn list_items(items: &[String], fallback: &str) -> String {
    let rendered: String = items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect();
    if rendered.is_empty() {
        fallback.to_string()
    } else {
        rendered
    }
}

fn timeline_item(day: &ItineraryItem) -> String {
    let mut out = format!(
        "<div class=\"timeline-item\">\n<div class=\"timeline-dot\"></div>\n<div class=\"day-header\"><span class=\"day-number\">{}일차</span>",
        day.day
    );
    if !day.location.trim().is_empty() {
        out.push_str(&format!(
            "<span class=\"location-tag\">📍 {}</span>",
            escape(&day.location)
        ));
    }
    if !day.transport.trim().is_empty() {
        out.push_str(&format!(
            "<span class=\"transport-tag\">🚌 {}</span>",
            escape(&day.transport)
        ));
    }
    out.push_str("</div>\n");

    let hotel = day.hotel.trim();
    if !hotel.is_empty() && hotel != "None" {
        out.push_str(&format!("<div class=\"hotel-badge\">🏨 {}</div>\n", escape(hotel)));
    }

    out.push_str("<ul class=\"activity-list\">");
    for activity in day.activities.iter().filter(|a| !a.trim().is_empty()) {
        out.push_str(&format!("<li>{}</li>", escape(activity)));
    }
    out.push_str("</ul>\n");

    out.push_str(&format!(
        "<div class=\"meals\"><span><strong>조:</strong> {}</span><span><strong>중:</strong> {}</span><span><strong>석:</strong> {}</span></div>\n</div>\n",
        meal(&day.meals.breakfast),
        meal(&day.meals.lunch),
        meal(&day.meals.dinner),
    ));
    out
}

fn meal(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        escape(value)
    }
}

fn cost_details_section(record: &TravelQuoteData, summary: &CostSummary) -> String {
    let mut out = String::from(
        "<div class=\"section cost-details-container\">\n<h2 class=\"section-title\">상세 견적 내역</h2>\n<div class=\"total-cost-summary\">\n",
    );

    out.push_str("<div class=\"cost-summary-header\"><div class=\"total-cost-label\">총 합계 (Total Cost)</div>");
    if summary.counted_pax > 0 {
        out.push_str(&format!(
            "<div class=\"pax-badge\">👥 성인 {}명, 아동 {}명 기준</div>",
            summary.pax_adult, summary.pax_child
        ));
    }
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<div class=\"primary-cost-row\"><div class=\"total-cost-value\">{}</div>",
        escape(&summary.totals.display())
    ));
    let per_person = summary.per_person_by_currency();
    if !per_person.is_empty() {
        let joined = per_person
            .iter()
            .map(|(code, value)| format!("{} {}", escape(code), format_integer(*value)))
            .collect::<Vec<_>>()
            .join(" + ");
        out.push_str(&format!("<div class=\"per-person\">1인당 약 {joined}</div>"));
    }
    out.push_str("</div>\n");

    if summary.has_foreign_currency() && summary.krw_total > 0 {
        out.push_str(&format!(
            "<div class=\"krw-conversion-box\"><div class=\"krw-total\">원화 환산 ≈ KRW {}</div>",
            format_integer(summary.krw_total)
        ));
        if summary.counted_pax > 0 {
            out.push_str(&format!(
                "<div class=\"krw-per-person\">1인당 약 KRW {}</div>",
                format_integer(summary.per_person_krw)
            ));
        }
        out.push_str("</div>\n");

        if !summary.applied_rates.is_empty() {
            let rates = summary
                .applied_rates
                .iter()
                .map(|(code, rate)| format!("1 {} = {}원", escape(code), format_number(*rate)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("<div class=\"exchange-rate-info\">ℹ️ 적용 환율: {rates}</div>\n"));
        }
    }
    out.push_str("</div>\n<div class=\"cost-category-grid\">\n");

    for category in &summary.categories {
        out.push_str(&format!(
            "<div class=\"cost-category-card\">\n<div class=\"category-header\"><span class=\"category-icon\">{icon}</span> {label}<span class=\"category-total\">{total}</span></div>\n<table class=\"category-table\"><tbody>",
            icon = category.category.icon(),
            label = category.category.heading(),
            total = escape(&category.totals.display()),
        ));
        for item in record.cost.details.iter().filter(|d| d.category == category.category) {
            out.push_str(&format!(
                "<tr><td class=\"item-name\">{}</td><td class=\"item-price\"><span class=\"currency-label\">{}</span> {}</td></tr>",
                escape(&item.detail),
                escape(&normalize_currency_code(&item.currency)),
                format_number(item.amount + item.profit_or_zero()),
            ));
        }
        out.push_str("</tbody></table>\n</div>\n");
    }

    out.push_str("</div>\n</div>\n");
    out
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
