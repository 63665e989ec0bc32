/// Inline stylesheet for the exported quote.
pub const QUOTE_CSS: &str = r#"
    body { font-family: 'Noto Sans KR', 'Apple SD Gothic Neo', 'Malgun Gothic', sans-serif; margin: 0; padding: 0; background-color: #f8fafc; color: #334155; line-height: 1.6; }
    .container { max-width: 800px; margin: 40px auto; background: white; box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1), 0 2px 4px -1px rgba(0,0,0,0.06); border-radius: 16px; overflow: hidden; }
    .header { background: linear-gradient(135deg, #5e2b97 0%, #4c1d80 100%); color: white; padding: 40px; position: relative; }
    .header h1 { margin: 0 0 8px 0; font-size: 28px; font-weight: 700; }
    .header p { margin: 0; opacity: 0.9; font-size: 14px; }
    .header-badge { position: absolute; top: 40px; right: 40px; background: rgba(255,255,255,0.2); padding: 8px 16px; border-radius: 20px; font-size: 12px; font-weight: 600; }
    .summary-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; padding: 30px 40px; border-bottom: 1px solid #f1f5f9; }
    .summary-item h3 { margin: 0 0 4px 0; font-size: 12px; color: #94a3b8; font-weight: 500; }
    .summary-item p { margin: 0; font-size: 16px; font-weight: 700; color: #1e293b; }
    .section { padding: 30px 40px; }
    .section-title { font-size: 18px; font-weight: 700; color: #1e293b; margin: 0 0 20px 0; padding-left: 12px; border-left: 4px solid #5e2b97; }
    .shopping-banner { background: #fef3c7; color: #92400e; padding: 12px 16px; border-radius: 8px; font-size: 13px; font-weight: 600; margin-bottom: 20px; }
    .cost-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; }
    .inclusion-list, .exclusion-list { margin: 0; padding-left: 18px; font-size: 13px; }
    .price-tag { margin-top: 24px; background: #f5f3ff; border-radius: 12px; padding: 20px 24px; display: flex; justify-content: space-between; align-items: center; }
    .price-label { font-size: 14px; color: #6d28d9; font-weight: 600; }
    .price-value { font-size: 24px; font-weight: 800; color: #5e2b97; }
    .note-card { background: #f8fafc; border: 1px solid #e2e8f0; padding: 20px; border-radius: 12px; }
    .note-title { font-size: 13px; font-weight: 700; color: #64748b; margin-bottom: 8px; }
    .note-body { font-size: 15px; white-space: pre-wrap; }
    .timeline { position: relative; padding-left: 24px; border-left: 2px solid #e2e8f0; }
    .timeline-item { position: relative; margin-bottom: 28px; }
    .timeline-dot { position: absolute; left: -31px; top: 4px; width: 12px; height: 12px; border-radius: 50%; background: #5e2b97; }
    .day-header { display: flex; gap: 8px; align-items: center; flex-wrap: wrap; margin-bottom: 8px; }
    .day-number { font-weight: 800; color: #5e2b97; }
    .location-tag, .transport-tag { font-size: 12px; background: #f1f5f9; padding: 2px 8px; border-radius: 6px; }
    .hotel-badge { display: inline-block; font-size: 12px; background: #ecfeff; color: #0e7490; padding: 4px 10px; border-radius: 6px; margin-bottom: 8px; }
    .activity-list { margin: 0 0 8px 0; padding-left: 18px; font-size: 14px; }
    .meals { display: flex; gap: 16px; font-size: 12px; color: #64748b; }
    .total-cost-summary { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 12px; padding: 24px; margin-bottom: 24px; }
    .cost-summary-header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 16px; }
    .total-cost-label { font-size: 15px; font-weight: 700; }
    .pax-badge { background: #e0e7ff; color: #4338ca; padding: 4px 10px; border-radius: 20px; font-size: 11px; font-weight: 600; }
    .total-cost-value { font-size: 20px; font-weight: 800; color: #5e2b97; }
    .per-person { font-size: 12px; color: #64748b; margin-top: 4px; }
    .krw-conversion-box { margin-top: 16px; background: #f0fdf4; border: 1px solid #bbf7d0; border-radius: 8px; padding: 12px 16px; }
    .krw-total { font-size: 16px; font-weight: 700; color: #166534; }
    .krw-per-person { font-size: 12px; color: #15803d; }
    .exchange-rate-info { margin-top: 8px; font-size: 11px; color: #64748b; }
    .cost-category-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 20px; }
    .cost-category-card { border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
    .category-header { display: flex; align-items: center; gap: 8px; padding: 12px 16px; background: #f8fafc; font-size: 13px; font-weight: 700; }
    .category-total { margin-left: auto; font-size: 12px; color: #5e2b97; }
    .category-table { width: 100%; border-collapse: collapse; font-size: 13px; }
    .category-table td { padding: 10px 16px; border-bottom: 1px solid #f1f5f9; color: #475569; }
    .category-table tr:last-child td { border-bottom: none; }
    .item-price { text-align: right; font-family: monospace; font-weight: 600; color: #5e2b97; white-space: nowrap; }
    .currency-label { font-size: 11px; color: #94a3b8; margin-right: 2px; font-weight: 400; }
    .footer { text-align: center; padding: 24px; font-size: 12px; color: #94a3b8; border-top: 1px solid #f1f5f9; }
    .print-fab { position: fixed; bottom: 32px; right: 32px; background: #5e2b97; color: white; border: none; border-radius: 999px; padding: 14px 22px; font-size: 14px; font-weight: 700; cursor: pointer; box-shadow: 0 10px 15px -3px rgba(0,0,0,0.2); }
    @media print {
      body { background: white; -webkit-print-color-adjust: exact; print-color-adjust: exact; }
      .container { box-shadow: none; margin: 0; width: 100%; max-width: none; border-radius: 0; }
      .print-fab { display: none !important; }
      .cost-category-card { break-inside: avoid; page-break-inside: avoid; }
    }
"#;
