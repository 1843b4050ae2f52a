//! Self-contained HTML report
//!
//! The summary table is rendered here; product cards are built in the
//! browser from the embedded JSON payload.

use crate::error::Result;
use crate::models::ComparisonReport;
use std::fmt::Write;

/// Cents string to dollars: `"1299"` -> `"$12.99"`, `"5"` -> `"$0.05"`
pub fn format_price(cents: &str) -> String {
    let padded = format!("{:0>3}", cents.trim());
    let chars: Vec<char> = padded.chars().collect();
    let split = chars.len() - 2;
    let dollars: String = chars[..split].iter().collect();
    let fraction: String = chars[split..].iter().collect();
    format!("${}.{}", dollars, fraction)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON safe to place inside a `<script>` element
fn embed_json(reports: &[ComparisonReport]) -> Result<String> {
    Ok(serde_json::to_string(reports)?.replace("</", "<\\/"))
}

fn summary_rows(reports: &[ComparisonReport]) -> String {
    let mut rows = String::new();
    for (index, report) in reports.iter().enumerate() {
        let local_price = report
            .local_top
            .first()
            .map(|item| format_price(&item.target_sale_price))
            .unwrap_or_else(|| "-".to_string());
        let status = if report.has_failures() {
            format!(
                "<span class=\"degraded\">{} failed</span>",
                escape_html(&report.failed_sources.join(", "))
            )
        } else if report.hunter_error.is_some() || report.express_error.is_some() {
            "<span class=\"degraded\">lookup failed</span>".to_string()
        } else {
            "ok".to_string()
        };

        // Writing to a String cannot fail
        let _ = write!(
            rows,
            r##"
            <tr>
                <td><a href="#record-{index}">{title}</a></td>
                <td>{product_id}</td>
                <td>{shop_id}</td>
                <td>{local}</td>
                <td>{local_price}</td>
                <td>{hunter}</td>
                <td>{express}</td>
                <td>{status}</td>
            </tr>"##,
            index = index,
            title = escape_html(&report.product_title),
            product_id = escape_html(&report.product_id.to_string()),
            shop_id = escape_html(&report.shop_id.to_string()),
            local = report.local_top.len(),
            local_price = escape_html(&local_price),
            hunter = report.hunter_top.len(),
            express = report.express_top.len(),
            status = status,
        );
    }
    rows
}

/// Complete HTML document for a run
pub fn render_html(reports: &[ComparisonReport], generated_at: &str) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let data = embed_json(reports)?;
    let rows = summary_rows(reports);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Product Comparison Report</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
            padding: 20px;
        }}
        h1 {{
            font-size: 26px;
            color: #4a9eff;
        }}
        h2 {{
            font-size: 18px;
            margin: 24px 0 8px;
        }}
        h3 {{
            font-size: 15px;
            color: #888;
            margin: 12px 0 6px;
        }}
        .subtitle {{
            color: #888;
            font-size: 14px;
            margin-bottom: 20px;
        }}
        table {{
            border-collapse: collapse;
            width: 100%;
        }}
        th, td {{
            border-bottom: 1px solid #3a3a3a;
            padding: 6px 10px;
            text-align: left;
        }}
        a {{
            color: #4a9eff;
        }}
        .degraded {{
            color: #ff9a4a;
        }}
        .record {{
            background-color: #2a2a2a;
            border-radius: 6px;
            margin-top: 24px;
            padding: 16px;
        }}
        .record > img {{
            max-width: 160px;
            border-radius: 4px;
        }}
        .cards {{
            display: flex;
            flex-wrap: wrap;
            gap: 12px;
        }}
        .card {{
            background-color: #333;
            border-radius: 4px;
            padding: 8px;
            width: 200px;
            font-size: 13px;
        }}
        .card img {{
            width: 100%;
            border-radius: 4px;
        }}
        .origin {{
            margin-top: 12px;
        }}
        .origin summary {{
            cursor: pointer;
            color: #888;
        }}
        .empty {{
            color: #666;
            font-style: italic;
        }}
        footer {{
            margin-top: 30px;
            color: #666;
            font-family: 'Courier New', monospace;
            font-size: 12px;
        }}
    </style>
</head>
<body>
    <h1>Product Comparison Report</h1>
    <div class="subtitle">Generated {generated_at} &middot; {count} records</div>

    <table>
        <thead>
            <tr>
                <th>Title</th>
                <th>Product ID</th>
                <th>Shop ID</th>
                <th>Local</th>
                <th>Local price</th>
                <th>AliHunter</th>
                <th>AliExpress</th>
                <th>Status</th>
            </tr>
        </thead>
        <tbody>{rows}
        </tbody>
    </table>

    <div id="records"></div>

    <footer>prodcmp-enrich v{version} ({git_hash}) built {build_timestamp}</footer>

    <script id="report-data" type="application/json">{data}</script>
    <script>
        function formatPrice(cents) {{
            let price = String(cents || '').trim();
            while (price.length < 3) price = '0' + price;
            return '$' + price.slice(0, -2) + '.' + price.slice(-2);
        }}

        function el(tag, className, text) {{
            const node = document.createElement(tag);
            if (className) node.className = className;
            if (text !== undefined) node.textContent = text;
            return node;
        }}

        function card(image, title, url, lines) {{
            const box = el('div', 'card');
            if (image) {{
                const img = el('img');
                img.src = image;
                img.loading = 'lazy';
                box.appendChild(img);
            }}
            const link = el('a', null, title || '(untitled)');
            if (url) link.href = url;
            link.target = '_blank';
            box.appendChild(link);
            for (const line of lines) box.appendChild(el('div', null, line));
            return box;
        }}

        function origin(parent, heading, items, render) {{
            if (!items) return;
            const details = el('details', 'origin');
            details.appendChild(el('summary', null, heading + ' (' + items.length + ')'));
            section(details, heading, items, render);
            parent.appendChild(details);
        }}

        function section(parent, heading, items, render, error) {{
            parent.appendChild(el('h3', null, heading));
            if (error) parent.appendChild(el('div', 'degraded', error));
            const row = el('div', 'cards');
            if (!items || items.length === 0) {{
                row.appendChild(el('div', 'empty', 'No matches'));
            }} else {{
                for (const item of items) row.appendChild(render(item));
            }}
            parent.appendChild(row);
        }}

        const localCard = (p) => card(p.productmainimageurl, p.producttitle, p.producturl, [
            'Price: ' + formatPrice(p.targetsaleprice),
            'Rating: ' + p.avgstar,
            'Sold: ' + p.sale,
        ]);
        const hunterCard = (p) => card(p.product_main_image_url, p.product_title, p.product_detail_url, [
            'Price: ' + p.target_sale_price + ' ' + (p.target_sale_price_currency || ''),
            'Rating: ' + (p.evaluate_rate || '-'),
            'Sold: ' + (p.latest_volume || 0),
            'Reviews: ' + (p.total_review || '-'),
        ]);
        const expressCard = (p) => card(p.ImageURL, p.Title, p.URL, [
            'Price: $' + p.SalePrice,
            'Rating: ' + (p.AvgRatingStar === null ? '-' : p.AvgRatingStar),
            'Sold: ' + p.Volume,
            'Reviews: ' + (p.TotalReview || '-'),
        ]);

        const reports = JSON.parse(document.getElementById('report-data').textContent);
        const container = document.getElementById('records');
        reports.forEach((report, index) => {{
            const block = el('div', 'record');
            block.id = 'record-' + index;
            block.appendChild(el('h2', null, (report.ProductTitle || '(untitled)') + ' #' + report.ProductID));
            if (report.ImageURL) {{
                const img = el('img');
                img.src = report.ImageURL;
                block.appendChild(img);
            }}
            section(block, 'Local top', report.LocalRapidAPITop, localCard);
            section(block, 'AliHunter top', report.AliHunterTop, hunterCard, report.AliHunterError);
            section(block, 'AliExpress top', report.AliExpressTop, expressCard, report.AliExpressError);
            origin(block, 'Local origin', report.LocalRapidAPIOrigin, localCard);
            origin(block, 'AliHunter origin', report.AliHunterOrigin, hunterCard);
            origin(block, 'AliExpress origin', report.AliExpressOrigin, expressCard);
            container.appendChild(block);
        }});
    </script>
</body>
</html>
"#,
        generated_at = escape_html(generated_at),
        count = reports.len(),
        rows = rows,
        version = version,
        git_hash = git_hash,
        build_timestamp = build_timestamp,
        data = data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductItem, RecordId};

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("1299"), "$12.99");
        assert_eq!(format_price("99"), "$0.99");
        assert_eq!(format_price("5"), "$0.05");
        assert_eq!(format_price(""), "$0.00");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        let reports = vec![ComparisonReport {
            product_title: "</script><script>alert(1)</script>".to_string(),
            ..Default::default()
        }];

        let html = render_html(&reports, "2026-01-01T00:00:00+00:00").unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_summary_table_rows() {
        let reports = vec![
            ComparisonReport {
                product_title: "Lamp & shade".to_string(),
                product_id: RecordId::Number(7),
                shop_id: RecordId::Number(3),
                local_top: vec![ProductItem {
                    target_sale_price: "1999".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            ComparisonReport {
                product_id: RecordId::Number(8),
                failed_sources: vec!["AliExpress".to_string()],
                ..Default::default()
            },
        ];

        let html = render_html(&reports, "now").unwrap();
        assert!(html.contains("Lamp &amp; shade"));
        assert!(html.contains("<td>$19.99</td>"));
        assert!(html.contains("AliExpress failed"));
        assert!(html.contains("href=\"#record-1\""));
        assert!(html.contains("2 records"));
    }

    #[test]
    fn test_origin_lists_reach_the_page() {
        let reports = vec![ComparisonReport {
            product_id: RecordId::Number(4),
            local_origin: Some(vec![ProductItem {
                product_id: "unfiltered-local".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        }];

        let html = render_html(&reports, "now").unwrap();
        assert!(html.contains(r#""LocalRapidAPIOrigin":[{"#));
        assert!(html.contains("unfiltered-local"));
        assert!(html.contains("origin(block, 'Local origin', report.LocalRapidAPIOrigin, localCard)"));
        assert!(html.contains("origin(block, 'AliHunter origin', report.AliHunterOrigin, hunterCard)"));
        assert!(html.contains("origin(block, 'AliExpress origin', report.AliExpressOrigin, expressCard)"));
    }
}
