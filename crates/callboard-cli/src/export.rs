//! Report exports
//!
//! CSV for spreadsheets and a printable HTML page. Times are rendered in the
//! given time zone, amounts as integers with the currency suffix.

use callboard::{compute_daily_stats, top_selling_items, CallRecord, DailyStats};
use chrono::{NaiveDate, TimeZone};
use html_escape::encode_text;
use std::fmt::Write;

const TOP_ITEMS_IN_REPORT: usize = 5;

pub struct ReportHeader<'a> {
    pub property_name: &'a str,
    pub currency: &'a str,
    pub date: NaiveDate,
}

/// Default file name for a report of `date`, e.g. `sales_report_2026-03-14.csv`
pub fn default_file_name(date: NaiveDate, extension: &str) -> String {
    format!("sales_report_{}.{}", date.format("%Y-%m-%d"), extension)
}

fn time_of<Tz: TimeZone>(record: &CallRecord, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    record
        .created_at()
        .with_timezone(tz)
        .format("%H:%M:%S")
        .to_string()
}

fn items_summary(record: &CallRecord, separator: &str) -> String {
    record
        .ordered_lines()
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.name))
        .collect::<Vec<_>>()
        .join(separator)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per record, in log order
pub fn render_csv<Tz: TimeZone>(records: &[CallRecord], tz: &Tz, currency: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = format!(
        "Time,Room Number,Call Outcome,Order Status,Items,Total Amount ({})\n",
        csv_field(currency)
    );

    for record in records {
        let row = [
            time_of(record, tz),
            record.room_number().to_string(),
            record.outcome().label().to_string(),
            record.order_status().label().to_string(),
            items_summary(record, " | "),
            record.total_amount().to_string(),
        ];
        let row: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Printable daily report: summary figures, top sellers and every call
pub fn render_html<Tz: TimeZone>(records: &[CallRecord], tz: &Tz, header: &ReportHeader) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stats = compute_daily_stats(records);
    let top = top_selling_items(records, TOP_ITEMS_IN_REPORT);
    let title = format!(
        "Daily Sales Report - {}",
        header.date.format("%Y-%m-%d")
    );

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title>\
<style>body{{font-family: sans-serif; padding: 20px;}} \
table{{width:100%; border-collapse: collapse; margin-top:20px;}} \
th, td{{border: 1px solid #ddd; padding: 8px; text-align: left; font-size: 12px;}} \
th{{background-color: #f2f2f2;}} h2{{color: #333;}}</style></head><body>\n\
<h1>{property}</h1>\n<h2>{title}</h2>\n",
        title = encode_text(&title),
        property = encode_text(header.property_name),
    );

    summary_table(&mut html, &stats, header.currency);

    if !top.is_empty() {
        html.push_str("<h3>Top Selling Items</h3>\n<table><thead><tr><th>Item</th><th>Quantity</th></tr></thead><tbody>\n");
        for item in &top {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                encode_text(&item.name),
                item.quantity
            );
        }
        html.push_str("</tbody></table>\n");
    }

    html.push_str("<h3>Calls</h3>\n<table><thead><tr><th>Time</th><th>Room</th><th>Status</th><th>Result</th><th>Items</th><th>Amount</th></tr></thead><tbody>\n");
    for record in records {
        let items = items_summary(record, ", ");
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td></tr>",
            time_of(record, tz),
            encode_text(record.room_number().as_str()),
            record.outcome().label(),
            record.order_status().label(),
            if items.is_empty() {
                "-".to_string()
            } else {
                encode_text(&items).to_string()
            },
            record.total_amount(),
            encode_text(header.currency),
        );
    }
    html.push_str("</tbody></table>\n</body></html>\n");

    html
}

fn summary_table(html: &mut String, stats: &DailyStats, currency: &str) {
    let rows = [
        ("Total Calls", stats.total_calls.to_string()),
        ("Picked", stats.total_picked.to_string()),
        ("Not Picked", stats.total_missed.to_string()),
        ("Orders", stats.total_ordered.to_string()),
        ("Picked, No Order", stats.total_picked_not_ordered.to_string()),
        ("Conversion Rate", format!("{}%", stats.conversion_rate_percent)),
        (
            "Revenue",
            format!("{} {}", stats.total_revenue, encode_text(currency)),
        ),
    ];

    html.push_str("<table><tbody>\n");
    for (label, value) in rows {
        let _ = writeln!(html, "<tr><th>{}</th><td>{}</td></tr>", label, value);
    }
    html.push_str("</tbody></table>\n");
}
