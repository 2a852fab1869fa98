//! Every user-visible string in one place. Replies are plain text in
//! the service's Thai voice; dates display as DD-MM-YYYY.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use larder_core::{format_quantity, LedgerEntry};

use crate::export::ExportArtifact;

pub(crate) fn display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub(crate) fn recorded(date: NaiveDate, saved: &[LedgerEntry], skipped: &[String]) -> String {
    let mut lines = vec![format!("📅 บันทึกวัตถุดิบวันที่ {}", display_date(date))];
    for entry in saved {
        lines.push(format!(
            "- {} {} {}",
            entry.item,
            format_quantity(entry.quantity),
            entry.unit
        ));
    }
    if !skipped.is_empty() {
        lines.push("⚠️ ข้ามบรรทัดที่อ่านไม่ออก:".to_string());
        for line in skipped {
            lines.push(format!("- {line}"));
        }
    }
    lines.join("\n")
}

pub(crate) fn record_format_help() -> &'static str {
    "❌ รูปแบบไม่ถูกต้อง เช่น:\nหมู 5 กก\nหรือ\n15 Jul 2025\nไก่ 3 กก"
}

pub(crate) fn delete_format_help() -> &'static str {
    "❌ รูปแบบลบไม่ถูกต้อง เช่น:\nลบ 26 Jul 2025\nหรือ\nลบ 26 Jul 2025 หมู"
}

pub(crate) fn range_format_help() -> &'static str {
    "❌ รูปแบบช่วงวันที่ไม่ถูกต้อง เช่น:\n1 Jul 2025 - 31 Jul 2025"
}

pub(crate) fn deleted(date: NaiveDate, item: Option<&str>, removed: usize) -> String {
    let suffix = item.map(|i| format!(" ({i})")).unwrap_or_default();
    if removed == 0 {
        format!("📍 ไม่พบรายการวันที่ {}{}", display_date(date), suffix)
    } else {
        format!(
            "🗑 ลบแล้ว {} รายการ วันที่ {}{}",
            removed,
            display_date(date),
            suffix
        )
    }
}

pub(crate) fn no_data_in_range(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "📍 ไม่มีข้อมูลช่วง {} - {}",
        display_date(start),
        display_date(end)
    )
}

pub(crate) fn summary(
    start: NaiveDate,
    end: NaiveDate,
    totals: &BTreeMap<(String, String), f64>,
) -> String {
    let mut lines = vec![format!(
        "📊 สรุปวัตถุดิบ {} - {}",
        display_date(start),
        display_date(end)
    )];
    for ((item, unit), total) in totals {
        lines.push(format!("- {item} ({unit}): {}", format_quantity(*total)));
    }
    lines.join("\n")
}

pub(crate) fn export_ready(artifact: &ExportArtifact) -> String {
    format!("📦 ดาวน์โหลดวัตถุดิบ:\n{}", artifact.url)
}

pub(crate) fn generic_failure() -> &'static str {
    "⚠️ ระบบขัดข้อง กรุณาลองใหม่อีกครั้ง"
}
