pub mod error;
pub mod export;

mod delete;
mod record;
mod reply;
mod summarize;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, instrument};

use larder_core::{InboundMessage, LedgerScope};
use larder_parse::{classify, Classified, FormatError, Intent};
use larder_store::EntryRepo;

pub use error::EngineError;
pub use export::{CsvExportSink, ExportArtifact, ExportSink};

#[derive(Clone, Copy, Debug, Default)]
pub struct EngineConfig {
    pub scope: LedgerScope,
}

/// The command interpreter and ledger engine: classifies one inbound
/// message, runs the matching handler against the store, and renders
/// the reply. One call per message; no state is kept between calls.
pub struct Engine {
    repo: EntryRepo,
    config: EngineConfig,
    export: Arc<dyn ExportSink>,
}

impl Engine {
    pub fn new(repo: EntryRepo, config: EngineConfig, export: Arc<dyn ExportSink>) -> Self {
        Self {
            repo,
            config,
            export,
        }
    }

    /// Handle one message, resolving "today" from the local clock. This
    /// is the only place the ambient clock is read; everything below
    /// takes the date explicitly.
    pub fn handle_message(&self, message: &InboundMessage) -> String {
        self.handle_message_on(message, Local::now().date_naive())
    }

    /// Handle one message with an explicit default date. Never fails:
    /// every handler error becomes a generic failure reply, so one bad
    /// message cannot take down the caller.
    #[instrument(skip(self, message), fields(context = %message.context_id))]
    pub fn handle_message_on(&self, message: &InboundMessage, today: NaiveDate) -> String {
        match self.dispatch(message, today) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "message handling failed");
                reply::generic_failure().to_string()
            }
        }
    }

    /// Store reachability, for health probes.
    pub fn ping(&self) -> Result<(), EngineError> {
        Ok(self.repo.ping()?)
    }

    fn dispatch(&self, message: &InboundMessage, today: NaiveDate) -> Result<String, EngineError> {
        let context = self.config.scope.resolve(&message.context_id);
        match classify(&message.text) {
            Classified::Malformed(FormatError::DeleteDate) => {
                Ok(reply::delete_format_help().to_string())
            }
            Classified::Malformed(FormatError::Range) => {
                Ok(reply::range_format_help().to_string())
            }
            Classified::Command(Intent::Export) => {
                export::run(&self.repo, self.export.as_ref(), &context)
            }
            Classified::Command(Intent::Delete { date, item }) => {
                delete::run(&self.repo, &context, date, item.as_deref())
            }
            Classified::Command(Intent::Summarize { start, end }) => {
                summarize::run(&self.repo, &context, start, end)
            }
            Classified::Command(Intent::Record { date, lines }) => {
                record::run(&self.repo, &context, date.unwrap_or(today), &lines)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::ContextId;
    use larder_store::Database;
    use std::sync::Mutex;

    /// Sink that records how many rows it was handed.
    struct StubSink {
        rows_seen: Mutex<Vec<usize>>,
    }

    impl StubSink {
        fn new() -> Self {
            Self {
                rows_seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ExportSink for StubSink {
        fn materialize(
            &self,
            entries: &[larder_core::LedgerEntry],
        ) -> Result<ExportArtifact, EngineError> {
            self.rows_seen.lock().unwrap().push(entries.len());
            Ok(ExportArtifact {
                id: larder_core::ExportId::from_raw("exp_test"),
                file_name: "exp_test.csv".into(),
                url: "https://larder.example/export/exp_test.csv".into(),
            })
        }
    }

    struct Fixture {
        engine: Engine,
        repo: EntryRepo,
        sink: Arc<StubSink>,
    }

    fn fixture_with_scope(scope: LedgerScope) -> Fixture {
        let db = Database::in_memory().unwrap();
        let sink = Arc::new(StubSink::new());
        Fixture {
            engine: Engine::new(
                EntryRepo::new(db.clone()),
                EngineConfig { scope },
                sink.clone(),
            ),
            repo: EntryRepo::new(db),
            sink,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_scope(LedgerScope::PerContext)
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage::new(ContextId::from_raw("C1"), text, "rtok")
    }

    fn msg_from(context: &str, text: &str) -> InboundMessage {
        InboundMessage::new(ContextId::from_raw(context), text, "rtok")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 8, 7)
    }

    #[test]
    fn record_with_date_line_stores_dated_entries() {
        let f = fixture();
        let reply = f
            .engine
            .handle_message_on(&msg("26 Jul 2025\nหมู 5 กก\nไก่ 3 กก"), today());

        assert!(reply.contains("26-07-2025"), "reply: {reply}");
        assert!(reply.contains("หมู 5 กก"), "reply: {reply}");
        assert!(reply.contains("ไก่ 3 กก"), "reply: {reply}");

        let stored = f
            .repo
            .query_by_date(&ContextId::from_raw("C1"), date(2025, 7, 26))
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].item, "หมู");
        assert_eq!(stored[1].item, "ไก่");
    }

    #[test]
    fn record_without_date_line_uses_today() {
        let f = fixture();
        f.engine.handle_message_on(&msg("หมู 5 กก"), today());

        let stored = f
            .repo
            .query_by_date(&ContextId::from_raw("C1"), today())
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn record_reports_skipped_lines_verbatim() {
        let f = fixture();
        let reply = f
            .engine
            .handle_message_on(&msg("หมู 5 กก\nอันนี้อ่านไม่ออก"), today());

        assert!(reply.contains("หมู 5 กก"));
        assert!(reply.contains("อันนี้อ่านไม่ออก"), "reply: {reply}");

        // only the good line was stored
        let stored = f.repo.query_all(&ContextId::from_raw("C1")).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn record_with_no_parsable_lines_gives_help_and_stores_nothing() {
        let f = fixture();
        let reply = f.engine.handle_message_on(&msg("สวัสดีครับ"), today());

        assert!(reply.contains("รูปแบบไม่ถูกต้อง"), "reply: {reply}");
        assert!(f.repo.query_all(&ContextId::from_raw("C1")).unwrap().is_empty());
    }

    #[test]
    fn summarize_sums_per_item_and_unit() {
        let f = fixture();
        f.engine
            .handle_message_on(&msg("5 Jul 2025\nหมู 5 กก"), today());
        f.engine
            .handle_message_on(&msg("20 Jul 2025\nหมู 3 กก"), today());

        let reply = f
            .engine
            .handle_message_on(&msg("1 Jul 2025 - 31 Jul 2025"), today());
        assert!(reply.contains("หมู (กก): 8"), "reply: {reply}");
    }

    #[test]
    fn summarize_keeps_mixed_units_separate() {
        let f = fixture();
        f.engine
            .handle_message_on(&msg("5 Jul 2025\nหมู 5 กก\nหมู 300 กรัม"), today());

        let reply = f
            .engine
            .handle_message_on(&msg("1 Jul 2025 - 31 Jul 2025"), today());
        assert!(reply.contains("หมู (กก): 5"), "reply: {reply}");
        assert!(reply.contains("หมู (กรัม): 300"), "reply: {reply}");
    }

    #[test]
    fn summarize_empty_range_says_no_data() {
        let f = fixture();
        let reply = f
            .engine
            .handle_message_on(&msg("1 Jan 2025 - 31 Jan 2025"), today());
        assert!(reply.contains("ไม่มีข้อมูล"), "reply: {reply}");
    }

    #[test]
    fn malformed_range_gets_format_error_not_record() {
        let f = fixture();
        let reply = f.engine.handle_message_on(&msg("เมื่อวาน - วันนี้"), today());
        assert!(reply.contains("รูปแบบช่วงวันที่"), "reply: {reply}");
        assert!(f.repo.query_all(&ContextId::from_raw("C1")).unwrap().is_empty());
    }

    #[test]
    fn delete_by_date_and_item_spares_other_items() {
        let f = fixture();
        f.engine
            .handle_message_on(&msg("26 Jul 2025\nหมู 5 กก\nไก่ 3 กก"), today());

        let reply = f.engine.handle_message_on(&msg("ลบ 26 Jul 2025 หมู"), today());
        assert!(reply.contains("1 รายการ"), "reply: {reply}");

        let remaining = f
            .repo
            .query_by_date(&ContextId::from_raw("C1"), date(2025, 7, 26))
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].item, "ไก่");
    }

    #[test]
    fn delete_with_no_matches_reports_nothing_found() {
        let f = fixture();
        let reply = f.engine.handle_message_on(&msg("ลบ 26 Jul 2025"), today());
        assert!(reply.contains("ไม่พบ"), "reply: {reply}");
    }

    #[test]
    fn malformed_delete_gets_format_error_and_no_mutation() {
        let f = fixture();
        f.engine.handle_message_on(&msg("26 Jul 2025\nหมู 5 กก"), today());

        let reply = f.engine.handle_message_on(&msg("ลบ อะไร สัก อย่าง"), today());
        assert!(reply.contains("รูปแบบลบ"), "reply: {reply}");
        assert_eq!(f.repo.query_all(&ContextId::from_raw("C1")).unwrap().len(), 1);
    }

    #[test]
    fn export_hands_all_rows_to_the_sink() {
        let f = fixture();
        f.engine
            .handle_message_on(&msg("26 Jul 2025\nหมู 5 กก\nไก่ 3 กก"), today());

        let reply = f.engine.handle_message_on(&msg("export"), today());
        assert!(reply.contains("https://larder.example/export/"), "reply: {reply}");
        assert_eq!(*f.sink.rows_seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn export_of_empty_ledger_still_replies_with_artifact() {
        let f = fixture();
        let reply = f.engine.handle_message_on(&msg("export"), today());
        assert!(reply.contains("ดาวน์โหลด"), "reply: {reply}");
        assert_eq!(*f.sink.rows_seen.lock().unwrap(), vec![0]);
    }

    #[test]
    fn per_context_scope_isolates_conversations() {
        let f = fixture();
        f.engine
            .handle_message_on(&msg_from("C1", "26 Jul 2025\nหมู 5 กก"), today());
        f.engine
            .handle_message_on(&msg_from("C2", "26 Jul 2025\nหมู 9 กก"), today());

        let reply = f
            .engine
            .handle_message_on(&msg_from("C1", "1 Jul 2025 - 31 Jul 2025"), today());
        assert!(reply.contains("หมู (กก): 5"), "reply: {reply}");
    }

    #[test]
    fn global_scope_merges_conversations() {
        let f = fixture_with_scope(LedgerScope::Global);
        f.engine
            .handle_message_on(&msg_from("C1", "26 Jul 2025\nหมู 5 กก"), today());
        f.engine
            .handle_message_on(&msg_from("C2", "26 Jul 2025\nหมู 3 กก"), today());

        let reply = f
            .engine
            .handle_message_on(&msg_from("C3", "1 Jul 2025 - 31 Jul 2025"), today());
        assert!(reply.contains("หมู (กก): 8"), "reply: {reply}");
    }

    #[test]
    fn store_failure_becomes_generic_failure_reply() {
        let db = Database::in_memory().unwrap();
        let engine = Engine::new(
            EntryRepo::new(db.clone()),
            EngineConfig::default(),
            Arc::new(StubSink::new()),
        );
        db.with_conn(|conn| {
            conn.execute_batch("DROP TABLE entries")
                .map_err(larder_store::StoreError::from)
        })
        .unwrap();

        let reply = engine.handle_message_on(&msg("หมู 5 กก"), today());
        assert!(reply.contains("ระบบขัดข้อง"), "reply: {reply}");
    }
}
