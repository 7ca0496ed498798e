//! Property-based tests for rust_pooled_logger using proptest

use proptest::prelude::*;
use rust_pooled_logger::core::formatter::split_package_name;
use rust_pooled_logger::core::pool;
use rust_pooled_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// A message is emitted iff the configured level is at least as verbose
    #[test]
    fn test_level_gating(configured in any_level(), message in any_level()) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level(configured)
            .output(sink.clone())
            .formatter(Formatter::plain())
            .build();

        // panic and fatal levels abort, so gate them through `enabled`
        if message <= LogLevel::Fatal {
            prop_assert_eq!(logger.enabled(message), configured as u8 >= message as u8);
        } else {
            logger.log(message, "probe");
            prop_assert_eq!(!sink.is_empty(), configured as u8 >= message as u8);
        }
    }

    #[test]
    fn test_level_text_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.as_text().parse().unwrap();
        prop_assert_eq!(parsed, level);
        let parsed: LogLevel = level.to_str().to_uppercase().parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Display falls back to "trace" while conversion fails closed
    #[test]
    fn test_unknown_raw_level(raw in 7u32..) {
        prop_assert_eq!(LogLevel::name_of(raw), "trace");
        prop_assert!(LogLevel::try_from(raw).is_err());
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// N newline separated parts render as N complete lines
    #[test]
    fn test_multiline_line_count(parts in prop::collection::vec("[a-z]{1,12}", 1..8)) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .output(sink.clone())
            .formatter(Formatter::plain())
            .build();
        logger.info(parts.join("\n"));

        let out = sink.contents_string();
        let lines: Vec<&str> = out.lines().collect();
        prop_assert_eq!(lines.len(), parts.len());
        for (line, part) in lines.iter().zip(&parts) {
            let expected = format!("[info] {} [ ", part);
            prop_assert!(line.contains(&expected));
            prop_assert!(line.contains("property_tests.rs:"));
        }
    }

    #[test]
    fn test_split_rust_path(segments in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 2..6)) {
        let qualified = segments.join("::");
        let (dir, func) = split_package_name(&qualified);
        prop_assert_eq!(&func, segments.last().unwrap());
        prop_assert_eq!(dir, segments[..segments.len() - 1].join("/"));
    }
}

// ============================================================================
// Pool Tests
// ============================================================================

proptest! {
    /// Whatever a released entry held, the next acquire reads back empty
    #[test]
    fn test_entry_reuse_is_clean(message in ".{0,64}", trace_id in "[0-9a-f]{0,16}", prefix in ".{0,8}") {
        let mut entry = pool::acquire_entry();
        entry.message.push_str(&message);
        entry.trace_id.push_str(&trace_id);
        entry.prefix.extend_from_slice(prefix.as_bytes());
        entry.caller_func.push_str("handler");
        pool::release_entry(entry);

        let entry = pool::acquire_entry();
        prop_assert!(entry.message.is_empty());
        prop_assert!(entry.trace_id.is_empty());
        prop_assert!(entry.prefix.is_empty());
        prop_assert!(entry.caller_func.is_empty());
        prop_assert_eq!(entry.pid, std::process::id());
        pool::release_entry(entry);
    }
}
