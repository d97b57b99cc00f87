use std::time::Duration;

use chrono::{DateTime, TimeZone};

use super::dedup::CommandDeduplicator;
use super::staleness::{StalenessFilter, StalenessVerdict};
use crate::clipboard::ClipboardEntry;
use crate::ids::CommandId;
use crate::typing::{TypingCommand, TypingCommandError};

/// What to do with a typing-command entry seen on the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDecision {
    Execute(TypingCommand),
    /// Already executed or rejected during this run.
    Duplicate(CommandId),
    /// Issued too long before the agent started.
    Stale { command_id: CommandId, lag: Duration },
    /// Payload could not be decoded; ignored for this tick.
    Malformed(TypingCommandError),
}

/// Route a typing-command entry through dedup and staleness checks.
///
/// Every decision except `Malformed` leaves the command id in `processed`,
/// so a command is evaluated once per run no matter how often it is re-polled.
pub fn admit_command<Tz: TimeZone>(
    entry: &ClipboardEntry,
    processed: &mut CommandDeduplicator,
    filter: &StalenessFilter,
    start_time: &DateTime<Tz>,
) -> CommandDecision {
    let command = match entry.typing_command() {
        Ok(command) => command,
        Err(err) => return CommandDecision::Malformed(err),
    };

    if processed.seen(&command.command_id) {
        return CommandDecision::Duplicate(command.command_id);
    }

    // Unparseable timestamps fall through as unknown origin.
    let origin = entry.origin_timestamp().and_then(Result::ok);

    match filter.evaluate(origin, start_time) {
        StalenessVerdict::Stale { lag } => {
            processed.mark_seen(command.command_id.clone());
            CommandDecision::Stale {
                command_id: command.command_id,
                lag,
            }
        }
        StalenessVerdict::Fresh { .. } | StalenessVerdict::UnknownOrigin => {
            processed.mark_seen(command.command_id.clone());
            CommandDecision::Execute(command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ContentType;
    use chrono::{Local, SecondsFormat, Utc};

    fn command_entry(id: &str, issued: Option<String>) -> ClipboardEntry {
        let command = TypingCommand::new(CommandId::new(id), "hello", Some(50));
        ClipboardEntry {
            id: None,
            content: command.encode().unwrap(),
            content_type: ContentType::TypingCommand,
            timestamp: issued,
        }
    }

    fn iso_utc(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    #[test]
    fn test_fresh_command_executes_once() {
        let start = Local::now();
        let issued = iso_utc(start.with_timezone(&Utc) - chrono::Duration::seconds(3));
        let entry = command_entry("c1", Some(issued));
        let mut processed = CommandDeduplicator::default();
        let filter = StalenessFilter::default();

        let first = admit_command(&entry, &mut processed, &filter, &start);
        let second = admit_command(&entry, &mut processed, &filter, &start);

        assert!(matches!(first, CommandDecision::Execute(ref c) if c.content == "hello"));
        assert_eq!(second, CommandDecision::Duplicate(CommandId::new("c1")));
    }

    #[test]
    fn test_stale_command_is_marked_seen() {
        let start = Local::now();
        let issued = iso_utc(start.with_timezone(&Utc) - chrono::Duration::seconds(60));
        let entry = command_entry("old", Some(issued));
        let mut processed = CommandDeduplicator::default();
        let filter = StalenessFilter::default();

        let decision = admit_command(&entry, &mut processed, &filter, &start);

        assert!(matches!(decision, CommandDecision::Stale { .. }));
        assert!(processed.seen(&CommandId::new("old")));
        assert_eq!(
            admit_command(&entry, &mut processed, &filter, &start),
            CommandDecision::Duplicate(CommandId::new("old"))
        );
    }

    #[test]
    fn test_unparseable_timestamp_fails_open() {
        let entry = command_entry("c2", Some("not-a-time".to_string()));
        let mut processed = CommandDeduplicator::default();

        let decision = admit_command(
            &entry,
            &mut processed,
            &StalenessFilter::default(),
            &Local::now(),
        );

        assert!(matches!(decision, CommandDecision::Execute(_)));
    }

    #[test]
    fn test_missing_timestamp_fails_open() {
        let entry = command_entry("c3", None);
        let mut processed = CommandDeduplicator::default();

        let decision = admit_command(
            &entry,
            &mut processed,
            &StalenessFilter::default(),
            &Local::now(),
        );

        assert!(matches!(decision, CommandDecision::Execute(_)));
    }

    #[test]
    fn test_malformed_payload_is_not_remembered() {
        let entry = ClipboardEntry {
            id: None,
            content: "{not json".to_string(),
            content_type: ContentType::TypingCommand,
            timestamp: None,
        };
        let mut processed = CommandDeduplicator::default();

        let decision = admit_command(
            &entry,
            &mut processed,
            &StalenessFilter::default(),
            &Local::now(),
        );

        assert!(matches!(decision, CommandDecision::Malformed(_)));
        assert!(processed.is_empty());
    }

    #[test]
    fn test_malformed_decision_keeps_decode_error() {
        let entry = ClipboardEntry {
            id: None,
            content: r#"{"action":"open_url","command_id":"c4"}"#.to_string(),
            content_type: ContentType::TypingCommand,
            timestamp: None,
        };
        let mut processed = CommandDeduplicator::default();

        let decision = admit_command(
            &entry,
            &mut processed,
            &StalenessFilter::default(),
            &Local::now(),
        );
        let reported = decision.clone();

        assert_eq!(
            reported,
            CommandDecision::Malformed(TypingCommandError::UnsupportedAction(Some(
                "open_url".to_string()
            )))
        );
        assert_eq!(decision, reported);
    }
}
