//! Correlation of bus notifications with cached snapshots
//!
//! Each entry point takes the state write lock for its whole sequence. A
//! notification for an id with no cached snapshot is unobservable and is
//! dropped without error.

use tracing::debug;

use crate::directory::Directory;
use crate::types::{
    AuthorInfo, BulkDeletionRecord, BulkMember, DeletionRecord, EditRecord, LogRecord,
    MessageAuthor, MessageSnapshot, UNKNOWN_CHANNEL, UNKNOWN_DISCRIMINATOR, UNKNOWN_USERNAME,
};
use crate::utils::now_millis;

use super::MessageLogger;

/// Cache a newly created message
pub fn on_create(logger: &MessageLogger, message: MessageSnapshot) {
    let mut state = logger.state.write();
    state.cache.put(message);
}

/// Record a deletion if the message was observed while live
///
/// The snapshot stays cached, so a repeated delete for the same id records
/// again.
pub fn on_delete(logger: &MessageLogger, channel_id: &str, message_id: &str) -> Option<DeletionRecord> {
    let record = {
        let mut state = logger.state.write();
        let Some(message) = state.cache.get(message_id) else {
            debug!(message_id, "Delete for uncached message ignored");
            return None;
        };

        let (channel_name, guild_id) = resolve_channel(logger.directory.as_ref(), channel_id);
        let record = DeletionRecord {
            message_id: message_id.to_string(),
            channel_id: channel_id.to_string(),
            channel_name,
            guild_id,
            content: message.content.clone(),
            author: resolve_author(logger.directory.as_ref(), &[&message.author]),
            timestamp: message.timestamp.clone(),
            deleted_at: now_millis(),
            attachments: message.attachments.clone(),
            embeds: message.embeds.clone(),
        };
        state.deleted.record(record.clone());
        record
    };

    publish(logger, LogRecord::Deleted(record.clone()));
    Some(record)
}

/// Record an edit if the content actually changed
///
/// A no-op edit (same content, e.g. an embed resolving) leaves the cached
/// snapshot untouched. A real edit replaces it wholesale with `message`.
pub fn on_update(logger: &MessageLogger, message: MessageSnapshot) -> Option<EditRecord> {
    let record = {
        let mut state = logger.state.write();
        let Some(prior) = state.cache.get(&message.id) else {
            debug!(message_id = %message.id, "Update for uncached message ignored");
            return None;
        };
        if prior.content == message.content {
            debug!(message_id = %message.id, "Update without content change ignored");
            return None;
        }

        let channel_id = message
            .channel_id
            .clone()
            .or_else(|| prior.channel_id.clone())
            .unwrap_or_default();
        let (channel_name, guild_id) = resolve_channel(logger.directory.as_ref(), &channel_id);
        let record = EditRecord {
            message_id: message.id.clone(),
            channel_id,
            channel_name,
            guild_id,
            old_content: prior.content.clone(),
            new_content: message.content.clone(),
            author: resolve_author(logger.directory.as_ref(), &[&message.author, &prior.author]),
            original_timestamp: prior.timestamp.clone(),
            edited_at: now_millis(),
        };
        state.edited.record(record.clone());
        state.cache.put(message);
        record
    };

    publish(logger, LogRecord::Edited(record.clone()));
    Some(record)
}

/// Record a bulk deletion
///
/// Ids without a cached snapshot are left out of `messages`, while
/// `message_count` keeps the number of ids the host reported. `requested` can
/// exceed `message_ids.len()` when some reported ids were unusable.
pub fn on_bulk_delete(
    logger: &MessageLogger,
    channel_id: &str,
    message_ids: &[String],
    requested: usize,
) -> BulkDeletionRecord {
    let record = {
        let mut state = logger.state.write();
        let directory = logger.directory.as_ref();

        let messages: Vec<BulkMember> = message_ids
            .iter()
            .filter_map(|id| {
                let message = state.cache.get(id)?;
                Some(BulkMember {
                    message_id: id.clone(),
                    content: message.content.clone(),
                    author: resolve_author(directory, &[&message.author]),
                    timestamp: message.timestamp.clone(),
                })
            })
            .collect();

        let (channel_name, guild_id) = resolve_channel(directory, channel_id);
        let record = BulkDeletionRecord {
            channel_id: channel_id.to_string(),
            channel_name,
            guild_id,
            message_count: requested.max(message_ids.len()),
            messages,
            deleted_at: now_millis(),
        };
        if record.unresolved_count() > 0 {
            debug!(
                channel_id,
                unresolved = record.unresolved_count(),
                "Bulk delete included uncached messages"
            );
        }
        state.bulk_deleted.record(record.clone());
        record
    };

    publish(logger, LogRecord::BulkDeleted(record.clone()));
    record
}

/// Hand a record to the observer outside the state lock
fn publish(logger: &MessageLogger, record: LogRecord) {
    if logger.config.read().show_notifications {
        logger.observer.notify(&record);
    }
}

/// Channel name and guild id, falling back to the placeholder name
fn resolve_channel(directory: &dyn Directory, channel_id: &str) -> (String, Option<String>) {
    match directory.channel(channel_id) {
        Some(channel) => {
            let name = non_empty(Some(channel.name.as_str()))
                .unwrap_or(UNKNOWN_CHANNEL)
                .to_string();
            (name, channel.guild_id)
        }
        None => (UNKNOWN_CHANNEL.to_string(), None),
    }
}

/// Resolve an author field by field
///
/// Each field takes the first non-empty value from: the user directory (looked
/// up by the first known author id), then each embedded author in order, then
/// the literal placeholder.
fn resolve_author(directory: &dyn Directory, embedded: &[&MessageAuthor]) -> AuthorInfo {
    let id = embedded.iter().find_map(|author| author.id.clone());
    let known = id.as_deref().and_then(|id| directory.user(id));

    let username = std::iter::once(known.as_ref().map(|u| u.username.as_str()))
        .chain(embedded.iter().map(|author| author.username.as_deref()))
        .find_map(non_empty)
        .unwrap_or(UNKNOWN_USERNAME)
        .to_string();
    let discriminator = std::iter::once(known.as_ref().map(|u| u.discriminator.as_str()))
        .chain(embedded.iter().map(|author| author.discriminator.as_deref()))
        .find_map(non_empty)
        .unwrap_or(UNKNOWN_DISCRIMINATOR)
        .to_string();

    AuthorInfo {
        id,
        username,
        discriminator,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ChannelInfo, NoDirectory, StaticDirectory, UserInfo};

    #[test]
    fn test_author_prefers_directory() {
        let dir = StaticDirectory::new();
        dir.insert_user("42", UserInfo::new("alice", "1234"));
        let embedded = MessageAuthor::new("42", "old-name", "9999");

        let author = resolve_author(&dir, &[&embedded]);
        assert_eq!(author.tag(), "alice#1234");
        assert_eq!(author.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_author_falls_back_per_field() {
        let dir = StaticDirectory::new();
        dir.insert_user("42", UserInfo::new("alice", ""));
        let embedded = MessageAuthor::new("42", "", "5678");

        assert_eq!(resolve_author(&dir, &[&embedded]).tag(), "alice#5678");
    }

    #[test]
    fn test_author_literal_placeholders() {
        let author = resolve_author(&NoDirectory, &[&MessageAuthor::default()]);
        assert_eq!(author.tag(), "Unknown#0000");
        assert_eq!(author.id, None);
    }

    #[test]
    fn test_author_uses_later_embedded_authors() {
        let partial = MessageAuthor::default();
        let prior = MessageAuthor::new("42", "bob", "0001");

        assert_eq!(resolve_author(&NoDirectory, &[&partial, &prior]).tag(), "bob#0001");
    }

    #[test]
    fn test_channel_resolution() {
        let dir = StaticDirectory::new();
        dir.insert_channel("7", ChannelInfo::new("general", Some("99")));
        dir.insert_channel("8", ChannelInfo::new("", None));

        assert_eq!(
            resolve_channel(&dir, "7"),
            ("general".to_string(), Some("99".to_string()))
        );
        assert_eq!(resolve_channel(&dir, "8").0, UNKNOWN_CHANNEL);
        assert_eq!(resolve_channel(&dir, "9"), (UNKNOWN_CHANNEL.to_string(), None));
    }
}
