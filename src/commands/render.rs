//! Text reports for the `msglog` command

use crate::engine::RecentView;
use crate::types::{BulkDeletionRecord, DeletionRecord, EditRecord, LoggerStats};
use crate::utils::{format_timestamp, truncate};

/// Most deletions or edits shown in one report
pub const RECENT_LIMIT: usize = 10;

/// Most bulk deletions shown in one report
pub const BULK_LIMIT: usize = 5;

pub const HELP_TEXT: &str = "**Message Logger Commands:**\n\n\
/msglog deleted - View recently deleted messages\n\
/msglog edited - View recently edited messages\n\
/msglog bulk - View bulk deletion events\n\
/msglog stats - View logging statistics\n\
/msglog clear - Clear all logs";

pub const CLEARED_TEXT: &str = "Message logs cleared.";

pub fn render_deleted(view: &RecentView<DeletionRecord>) -> String {
    if view.is_empty() {
        return "No deleted messages logged.".to_string();
    }

    let mut out = format!("**Deleted Messages ({}):**\n\n", view.total);
    for (index, entry) in view.records.iter().enumerate() {
        out.push_str(&format!(
            "**{}.** {} in #{}\n",
            index + 1,
            entry.author.tag(),
            entry.channel_name
        ));
        out.push_str(&format!("   Content: {}\n", truncate(&entry.content, 150)));
        if !entry.attachments.is_empty() {
            out.push_str(&format!("   Attachments: {}\n", entry.attachments.len()));
        }
        out.push_str(&format!("   Deleted: {}\n\n", format_timestamp(entry.deleted_at)));
    }
    out
}

pub fn render_edited(view: &RecentView<EditRecord>) -> String {
    if view.is_empty() {
        return "No edited messages logged.".to_string();
    }

    let mut out = format!("**Edited Messages ({}):**\n\n", view.total);
    for (index, entry) in view.records.iter().enumerate() {
        out.push_str(&format!(
            "**{}.** {} in #{}\n",
            index + 1,
            entry.author.tag(),
            entry.channel_name
        ));
        out.push_str(&format!("   Old: {}\n", truncate(&entry.old_content, 100)));
        out.push_str(&format!("   New: {}\n", truncate(&entry.new_content, 100)));
        out.push_str(&format!("   Edited: {}\n\n", format_timestamp(entry.edited_at)));
    }
    out
}

pub fn render_bulk(view: &RecentView<BulkDeletionRecord>) -> String {
    if view.is_empty() {
        return "No bulk deletions logged.".to_string();
    }

    let mut out = format!("**Bulk Deletions ({}):**\n\n", view.total);
    for (index, entry) in view.records.iter().enumerate() {
        out.push_str(&format!(
            "**{}.** {} messages in #{}\n",
            index + 1,
            entry.message_count,
            entry.channel_name
        ));
        if entry.unresolved_count() > 0 {
            out.push_str(&format!(
                "   Recovered: {} of {}\n",
                entry.messages.len(),
                entry.message_count
            ));
        }
        out.push_str(&format!("   Deleted: {}\n\n", format_timestamp(entry.deleted_at)));
    }
    out
}

pub fn render_stats(stats: &LoggerStats) -> String {
    format!(
        "**Message Logger Statistics:**\n\n\
         Deleted Messages: {}\n\
         Edited Messages: {}\n\
         Bulk Deletions: {}\n\
         Cached Messages: {}",
        stats.deleted_count,
        stats.edited_count,
        stats.bulk_deleted_count,
        stats.cached_message_count
    )
}
