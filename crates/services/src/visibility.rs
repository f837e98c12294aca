//! # Visibility
//!
//! Applies a viewer's ignore list to an already-fetched feed page.
//!
//! Filtering happens after pagination, so a filtered page can hold fewer
//! than `page_size` entries. Pagination metadata still describes the
//! unfiltered feed.

use domains::FeedEntry;

/// Drops entries whose author display name is in `ignored_usernames`,
/// unless `show_ignored` is set. Entries without a display name always stay.
pub fn apply_ignore_filter(
    entries: Vec<FeedEntry>,
    ignored_usernames: &[String],
    show_ignored: bool,
) -> Vec<FeedEntry> {
    if show_ignored || ignored_usernames.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .filter(|entry| match entry.author_display_name() {
            Some(name) => !ignored_usernames.iter().any(|ignored| ignored == name),
            None => true,
        })
        .collect()
}
