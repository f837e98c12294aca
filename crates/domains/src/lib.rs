//! guestbook/crates/domains/src/lib.rs
//!
//! Entities, error taxonomy, and port definitions for the guestbook.

pub mod errors;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;

#[cfg(test)]
mod tests {
    use super::models::*;
    use uuid::Uuid;

    #[test]
    fn test_message_creation_v7() {
        let author = Uuid::now_v7();
        let root = Message::new(author, "Hello Rust!".to_string(), None);
        let reply = Message::new(author, "Hi back".to_string(), Some(root.id));

        assert!(!root.is_reply());
        assert!(reply.is_reply());
        assert_ne!(reply.id, root.id);
        assert!(reply.id > root.id, "v7 ids sort by creation time");
    }

    #[test]
    fn display_name_precedence() {
        let mut author = AuthorSummary {
            username: Some("alice".into()),
            display_username: Some("Alice".into()),
            name: Some("Alice Liddell".into()),
        };
        assert_eq!(author.display_name(), Some("Alice"));

        author.display_username = None;
        assert_eq!(author.display_name(), Some("alice"));

        author.username = None;
        assert_eq!(author.display_name(), Some("Alice Liddell"));

        author.name = None;
        assert_eq!(author.display_name(), None);
    }

    #[test]
    fn pagination_for_125_messages() {
        let first = Pagination::new(1, 50, 125);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let last = Pagination::new(3, 50, 125);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let beyond = Pagination::new(4, 50, 125);
        assert!(!beyond.has_next);
        assert!(beyond.has_prev);
    }

    #[test]
    fn pagination_for_empty_feed() {
        let page = Pagination::new(1, 20, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn feed_entry_serializes_flat() {
        let message = Message::new(Uuid::now_v7(), "hi".into(), None);
        let entry = FeedEntry {
            message: message.clone(),
            author: None,
            reply_to: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["body"], "hi");
        assert_eq!(json["id"], message.id.to_string());
        assert!(json["reply_to"].is_null());
    }
}
