use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates an identifier for a list item created during an editing session.
///
/// Ids are time based and only unique within the current process, which is
/// enough because they are never compared across sessions.
pub fn generate_item_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, millis, seq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_item_id_is_unique_in_tight_loop() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_item_id("bank")).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generate_item_id_uses_prefix() {
        let id = generate_item_id("story");
        assert!(id.starts_with("story-"));
        assert_eq!(id.split('-').count(), 3);
    }
}
