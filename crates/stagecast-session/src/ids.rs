//! Id generation for session-local graph nodes and backend records.

use std::collections::HashSet;

/// Alphabet for session-local graph node ids (lowercase hex).
const GRAPH_ID_ALPHABET: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Length of a session-local graph node id.
pub const GRAPH_ID_LEN: usize = 8;

/// Generates a fresh 8-char hex id that is not in `taken`.
///
/// Eight hex chars are plenty for a single editing session, but collisions
/// are still checked rather than assumed away.
pub fn new_graph_id(taken: &HashSet<String>) -> String {
    loop {
        let id = nanoid::nanoid!(GRAPH_ID_LEN, &GRAPH_ID_ALPHABET);
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Generates an opaque backend record id.
pub fn new_record_id() -> String {
    nanoid::nanoid!()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_spec::is_session_graph_id;

    #[test]
    fn test_graph_id_format() {
        let id = new_graph_id(&HashSet::new());
        assert_eq!(id.len(), GRAPH_ID_LEN);
        assert!(is_session_graph_id(&id));
    }

    #[test]
    fn test_graph_id_avoids_taken_set() {
        // Generate a batch, then require fresh ids to dodge all of them.
        let mut taken = HashSet::new();
        for _ in 0..64 {
            taken.insert(new_graph_id(&taken));
        }
        for _ in 0..64 {
            let id = new_graph_id(&taken);
            assert!(!taken.contains(&id));
        }
    }

    #[test]
    fn test_record_id_nonempty_and_distinct() {
        let a = new_record_id();
        let b = new_record_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
