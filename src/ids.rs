// Identifier generation
// The store never mints ids itself; callers hand it a generator.

use crate::friend::FriendId;

/// Produces friend ids unique for the lifetime of a store
pub trait IdGenerator {
    fn next_id(&mut self) -> FriendId;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> FriendId {
        FriendId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Deterministic ids: `{prefix}{n}` with n counting from 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> FriendId {
        let id = FriendId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> FriendId,
{
    fn next_id(&mut self) -> FriendId {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_generator_unique() {
        let mut ids = UuidGenerator;
        let seen: HashSet<FriendId> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("D");
        assert_eq!(ids.next_id().as_str(), "D1");
        assert_eq!(ids.next_id().as_str(), "D2");
    }

    #[test]
    fn test_closure_generator() {
        let mut fixed = || FriendId::from("fixed");
        assert_eq!(IdGenerator::next_id(&mut fixed).as_str(), "fixed");
    }
}
