use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub id: Uuid,
    pub reason: String,
}

/// Outcome of a best-effort batch: each id is attempted independently and
/// a failed item never aborts its siblings.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    pub fn push_ok(&mut self, item: T) {
        self.succeeded.push(item);
    }

    pub fn push_err(&mut self, id: Uuid, reason: impl Into<String>) {
        self.failed.push(BatchFailure { id, reason: reason.into() });
    }

    pub fn total_requested(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn failed_ids(&self) -> Vec<Uuid> {
        self.failed.iter().map(|f| f.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_both_outcomes() {
        let mut batch: BatchResult<u32> = BatchResult::default();
        batch.push_ok(1);
        let missing = Uuid::new_v4();
        batch.push_err(missing, "not found");
        batch.push_ok(3);

        assert_eq!(batch.total_requested(), 3);
        assert_eq!(batch.succeeded, vec![1, 3]);
        assert_eq!(batch.failed_ids(), vec![missing]);
    }
}
