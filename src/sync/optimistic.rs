use crate::{
    error::{AppError, Result},
    models::interaction::InteractionKind,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::future::Future;

/// Structural optimistic transaction. A toggle moves through
/// `Idle → Requesting → Committed | RolledBack`: the local flip
/// (`apply`) lands before the request suspends, and exactly one of
/// commit (keep the flip) or `rollback` (revert it) follows the
/// response. Failure handling is forced by the shape — there is no way
/// to run the request without naming the rollback.
pub async fn optimistic<T, Fut>(
    apply: impl FnOnce(),
    request: Fut,
    rollback: impl FnOnce(),
) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    apply();
    match request.await {
        Ok(value) => Ok(value),
        Err(err) => {
            rollback();
            Err(err)
        }
    }
}

/// At most one live mutation per (entity, interaction kind) pair.
/// A second toggle while the first is still resolving is rejected;
/// the UI disables the control off `is_in_flight` for the duration.
#[derive(Default)]
pub struct InFlightTable {
    entries: DashMap<(i64, InteractionKind), ()>,
}

impl InFlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the pair. The returned guard releases the claim on drop,
    /// so early returns and failed requests cannot strand a pair in
    /// the requesting state.
    pub fn try_begin(&self, entity_id: i64, kind: InteractionKind) -> Result<InFlightGuard<'_>> {
        match self.entries.entry((entity_id, kind)) {
            Entry::Occupied(_) => Err(AppError::in_flight(&format!(
                "{} mutation for entity {} is still resolving",
                kind, entity_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlightGuard {
                    table: &self.entries,
                    key: (entity_id, kind),
                })
            }
        }
    }

    pub fn is_in_flight(&self, entity_id: i64, kind: InteractionKind) -> bool {
        self.entries.contains_key(&(entity_id, kind))
    }
}

pub struct InFlightGuard<'a> {
    table: &'a DashMap<(i64, InteractionKind), ()>,
    key: (i64, InteractionKind),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.table.remove(&self.key);
    }
}
