use crate::core::reorder::{reorder, transfer};
use crate::domain::model::{DragResult, Item, PoolKey, TransferRequest};
use crate::utils::error::{PlannerError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Result of dispatching a completed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 拖放到清單外，不做任何變更
    Cancelled,
    Reordered { pool: PoolKey, from: usize, to: usize },
    Transferred {
        from: PoolKey,
        to: PoolKey,
        source_index: usize,
        destination_index: usize,
    },
}

impl DispatchOutcome {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, DispatchOutcome::Cancelled)
    }
}

/// Snapshot of both pools. Mutating operations return a new snapshot and
/// leave `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pools {
    itinerary: Vec<Item>,
    candidates: Vec<Item>,
}

impl Pools {
    /// 建立時檢查 id 不重複
    pub fn new(itinerary: Vec<Item>, candidates: Vec<Item>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (key, pool) in [
            (PoolKey::Itinerary, &itinerary),
            (PoolKey::Candidates, &candidates),
        ] {
            for item in pool {
                if item.id.is_empty() {
                    return Err(PlannerError::ValidationError {
                        message: format!("Item '{}' in {} has an empty id", item.title, key),
                    });
                }
                if !seen.insert(item.id.as_str()) {
                    return Err(PlannerError::DuplicateIdentity {
                        id: item.id.clone(),
                        pool: key,
                    });
                }
            }
        }

        Ok(Self {
            itinerary,
            candidates,
        })
    }

    pub fn itinerary(&self) -> &[Item] {
        &self.itinerary
    }

    pub fn candidates(&self) -> &[Item] {
        &self.candidates
    }

    pub fn get(&self, key: PoolKey) -> &[Item] {
        match key {
            PoolKey::Itinerary => &self.itinerary,
            PoolKey::Candidates => &self.candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.itinerary.len() + self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which pool holds `id`, if any.
    pub fn locate(&self, id: &str) -> Option<(PoolKey, usize)> {
        [PoolKey::Itinerary, PoolKey::Candidates]
            .into_iter()
            .find_map(|key| {
                self.get(key)
                    .iter()
                    .position(|item| item.id == id)
                    .map(|index| (key, index))
            })
    }

    fn with_pool(&self, key: PoolKey, items: Vec<Item>) -> Self {
        let mut next = self.clone();
        match key {
            PoolKey::Itinerary => next.itinerary = items,
            PoolKey::Candidates => next.candidates = items,
        }
        next
    }

    /// Applies a completed gesture: cancelled gestures are a no-op, same-pool
    /// gestures reorder, cross-pool gestures transfer.
    pub fn apply(&self, gesture: &DragResult) -> Result<(Self, DispatchOutcome)> {
        let source = gesture.source;
        let Some(destination) = gesture.destination else {
            return Ok((self.clone(), DispatchOutcome::Cancelled));
        };

        if source.pool == destination.pool {
            let items = reorder(
                source.pool,
                self.get(source.pool),
                source.index,
                destination.index,
            )?;
            Ok((
                self.with_pool(source.pool, items),
                DispatchOutcome::Reordered {
                    pool: source.pool,
                    from: source.index,
                    to: destination.index,
                },
            ))
        } else {
            let (source_items, destination_items) = transfer(
                source.pool,
                self.get(source.pool),
                source.index,
                destination.pool,
                self.get(destination.pool),
                destination.index,
            )?;
            let next = self
                .with_pool(source.pool, source_items)
                .with_pool(destination.pool, destination_items);
            Ok((
                next,
                DispatchOutcome::Transferred {
                    from: source.pool,
                    to: destination.pool,
                    source_index: source.index,
                    destination_index: destination.index,
                },
            ))
        }
    }

    pub fn apply_transfer(&self, request: &TransferRequest) -> Result<(Self, DispatchOutcome)> {
        self.apply(&DragResult::from(*request))
    }

    /// 新增候選地點，id 與任一清單重複時拒絕
    pub fn append_candidate(&self, item: Item) -> Result<Self> {
        if item.id.is_empty() {
            return Err(PlannerError::ValidationError {
                message: format!("Candidate '{}' has an empty id", item.title),
            });
        }
        if let Some((pool, _)) = self.locate(&item.id) {
            return Err(PlannerError::DuplicateIdentity { id: item.id, pool });
        }

        let mut next = self.clone();
        next.candidates.push(item);
        Ok(next)
    }
}
