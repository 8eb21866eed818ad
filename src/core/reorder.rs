// 拖放手勢背後的清單操作：只讀取傳入的 slice，回傳新的 Vec，失敗時不產生部分更新。

use crate::domain::model::{Item, PoolKey};
use crate::utils::error::{PlannerError, Result};

fn check_index(pool: PoolKey, index: usize, len: usize, allow_end: bool) -> Result<()> {
    let in_range = if allow_end { index <= len } else { index < len };
    if in_range {
        Ok(())
    } else {
        Err(PlannerError::InvalidIndex { pool, index, len })
    }
}

/// 將 `from` 位置的項目移到 `to`，其餘項目保持相對順序
pub fn reorder(pool: PoolKey, items: &[Item], from: usize, to: usize) -> Result<Vec<Item>> {
    check_index(pool, from, items.len(), false)?;
    check_index(pool, to, items.len(), false)?;

    let mut result = items.to_vec();
    if from != to {
        let moved = result.remove(from);
        result.insert(to, moved);
    }
    Ok(result)
}

/// Moves the item at `source_index` of `source` into `destination` at
/// `destination_index`. `destination_index == destination.len()` appends.
/// Returns `(source, destination)` after the move.
pub fn transfer(
    source_key: PoolKey,
    source: &[Item],
    source_index: usize,
    destination_key: PoolKey,
    destination: &[Item],
    destination_index: usize,
) -> Result<(Vec<Item>, Vec<Item>)> {
    check_index(source_key, source_index, source.len(), false)?;
    check_index(destination_key, destination_index, destination.len(), true)?;

    let mut source_clone = source.to_vec();
    let mut destination_clone = destination.to_vec();
    let moved = source_clone.remove(source_index);
    destination_clone.insert(destination_index, moved);

    Ok((source_clone, destination_clone))
}
