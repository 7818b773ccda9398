//! Category-priority stabilization
//!
//! Starting from a valid topological order, adjacent packages are swapped
//! when the later one has a strictly better category rank and neither
//! declares a direct ordering relation on the other. Only adjacent,
//! unrelated pairs move, so every other precedence is preserved and the
//! order stays topologically valid. Full passes repeat until one makes no
//! swap.

use serde::Serialize;

use loadout_core::types::{Catalog, CategoryPriority, Package, PackageId, UNLISTED_RANK};

/// Work done by one stabilization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StabilizeStats {
    /// Full scans over the sequence, including the final clean one
    pub passes: usize,
    /// Adjacent swaps performed
    pub swaps: usize,
}

/// Whether two adjacent packages may trade places
///
/// Forbidden when either declares a `requires`, `load_after` or
/// `load_before` relation on the other.
pub fn can_swap(first: &Package, second: &Package) -> bool {
    !first.is_ordered_with(second)
}

/// Reorder `order` toward category priority
///
/// Ids the catalog does not know keep their slot and never swap.
pub fn stabilize(
    catalog: &Catalog,
    order: &[PackageId],
    priority: &CategoryPriority,
) -> (Vec<PackageId>, StabilizeStats) {
    let mut slots: Vec<(&PackageId, Option<&Package>)> =
        order.iter().map(|id| (id, catalog.get(id))).collect();

    let stats = bubble(
        &mut slots,
        |(_, package)| package.map_or(UNLISTED_RANK, |p| priority.rank(&p.category)),
        |(_, first), (_, second)| match (first, second) {
            (Some(first), Some(second)) => can_swap(first, second),
            _ => false,
        },
    );

    let order = slots.into_iter().map(|(id, _)| id.clone()).collect();
    (order, stats)
}

/// Adjacent-swap passes until a fixed point
fn bubble<T, R, S>(items: &mut [T], rank: R, swappable: S) -> StabilizeStats
where
    R: Fn(&T) -> usize,
    S: Fn(&T, &T) -> bool,
{
    let mut stats = StabilizeStats::default();
    if items.len() < 2 {
        return stats;
    }

    loop {
        stats.passes += 1;
        let mut swapped = false;

        for i in 0..items.len() - 1 {
            if rank(&items[i + 1]) < rank(&items[i]) && swappable(&items[i], &items[i + 1]) {
                items.swap(i, i + 1);
                stats.swaps += 1;
                swapped = true;
            }
        }

        if !swapped {
            return stats;
        }
    }
}
