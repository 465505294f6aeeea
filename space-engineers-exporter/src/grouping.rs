//! Grid grouping: power state x size class buckets, with PCU per owner.
//!
//! The owner set is taken from the whole grid list, so every bucket reports
//! every owner, with an explicit zero where the owner has no matching grid.

use std::collections::{BTreeMap, BTreeSet};

use vrage_client::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridSize {
    Large,
    Small,
}

impl GridSize {
    /// Anything other than the two known classes is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Large" => Some(GridSize::Large),
            "Small" => Some(GridSize::Small),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridSize::Large => "Large",
            GridSize::Small => "Small",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub powered: bool,
    pub size: GridSize,
}

impl BucketKey {
    pub const ALL: [BucketKey; 4] = [
        BucketKey { powered: true, size: GridSize::Large },
        BucketKey { powered: true, size: GridSize::Small },
        BucketKey { powered: false, size: GridSize::Large },
        BucketKey { powered: false, size: GridSize::Small },
    ];

    pub fn of(grid: &Grid) -> Option<Self> {
        GridSize::parse(&grid.grid_size).map(|size| BucketKey {
            powered: grid.is_powered,
            size,
        })
    }

    fn index(&self) -> usize {
        match (self.powered, self.size) {
            (true, GridSize::Large) => 0,
            (true, GridSize::Small) => 1,
            (false, GridSize::Large) => 2,
            (false, GridSize::Small) => 3,
        }
    }

    pub fn powered_label(&self) -> &'static str {
        if self.powered { "true" } else { "false" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: BucketKey,
    pub count: u64,
    pub pcu: u64,
    /// Contains every owner from the full grid list
    pub pcu_by_owner: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    pub owners: BTreeSet<String>,
    /// Always four entries, ordered as [`BucketKey::ALL`]
    pub buckets: Vec<Bucket>,
}

impl GridSummary {
    pub fn bucket(&self, powered: bool, size: GridSize) -> &Bucket {
        &self.buckets[BucketKey { powered, size }.index()]
    }
}

pub fn summarize_grids(grids: &[Grid]) -> GridSummary {
    let owners: BTreeSet<String> = grids
        .iter()
        .map(|g| g.owner_display_name.clone())
        .collect();

    let mut buckets: Vec<Bucket> = BucketKey::ALL
        .iter()
        .map(|key| Bucket {
            key: *key,
            count: 0,
            pcu: 0,
            pcu_by_owner: owners.iter().map(|o| (o.clone(), 0)).collect(),
        })
        .collect();

    for grid in grids {
        let Some(key) = BucketKey::of(grid) else {
            tracing::trace!(
                grid = %grid.display_name,
                size = %grid.grid_size,
                "Skipping grid with unknown size class"
            );
            continue;
        };
        let bucket = &mut buckets[key.index()];
        bucket.count += 1;
        bucket.pcu += grid.pcu;
        if let Some(sum) = bucket.pcu_by_owner.get_mut(&grid.owner_display_name) {
            *sum += grid.pcu;
        }
    }

    GridSummary { owners, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: &str, powered: bool, owner: &str, pcu: u64) -> Grid {
        Grid {
            grid_size: size.to_string(),
            is_powered: powered,
            owner_display_name: owner.to_string(),
            pcu,
            ..Default::default()
        }
    }

    #[test]
    fn test_three_grid_scenario() {
        let grids = vec![
            grid("Large", true, "A", 10),
            grid("Large", true, "B", 5),
            grid("Small", false, "A", 2),
        ];
        let summary = summarize_grids(&grids);
        assert_eq!(summary.owners.len(), 2);

        let b = summary.bucket(true, GridSize::Large);
        assert_eq!(b.count, 2);
        assert_eq!(b.pcu_by_owner["A"], 10);
        assert_eq!(b.pcu_by_owner["B"], 5);

        let b = summary.bucket(false, GridSize::Small);
        assert_eq!(b.count, 1);
        assert_eq!(b.pcu_by_owner["A"], 2);
        assert_eq!(b.pcu_by_owner["B"], 0);

        for (powered, size) in [(true, GridSize::Small), (false, GridSize::Large)] {
            let b = summary.bucket(powered, size);
            assert_eq!(b.count, 0);
            assert_eq!(b.pcu_by_owner.len(), 2);
            assert!(b.pcu_by_owner.values().all(|v| *v == 0));
        }
    }

    #[test]
    fn test_unknown_size_is_excluded() {
        let grids = vec![
            grid("Large", true, "A", 10),
            grid("Medium", true, "A", 1000),
            grid("", false, "C", 7),
        ];
        let summary = summarize_grids(&grids);

        let total: u64 = summary.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 1);
        // C owns only an unrecognized grid but is still a known owner
        assert!(summary.owners.contains("C"));
        assert!(summary.buckets.iter().all(|b| b.pcu_by_owner["C"] == 0));
        assert_eq!(summary.bucket(true, GridSize::Large).pcu_by_owner["A"], 10);
    }

    #[test]
    fn test_empty_owner_is_distinct() {
        let grids = vec![grid("Small", true, "", 3), grid("Small", true, "A", 4)];
        let summary = summarize_grids(&grids);
        assert_eq!(summary.owners.len(), 2);
        let b = summary.bucket(true, GridSize::Small);
        assert_eq!(b.pcu_by_owner[""], 3);
        assert_eq!(b.pcu_by_owner["A"], 4);
    }

    #[test]
    fn test_empty_list() {
        let summary = summarize_grids(&[]);
        assert!(summary.owners.is_empty());
        assert_eq!(summary.buckets.len(), 4);
        assert!(summary.buckets.iter().all(|b| b.count == 0 && b.pcu_by_owner.is_empty()));
    }

    #[test]
    fn test_partition_and_owner_sums_hold() {
        let sizes = ["Large", "Small", "Huge", ""];
        let owners = ["A", "B", "", "Cora"];
        let grids: Vec<Grid> = (0..200u64)
            .map(|i| {
                grid(
                    sizes[(i * 7 % 4) as usize],
                    i % 3 == 0,
                    owners[(i * 5 % 4) as usize],
                    i * 13 % 97,
                )
            })
            .collect();
        let summary = summarize_grids(&grids);

        let recognized = grids
            .iter()
            .filter(|g| GridSize::parse(&g.grid_size).is_some())
            .count() as u64;
        let counted: u64 = summary.buckets.iter().map(|b| b.count).sum();
        assert_eq!(counted, recognized);

        for bucket in &summary.buckets {
            assert_eq!(bucket.pcu_by_owner.len(), summary.owners.len());
            let owner_total: u64 = bucket.pcu_by_owner.values().sum();
            assert_eq!(owner_total, bucket.pcu);

            let expected: u64 = grids
                .iter()
                .filter(|g| BucketKey::of(g) == Some(bucket.key))
                .map(|g| g.pcu)
                .sum();
            assert_eq!(bucket.pcu, expected);
        }
    }
}
