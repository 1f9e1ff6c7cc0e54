//! Tree growth stages derived from the completed-challenge count.
//!
//! Purely a lookup; nothing in the lifecycle depends on the stage.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthStage {
    pub name: &'static str,
    pub min_completed: usize,
    /// Inclusive upper bound; `None` for the final stage.
    pub max_completed: Option<usize>,
    pub description: &'static str,
}

impl GrowthStage {
    fn contains(&self, completed: usize) -> bool {
        completed >= self.min_completed && self.max_completed.map_or(true, |max| completed <= max)
    }
}

pub const GROWTH_STAGES: [GrowthStage; 5] = [
    GrowthStage {
        name: "Seed",
        min_completed: 0,
        max_completed: Some(2),
        description: "Just planted an eco seed",
    },
    GrowthStage {
        name: "Seedling",
        min_completed: 3,
        max_completed: Some(5),
        description: "Growing strong",
    },
    GrowthStage {
        name: "Young Tree",
        min_completed: 6,
        max_completed: Some(9),
        description: "Growing into a tree",
    },
    GrowthStage {
        name: "Mature Tree",
        min_completed: 10,
        max_completed: Some(14),
        description: "Thriving and strong",
    },
    GrowthStage {
        name: "Fruit Tree",
        min_completed: 15,
        max_completed: None,
        description: "Eco champion!",
    },
];

/// Where a completed count sits on the growth ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progression {
    pub completed: usize,
    pub stage: &'static GrowthStage,
    pub next: Option<&'static GrowthStage>,
    /// Completions still needed to reach `next`; 0 at the final stage.
    pub remaining_to_next: usize,
    /// Progress through the current stage band, 0..=100.
    pub stage_progress_pct: f64,
}

impl Progression {
    pub fn for_completed(completed: usize) -> Self {
        let index = GROWTH_STAGES
            .iter()
            .position(|s| s.contains(completed))
            .unwrap_or(0);
        let stage = &GROWTH_STAGES[index];
        let next = GROWTH_STAGES.get(index + 1);

        let (remaining_to_next, stage_progress_pct) = match next {
            Some(next) => {
                let band = (next.min_completed - stage.min_completed) as f64;
                let done = (completed - stage.min_completed) as f64;
                (next.min_completed - completed, done / band * 100.0)
            }
            None => (0, 100.0),
        };

        Self {
            completed,
            stage,
            next,
            remaining_to_next,
            stage_progress_pct,
        }
    }

    pub fn is_max(&self) -> bool {
        self.next.is_none()
    }

    /// True when going from `before` to `after` completions entered a new stage.
    pub fn crossed(before: usize, after: usize) -> Option<&'static GrowthStage> {
        let old = Self::for_completed(before).stage;
        let new = Self::for_completed(after).stage;
        (old != new).then_some(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_boundaries() {
        let cases = [
            (0, "Seed"),
            (2, "Seed"),
            (3, "Seedling"),
            (5, "Seedling"),
            (6, "Young Tree"),
            (9, "Young Tree"),
            (10, "Mature Tree"),
            (14, "Mature Tree"),
            (15, "Fruit Tree"),
            (500, "Fruit Tree"),
        ];
        for (completed, name) in cases {
            assert_eq!(Progression::for_completed(completed).stage.name, name, "{completed}");
        }
    }

    #[test]
    fn remaining_and_progress_within_band() {
        let p = Progression::for_completed(7);
        assert_eq!(p.next.unwrap().name, "Mature Tree");
        assert_eq!(p.remaining_to_next, 3);
        assert!((p.stage_progress_pct - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn final_stage_is_max() {
        let p = Progression::for_completed(15);
        assert!(p.is_max());
        assert_eq!(p.remaining_to_next, 0);
        assert_eq!(p.stage_progress_pct, 100.0);
    }

    #[test]
    fn crossing_detects_new_stage_only() {
        assert_eq!(Progression::crossed(2, 3).map(|s| s.name), Some("Seedling"));
        assert_eq!(Progression::crossed(3, 4), None);
        assert_eq!(Progression::crossed(14, 15).map(|s| s.name), Some("Fruit Tree"));
    }
}
