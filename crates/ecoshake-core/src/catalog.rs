//! Challenge catalog.
//!
//! The catalog is fixed for the lifetime of the process. It is either the
//! built-in set of eco challenges or a TOML file named by `catalog.path` in
//! the configuration:
//!
//! ```toml
//! [[challenges]]
//! id = "1"
//! title = "Sort Desktop Recyclables"
//! description = "Check your desk and sort all recyclable items"
//! duration = 60
//! ```

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Duration shared by every built-in challenge.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// A catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Fixed countdown length in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u32,
}

impl Challenge {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        duration_secs: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            duration_secs,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    challenges: Vec<Challenge>,
}

/// Validated, non-empty list of challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    challenges: Vec<Challenge>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and zero durations.
    pub fn new(challenges: Vec<Challenge>) -> Result<Self, ValidationError> {
        if challenges.is_empty() {
            return Err(ValidationError::EmptyCollection("challenge catalog".into()));
        }

        let mut seen = HashSet::new();
        for challenge in &challenges {
            if !seen.insert(challenge.id.as_str()) {
                return Err(ValidationError::DuplicateId {
                    collection: "challenge catalog".into(),
                    id: challenge.id.clone(),
                });
            }
            if challenge.duration_secs == 0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("challenges[{}].duration", challenge.id),
                    message: "duration must be at least one second".into(),
                });
            }
        }

        Ok(Self { challenges })
    }

    /// The ten built-in eco challenges.
    pub fn builtin() -> Self {
        let d = DEFAULT_DURATION_SECS;
        Self {
            challenges: vec![
                Challenge::new(
                    "1",
                    "Sort Desktop Recyclables",
                    "Check your desk and sort all recyclable items (paper, plastic bottles, etc.) into the recycling bin",
                    d,
                ),
                Challenge::new(
                    "2",
                    "Photo Your Water Bottle Usage",
                    "Take out your water bottle, photograph and record current water consumption to remind yourself to drink more and avoid disposable cups",
                    d,
                ),
                Challenge::new(
                    "3",
                    "Unplug Unnecessary Outlets",
                    "Check all outlets in the room and unplug unused appliances to save standby power",
                    d,
                ),
                Challenge::new(
                    "4",
                    "Turn Off Unnecessary Lights",
                    "Walk through your space and turn off lights in unoccupied areas, use natural light during the day",
                    d,
                ),
                Challenge::new(
                    "5",
                    "Count Daily Disposable Items",
                    "Recall and record how many disposable items you used today (utensils, cups, bags, etc.)",
                    d,
                ),
                Challenge::new(
                    "6",
                    "Use Your Own Cup for Water",
                    "Fill your reusable cup with water now, refuse to use disposable paper cups",
                    d,
                ),
                Challenge::new(
                    "7",
                    "Check for Double-Sided Paper",
                    "Organize desk papers and find sheets that can be used double-sided for next printing",
                    d,
                ),
                Challenge::new(
                    "8",
                    "Unplug Unused Chargers",
                    "Check all chargers and unplug fully charged or unused device chargers",
                    d,
                ),
                Challenge::new(
                    "9",
                    "Sort & Donate Unused Items",
                    "Quickly check around and find one item you can donate or share with others",
                    d,
                ),
                Challenge::new(
                    "10",
                    "Record Your Carbon Footprint",
                    "Review your transportation today and record time spent walking, biking, taking transit, or driving",
                    d,
                ),
            ],
        }
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| {
            ValidationError::InvalidValue {
                field: "challenges".into(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(file.challenges)?)
    }

    /// Load a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    /// Uniform draw. Draws are independent, so repeats are allowed.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Challenge {
        let index = rng.gen_range(0..self.challenges.len());
        &self.challenges[index]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn builtin_has_ten_sixty_second_challenges() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.challenges().iter().all(|c| c.duration_secs == 60));
        assert_eq!(catalog.get("6").unwrap().title, "Use Your Own Cup for Water");
    }

    #[test]
    fn builtin_passes_validation() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(builtin.challenges().to_vec()).unwrap();
        assert_eq!(rebuilt, builtin);
    }

    #[test]
    fn empty_catalog_rejected() {
        assert!(matches!(
            Catalog::new(vec![]),
            Err(ValidationError::EmptyCollection(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            Challenge::new("a", "One", "", 10),
            Challenge::new("a", "Two", "", 10),
        ]);
        assert!(matches!(result, Err(ValidationError::DuplicateId { .. })));
    }

    #[test]
    fn zero_duration_rejected() {
        let result = Catalog::new(vec![Challenge::new("a", "One", "", 0)]);
        assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn parses_toml_catalog() {
        let catalog = Catalog::from_toml_str(
            r#"
[[challenges]]
id = "walk"
title = "Take the stairs"
description = "Skip the elevator once"
duration = 90
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.challenges()[0].duration_secs, 90);
    }

    #[test]
    fn malformed_toml_is_a_validation_error() {
        let err = Catalog::from_toml_str("challenges = 3").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn pick_stays_within_catalog() {
        let catalog = Catalog::builtin();
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        for _ in 0..200 {
            let picked = catalog.pick(&mut rng);
            assert!(catalog.get(&picked.id).is_some());
        }
    }

    #[test]
    fn pick_reaches_every_entry() {
        let catalog = Catalog::builtin();
        let mut rng = Mcg128Xsl64::seed_from_u64(42);
        let seen: HashSet<String> = (0..1000)
            .map(|_| catalog.pick(&mut rng).id.clone())
            .collect();
        assert_eq!(seen.len(), catalog.len());
    }
}
