//! Nutrition lookup table loaded from a CSV file at startup.
//!
//! The table keeps its rows in file order and resolves queries by name:
//! an exact case-insensitive match wins, otherwise the first row whose
//! name contains the query as a case-insensitive substring is returned.
//! This is not a ranked search.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum NutritionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Nutrition CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Macro-nutrient estimate for one food, per serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct NutritionRow {
    name: String,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
}

/// Ordered collection of named nutrition records.
///
/// Loaded once at startup and immutable thereafter. Names are not required
/// to be unique; overlapping names resolve by table order.
#[derive(Debug, Clone, Default)]
pub struct NutritionTable {
    rows: Vec<NutritionRow>,
}

impl NutritionTable {
    /// Loads the table from a CSV file with at least the columns
    /// `name, calories, protein, carbs, fats`. Extra columns are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NutritionError> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: NutritionRow = result?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a food name to its nutrition record.
    ///
    /// Lookup is case-insensitive. An exact name match is preferred;
    /// otherwise the first row whose name contains the query wins. Empty
    /// queries match nothing. Returns `None` when no entry matches.
    pub fn lookup(&self, food_name: &str) -> Option<NutritionRecord> {
        if food_name.is_empty() {
            return None;
        }
        let query = food_name.to_lowercase();

        let row = self
            .rows
            .iter()
            .find(|row| row.name.to_lowercase() == query)
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|row| row.name.to_lowercase().contains(&query))
            })?;

        Some(NutritionRecord {
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fats: row.fats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table_from(csv: &str) -> NutritionTable {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", csv).unwrap();
        NutritionTable::from_file(file.path()).expect("Failed to load test table")
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = table_from(
            "name,calories,protein,carbs,fats\n\
             Pizza Margherita,266,11,33,9.7\n",
        );

        let lower = table.lookup("pizza").unwrap();
        let upper = table.lookup("PIZZA").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.calories, 266.0);
    }

    #[test]
    fn test_exact_match_beats_earlier_substring() {
        let table = table_from(
            "name,calories,protein,carbs,fats\n\
             Apple pie,237,2,34,11\n\
             Apple,52,0.3,14,0.2\n",
        );

        let record = table.lookup("apple").unwrap();
        assert_eq!(record.calories, 52.0);
        assert_eq!(record.protein, 0.3);
        assert_eq!(record.carbs, 14.0);
        assert_eq!(record.fats, 0.2);
    }

    #[test]
    fn test_first_substring_match_wins_in_table_order() {
        let table = table_from(
            "name,calories,protein,carbs,fats\n\
             Chicken curry,240,14,9,16\n\
             Chicken wings,290,27,0,19\n",
        );

        let record = table.lookup("chicken").unwrap();
        assert_eq!(record.calories, 240.0);
    }

    #[test]
    fn test_lookup_misses_return_none() {
        let table = table_from(
            "name,calories,protein,carbs,fats\n\
             Apple,52,0.3,14,0.2\n",
        );

        assert!(table.lookup("dragonfruit").is_none());
        assert!(table.lookup("Unknown").is_none());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let table = table_from(
            "name,calories,protein,carbs,fats\n\
             Apple,52,0.3,14,0.2\n",
        );

        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_missing_file() {
        let result = NutritionTable::from_file("/nonexistent/nutrition.csv");
        assert!(matches!(result, Err(NutritionError::Io(_))));
    }

    #[test]
    fn test_malformed_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "name,calories,protein,carbs,fats\nApple,fifty-two,0.3,14,0.2\n"
        )
        .unwrap();

        let result = NutritionTable::from_file(file.path());
        assert!(matches!(result, Err(NutritionError::Csv(_))));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "name,calories,protein,carbs,fats,serving\nApple,52,0.3,14,0.2,100g\n"
        )
        .unwrap();

        let table = NutritionTable::from_file(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("apple").unwrap().calories, 52.0);
    }
}
