use std::collections::HashMap;

use super::normalizers::{EarthquakeNormalizer, TsunamiNormalizer, VolcanoNormalizer};
use super::CategoryNormalizer;
use crate::domain::{Category, DisasterRecord};
use crate::error::RowRejection;
use crate::pipeline::processing::parser::RawRow;

/// Registry for category-specific normalization strategies
pub struct NormalizationRegistry {
    normalizers: HashMap<Category, Box<dyn CategoryNormalizer>>,
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationRegistry {
    /// Create a new normalization registry with the built-in normalizers
    pub fn new() -> Self {
        let mut normalizers: HashMap<Category, Box<dyn CategoryNormalizer>> = HashMap::new();

        normalizers.insert(Category::Volcano, Box::new(VolcanoNormalizer::new()));
        normalizers.insert(Category::Tsunami, Box::new(TsunamiNormalizer::new()));
        normalizers.insert(Category::Earthquake, Box::new(EarthquakeNormalizer::new()));

        Self { normalizers }
    }

    /// Register (or replace) the normalizer for its category
    pub fn register(&mut self, normalizer: Box<dyn CategoryNormalizer>) {
        self.normalizers.insert(normalizer.category(), normalizer);
    }

    pub fn get_normalizer(&self, category: Category) -> Option<&dyn CategoryNormalizer> {
        self.normalizers.get(&category).map(|n| n.as_ref())
    }

    /// Normalize a row with the normalizer registered for `category`.
    /// `None` means no normalizer is registered.
    pub fn normalize(
        &self,
        category: Category,
        row: &RawRow,
    ) -> Option<Result<DisasterRecord, RowRejection>> {
        self.get_normalizer(category).map(|n| n.normalize(row))
    }

    /// List all registered categories, in declaration order
    pub fn list_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.normalizers.keys().copied().collect();
        categories.sort();
        categories
    }
}
