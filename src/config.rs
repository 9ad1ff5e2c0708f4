use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::domain::Category;
use crate::error::{HazardError, Result};

/// Inclusive range of accepted years for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub min_year: i32,
    pub max_year: i32,
}

impl YearWindow {
    pub const fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min_year <= year && year <= self.max_year
    }
}

/// How records are ranked inside each year after window filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RankingMode {
    /// Ascending by year only
    #[default]
    None,
    /// Keep the `k` highest-magnitude records of every year
    TopK { k: usize },
    /// Keep every record, highest magnitude first within a year
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    #[serde(flatten)]
    pub window: YearWindow,
    #[serde(default)]
    pub ranking: RankingMode,
}

impl CategoryProfile {
    pub const fn new(window: YearWindow, ranking: RankingMode) -> Self {
        Self { window, ranking }
    }
}

/// Year windows and ranking policy for every category, as deployed together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentProfile {
    #[serde(skip)]
    pub name: String,
    pub volcano: CategoryProfile,
    pub tsunami: CategoryProfile,
    pub earthquake: CategoryProfile,
}

impl DeploymentProfile {
    pub fn for_category(&self, category: Category) -> &CategoryProfile {
        match category {
            Category::Volcano => &self.volcano,
            Category::Tsunami => &self.tsunami,
            Category::Earthquake => &self.earthquake,
        }
    }

    /// First deployment: every category 1950-2020, plain year ordering
    pub fn original() -> Self {
        let plain = CategoryProfile::new(YearWindow::new(1950, 2020), RankingMode::None);
        Self {
            name: "original".to_string(),
            volcano: plain,
            tsunami: plain,
            earthquake: plain,
        }
    }

    /// Later deployment: windows extended to 2023, earthquakes from 1995 with Top-K ranking
    pub fn revised() -> Self {
        Self {
            name: "revised".to_string(),
            volcano: CategoryProfile::new(YearWindow::new(1950, 2023), RankingMode::None),
            tsunami: CategoryProfile::new(YearWindow::new(1950, 2023), RankingMode::None),
            earthquake: CategoryProfile::new(
                YearWindow::new(1995, 2023),
                RankingMode::TopK { k: constants::DEFAULT_TOP_K },
            ),
        }
    }

    /// Same windows as `revised`, but every earthquake of a year is kept
    pub fn revised_full() -> Self {
        let mut profile = Self::revised();
        profile.name = "revised_full".to_string();
        profile.earthquake.ranking = RankingMode::Full;
        profile
    }

    fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let p = self.for_category(category);
            if p.window.min_year > p.window.max_year {
                return Err(HazardError::Config(format!(
                    "profile '{}': {} min_year {} is after max_year {}",
                    self.name, category, p.window.min_year, p.window.max_year
                )));
            }
            if let RankingMode::TopK { k: 0 } = p.ranking {
                return Err(HazardError::Config(format!(
                    "profile '{}': {} top_k ranking needs k >= 1",
                    self.name, category
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    #[serde(default)]
    pub profiles: BTreeMap<String, DeploymentProfile>,
}

fn default_profile_name() -> String {
    constants::DEFAULT_PROFILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Config {
    /// The profiles known without any config file
    pub fn builtin() -> Self {
        let profiles = [
            DeploymentProfile::original(),
            DeploymentProfile::revised(),
            DeploymentProfile::revised_full(),
        ]
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect();

        Self {
            default_profile: default_profile_name(),
            profiles,
        }
    }

    /// Load a TOML config file. Profiles it defines are added to (or replace)
    /// the built-in ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: Config = toml::from_str(content)?;

        let mut config = Self::builtin();
        config.default_profile = parsed.default_profile;
        for (name, mut profile) in parsed.profiles {
            profile.name = name.clone();
            config.profiles.insert(name, profile);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for profile in self.profiles.values() {
            profile.validate()?;
        }
        if !self.profiles.contains_key(&self.default_profile) {
            return Err(HazardError::Config(format!(
                "default profile '{}' is not defined",
                self.default_profile
            )));
        }
        Ok(())
    }

    /// Look up a profile by name, or the default one when `name` is `None`
    pub fn profile(&self, name: Option<&str>) -> Result<&DeploymentProfile> {
        let name = name.unwrap_or(&self.default_profile);
        self.profiles
            .get(name)
            .ok_or_else(|| HazardError::Config(format!("unknown profile '{}'", name)))
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(|k| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let config = Config::builtin();
        assert_eq!(config.profile_names(), vec!["original", "revised", "revised_full"]);

        let default = config.profile(None).unwrap();
        assert_eq!(default.name, "revised");
        assert_eq!(default.earthquake.window, YearWindow::new(1995, 2023));
        assert_eq!(default.earthquake.ranking, RankingMode::TopK { k: 5 });
        assert_eq!(default.volcano.ranking, RankingMode::None);

        let full = config.profile(Some("revised_full")).unwrap();
        assert_eq!(full.earthquake.ranking, RankingMode::Full);

        let original = config.profile(Some("original")).unwrap();
        assert_eq!(original.earthquake.window, YearWindow::new(1950, 2020));
    }

    #[test]
    fn test_year_window_is_inclusive() {
        let window = YearWindow::new(1950, 2023);
        assert!(window.contains(1950));
        assert!(window.contains(2023));
        assert!(!window.contains(1949));
        assert!(!window.contains(2024));
    }

    #[test]
    fn test_load_toml_profile() {
        let toml = r#"
            default_profile = "museum"

            [profiles.museum.volcano]
            min_year = 1900
            max_year = 2000

            [profiles.museum.tsunami]
            min_year = 1900
            max_year = 2000

            [profiles.museum.earthquake]
            min_year = 1990
            max_year = 2000
            ranking = { mode = "top_k", k = 3 }
        "#;

        let config = Config::from_toml_str(toml).unwrap();
        let profile = config.profile(None).unwrap();
        assert_eq!(profile.name, "museum");
        assert_eq!(profile.volcano.window, YearWindow::new(1900, 2000));
        assert_eq!(profile.earthquake.ranking, RankingMode::TopK { k: 3 });
        // built-ins stay available
        assert!(config.profile(Some("original")).is_ok());
    }

    #[test]
    fn test_invalid_profiles_are_rejected() {
        let inverted = r#"
            [profiles.bad.volcano]
            min_year = 2000
            max_year = 1990
            [profiles.bad.tsunami]
            min_year = 1950
            max_year = 2020
            [profiles.bad.earthquake]
            min_year = 1950
            max_year = 2020
        "#;
        assert!(matches!(Config::from_toml_str(inverted), Err(HazardError::Config(_))));

        let zero_k = r#"
            [profiles.bad.volcano]
            min_year = 1950
            max_year = 2020
            [profiles.bad.tsunami]
            min_year = 1950
            max_year = 2020
            [profiles.bad.earthquake]
            min_year = 1950
            max_year = 2020
            ranking = { mode = "top_k", k = 0 }
        "#;
        assert!(matches!(Config::from_toml_str(zero_k), Err(HazardError::Config(_))));

        let missing_default = r#"default_profile = "nowhere""#;
        assert!(Config::from_toml_str(missing_default).is_err());
    }

    #[test]
    fn test_unknown_profile_lookup() {
        let config = Config::builtin();
        assert!(matches!(config.profile(Some("nope")), Err(HazardError::Config(_))));
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(Config::load(&missing), Err(HazardError::Io(_))));
    }
}
