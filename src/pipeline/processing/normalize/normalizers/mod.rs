// Category-specific normalizers
pub mod earthquake;
pub mod tsunami;
pub mod volcano;

pub use earthquake::EarthquakeNormalizer;
pub use tsunami::TsunamiNormalizer;
pub use volcano::VolcanoNormalizer;
