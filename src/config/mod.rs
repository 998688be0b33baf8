//! Configuration and path management

pub mod paths;
pub mod settings;

pub use paths::DigibookPaths;
pub use settings::Settings;
