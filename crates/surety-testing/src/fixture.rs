//! JSON fixture loader.
//!
//! Loads the seed files under `services/portal/fixtures/` so tests can assert
//! against the same records the service serves in mock mode.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Load a JSON fixture file relative to the workspace root.
///
/// # Example
/// ```no_run
/// use surety_testing::fixture::Fixture;
/// let val = Fixture::load("services/portal/fixtures/proposals.json");
/// ```
pub struct Fixture;

impl Fixture {
    fn workspace_root() -> PathBuf {
        std::env::var("CARGO_MANIFEST_DIR")
            .map(|dir| {
                // Walk up from crate dir to the directory holding the workspace manifest.
                let p = Path::new(&dir);
                p.ancestors()
                    .find(|a| {
                        std::fs::read_to_string(a.join("Cargo.toml"))
                            .map(|s| s.contains("[workspace]"))
                            .unwrap_or(false)
                    })
                    .unwrap_or(p)
                    .to_path_buf()
            })
            .unwrap_or_else(|_| std::env::current_dir().unwrap())
    }

    /// Load and parse a fixture JSON file at `workspace_root/path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = Self::workspace_root().join(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }

    /// Load a fixture and deserialize it into `T`.
    pub fn load_as<T: DeserializeOwned>(relative_path: &str) -> T {
        serde_json::from_value(Self::load(relative_path))
            .unwrap_or_else(|e| panic!("fixture {} has unexpected shape: {}", relative_path, e))
    }
}
