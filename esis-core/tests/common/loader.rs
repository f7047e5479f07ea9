//! Fixture loading from YAML files

use serde::Deserialize;

use std::path::Path;

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    /// ESIS input
    pub esis: String,
    /// Expected events, one formatted line each (see `format_event`)
    #[serde(default)]
    pub events: Vec<String>,
    /// Expected XML output (non-canonical)
    #[serde(default)]
    pub xml: Option<String>,
    /// Expected canonical XML output
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub sgml: Option<String>,
    /// Expected ESIS output; defaults to the input when `roundtrip` is set
    #[serde(default)]
    pub reesis: Option<String>,
    #[serde(default)]
    pub roundtrip: bool,
    /// Expected echo of a filter pass with no handlers; defaults to the
    /// input when `roundtrip` is set
    #[serde(default)]
    pub echo: Option<String>,
    /// Malformed inputs change meaning when wrapped; they opt out
    #[serde(default = "default_true")]
    pub variations: bool,
}

fn default_true() -> bool {
    true
}

impl TestCase {
    /// ESIS the ESIS writer should produce, if the case says.
    pub fn expected_esis(&self) -> Option<&str> {
        match (&self.reesis, self.roundtrip) {
            (Some(out), _) => Some(out),
            (None, true) => Some(&self.esis),
            (None, false) => None,
        }
    }

    /// Echo a handler-less filter pass should produce, if the case says.
    pub fn expected_echo(&self) -> Option<&str> {
        match (&self.echo, self.roundtrip) {
            (Some(out), _) => Some(out),
            (None, true) => Some(&self.esis),
            (None, false) => None,
        }
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
