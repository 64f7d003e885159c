//! Persisted-path oracle (spec §9 open question, resolved): an optional
//! operator-supplied JSON file pinning specific (src, dst) routes, tried
//! before policy-based planning. A missing file, an unreadable file, or a
//! malformed entry is not a hard error — planning simply falls back to
//! `PathEngine` for that pair.

use std::collections::HashMap;
use std::path::Path;

use lattice_common::DatapathId;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OracleFile {
    #[serde(default)]
    paths: HashMap<String, Vec<u64>>,
}

#[derive(Debug, Default)]
pub struct PathOracle {
    paths: HashMap<(DatapathId, DatapathId), Vec<DatapathId>>,
}

impl PathOracle {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads overrides from a JSON file shaped `{"paths": {"1-3": [1,2,3]}}`.
    /// Read or parse failure yields an empty oracle rather than an error —
    /// callers fall back to policy computation for every pair.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(?path, error = %e, "persisted path file unreadable, ignoring");
                return Self::empty();
            }
        };
        let parsed: OracleFile = match serde_json::from_str(&raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!(?path, error = %e, "persisted path file malformed, ignoring");
                return Self::empty();
            }
        };

        let mut paths = HashMap::new();
        for (key, dpids) in parsed.paths {
            let Some((src, dst)) = parse_key(&key) else {
                tracing::debug!(key = %key, "malformed persisted path key, skipping");
                continue;
            };
            paths.insert((src, dst), dpids.into_iter().map(DatapathId).collect());
        }
        PathOracle { paths }
    }

    pub fn lookup(&self, src: DatapathId, dst: DatapathId) -> Option<&[DatapathId]> {
        self.paths.get(&(src, dst)).map(Vec::as_slice)
    }
}

fn parse_key(key: &str) -> Option<(DatapathId, DatapathId)> {
    let (a, b) = key.split_once('-')?;
    Some((DatapathId(a.trim().parse().ok()?), DatapathId(b.trim().parse().ok()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_oracle() {
        let oracle = PathOracle::load(Path::new("/nonexistent/path/oracle.json"));
        assert!(oracle.lookup(DatapathId(1), DatapathId(2)).is_none());
    }

    #[test]
    fn loads_and_looks_up_override() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"paths": {{"1-3": [1,2,3]}}}}"#).unwrap();
        let oracle = PathOracle::load(f.path());
        assert_eq!(
            oracle.lookup(DatapathId(1), DatapathId(3)),
            Some(&[DatapathId(1), DatapathId(2), DatapathId(3)][..])
        );
    }

    #[test]
    fn malformed_json_yields_empty_oracle() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        let oracle = PathOracle::load(f.path());
        assert!(oracle.lookup(DatapathId(1), DatapathId(2)).is_none());
    }
}
