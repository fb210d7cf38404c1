//! Snapshot parsing for agent-browser output
//!
//! Parses the accessibility tree JSON from `agent-browser snapshot --json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parsed snapshot from agent-browser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Whether the operation succeeded
    #[serde(default)]
    pub success: bool,
    /// Snapshot data
    #[serde(default)]
    pub data: Option<SnapshotData>,
}

/// Snapshot data content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Raw snapshot string (accessibility tree)
    #[serde(default)]
    pub snapshot: String,
    /// Element refs mapped to their info
    #[serde(default)]
    pub refs: HashMap<String, Element>,
}

/// An element in the snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    /// ARIA role
    #[serde(default)]
    pub role: String,
    /// Accessible name
    #[serde(default)]
    pub name: String,
}

impl Snapshot {
    /// Count the number of elements with refs
    pub fn count_elements(&self) -> usize {
        self.data.as_ref().map(|d| d.refs.len()).unwrap_or(0)
    }

    /// Refs of elements whose name contains `text`, case-insensitively,
    /// in ascending ref order (`e2` before `e10`)
    pub fn find_by_text(&self, text: &str) -> Vec<String> {
        let needle = text.to_lowercase();
        let mut refs: Vec<String> = self
            .data
            .as_ref()
            .map(|d| {
                d.refs
                    .iter()
                    .filter(|(_, el)| el.name.to_lowercase().contains(&needle))
                    .map(|(r, _)| r.clone())
                    .collect()
            })
            .unwrap_or_default();

        refs.sort_by_key(|r| ref_sort_key(r));
        refs
    }
}

fn ref_sort_key(ref_id: &str) -> (u64, String) {
    let digits: String = ref_id.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.parse().unwrap_or(u64::MAX), ref_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(elements: &[(&str, &str, &str)]) -> Snapshot {
        let refs = elements
            .iter()
            .map(|(r, role, name)| {
                (
                    r.to_string(),
                    Element {
                        role: role.to_string(),
                        name: name.to_string(),
                    },
                )
            })
            .collect();

        Snapshot {
            success: true,
            data: Some(SnapshotData {
                snapshot: String::new(),
                refs,
            }),
        }
    }

    #[test]
    fn test_find_by_text_is_case_insensitive() {
        let snap = snapshot(&[
            ("e10", "button", "Download HD"),
            ("e2", "link", "Baixar vídeo"),
            ("e3", "link", "Home"),
            ("e1", "button", "download"),
        ]);

        assert_eq!(snap.find_by_text("DOWNLOAD"), vec!["e1", "e10"]);
        assert_eq!(snap.find_by_text("baixar vídeo"), vec!["e2"]);
        assert!(snap.find_by_text("upload").is_empty());
        assert_eq!(snap.count_elements(), 4);
    }

    #[test]
    fn test_parse_agent_browser_json() {
        let json = r#"{"success":true,"data":{"snapshot":"- button \"Download\" [ref=e1]","refs":{"e1":{"role":"button","name":"Download"}}}}"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.find_by_text("down"), vec!["e1"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Snapshot::default();
        assert_eq!(snap.count_elements(), 0);
        assert!(snap.find_by_text("x").is_empty());
    }
}
