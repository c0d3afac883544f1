use serde::{Deserialize, Serialize};

use super::recommendation::{Matching, Strategy};

/// A request to the pair-sight engine (session mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRequest {
    pub command: Command,
    /// Git repository directory (default: ".")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Time window, e.g. "2w" or "2024-01-01..2024-01-31"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    /// Team file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Team sections to include
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching: Option<Matching>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_developers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Matrix,
    Recommend,
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request() {
        let req: PairRequest = serde_json::from_str(r#"{"command":"matrix"}"#).unwrap();
        assert_eq!(req.command, Command::Matrix);
        assert!(req.dir.is_none());
        assert!(req.sections.is_empty());
    }

    #[test]
    fn full_request() {
        let req: PairRequest = serde_json::from_str(
            r#"{"command":"recommend","dir":"/repo","window":"2w","team":".team",
                "sections":["backend"],"strategy":"least-recent","matching":"optimal",
                "max_developers":12}"#,
        )
        .unwrap();
        assert_eq!(req.command, Command::Recommend);
        assert_eq!(req.strategy, Some(Strategy::LeastRecent));
        assert_eq!(req.matching, Some(Matching::Optimal));
        assert_eq!(req.max_developers, Some(12));
        assert_eq!(req.sections, vec!["backend"]);
    }

    #[test]
    fn unknown_command_rejected() {
        assert!(serde_json::from_str::<PairRequest>(r#"{"command":"blame"}"#).is_err());
    }
}
