//! ui::graph
//!
//! Read-only projection of a snapshot for drawing the commit graph.
//!
//! One node per commit in the log, owned by the first branch whose history
//! lists it (`detached` otherwise), and one edge from each commit to its
//! parent. Nothing here mutates the snapshot.

use serde::Serialize;

use crate::core::state::{RepoState, StagedFile, WorkingFile};
use crate::core::types::{BranchName, CommitId, UtcTimestamp};

/// Owner label for commits no branch lists.
pub const DETACHED: &str = "detached";

const MAIN_COLOR: &str = "#3B82F6";
const DETACHED_COLOR: &str = "#6B7280";
const BRANCH_COLOR: &str = "#8B5CF6";

/// Display colour for a commit's owning branch, `None` when no branch lists it.
pub fn branch_color(owner: Option<&BranchName>) -> &'static str {
    match owner {
        None => DETACHED_COLOR,
        Some(name) if name.as_str() == "main" => MAIN_COLOR,
        Some(_) => BRANCH_COLOR,
    }
}

fn label(owner: Option<&BranchName>) -> String {
    owner.map_or_else(|| DETACHED.to_string(), BranchName::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: CommitId,
    pub message: String,
    pub branch: String,
    pub color: &'static str,
    pub timestamp: UtcTimestamp,
    pub is_head: bool,
}

/// Child to parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: CommitId,
    pub target: CommitId,
    pub branch: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchLabel {
    pub name: BranchName,
    pub tip: Option<CommitId>,
    pub is_current: bool,
}

/// Everything the visualizer draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub branches: Vec<BranchLabel>,
    pub current_branch: BranchName,
    pub working_directory: Vec<WorkingFile>,
    pub staging_area: Vec<StagedFile>,
}

impl GraphView {
    pub fn project(state: &RepoState) -> Self {
        let nodes = state
            .commits
            .iter()
            .map(|commit| {
                let owner = owner(state, &commit.id);
                GraphNode {
                    id: commit.id.clone(),
                    message: commit.message.clone(),
                    branch: label(owner),
                    color: branch_color(owner),
                    timestamp: commit.timestamp.clone(),
                    is_head: commit.id == state.head,
                }
            })
            .collect();

        // Parents outside the log (never expected) would leave a dangling edge.
        let edges = state
            .commits
            .iter()
            .filter_map(|commit| {
                let parent = commit.parent.as_ref()?;
                if !state.contains_commit(parent) {
                    return None;
                }
                let owner = owner(state, &commit.id);
                Some(GraphEdge {
                    source: commit.id.clone(),
                    target: parent.clone(),
                    branch: label(owner),
                    color: branch_color(owner),
                })
            })
            .collect();

        let branches = state
            .branches
            .iter()
            .map(|b| BranchLabel {
                name: b.name.clone(),
                tip: b.tip().cloned(),
                is_current: b.name == state.current_branch,
            })
            .collect();

        Self {
            nodes,
            edges,
            branches,
            current_branch: state.current_branch.clone(),
            working_directory: state.working_directory.clone(),
            staging_area: state.staging_area.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn owner<'a>(state: &'a RepoState, id: &CommitId) -> Option<&'a BranchName> {
    state
        .branches
        .iter()
        .find(|b| b.commits.contains(id))
        .map(|b| &b.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Branch, Commit, Template};

    fn epoch() -> UtcTimestamp {
        UtcTimestamp::from_millis(0).unwrap()
    }

    fn id(s: &str) -> CommitId {
        CommitId::new(s).unwrap()
    }

    fn sample() -> RepoState {
        let mut state = RepoState::initial(&Template::default(), epoch());
        for (cid, parent) in [("aaaaaaa", "initial"), ("bbbbbbb", "initial")] {
            state.commits.insert(
                0,
                Commit {
                    id: id(cid),
                    message: format!("commit {cid}"),
                    timestamp: epoch(),
                    parent: Some(id(parent)),
                    author: None,
                    email: None,
                },
            );
        }
        state.branches[0].commits.insert(0, id("aaaaaaa"));
        state.branches.push(Branch::new(
            BranchName::new("feature").unwrap(),
            vec![id("aaaaaaa"), id("initial")],
        ));
        state.head = id("aaaaaaa");
        state
    }

    #[test]
    fn colours() {
        let name = |s: &str| BranchName::new(s).unwrap();
        assert_eq!(branch_color(Some(&BranchName::main())), "#3B82F6");
        assert_eq!(branch_color(None), "#6B7280");
        assert_eq!(branch_color(Some(&name("feature"))), "#8B5CF6");
        assert_eq!(branch_color(Some(&name("detached"))), "#8B5CF6");
    }

    #[test]
    fn branch_named_detached_keeps_branch_colour() {
        let mut state = sample();
        state.branches[1].name = BranchName::new("detached").unwrap();
        state.branches[1].commits.insert(0, id("bbbbbbb"));

        let view = GraphView::project(&state);
        assert_eq!(view.nodes[0].branch, "detached");
        assert_eq!(view.nodes[0].color, "#8B5CF6");
        assert_eq!(view.edges[0].color, "#8B5CF6");
    }

    #[test]
    fn nodes_owned_by_first_listing_branch() {
        let view = GraphView::project(&sample());
        let owners: Vec<(&str, &str)> = view
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.branch.as_str()))
            .collect();

        assert_eq!(
            owners,
            [("bbbbbbb", "detached"), ("aaaaaaa", "main"), ("initial", "main")]
        );
        assert!(view.nodes[1].is_head);
        assert_eq!(view.nodes[0].color, "#6B7280");
    }

    #[test]
    fn edges_point_child_to_parent() {
        let view = GraphView::project(&sample());
        assert_eq!(view.edges.len(), 2);
        assert!(view
            .edges
            .iter()
            .all(|e| e.target.as_str() == "initial"));
    }

    #[test]
    fn unknown_parent_has_no_edge() {
        let mut state = sample();
        state.commits[0].parent = Some(id("zzzzzzz"));
        assert_eq!(GraphView::project(&state).edges.len(), 1);
    }

    #[test]
    fn json_is_camel_case() {
        let json: serde_json::Value =
            serde_json::from_str(&GraphView::project(&sample()).to_json().unwrap()).unwrap();
        assert_eq!(json["currentBranch"], "main");
        assert_eq!(json["nodes"][1]["isHead"], true);
        assert_eq!(json["branches"][1]["isCurrent"], false);
    }
}
