//! Keyword-based tool selection
//!
//! The full GitHub description yields far more operations than a model will
//! accept as function declarations. The selector keeps the tools whose name
//! contains one of a set of domain keywords, in their original order, then
//! cuts the result down to a hard cap.
//!
//! Substring matching is a crude proxy for intent: false positives are
//! acceptable, an empty result is not and is reported as
//! [`AgentError::NoTools`].

use crate::errors::{AgentError, AgentResult};
use crate::tools::BaseTool;
use std::sync::Arc;

/// Default upper bound on the number of tools handed to the agent.
pub const DEFAULT_TOOL_LIMIT: usize = 500;

/// Keywords covering the commonly used parts of the GitHub REST API.
pub const DEFAULT_GITHUB_KEYWORDS: &[&str] = &[
    // Repository operations
    "repos",
    "repository",
    "create_repo",
    "get_repo",
    "list_repos",
    // Issues and pull requests
    "issues",
    "issue",
    "pull",
    "pulls",
    "create_issue",
    "get_issue",
    "list_issues",
    // Contents
    "contents",
    "content",
    "create_file",
    "update_file",
    "get_content",
    // Branches and commits
    "branches",
    "branch",
    "commits",
    "commit",
    "refs",
    "ref",
    // Users
    "user",
    "users",
    "get_user",
    "authenticated",
    // Organizations
    "orgs",
    "org",
    "organization",
    "search",
    "releases",
    "release",
    // Actions and workflows
    "actions",
    "workflows",
    "workflow",
    "collaborators",
    "collaborator",
    // Labels and milestones
    "labels",
    "label",
    "milestones",
    "milestone",
];

/// Anything the selector can read a name from.
pub trait ToolName {
    fn tool_name(&self) -> &str;
}

impl<T: BaseTool + ?Sized> ToolName for Arc<T> {
    fn tool_name(&self) -> &str {
        self.name()
    }
}

impl ToolName for String {
    fn tool_name(&self) -> &str {
        self
    }
}

impl ToolName for &str {
    fn tool_name(&self) -> &str {
        self
    }
}

/// Lowercase substring patterns, deduplicated, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    /// Build a keyword set. Keywords are trimmed and lowercased; blanks and
    /// duplicates are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !set.contains(&keyword) {
                set.push(keyword);
            }
        }
        Self(set)
    }

    /// The default GitHub keyword set
    #[must_use]
    pub fn github() -> Self {
        Self::new(DEFAULT_GITHUB_KEYWORDS)
    }

    /// Whether any keyword occurs in the lowercased `name`
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.0.iter().any(|keyword| name.contains(keyword.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keywords plus cap, as configured for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    keywords: KeywordSet,
    cap: usize,
}

impl SelectionPolicy {
    pub fn new<I, S>(keywords: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: KeywordSet::new(keywords),
            cap,
        }
    }

    #[must_use]
    pub const fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Apply this policy to `tools`; see [`select_tools`].
    pub fn select<T: ToolName>(&self, tools: Vec<T>) -> AgentResult<ToolSelection<T>> {
        select_tools(tools, &self.keywords, self.cap)
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::github(),
            cap: DEFAULT_TOOL_LIMIT,
        }
    }
}

/// Outcome of a selection pass.
#[derive(Debug, Clone)]
pub struct ToolSelection<T> {
    tools: Vec<T>,
    total: usize,
    matched: usize,
}

impl<T> ToolSelection<T> {
    /// Tools kept, in original order
    #[must_use]
    pub fn tools(&self) -> &[T] {
        &self.tools
    }

    #[must_use]
    pub fn into_tools(self) -> Vec<T> {
        self.tools
    }

    /// Number of tools offered to the selector
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of tools that matched a keyword, before the cap
    #[must_use]
    pub const fn matched(&self) -> usize {
        self.matched
    }

    /// Number of matching tools removed by the cap
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.matched - self.tools.len()
    }

    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.dropped() > 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Keep the tools whose lowercased name contains any keyword, then keep at
/// most `cap` of them.
///
/// The result is always a prefix of the keyword-filtered list, which is
/// itself order-preserving over `all_tools`. Truncation is logged as a
/// warning; an empty result is an error.
pub fn select_tools<T: ToolName>(
    all_tools: Vec<T>,
    keywords: &KeywordSet,
    cap: usize,
) -> AgentResult<ToolSelection<T>> {
    let total = all_tools.len();

    let mut tools: Vec<T> = all_tools
        .into_iter()
        .filter(|tool| keywords.matches(tool.tool_name()))
        .collect();
    let matched = tools.len();

    if matched > cap {
        tools.truncate(cap);
        tracing::warn!(
            cap,
            total,
            matched,
            dropped = matched - cap,
            "Limiting tools to {cap} out of {total} total tools"
        );
    }

    if tools.is_empty() {
        let reason = if total == 0 {
            "toolset produced no tools".to_string()
        } else if matched == 0 {
            format!(
                "none of {total} tools matched any of {} keywords",
                keywords.len()
            )
        } else {
            format!("tool limit is {cap}")
        };
        return Err(AgentError::NoTools { reason });
    }

    Ok(ToolSelection {
        tools,
        total,
        matched,
    })
}
