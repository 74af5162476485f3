use std::collections::HashSet;
use tracing::debug;

use repoglance_config::SelectionPolicy;
use repoglance_utils::logging::{log_selection_complete, selection_span};
use repoglance_utils::types::FileRecord;

use crate::budget::{Admission, SelectionBudget};
use crate::model::Tier;

/// How the candidates of one tier are ordered before committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ranking {
    /// Keep input order
    InputOrder,
    /// Ascending slash count, ties in input order
    Depth,
    /// Marker priority, then ascending slash count
    MarkerThenDepth,
    /// Lexicographic by path
    Path,
}

/// How a tier's limit is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Unbounded,
    /// Stop once this many files were added by the tier
    Added(usize),
    /// Only the first `n` ranked candidates are considered; already selected
    /// paths inside the window still take a slot
    Window(usize),
}

/// One (predicate, ranking, limit) rule. Predicates live on [`Selector`].
#[derive(Debug, Clone, Copy)]
struct TierRule {
    tier: Tier,
    ranking: Ranking,
    limit: Limit,
}

/// Deterministic key file selector.
///
/// Scans the full file set tier by tier (documentation, configuration,
/// entry points, source directories), committing each candidate against a
/// single [`SelectionBudget`]. When the tiers find too little, a fallback
/// pass pulls in shallow files. The first candidate rejected by the
/// aggregate cap ends the whole run.
#[derive(Debug, Clone)]
pub struct Selector {
    policy: SelectionPolicy,
    doc_names: HashSet<String>,
    config_names: HashSet<String>,
    entry_names: HashSet<String>,
}

impl Selector {
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        let doc_names = policy.doc_names.iter().cloned().collect();
        let config_names = policy.config_names.iter().cloned().collect();
        let entry_names = policy.entry_names.iter().cloned().collect();
        Self {
            policy,
            doc_names,
            config_names,
            entry_names,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Select the key files from `files`, in priority order.
    ///
    /// Never fails. Empty input yields an empty selection.
    #[must_use]
    pub fn select(&self, files: &[FileRecord]) -> Vec<FileRecord> {
        self.select_with_budget(files).into_selected()
    }

    /// Run a selection and return the final budget state.
    #[must_use]
    pub fn select_with_budget(&self, files: &[FileRecord]) -> SelectionBudget {
        let span = selection_span(files.len(), self.policy.max_total_bytes);
        let _guard = span.enter();

        let mut budget =
            SelectionBudget::new(self.policy.max_file_bytes, self.policy.max_total_bytes);

        for rule in self.tier_rules() {
            if budget.is_halted() {
                break;
            }
            self.commit_tier(rule, files, &mut budget);
        }

        if !budget.is_halted() && budget.len() < self.policy.fallback_threshold {
            debug!(
                selected = budget.len(),
                threshold = self.policy.fallback_threshold,
                "Too few key files, running fallback pass"
            );
            self.commit_tier(self.fallback_rule(), files, &mut budget);
        }

        log_selection_complete(budget.len(), budget.total_size(), budget.is_halted());
        budget
    }

    /// Tier assigned to `file`, if any tier (fallback excluded) matches it.
    #[must_use]
    pub fn classify(&self, file: &FileRecord) -> Option<Tier> {
        self.tier_rules()
            .into_iter()
            .map(|rule| rule.tier)
            .find(|tier| self.matches(*tier, file))
    }

    fn tier_rules(&self) -> [TierRule; 4] {
        [
            TierRule {
                tier: Tier::Documentation,
                ranking: Ranking::InputOrder,
                limit: Limit::Unbounded,
            },
            TierRule {
                tier: Tier::Configuration,
                ranking: Ranking::InputOrder,
                limit: Limit::Unbounded,
            },
            TierRule {
                tier: Tier::EntryPoint,
                ranking: Ranking::Depth,
                limit: Limit::Unbounded,
            },
            TierRule {
                tier: Tier::SourceDirectory,
                ranking: Ranking::MarkerThenDepth,
                limit: Limit::Added(self.policy.source_dir_limit),
            },
        ]
    }

    const fn fallback_rule(&self) -> TierRule {
        TierRule {
            tier: Tier::Fallback,
            ranking: Ranking::Path,
            limit: Limit::Window(self.policy.fallback_limit),
        }
    }

    /// Rank the matching candidates of one tier and commit them in order.
    fn commit_tier(&self, rule: TierRule, files: &[FileRecord], budget: &mut SelectionBudget) {
        let mut candidates: Vec<&FileRecord> = files
            .iter()
            .filter(|file| self.matches(rule.tier, file))
            .collect();
        self.rank(rule.ranking, &mut candidates);
        if let Limit::Window(window) = rule.limit {
            candidates.truncate(window);
        }

        let mut added = 0usize;
        for file in candidates {
            if let Limit::Added(limit) = rule.limit
                && added >= limit
            {
                break;
            }
            let admission = budget.commit(file, &self.policy.truncation_marker);
            match admission {
                Admission::Appended | Admission::Truncated => added += 1,
                Admission::AlreadySelected => {}
                Admission::Rejected | Admission::Halted => break,
            }
        }

        debug!(tier = %rule.tier, added, "Tier committed");
    }

    fn rank(&self, ranking: Ranking, candidates: &mut [&FileRecord]) {
        match ranking {
            Ranking::InputOrder => {}
            Ranking::Depth => candidates.sort_by_key(|file| file.depth()),
            Ranking::MarkerThenDepth => candidates.sort_by_key(|file| {
                (self.marker_rank(file).unwrap_or(usize::MAX), file.depth())
            }),
            Ranking::Path => candidates.sort_by(|a, b| a.path.cmp(&b.path)),
        }
    }

    fn matches(&self, tier: Tier, file: &FileRecord) -> bool {
        match tier {
            Tier::Documentation => self.doc_names.contains(file.file_name()),
            Tier::Configuration => self.config_names.contains(file.file_name()),
            Tier::EntryPoint => self.entry_names.contains(file.file_name()),
            Tier::SourceDirectory => self.marker_rank(file).is_some(),
            Tier::Fallback => file.depth() <= self.policy.fallback_max_depth,
        }
    }

    /// Position in the marker list of the highest-priority directory marker
    /// among the file's directory segments.
    fn marker_rank(&self, file: &FileRecord) -> Option<usize> {
        file.dir_segments()
            .filter_map(|segment| {
                self.policy
                    .source_dirs
                    .iter()
                    .position(|marker| marker == segment)
            })
            .min()
    }
}
