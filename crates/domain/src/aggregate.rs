use crate::Issue;

/// Sums estimated costs over an issue list. Empty input yields zero.
pub fn total_estimated_cost(issues: &[Issue]) -> u64 {
    issues.iter().map(|issue| issue.estimated_cost).sum()
}
