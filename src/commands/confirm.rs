//! Confirmation: command-line flags and prompt answers to a `Decision`

use std::collections::BTreeSet;

use crate::error::{RenamerError, Result};
use crate::execution::Decision;

/// 1-based operation numbers (as shown in the preview) to 0-based indices
pub fn parse_only(numbers: &[usize], plan_len: usize) -> Result<BTreeSet<usize>> {
    numbers
        .iter()
        .map(|&n| {
            if n == 0 || n > plan_len {
                Err(RenamerError::Config(format!(
                    "--only {} is out of range (1..={})",
                    n, plan_len
                )))
            } else {
                Ok(n - 1)
            }
        })
        .collect()
}

/// Decision taken without prompting. `None` unless `yes` is set.
///
/// Auto-confirm applies the error-free operations only, unless `all` asks
/// for everything or `subset` names the operations explicitly.
pub fn decision_from_flags(yes: bool, all: bool, subset: Option<BTreeSet<usize>>) -> Option<Decision> {
    if !yes {
        return None;
    }

    Some(match subset {
        Some(indices) => Decision::ProceedWithSubset(indices),
        None if all => Decision::Proceed,
        None => Decision::ProceedSafe,
    })
}

/// The prompt shown before executing
pub fn confirm_question(subset: Option<&BTreeSet<usize>>, has_errors: bool) -> String {
    match (subset, has_errors) {
        (Some(indices), _) => format!("Apply the {} selected operations? [y/N] ", indices.len()),
        (None, true) => "Apply? [s]afe operations only / [a]ll / [N]o: ".to_string(),
        (None, false) => "Apply? [y/N] ".to_string(),
    }
}

/// Map the user's answer to a decision. Anything unrecognized aborts.
///
/// When the plan has errors a plain "y" is not accepted: the user has to
/// pick between the safe subset and everything.
pub fn decision_from_answer(answer: &str, subset: Option<BTreeSet<usize>>, has_errors: bool) -> Decision {
    let answer = answer.trim().to_lowercase();

    match (answer.as_str(), subset) {
        ("y" | "yes", Some(indices)) => Decision::ProceedWithSubset(indices),
        ("y" | "yes", None) if !has_errors => Decision::Proceed,
        ("s" | "safe", None) if has_errors => Decision::ProceedSafe,
        ("a" | "all", None) if has_errors => Decision::Proceed,
        _ => Decision::Abort,
    }
}
