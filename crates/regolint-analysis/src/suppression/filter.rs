//! Violation filtering against extracted directives.

use std::collections::HashMap;

use regolint_core::types::Violation;

use super::directive::SuppressionDirective;

/// Drop every violation a directive suppresses. Pure; order preserved.
pub fn filter_violations(violations: Vec<Violation>, directives: &[SuppressionDirective]) -> Vec<Violation> {
    if directives.is_empty() {
        return violations;
    }

    let mut by_line: HashMap<u32, Vec<&SuppressionDirective>> = HashMap::new();
    for directive in directives {
        by_line.entry(directive.line).or_default().push(directive);
    }

    violations
        .into_iter()
        .filter(|v| !suppressed_by(&by_line, directives, v.position.line, &v.rule))
        .collect()
}

/// A violation of `rule` at `line` is suppressed by a matching directive on
/// `line` or `line - 1`, or by a matching struct-scoped directive covering it.
pub fn is_suppressed(directives: &[SuppressionDirective], line: u32, rule: &str) -> bool {
    directives.iter().any(|d| {
        let nearby = d.line == line || line.checked_sub(1) == Some(d.line);
        (nearby || d.covers(line)) && d.matches(rule)
    })
}

fn suppressed_by(
    by_line: &HashMap<u32, Vec<&SuppressionDirective>>,
    all: &[SuppressionDirective],
    line: u32,
    rule: &str,
) -> bool {
    let nearby = [Some(line), line.checked_sub(1)]
        .into_iter()
        .flatten()
        .filter_map(|l| by_line.get(&l))
        .flatten()
        .any(|d| d.matches(rule));

    nearby || all.iter().any(|d| d.covers(line) && d.matches(rule))
}
