//! Coding-standard markers. Each rule is an independent sub-check a file
//! passes by containing the marker.

use super::{RuleDef, RuleRole};
use crate::models::Severity;

pub(crate) const RULES: &[RuleDef] = &[
    RuleDef {
        name: "CommentBasedHelp",
        pattern: r"(?is)\.SYNOPSIS\b.*\.DESCRIPTION\b",
        severity: Severity::Medium,
        role: RuleRole::Required,
        description: "Comment-based help with .SYNOPSIS and .DESCRIPTION",
    },
    RuleDef {
        name: "StructuredErrorHandling",
        pattern: r"(?is)\btry\s*\{.*\}\s*catch\b",
        severity: Severity::Medium,
        role: RuleRole::Required,
        description: "Errors handled with try/catch",
    },
    RuleDef {
        name: "LoggingCalls",
        pattern: r"(?i)\bWrite-(Verbose|Information|Debug|Log\w*)\b",
        severity: Severity::Low,
        role: RuleRole::Required,
        description: "Progress reported through Write-Verbose, Write-Information, Write-Debug or a Write-Log helper",
    },
    RuleDef {
        name: "TypedContextObject",
        pattern: r"(?i)\[PSCustomObject\]\s*@\{",
        severity: Severity::Low,
        role: RuleRole::Required,
        description: "Results returned as [PSCustomObject]@{ ... }",
    },
];
