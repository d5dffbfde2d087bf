//! Compatibility rules: PowerShell 7+ syntax that Windows PowerShell 5.1
//! cannot parse or run, plus defensive patterns recorded for information.

use super::{RuleDef, RuleRole};
use crate::models::Severity;

pub(crate) const RULES: &[RuleDef] = &[
    RuleDef {
        name: "NullCoalescingOperator",
        pattern: r"(\$[\w:]+|\))\s*\?\?=?\s*\S",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Null-coalescing operators (?? and ??=) require PowerShell 7",
    },
    RuleDef {
        name: "NullConditionalAccess",
        pattern: r"\$\{[\w:]+\}\?[.\[]",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Null-conditional member access (${x}?.y) requires PowerShell 7",
    },
    RuleDef {
        name: "PipelineChainOperator",
        // Quoted spans and comments are skipped so `cmd /c "a && b"` stays valid
        pattern: concat!(
            r#"(?m)^([^"'\n#]|"[^"\n]*"|'[^'\n]*')*?"#,
            r#"([\w)\]}]|"[^"\n]*"|'[^'\n]*')\s*(&&|\|\|)\s*[\w$(&'"-]"#,
        ),
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Pipeline chain operators (&& and ||) require PowerShell 7",
    },
    RuleDef {
        name: "TernaryOperator",
        pattern: r"(\)|\$[\w:]+)\s+\?\s+[^\s{|][^\n]*?\s:\s+\S",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "The ternary operator (a ? b : c) requires PowerShell 7",
    },
    RuleDef {
        name: "ParallelForEach",
        pattern: r"(?i)(ForEach-Object|%|foreach)\s+-Parallel\b",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "ForEach-Object -Parallel requires PowerShell 7",
    },
    RuleDef {
        name: "ConvertFromJsonAsHashtable",
        pattern: r"(?i)ConvertFrom-Json\b[^\n|]*-AsHashtable\b",
        severity: Severity::Medium,
        role: RuleRole::Disqualifying,
        description: "ConvertFrom-Json -AsHashtable requires PowerShell 6",
    },
    RuleDef {
        name: "CleanBlock",
        pattern: r"(?im)^\s*clean\s*\{",
        severity: Severity::Medium,
        role: RuleRole::Disqualifying,
        description: "The clean {} block requires PowerShell 7.3",
    },
    RuleDef {
        name: "PSStyleVariable",
        pattern: r"(?i)\$PSStyle\b",
        severity: Severity::Low,
        role: RuleRole::Disqualifying,
        description: "$PSStyle is only defined in PowerShell 7.2+",
    },
    RuleDef {
        name: "GetErrorCmdlet",
        pattern: r"(?i)\bGet-Error\b",
        severity: Severity::Low,
        role: RuleRole::Disqualifying,
        description: "Get-Error is only available in PowerShell 7",
    },
    // Defensive programming signals
    RuleDef {
        name: "ModuleAvailabilityCheck",
        pattern: r"(?i)\bGet-Module\b[^\n]*-ListAvailable\b",
        severity: Severity::Info,
        role: RuleRole::Informational,
        description: "Checks that a module exists before importing it",
    },
    RuleDef {
        name: "ScopedErrorHandling",
        pattern: r"(?is)\btry\s*\{.*?\}\s*catch\b",
        severity: Severity::Info,
        role: RuleRole::Informational,
        description: "Wraps risky calls in try/catch",
    },
    RuleDef {
        name: "ErrorActionDirective",
        pattern: r"(?i)-ErrorAction\s+\w+|\$ErrorActionPreference\s*=",
        severity: Severity::Info,
        role: RuleRole::Informational,
        description: "Sets an explicit error action",
    },
    RuleDef {
        name: "VersionBranching",
        pattern: r"(?i)\$PSVersionTable\.PSVersion",
        severity: Severity::Info,
        role: RuleRole::Informational,
        description: "Branches on the running PowerShell version",
    },
];
