//! Security anti-patterns. A critical match anywhere in the scan blocks
//! deployment on its own.

use super::{RuleDef, RuleRole};
use crate::models::Severity;

pub(crate) const RULES: &[RuleDef] = &[
    RuleDef {
        name: "PlaintextPassword",
        // Single-quoted strings are literal in PowerShell; double-quoted ones
        // only count when nothing is interpolated.
        pattern: concat!(
            r#"(?i)(\$[\w:]*(password|passwd|pwd|secret)\w*|\b(password|passwd|secret))"#,
            r#"\s*=\s*("[^"$\r\n]+"|'[^'\r\n]+')"#,
            r#"|(^|\s)-(password|secret)\s+("[^"$\r\n]+"|'[^'\r\n]+')"#,
        ),
        severity: Severity::Critical,
        role: RuleRole::Disqualifying,
        description: "Password or secret given as a string literal",
    },
    RuleDef {
        name: "PlainTextSecureString",
        pattern: r"(?i)ConvertTo-SecureString\b[^\n]*-AsPlainText\b",
        severity: Severity::Critical,
        role: RuleRole::Disqualifying,
        description: "SecureString built from plain text",
    },
    RuleDef {
        name: "HardcodedApiKey",
        pattern: r#"(?i)\$[\w:]*(api_?key|access_?key|token)\w*\s*=\s*["'][A-Za-z0-9_\-+/=]{16,}["']"#,
        severity: Severity::Critical,
        role: RuleRole::Disqualifying,
        description: "API key or token assigned from a string literal",
    },
    RuleDef {
        name: "PrivateKeyBlock",
        pattern: r"-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----",
        severity: Severity::Critical,
        role: RuleRole::Disqualifying,
        description: "Private key embedded in source",
    },
    RuleDef {
        name: "InvokeExpression",
        pattern: r"(?i)\b(Invoke-Expression|iex)\b",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Dynamic code execution with Invoke-Expression",
    },
    RuleDef {
        name: "RemoteDownload",
        pattern: r"(?i)\.(DownloadString|DownloadFile|DownloadData)\s*\(",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Content downloaded with WebClient at runtime",
    },
    RuleDef {
        name: "ExecutionPolicyBypass",
        pattern: r"(?i)(Set-ExecutionPolicy|-ExecutionPolicy)\s+(Bypass|Unrestricted)\b",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "Execution policy bypassed or unrestricted",
    },
    RuleDef {
        name: "CertificateValidationDisabled",
        pattern: r"(?i)ServerCertificateValidationCallback\s*=|-SkipCertificateCheck\b",
        severity: Severity::High,
        role: RuleRole::Disqualifying,
        description: "TLS certificate validation disabled",
    },
    RuleDef {
        name: "EncodedCommand",
        pattern: r"(?i)\s-(EncodedCommand|enc|e)\s+[A-Za-z0-9+/]{20,}={0,2}",
        severity: Severity::Medium,
        role: RuleRole::Disqualifying,
        description: "Base64-encoded command passed to PowerShell",
    },
    RuleDef {
        name: "InsecureHttpUrl",
        pattern: r#"(?i)["']http://[a-z0-9]"#,
        severity: Severity::Medium,
        role: RuleRole::Disqualifying,
        description: "Plain HTTP URL",
    },
];
