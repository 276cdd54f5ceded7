use std::sync::LazyLock;

use regex::Regex;

use crate::Verdict;

/// Paths the tool layer must never edit.
const PROTECTED: &[&str] = &[
    // Environment and secrets
    r"\.env$",
    r"\.env\.[a-z]+$",
    r"\.secret",
    r"credentials\.json$",
    r"secrets\.ya?ml$",
    r"\.pem$",
    r"\.key$",
    r"id_rsa",
    r"id_ed25519",
    // Lock files (usually auto-generated)
    r"package-lock\.json$",
    r"yarn\.lock$",
    r"pnpm-lock\.yaml$",
    r"Gemfile\.lock$",
    r"poetry\.lock$",
    r"Cargo\.lock$",
    r"composer\.lock$",
    // Git internals
    r"\.git/",
    r"\.gitattributes$",
    // IDE/editor config
    r"\.idea/",
    r"\.vscode/settings\.json$",
    // Database files
    r"\.sqlite$",
    r"\.db$",
];

/// Allowed, but worth flagging.
const WARNINGS: &[(&str, &str)] = &[
    (r"\.gitignore$", "Modifying .gitignore"),
    (r"tsconfig\.json$", "Modifying TypeScript config"),
    (r"package\.json$", "Modifying package.json"),
];

static PROTECTED_SET: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PROTECTED
        .iter()
        .map(|pattern| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("guard pattern must compile");
            (re, *pattern)
        })
        .collect()
});

static WARNING_SET: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    WARNINGS
        .iter()
        .map(|(pattern, message)| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("guard pattern must compile");
            (re, *message)
        })
        .collect()
});

/// Check an edit/write target. The matched pattern is reported back so the
/// caller can explain the block.
pub fn check_path(path: &str) -> Verdict {
    let normalized = normalize(path);

    for (re, pattern) in PROTECTED_SET.iter() {
        if re.is_match(&normalized) {
            return Verdict::block(format!("Protected file (pattern {pattern}): {path}"));
        }
    }

    let warnings = WARNING_SET
        .iter()
        .filter(|(re, _)| re.is_match(&normalized))
        .map(|(_, message)| (*message).to_string())
        .collect();

    Verdict {
        blocked: false,
        reason: None,
        warnings,
    }
}

/// Lexical cleanup only: unify separators and collapse `.`/`..` segments.
/// The path is never resolved against the filesystem.
fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    let mut normalized = parts.join("/");
    if unified.starts_with('/') {
        normalized.insert(0, '/');
    }
    normalized
}
