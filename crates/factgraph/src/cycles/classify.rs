//! Internal/external import classification.

/// Decides whether an import target can refer to a module of the analysed
/// codebase.
///
/// Conventions differ per language, so the cycle detector takes this as a
/// pluggable predicate.
pub trait ImportClassifier: Send + Sync {
    /// Whether `target` may name a module in this codebase.
    fn is_internal(&self, target: &str) -> bool;
}

/// Path-shaped heuristic that suits Go-style and relative imports.
///
/// A `.` anywhere in a non-relative target is the external-package marker
/// (a registry host such as `github.com`).
///
/// | Target | Verdict |
/// |--------|---------|
/// | starts with `./` or `../` | internal |
/// | separator, no marker (`internal/api`) | internal |
/// | no separator, no marker (`fmt`, `lodash`) | internal |
/// | marker, with or without separator (`github.com/x`, `internal/v1.2/pkg`) | external |
///
/// Scoped package names such as `@scope/pkg` come out as internal. They
/// never match a module name in practice, so the only cost is a wasted
/// lookup. Dotted in-tree paths like `internal/v1.2/pkg` come out as
/// external; plug in another [`ImportClassifier`] for layouts that use them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathHeuristicClassifier;

impl ImportClassifier for PathHeuristicClassifier {
    fn is_internal(&self, target: &str) -> bool {
        is_relative(target) || !target.contains('.')
    }
}

fn is_relative(target: &str) -> bool {
    target == "." || target == ".." || target.starts_with("./") || target.starts_with("../")
}

/// Resolve an import target written in `source_dir` to a module-style name.
///
/// Relative targets are joined onto `source_dir` with `.` and `..` folded
/// away. Returns `None` when the result would climb above the root or is
/// empty.
pub(crate) fn resolve_target(source_dir: &str, target: &str) -> Option<String> {
    if !is_relative(target) {
        let trimmed = target.trim_end_matches('/');
        return (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    let mut segments: Vec<&str> = if source_dir == "." {
        Vec::new()
    } else {
        source_dir.split('/').filter(|s| !s.is_empty()).collect()
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    (!segments.is_empty()).then(|| segments.join("/"))
}
