/// Build the task template identifier for a runtime version.
///
/// Format: `{prefix}-{ember_version with '.' replaced by '-'}`.
/// One template must exist per supported runtime version.
///
/// ```rust
/// assert_eq!(abd_model::task_template_id("addon-builder", "3.2.0"), "addon-builder-3-2-0");
/// ```
pub fn task_template_id(prefix: &str, ember_version: &str) -> String {
    format!("{prefix}-{}", ember_version.replace('.', "-"))
}

#[cfg(test)]
mod tests {
    use super::task_template_id;

    #[test]
    fn replaces_all_dots() {
        assert_eq!(task_template_id("builder", "3.2.0"), "builder-3-2-0");
        assert_eq!(task_template_id("builder", "2.18"), "builder-2-18");
    }

    #[test]
    fn version_without_dots_is_kept() {
        assert_eq!(task_template_id("builder", "canary"), "builder-canary");
    }
}
