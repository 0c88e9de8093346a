//! clang-tidy invocation construction.

use std::path::Path;

use crate::DriverConfig;

/// Builds the argument vector for one tool invocation.
///
/// Argument order is fixed: `-quiet`, then `-p <build_path>`, then a single
/// combined `-checks=` flag, then `-fix` when enabled, then the target path
/// as the final positional argument. The checks value joins each per-file
/// suppression prefixed with `-`, followed by the global filter verbatim;
/// suppressions must come first so the tool's filter grammar lets later
/// entries override earlier ones. The flag is omitted when the combined
/// list is empty.
pub fn build_args(config: &DriverConfig, suppressions: &[String], target: &str) -> Vec<String> {
    let mut args = vec![
        "-quiet".to_string(),
        "-p".to_string(),
        config.build_path.display().to_string(),
    ];

    let mut checks: Vec<String> = suppressions.iter().map(|check| format!("-{}", check)).collect();
    if let Some(global) = config.checks.as_deref().filter(|s| !s.is_empty()) {
        checks.push(global.to_string());
    }
    if !checks.is_empty() {
        args.push(format!("-checks={}", checks.join(",")));
    }

    if config.fix {
        args.push("-fix".to_string());
    }

    args.push(target.to_string());
    args
}

/// Renders the echoed command line for a task's report block, so a human
/// can reproduce any single invocation.
pub fn command_line(tool: &Path, args: &[String]) -> String {
    let mut line = tool.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn config(checks: Option<&str>, fix: bool) -> DriverConfig {
        DriverConfig {
            root: PathBuf::from("."),
            tool: PathBuf::from("clang-tidy"),
            build_path: PathBuf::from("out/Debug"),
            checks: checks.map(|s| s.to_string()),
            fix,
            jobs: 1,
        }
    }

    #[test]
    fn test_minimal_invocation_omits_checks_flag() {
        let args = build_args(&config(None, false), &[], "src/a.cpp");
        assert_eq!(args, vec!["-quiet", "-p", "out/Debug", "src/a.cpp"]);
    }

    #[test]
    fn test_global_checks_only() {
        let args = build_args(&config(Some("bugprone-*"), false), &[], "src/a.cpp");
        assert_eq!(
            args,
            vec!["-quiet", "-p", "out/Debug", "-checks=bugprone-*", "src/a.cpp"]
        );
    }

    #[test]
    fn test_suppressions_precede_global_filter() {
        let suppressions = vec!["X".to_string(), "modernize-use-nullptr".to_string()];
        let args = build_args(&config(Some("bugprone-*"), false), &suppressions, "b.hpp");
        assert_eq!(
            args,
            vec![
                "-quiet",
                "-p",
                "out/Debug",
                "-checks=-X,-modernize-use-nullptr,bugprone-*",
                "b.hpp"
            ]
        );
    }

    #[test]
    fn test_suppressions_without_global_filter() {
        let suppressions = vec!["X".to_string()];
        let args = build_args(&config(None, false), &suppressions, "b.hpp");
        assert_eq!(
            args,
            vec!["-quiet", "-p", "out/Debug", "-checks=-X", "b.hpp"]
        );
    }

    #[test]
    fn test_empty_global_filter_treated_as_absent() {
        let args = build_args(&config(Some(""), false), &[], "a.cpp");
        assert_eq!(args, vec!["-quiet", "-p", "out/Debug", "a.cpp"]);
    }

    #[test]
    fn test_fix_flag_before_target() {
        let args = build_args(&config(Some("cert-*"), true), &[], "a.cpp");
        assert_eq!(
            args,
            vec!["-quiet", "-p", "out/Debug", "-checks=cert-*", "-fix", "a.cpp"]
        );
    }

    #[test]
    fn test_deterministic() {
        let suppressions = vec!["X".to_string()];
        let config = config(Some("cert-*"), true);
        let first = build_args(&config, &suppressions, "a.cpp");
        let second = build_args(&config, &suppressions, "a.cpp");
        assert_eq!(first, second);
    }

    #[test]
    fn test_command_line_echo() {
        let args = vec!["-quiet".to_string(), "a.cpp".to_string()];
        let line = command_line(Path::new("/usr/bin/clang-tidy"), &args);
        assert_eq!(line, "/usr/bin/clang-tidy -quiet a.cpp");
    }
}
