use std::path::{Path, PathBuf};

use crate::{LaunchPlan, BACKEND_CMD_ENV, BACKEND_IMAGE_NAME};

/// Plan for the bundled backend: the fixed executable, no arguments, run from
/// its own directory so it finds its bundled data files.
pub fn resolve_bundled_launch(executable: &Path) -> Result<LaunchPlan, String> {
    let cwd = executable
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("Invalid backend executable path: {}", executable.display()))?;

    Ok(LaunchPlan {
        cmd: executable.to_string_lossy().into_owned(),
        args: Vec::new(),
        cwd,
        image_name: Some(BACKEND_IMAGE_NAME.to_string()),
    })
}

/// Plan for a developer-supplied command line. Name-based cleanup is disabled
/// because the program name (`python`, `flask`, ...) is rarely unique.
pub fn resolve_custom_launch(
    custom_cmd: &str,
    cwd_override: Option<PathBuf>,
    fallback_cwd: PathBuf,
) -> Result<LaunchPlan, String> {
    let mut pieces = shlex::split(custom_cmd)
        .ok_or_else(|| format!("Invalid {BACKEND_CMD_ENV}: {custom_cmd}"))?;
    if pieces.is_empty() {
        return Err(format!("{BACKEND_CMD_ENV} is empty."));
    }

    let cmd = pieces.remove(0);
    let cwd = cwd_override
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or(fallback_cwd);

    Ok(LaunchPlan {
        cmd,
        args: pieces,
        cwd,
        image_name: None,
    })
}

pub fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.iter().cloned());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_paths;

    #[test]
    fn bundled_launch_runs_fixed_executable_without_arguments() {
        let install = PathBuf::from("/opt/mys-exchange");
        let executable = runtime_paths::backend_executable_in(&install);

        let plan = resolve_bundled_launch(&executable).expect("bundled plan");

        assert_eq!(PathBuf::from(&plan.cmd), executable);
        assert!(plan.args.is_empty());
        assert_eq!(
            plan.cwd,
            install.join("flask_app").join("dist").join("run")
        );
        assert_eq!(plan.image_name.as_deref(), Some(BACKEND_IMAGE_NAME));
    }

    #[test]
    fn custom_launch_splits_quoted_arguments() {
        let plan = resolve_custom_launch(
            "python \"app with space.py\" --port 5000",
            None,
            PathBuf::from("/work"),
        )
        .expect("custom plan");

        assert_eq!(plan.cmd, "python");
        assert_eq!(plan.args, vec!["app with space.py", "--port", "5000"]);
        assert_eq!(plan.cwd, PathBuf::from("/work"));
        assert_eq!(plan.image_name, None);
        assert_eq!(
            build_debug_command(&plan),
            vec!["python", "app with space.py", "--port", "5000"]
        );
    }

    #[test]
    fn custom_launch_prefers_cwd_override() {
        let plan = resolve_custom_launch(
            "flask run",
            Some(PathBuf::from("/src/flask_app")),
            PathBuf::from("/work"),
        )
        .expect("custom plan");
        assert_eq!(plan.cwd, PathBuf::from("/src/flask_app"));
    }

    #[test]
    fn custom_launch_rejects_blank_and_unbalanced_commands() {
        assert!(resolve_custom_launch("   ", None, PathBuf::from("/work")).is_err());
        assert!(resolve_custom_launch("python \"unterminated", None, PathBuf::from("/work")).is_err());
    }
}
