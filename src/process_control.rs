#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;
use std::{
    io,
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

#[cfg(target_os = "windows")]
use crate::CREATE_NO_WINDOW;

const FORCE_STOP_WAIT_MIN_MS: u64 = 200;
const CHILD_EXIT_POLL_INTERVAL_MS: u64 = 100;
#[cfg(target_os = "windows")]
const WINDOWS_GRACEFUL_STOP_NONZERO_WAIT_MS: u64 = 350;
#[cfg(target_os = "windows")]
const FORCE_STOP_WAIT_MAX_MS: u64 = 2_200;
#[cfg(not(target_os = "windows"))]
const FORCE_STOP_WAIT_MAX_MS: u64 = 1_500;

fn wait_for_child_exit(child: &mut Child, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    return false;
                }
                thread::sleep(Duration::from_millis(CHILD_EXIT_POLL_INTERVAL_MS));
            }
            Err(_) => return false,
        }
    }
}

fn run_stop_command<F>(label: &str, program: &str, args: &[&str], log: F) -> io::Result<ExitStatus>
where
    F: Fn(&str),
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .stdin(Stdio::null());
    #[cfg(target_os = "windows")]
    {
        // No console flash for taskkill.
        command.creation_flags(CREATE_NO_WINDOW);
    }
    let status = command.status();

    match &status {
        Ok(exit_status) if exit_status.success() => {}
        Ok(exit_status) => log(&format!(
            "{label} returned non-zero: args={args:?}, status={exit_status:?}"
        )),
        Err(error) => log(&format!(
            "{label} failed to start: args={args:?}, error={error}"
        )),
    }

    status
}

fn compute_followup_wait(timeout: Duration, max_extra_wait: Duration) -> Duration {
    if timeout.is_zero() {
        Duration::ZERO
    } else {
        (timeout / 4)
            .max(Duration::from_millis(FORCE_STOP_WAIT_MIN_MS))
            .min(max_extra_wait)
    }
}

fn resolve_graceful_wait_timeout<F>(
    pid: u32,
    timeout: Duration,
    non_success_wait_cap: Duration,
    graceful_status: &io::Result<ExitStatus>,
    command_label: &str,
    log: F,
) -> Duration
where
    F: Fn(&str),
{
    match graceful_status {
        Ok(status) if status.success() => timeout,
        _ => {
            let shortened_wait = timeout.min(non_success_wait_cap);
            if shortened_wait < timeout {
                let outcome = match graceful_status {
                    Ok(status) => format!("status={status:?}"),
                    Err(error) => format!("error={error}"),
                };
                log(&format!(
                    "{command_label} not successful; shorten graceful wait: pid={pid}, {outcome}, requested_wait_ms={}, effective_wait_ms={}",
                    timeout.as_millis(),
                    shortened_wait.as_millis()
                ));
            }
            shortened_wait
        }
    }
}

#[cfg(target_os = "windows")]
fn graceful_stop_args(pid_arg: &str) -> (&'static str, &'static str, Vec<String>) {
    (
        "taskkill graceful stop",
        "taskkill",
        vec!["/pid".into(), pid_arg.into(), "/t".into()],
    )
}

#[cfg(not(target_os = "windows"))]
fn graceful_stop_args(pid_arg: &str) -> (&'static str, &'static str, Vec<String>) {
    ("kill -TERM", "kill", vec!["-TERM".into(), pid_arg.into()])
}

#[cfg(target_os = "windows")]
fn force_stop_args(pid_arg: &str) -> (&'static str, &'static str, Vec<String>) {
    (
        "taskkill force stop",
        "taskkill",
        vec!["/pid".into(), pid_arg.into(), "/t".into(), "/f".into()],
    )
}

#[cfg(not(target_os = "windows"))]
fn force_stop_args(pid_arg: &str) -> (&'static str, &'static str, Vec<String>) {
    ("kill -KILL", "kill", vec!["-KILL".into(), pid_arg.into()])
}

fn graceful_non_success_cap(timeout: Duration) -> Duration {
    #[cfg(target_os = "windows")]
    {
        let _ = timeout;
        Duration::from_millis(WINDOWS_GRACEFUL_STOP_NONZERO_WAIT_MS)
    }
    #[cfg(not(target_os = "windows"))]
    {
        timeout
    }
}

fn run_with_args<F>(command: (&str, &str, Vec<String>), log: F) -> io::Result<ExitStatus>
where
    F: Fn(&str),
{
    let (label, program, args) = command;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_stop_command(label, program, &args, log)
}

/// Asks the child to exit, escalates to a forced kill after `timeout`, and
/// finally falls back to `Child::kill`. Returns whether the child is known to
/// have exited.
pub fn stop_child_process_gracefully<F>(child: &mut Child, timeout: Duration, log: F) -> bool
where
    F: Fn(&str) + Copy,
{
    if let Ok(Some(status)) = child.try_wait() {
        log(&format!(
            "child already exited before stop: pid={}, status={status}",
            child.id()
        ));
        return true;
    }

    let pid = child.id();
    let pid_arg = pid.to_string();

    let graceful = graceful_stop_args(&pid_arg);
    let graceful_label = graceful.0;
    let graceful_status = run_with_args(graceful, log);
    let graceful_wait_timeout = resolve_graceful_wait_timeout(
        pid,
        timeout,
        graceful_non_success_cap(timeout),
        &graceful_status,
        graceful_label,
        log,
    );
    if wait_for_child_exit(child, graceful_wait_timeout) {
        return true;
    }

    let force_status = run_with_args(force_stop_args(&pid_arg), log);
    let followup_wait =
        compute_followup_wait(timeout, Duration::from_millis(FORCE_STOP_WAIT_MAX_MS));
    log(&format!(
        "child graceful stop timed out, force-kill issued: pid={pid}, graceful={graceful_status:?}, force={force_status:?}, followup_wait_ms={}",
        followup_wait.as_millis(),
    ));
    if wait_for_child_exit(child, followup_wait) {
        return true;
    }

    if let Err(error) = child.kill() {
        log(&format!("direct kill failed: pid={pid}, error={error}"));
    }
    wait_for_child_exit(child, Duration::from_millis(FORCE_STOP_WAIT_MIN_MS))
}

#[cfg(target_os = "windows")]
fn kill_by_image_name_args(image_name: &str) -> (&'static str, &'static str, Vec<String>) {
    (
        "taskkill by image name",
        "taskkill",
        vec![
            "/IM".into(),
            image_name.into(),
            "/F".into(),
            "/T".into(),
        ],
    )
}

#[cfg(not(target_os = "windows"))]
fn kill_by_image_name_args(image_name: &str) -> (&'static str, &'static str, Vec<String>) {
    (
        "pkill by image name",
        "pkill",
        vec!["-KILL".into(), "-x".into(), image_name.into()],
    )
}

/// Best-effort, OS-level kill of every process named `image_name`. Used only
/// for orphan cleanup once the held handle is gone or did not stop.
pub fn kill_processes_by_image_name<F>(image_name: &str, log: F) -> bool
where
    F: Fn(&str),
{
    let image_name = image_name.trim();
    if image_name.is_empty() {
        log("kill by image name skipped: empty image name");
        return false;
    }

    log(&format!("killing leftover backend processes named {image_name}"));
    matches!(
        run_with_args(kill_by_image_name_args(image_name), &log),
        Ok(status) if status.success()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn compute_followup_wait_respects_min_and_cap() {
        assert_eq!(
            compute_followup_wait(Duration::from_millis(0), Duration::from_millis(900)),
            Duration::ZERO
        );
        assert_eq!(
            compute_followup_wait(Duration::from_millis(100), Duration::from_millis(900)),
            Duration::from_millis(200)
        );
        assert_eq!(
            compute_followup_wait(Duration::from_millis(9_000), Duration::from_millis(900)),
            Duration::from_millis(900)
        );
    }

    #[test]
    fn resolve_graceful_wait_timeout_shortens_and_logs_on_failure() {
        let logs = Mutex::new(Vec::new());
        let graceful_status: io::Result<ExitStatus> = Err(io::Error::other("simulated failure"));
        let wait = resolve_graceful_wait_timeout(
            42,
            Duration::from_millis(2_000),
            Duration::from_millis(350),
            &graceful_status,
            "taskkill graceful stop",
            |message| logs.lock().expect("lock logs").push(message.to_string()),
        );

        assert_eq!(wait, Duration::from_millis(350));
        let snapshot = logs.lock().expect("lock logs");
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].contains("shorten graceful wait"));
    }

    #[test]
    fn kill_by_image_name_rejects_blank_name() {
        let logs = Mutex::new(Vec::new());
        let killed = kill_processes_by_image_name("  ", |message| {
            logs.lock().expect("lock logs").push(message.to_string())
        });

        assert!(!killed);
        assert!(logs.lock().expect("lock logs")[0].contains("empty image name"));
    }

    #[test]
    fn kill_by_image_name_targets_exact_image() {
        let (_, program, args) = kill_by_image_name_args("run.exe");
        assert!(!program.is_empty());
        assert!(args.iter().any(|arg| arg == "run.exe"));
    }

    #[cfg(unix)]
    #[test]
    fn stop_child_process_gracefully_terminates_sleeping_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sleep");

        assert!(stop_child_process_gracefully(
            &mut child,
            Duration::from_secs(5),
            |_| {}
        ));
        assert!(child.try_wait().expect("poll child").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn stop_child_process_gracefully_accepts_already_exited_child() {
        let mut child = Command::new("true").spawn().expect("spawn true");
        child.wait().expect("wait for true");
        assert!(stop_child_process_gracefully(
            &mut child,
            Duration::from_millis(500),
            |_| {}
        ));
    }
}
