use std::{
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::{Duration, Instant},
};

use url::Url;

use crate::{
    append_startup_log, BackendSupervisor, BACKEND_PING_TIMEOUT_MS, READY_BACKOFF_INITIAL_MS,
    READY_BACKOFF_MAX_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    ReadyImmediately,
    ReadyAfterWait { attempts: u32 },
    BackendExited,
    TimedOut { attempts: u32 },
}

impl ReadinessOutcome {
    pub fn is_ready(self) -> bool {
        matches!(self, Self::ReadyImmediately | Self::ReadyAfterWait { .. })
    }
}

/// The window's first navigation can only be trusted when the backend was
/// already listening before the window was created. Otherwise the page may
/// be the engine's error page, even if the next probe succeeds at once.
pub fn should_navigate_after_wait(
    reachable_before_window: bool,
    outcome: ReadinessOutcome,
) -> bool {
    !reachable_before_window && outcome.is_ready()
}

/// Delay before probe `attempt + 1`: doubling from `initial`, capped at `max`.
pub fn backoff_delay(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let factor = 1_u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
    initial.saturating_mul(factor).min(max)
}

pub fn ping_backend(backend_url: &str, timeout_ms: u64) -> bool {
    let Ok(parsed) = Url::parse(backend_url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let port = parsed.port_or_known_default().unwrap_or(80);
    let timeout = Duration::from_millis(timeout_ms.max(50));

    let Ok(addrs) = (host, port).to_socket_addrs() else {
        return false;
    };
    addrs
        .into_iter()
        .any(|address| TcpStream::connect_timeout(&address, timeout).is_ok())
}

/// Polls until `probe` succeeds, `backend_alive` reports the child is gone, or
/// `budget` runs out. Blocking; call from a worker thread.
pub fn wait_for_backend<P, A, F>(
    mut probe: P,
    mut backend_alive: A,
    budget: Duration,
    initial_delay: Duration,
    max_delay: Duration,
    log: F,
) -> ReadinessOutcome
where
    P: FnMut() -> bool,
    A: FnMut() -> bool,
    F: Fn(&str),
{
    if probe() {
        return ReadinessOutcome::ReadyImmediately;
    }

    let started = Instant::now();
    let mut attempts = 1_u32;
    loop {
        if !backend_alive() {
            log("backend process is not running; stop waiting for readiness");
            return ReadinessOutcome::BackendExited;
        }

        let elapsed = started.elapsed();
        if elapsed >= budget {
            return ReadinessOutcome::TimedOut { attempts };
        }
        let delay = backoff_delay(attempts - 1, initial_delay, max_delay).min(budget - elapsed);
        thread::sleep(delay);

        attempts += 1;
        if probe() {
            log(&format!(
                "backend became reachable after {attempts} probes ({}ms)",
                started.elapsed().as_millis()
            ));
            return ReadinessOutcome::ReadyAfterWait { attempts };
        }
    }
}

impl BackendSupervisor {
    pub(crate) fn wait_until_reachable(&self, backend_url: &str, budget: Duration) -> ReadinessOutcome {
        let outcome = wait_for_backend(
            || ping_backend(backend_url, BACKEND_PING_TIMEOUT_MS),
            || self.is_running(),
            budget,
            Duration::from_millis(READY_BACKOFF_INITIAL_MS),
            Duration::from_millis(READY_BACKOFF_MAX_MS),
            append_startup_log,
        );
        if let ReadinessOutcome::TimedOut { attempts } = outcome {
            append_startup_log(&format!(
                "backend not reachable at {backend_url} after {}ms ({attempts} probes); leaving window as is",
                budget.as_millis()
            ));
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, net::TcpListener};

    const FAST: Duration = Duration::from_millis(1);

    #[test]
    fn backoff_delay_doubles_until_cap() {
        let initial = Duration::from_millis(200);
        let max = Duration::from_millis(2_000);
        assert_eq!(backoff_delay(0, initial, max), Duration::from_millis(200));
        assert_eq!(backoff_delay(1, initial, max), Duration::from_millis(400));
        assert_eq!(backoff_delay(3, initial, max), Duration::from_millis(1_600));
        assert_eq!(backoff_delay(4, initial, max), max);
        assert_eq!(backoff_delay(40, initial, max), max);
    }

    #[test]
    fn wait_for_backend_reports_immediate_readiness() {
        let outcome = wait_for_backend(|| true, || true, Duration::from_secs(1), FAST, FAST, |_| {});
        assert_eq!(outcome, ReadinessOutcome::ReadyImmediately);
        assert!(outcome.is_ready());
    }

    #[test]
    fn wait_for_backend_retries_until_reachable() {
        let probes = Cell::new(0);
        let outcome = wait_for_backend(
            || {
                probes.set(probes.get() + 1);
                probes.get() >= 3
            },
            || true,
            Duration::from_secs(5),
            FAST,
            FAST,
            |_| {},
        );
        assert_eq!(outcome, ReadinessOutcome::ReadyAfterWait { attempts: 3 });
        assert!(outcome.is_ready());
    }

    #[test]
    fn wait_for_backend_stops_when_child_exits() {
        let outcome = wait_for_backend(|| false, || false, Duration::from_secs(5), FAST, FAST, |_| {});
        assert_eq!(outcome, ReadinessOutcome::BackendExited);
    }

    #[test]
    fn wait_for_backend_gives_up_after_budget() {
        let outcome = wait_for_backend(
            || false,
            || true,
            Duration::from_millis(30),
            FAST,
            Duration::from_millis(5),
            |_| {},
        );
        assert!(matches!(outcome, ReadinessOutcome::TimedOut { attempts } if attempts > 1));
    }

    #[test]
    fn window_is_renavigated_unless_backend_was_up_before_it() {
        let ready_now = ReadinessOutcome::ReadyImmediately;
        let ready_later = ReadinessOutcome::ReadyAfterWait { attempts: 4 };
        assert!(should_navigate_after_wait(false, ready_now));
        assert!(should_navigate_after_wait(false, ready_later));
        assert!(!should_navigate_after_wait(true, ready_now));
        assert!(!should_navigate_after_wait(
            false,
            ReadinessOutcome::TimedOut { attempts: 9 }
        ));
        assert!(!should_navigate_after_wait(false, ReadinessOutcome::BackendExited));
    }

    #[test]
    fn ping_backend_detects_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let port = listener.local_addr().expect("listener addr").port();
        assert!(ping_backend(&format!("http://127.0.0.1:{port}/"), 500));

        drop(listener);
        assert!(!ping_backend("not a url", 500));
    }
}
