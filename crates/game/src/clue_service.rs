//! Clue text generation: an external writer with a timeout and a local fallback.
//!
//! The request runs on its own thread while the game sits in the loading
//! phase. Whatever goes wrong, the caller always ends up with five texts.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use procgen::{clue_prompt, SuspectProfile, CLUE_COUNT};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClueServiceError {
    #[error("no clue writer configured")]
    Offline,
    #[error("clue command is empty")]
    EmptyCommand,
    #[error("could not run clue command: {0}")]
    Io(#[from] std::io::Error),
    #[error("clue command exited with {0}")]
    CommandFailed(ExitStatus),
    #[error("reply is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected {expected} clues, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("clue {0} is blank")]
    Blank(usize),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("clue worker went away")]
    Disconnected,
    #[error("request cancelled")]
    Cancelled,
}

/// Shared between a request and its worker: the cancelled flag plus the
/// writer process, if one is running.
#[derive(Debug, Default, Clone)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    child: Mutex<Option<Child>>,
}

impl CancelHandle {
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Mark cancelled and kill the writer process, if any.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        if let Some(child) = self.child_slot().take() {
            reap(child);
        }
    }

    /// Hand a running process over so [`cancel`](Self::cancel) can kill it.
    /// A request that is already cancelled kills it straight away.
    pub fn adopt(&self, child: Child) -> Result<(), ClueServiceError> {
        let mut slot = self.child_slot();
        if self.is_cancelled() {
            drop(slot);
            reap(child);
            return Err(ClueServiceError::Cancelled);
        }
        *slot = Some(child);
        Ok(())
    }

    /// Take the process back once its output is in. `None` if it was killed.
    pub fn release(&self) -> Option<Child> {
        self.child_slot().take()
    }

    fn child_slot(&self) -> MutexGuard<'_, Option<Child>> {
        self.inner.child.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn reap(mut child: Child) {
    let pid = child.id();
    if let Err(e) = child.kill() {
        log::debug!("Clue command {} already gone: {}", pid, e);
    }
    if let Err(e) = child.wait() {
        log::warn!("Could not reap clue command {}: {}", pid, e);
    }
}

/// Anything that can write clue texts for a culprit.
pub trait ClueSource: Send + Sync {
    /// Blocking. Long-running sources should give up once `cancel` fires.
    fn generate(&self, profile: &SuspectProfile, cancel: &CancelHandle) -> Result<Vec<String>, ClueServiceError>;
}

/// Used when no writer is configured. Always falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineClueSource;

impl ClueSource for OfflineClueSource {
    fn generate(&self, _profile: &SuspectProfile, _cancel: &CancelHandle) -> Result<Vec<String>, ClueServiceError> {
        Err(ClueServiceError::Offline)
    }
}

/// Runs an external program: prompt on stdin, JSON array on stdout.
#[derive(Debug, Clone)]
pub struct CommandClueSource {
    program: String,
    args: Vec<String>,
}

impl CommandClueSource {
    pub fn new(argv: Vec<String>) -> Result<Self, ClueServiceError> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ClueServiceError::EmptyCommand)?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }
}

impl ClueSource for CommandClueSource {
    fn generate(&self, profile: &SuspectProfile, cancel: &CancelHandle) -> Result<Vec<String>, ClueServiceError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        cancel.adopt(child)?;

        if let Some(mut stdin) = stdin {
            // A writer that ignores its input may close the pipe early.
            if let Err(e) = stdin.write_all(clue_prompt(profile).as_bytes()) {
                log::debug!("Clue command did not take the prompt: {}", e);
            }
        }

        // Reaches EOF when the command exits or is killed.
        let mut reply = Vec::new();
        if let Some(mut stdout) = stdout {
            stdout.read_to_end(&mut reply)?;
        }

        let Some(mut child) = cancel.release() else {
            return Err(ClueServiceError::Cancelled);
        };
        let status = child.wait()?;
        if !status.success() {
            return Err(ClueServiceError::CommandFailed(status));
        }
        parse_clue_reply(&String::from_utf8_lossy(&reply))
    }
}

/// Parse a writer's reply: a JSON array of exactly [`CLUE_COUNT`] non-blank
/// strings, optionally inside a markdown code fence.
pub fn parse_clue_reply(reply: &str) -> Result<Vec<String>, ClueServiceError> {
    let texts: Vec<String> = serde_json::from_str(strip_code_fence(reply))?;
    if texts.len() != CLUE_COUNT {
        return Err(ClueServiceError::WrongCount {
            expected: CLUE_COUNT,
            got: texts.len(),
        });
    }
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let text = text.trim();
            if text.is_empty() {
                Err(ClueServiceError::Blank(i))
            } else {
                Ok(text.to_string())
            }
        })
        .collect()
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Texts for a level, and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClueBatch {
    Generated(Vec<String>),
    Fallback(Vec<String>),
}

impl ClueBatch {
    pub fn texts(&self) -> &[String] {
        match self {
            ClueBatch::Generated(texts) | ClueBatch::Fallback(texts) => texts,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, ClueBatch::Generated(_))
    }
}

/// One outstanding request to a [`ClueSource`]. Dropping it stops the work.
pub struct ClueRequest {
    receiver: Receiver<Result<Vec<String>, ClueServiceError>>,
    /// `None` when the timeout is too long to express as an instant.
    deadline: Option<Instant>,
    timeout: Duration,
    fallback: Vec<String>,
    cancel: CancelHandle,
}

impl ClueRequest {
    /// Start generating on a worker thread. `fallback` is used on any failure.
    pub fn spawn(
        source: Arc<dyn ClueSource>,
        profile: SuspectProfile,
        fallback: Vec<String>,
        timeout: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancel = CancelHandle::default();
        let worker_cancel = cancel.clone();
        let worker = thread::Builder::new()
            .name("clue-writer".into())
            .spawn(move || {
                // The receiver is gone if the request timed out or was cancelled.
                let _ = sender.send(source.generate(&profile, &worker_cancel));
            });
        if let Err(e) = worker {
            log::warn!("Could not start clue worker: {}", e);
        }

        let deadline = Instant::now().checked_add(timeout);
        if deadline.is_none() {
            log::warn!("Clue timeout {:?} is too long, waiting without a deadline", timeout);
        }

        Self {
            receiver,
            deadline,
            timeout,
            fallback,
            cancel,
        }
    }

    /// Non-blocking check. `Some` once the request has settled either way.
    pub fn poll(&mut self) -> Option<ClueBatch> {
        match self.receiver.try_recv() {
            Ok(Ok(texts)) => {
                log::info!("Received {} generated clues", texts.len());
                Some(ClueBatch::Generated(texts))
            }
            Ok(Err(e)) => Some(self.fall_back(e)),
            Err(TryRecvError::Disconnected) => Some(self.fall_back(ClueServiceError::Disconnected)),
            Err(TryRecvError::Empty) if self.deadline.is_some_and(|d| Instant::now() >= d) => {
                self.cancel.cancel();
                Some(self.fall_back(ClueServiceError::Timeout(self.timeout)))
            }
            Err(TryRecvError::Empty) => None,
        }
    }

    /// Stop waiting, kill the writer and take the fallback now.
    pub fn cancel(self) -> ClueBatch {
        self.cancel.cancel();
        self.fall_back(ClueServiceError::Cancelled)
    }

    /// Stop the writer when nobody needs its texts any more.
    pub fn abandon(self) {
        self.cancel.cancel();
        log::debug!("Abandoned clue request");
    }

    fn fall_back(&self, error: ClueServiceError) -> ClueBatch {
        match error {
            ClueServiceError::Offline | ClueServiceError::Cancelled => {
                log::info!("Using built-in clues ({})", error)
            }
            _ => log::warn!("Clue writer failed ({}), using built-in clues", error),
        }
        ClueBatch::Fallback(self.fallback.clone())
    }
}

impl Drop for ClueRequest {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SuspectProfile {
        SuspectProfile {
            name: "Agent B".into(),
            trait_tag: "Gloves".into(),
            color: "green".into(),
        }
    }

    fn fallback() -> Vec<String> {
        vec!["fallback".to_string(); CLUE_COUNT]
    }

    struct Fixed(Vec<String>);

    impl ClueSource for Fixed {
        fn generate(&self, _: &SuspectProfile, _: &CancelHandle) -> Result<Vec<String>, ClueServiceError> {
            Ok(self.0.clone())
        }
    }

    struct Slow(Duration);

    impl ClueSource for Slow {
        fn generate(&self, _: &SuspectProfile, _: &CancelHandle) -> Result<Vec<String>, ClueServiceError> {
            thread::sleep(self.0);
            Ok(vec!["late".to_string(); CLUE_COUNT])
        }
    }

    fn settle(mut request: ClueRequest) -> ClueBatch {
        let give_up = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(batch) = request.poll() {
                return batch;
            }
            assert!(Instant::now() < give_up, "request never settled");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn parses_plain_array() {
        let texts = parse_clue_reply(r#"["a", "b", " c ", "d", "e"]"#).unwrap();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn parses_fenced_array() {
        let reply = "```json\n[\"a\",\"b\",\"c\",\"d\",\"e\"]\n```\n";
        assert_eq!(parse_clue_reply(reply).unwrap().len(), CLUE_COUNT);
    }

    #[test]
    fn rejects_wrong_count() {
        assert!(matches!(
            parse_clue_reply(r#"["a", "b"]"#),
            Err(ClueServiceError::WrongCount { expected: 5, got: 2 })
        ));
    }

    #[test]
    fn rejects_blank_and_non_strings() {
        assert!(matches!(
            parse_clue_reply(r#"["a", "  ", "c", "d", "e"]"#),
            Err(ClueServiceError::Blank(1))
        ));
        assert!(matches!(
            parse_clue_reply(r#"[1, 2, 3, 4, 5]"#),
            Err(ClueServiceError::Parse(_))
        ));
        assert!(matches!(parse_clue_reply("sorry, no"), Err(ClueServiceError::Parse(_))));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            CommandClueSource::new(vec![]),
            Err(ClueServiceError::EmptyCommand)
        ));
        assert!(CommandClueSource::new(vec![" ".into()]).is_err());
    }

    #[test]
    fn generated_texts_arrive() {
        let texts: Vec<String> = (0..CLUE_COUNT).map(|i| format!("clue {i}")).collect();
        let request = ClueRequest::spawn(
            Arc::new(Fixed(texts.clone())),
            profile(),
            fallback(),
            Duration::from_secs(5),
        );
        let batch = settle(request);
        assert!(batch.is_generated());
        assert_eq!(batch.texts(), texts.as_slice());
    }

    #[test]
    fn offline_source_falls_back() {
        let request = ClueRequest::spawn(
            Arc::new(OfflineClueSource),
            profile(),
            fallback(),
            Duration::from_secs(5),
        );
        assert_eq!(settle(request), ClueBatch::Fallback(fallback()));
    }

    #[test]
    fn slow_source_times_out() {
        let request = ClueRequest::spawn(
            Arc::new(Slow(Duration::from_millis(500))),
            profile(),
            fallback(),
            Duration::from_millis(20),
        );
        assert_eq!(settle(request), ClueBatch::Fallback(fallback()));
    }

    #[test]
    fn cancel_returns_fallback_at_once() {
        let request = ClueRequest::spawn(
            Arc::new(Slow(Duration::from_millis(500))),
            profile(),
            fallback(),
            Duration::from_secs(5),
        );
        assert_eq!(request.cancel(), ClueBatch::Fallback(fallback()));
    }

    #[cfg(unix)]
    #[test]
    fn command_source_reads_stdout() {
        let source = CommandClueSource::new(vec![
            "sh".into(),
            "-c".into(),
            r#"cat > /dev/null; echo '["one","two","three","four","five"]'"#.into(),
        ])
        .unwrap();
        let texts = source.generate(&profile(), &CancelHandle::default()).unwrap();
        assert_eq!(texts[4], "five");
    }

    #[cfg(unix)]
    #[test]
    fn command_failure_is_reported() {
        let source = CommandClueSource::new(vec!["sh".into(), "-c".into(), "exit 3".into()]).unwrap();
        assert!(matches!(
            source.generate(&profile(), &CancelHandle::default()),
            Err(ClueServiceError::CommandFailed(_))
        ));
    }

    #[test]
    fn endless_timeout_does_not_overflow() {
        let mut request = ClueRequest::spawn(
            Arc::new(Slow(Duration::from_millis(200))),
            profile(),
            fallback(),
            Duration::from_secs(u64::MAX / 2),
        );
        assert_eq!(request.poll(), None);
        assert_eq!(request.cancel(), ClueBatch::Fallback(fallback()));
    }

    #[test]
    fn cancelled_handle_refuses_new_work() {
        let cancel = CancelHandle::default();
        cancel.cancel();
        assert!(cancel.is_cancelled());
        assert!(cancel.release().is_none());
    }

    /// Start a writer that records its pid and then hangs.
    #[cfg(target_os = "linux")]
    fn hung_writer(name: &str, timeout: Duration) -> (ClueRequest, std::path::PathBuf) {
        let pid_file = std::env::temp_dir().join(format!("traitor-{}-{}.pid", name, std::process::id()));
        let _ = std::fs::remove_file(&pid_file);
        let script = format!("echo $$ > '{}'; exec sleep 7", pid_file.display());
        let source = CommandClueSource::new(vec!["sh".into(), "-c".into(), script]).unwrap();
        let request = ClueRequest::spawn(Arc::new(source), profile(), fallback(), timeout);
        (request, pid_file)
    }

    #[cfg(target_os = "linux")]
    fn wait_for_pid(pid_file: &std::path::Path) -> String {
        let give_up = Instant::now() + Duration::from_secs(5);
        loop {
            if let Ok(pid) = std::fs::read_to_string(pid_file) {
                if !pid.trim().is_empty() {
                    return pid.trim().to_string();
                }
            }
            assert!(Instant::now() < give_up, "writer never started");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[cfg(target_os = "linux")]
    fn assert_process_gone(pid: &str) {
        let proc_dir = std::path::PathBuf::from(format!("/proc/{pid}"));
        let give_up = Instant::now() + Duration::from_secs(2);
        while proc_dir.exists() {
            assert!(Instant::now() < give_up, "writer {pid} still running");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn cancel_kills_the_writer() {
        let (request, pid_file) = hung_writer("cancel", Duration::from_secs(30));
        let pid = wait_for_pid(&pid_file);
        assert_eq!(request.cancel(), ClueBatch::Fallback(fallback()));
        assert_process_gone(&pid);
        let _ = std::fs::remove_file(pid_file);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn timeout_kills_the_writer() {
        let (request, pid_file) = hung_writer("timeout", Duration::from_millis(50));
        let pid = wait_for_pid(&pid_file);
        assert_eq!(settle(request), ClueBatch::Fallback(fallback()));
        assert_process_gone(&pid);
        let _ = std::fs::remove_file(pid_file);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn abandoned_request_kills_the_writer() {
        let (request, pid_file) = hung_writer("abandon", Duration::from_secs(30));
        let pid = wait_for_pid(&pid_file);
        request.abandon();
        assert_process_gone(&pid);
        let _ = std::fs::remove_file(pid_file);
    }
}
