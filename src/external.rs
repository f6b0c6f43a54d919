//! Launching external programs: fork, exec, and wait for a terminal state.
//!
//! One invocation walks `CREATING -> CHILD_RUNNING -> (CHILD_EXITED |
//! CHILD_SIGNALED)`, or stops at `CREATE_FAILED` when the fork itself fails.
//! A child whose exec fails exits with [`EXEC_FAILURE_STATUS`], which the
//! parent observes as an ordinary exit.

use crate::SHELL_NAME;
use crate::command::{Continuation, Streams};
use crate::error::{ShellError, ShellResult};
use crate::lexer::ArgVector;
use log::{debug, warn};
use nix::errno::Errno;
use nix::libc::{self, c_char};
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, fork};
use std::ffi::CString;
use std::ptr;

/// Status a child exits with when its program image could not be replaced.
pub const EXEC_FAILURE_STATUS: i32 = 1;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(Signal),
}

/// A running child process, owned until its termination has been reaped.
#[derive(Debug)]
pub struct ChildHandle {
    pid: Pid,
}

impl ChildHandle {
    /// Block until the child exits or is killed by a signal.
    ///
    /// Stop and continue notifications are logged and waited through.
    pub fn wait_for_exit_or_signal(self) -> ShellResult<ExitOutcome> {
        loop {
            match waitpid(self.pid, Some(WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(ExitOutcome::Exited(code)),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    return Ok(ExitOutcome::Signaled(signal));
                }
                Ok(WaitStatus::Stopped(pid, signal)) => {
                    debug!("child {pid} stopped by {}", signal.as_str());
                }
                Ok(status) => debug!("child {}: {status:?}", self.pid),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn to_c_strings(args: &ArgVector) -> ShellResult<Vec<CString>> {
    args.as_slice()
        .iter()
        .map(|arg| CString::new(arg.as_bytes()).map_err(|_| ShellError::NulByte(arg.clone())))
        .collect()
}

/// Null-terminated `argv` pointer array borrowing from `args`.
fn exec_pointers(args: &[CString]) -> Vec<*const c_char> {
    args.iter()
        .map(|arg| arg.as_ptr())
        .chain(std::iter::once(ptr::null()))
        .collect()
}

/// Replace the current process image, or write the OS error and exit.
///
/// Only runs in a freshly forked child: everything it touches was allocated
/// before the fork, and it writes straight to the stderr descriptor.
fn exec_or_exit(argv: &[*const c_char]) -> ! {
    if let Some(&program) = argv.first().filter(|p| !p.is_null()) {
        // SAFETY: `argv` is a null-terminated array of pointers to live C strings.
        unsafe { libc::execvp(program, argv.as_ptr()) };
        let errno = Errno::last();
        let stderr = std::io::stderr();
        let _ = nix::unistd::write(&stderr, SHELL_NAME.as_bytes());
        let _ = nix::unistd::write(&stderr, b": ");
        let _ = nix::unistd::write(&stderr, errno.desc().as_bytes());
        let _ = nix::unistd::write(&stderr, b"\n");
    }
    // SAFETY: terminating without running exit handlers is the intent here.
    unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
}

/// Fork a child running `args[0]` with `args` as its argument list.
///
/// The child inherits the environment and the three standard descriptors.
/// Callers flush buffered output first so it is not duplicated.
pub fn spawn(args: &ArgVector) -> ShellResult<ChildHandle> {
    let argv = to_c_strings(args)?;
    if argv.is_empty() {
        return Err(ShellError::MissingArgument("launch"));
    }
    let pointers = exec_pointers(&argv);
    // SAFETY: the child performs no allocation; it only calls execvp(3),
    // write(2) and _exit(2) on data prepared before the fork.
    match unsafe { fork() }? {
        ForkResult::Parent { child } => {
            debug!("spawned {} as pid {child}", args.as_slice()[0]);
            Ok(ChildHandle { pid: child })
        }
        ForkResult::Child => exec_or_exit(&pointers),
    }
}

/// Spawn `args` and wait for it to finish.
pub fn run(args: &ArgVector) -> ShellResult<ExitOutcome> {
    spawn(args)?.wait_for_exit_or_signal()
}

/// Run an external command to completion; failures are reported, never fatal.
pub fn launch(args: &ArgVector, io: &mut Streams<'_>) -> Continuation {
    io.flush();
    match run(args) {
        Ok(ExitOutcome::Exited(code)) => debug!("child exited with status {code}"),
        Ok(ExitOutcome::Signaled(signal)) => debug!("child killed by {}", signal.as_str()),
        Err(e) => {
            warn!("launching {:?} failed: {e}", args.command());
            io.report(e);
        }
    }
    Continuation::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn args(words: &[&str]) -> ArgVector {
        words.iter().copied().collect()
    }

    #[test]
    fn true_exits_zero() {
        assert_eq!(run(&args(&["true"])).unwrap(), ExitOutcome::Exited(0));
    }

    #[test]
    fn exit_code_is_observed() {
        let outcome = run(&args(&["sh", "-c", "exit 7"])).unwrap();
        assert_eq!(outcome, ExitOutcome::Exited(7));
    }

    #[test]
    fn signal_termination_is_observed() {
        let outcome = run(&args(&["sh", "-c", "kill -TERM $$"])).unwrap();
        assert_eq!(outcome, ExitOutcome::Signaled(Signal::SIGTERM));
    }

    #[test]
    fn stopped_child_is_waited_through() {
        // Stops itself, then is resumed by a background helper before exiting.
        let script = "(sleep 0.2; kill -CONT $$) & kill -STOP $$; exit 3";
        let outcome = run(&args(&["sh", "-c", script])).unwrap();
        assert_eq!(outcome, ExitOutcome::Exited(3));
    }

    #[test]
    fn launch_blocks_until_child_finishes() {
        let started = Instant::now();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut io = Streams::new(&mut out, &mut err);

        let res = launch(&args(&["sleep", "0.3"]), &mut io);

        assert_eq!(res, Continuation::Continue);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(err.is_empty());
    }

    #[test]
    fn missing_program_exits_with_failure_status() {
        let outcome = run(&args(&["myshell-no-such-program-xyz"])).unwrap();
        assert_eq!(outcome, ExitOutcome::Exited(EXEC_FAILURE_STATUS));
    }

    #[test]
    fn missing_program_still_continues() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut io = Streams::new(&mut out, &mut err);
        let res = launch(&args(&["myshell-no-such-program-xyz"]), &mut io);
        assert_eq!(res, Continuation::Continue);
    }

    #[test]
    fn nul_byte_is_reported_without_forking() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut io = Streams::new(&mut out, &mut err);
        let res = launch(&args(&["echo", "a\0b"]), &mut io);

        assert_eq!(res, Continuation::Continue);
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("myshell: argument contains an interior NUL byte"));
    }

    #[test]
    fn exec_pointers_are_null_terminated() {
        let argv = to_c_strings(&args(&["ls", "-l"])).unwrap();
        let pointers = exec_pointers(&argv);
        assert_eq!(pointers.len(), 3);
        assert_eq!(pointers[0], argv[0].as_ptr());
        assert_eq!(pointers[1], argv[1].as_ptr());
        assert!(pointers[2].is_null());
    }

    #[test]
    fn empty_vector_is_rejected() {
        assert_eq!(
            spawn(&args(&[])).unwrap_err(),
            ShellError::MissingArgument("launch")
        );
    }
}
