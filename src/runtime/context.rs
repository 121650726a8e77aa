//! Lifecycle management for the shared encoding context.
//!
//! The numeric conversion facility historically required a process-wide
//! environment created exactly once plus one error-reporting handle per
//! thread. Both are modelled here as an explicit resource manager: the
//! context transitions `Uninitialized -> Initializing -> Ready` under a
//! single mutex (with a lock-free fast path once ready), and thread-private
//! handles live in a bounded table keyed by thread identity, released
//! explicitly when a thread is done encoding.
//!
//! An initialization or allocation failure is fatal for that call only; it
//! never poisons the shared state, so callers may retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::error::{ShardError, ShardResult};

/// Default bound on the per-thread handle table.
pub const DEFAULT_MAX_HANDLES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextState {
    Uninitialized,
    Initializing,
    Ready,
}

/// A thread's private error-reporting handle.
///
/// Records the most recent encoding diagnostic for the owning thread. Never
/// shared across threads; the runtime hands out exclusive access scoped to
/// one call.
#[derive(Debug)]
pub struct ErrorHandle {
    thread: ThreadId,
    failures: u64,
    last_error: Option<String>,
}

impl ErrorHandle {
    fn new(thread: ThreadId) -> Self {
        Self {
            thread,
            failures: 0,
            last_error: None,
        }
    }

    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records a failed encoding attempt on this thread.
    pub fn record_failure(&mut self, err: &ShardError) {
        self.failures += 1;
        self.last_error = Some(err.to_string());
        tracing::debug!(thread = ?self.thread, error = %err, "encoding failure recorded");
    }
}

/// Shared encoding runtime: one context per process, one handle per thread.
#[derive(Debug)]
pub struct EncodingRuntime {
    ready: AtomicBool,
    state: Mutex<ContextState>,
    handles: Mutex<HashMap<ThreadId, Arc<Mutex<ErrorHandle>>>>,
    max_handles: usize,
}

impl EncodingRuntime {
    pub fn new() -> Self {
        Self::with_handle_limit(DEFAULT_MAX_HANDLES)
    }

    pub fn with_handle_limit(max_handles: usize) -> Self {
        Self {
            ready: AtomicBool::new(false),
            state: Mutex::new(ContextState::Uninitialized),
            handles: Mutex::new(HashMap::new()),
            max_handles,
        }
    }

    /// The process-wide runtime backing the default pipeline.
    pub fn global() -> &'static EncodingRuntime {
        static GLOBAL: OnceLock<EncodingRuntime> = OnceLock::new();
        GLOBAL.get_or_init(EncodingRuntime::new)
    }

    /// Initializes the shared context on first use.
    ///
    /// Double-checked: the atomic flag short-circuits the common case, the
    /// state mutex serializes the one-time transition. A failed attempt
    /// resets the state so any caller may retry.
    pub fn ensure_ready(&self) -> ShardResult<()> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut state = self.state.lock();
        if *state == ContextState::Ready {
            return Ok(());
        }

        *state = ContextState::Initializing;
        if let Err(reason) = self.init_context() {
            *state = ContextState::Uninitialized;
            return Err(ShardError::ContextInit { reason });
        }
        *state = ContextState::Ready;
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn init_context(&self) -> Result<(), &'static str> {
        if self.max_handles == 0 {
            return Err("error handle capacity must be at least 1");
        }
        tracing::debug!(max_handles = self.max_handles, "encoding context initialized");
        Ok(())
    }

    /// Runs `f` with exclusive access to the calling thread's error handle,
    /// creating the handle on the thread's first call.
    ///
    /// Fails with [`ShardError::HandleAlloc`] when the handle table is full;
    /// the table is untouched in that case, so the same thread may retry
    /// after another thread releases its handle.
    pub fn with_thread_handle<T>(&self, f: impl FnOnce(&mut ErrorHandle) -> T) -> ShardResult<T> {
        self.ensure_ready()?;

        let thread = thread::current().id();
        let handle = {
            let mut handles = self.handles.lock();
            match handles.get(&thread) {
                Some(handle) => Arc::clone(handle),
                None => {
                    if handles.len() >= self.max_handles {
                        return Err(ShardError::HandleAlloc { thread });
                    }
                    let handle = Arc::new(Mutex::new(ErrorHandle::new(thread)));
                    handles.insert(thread, Arc::clone(&handle));
                    handle
                }
            }
        };

        // The handle is thread-scoped, so this lock is uncontended; it only
        // exists to keep the table and the handles independently lockable.
        let mut guard = handle.lock();
        Ok(f(&mut guard))
    }

    /// Releases the calling thread's handle (thread-exit notification).
    ///
    /// Returns whether a handle existed. Threads that encode transiently
    /// should call this before terminating so the table slot is reusable.
    pub fn release_thread_handle(&self) -> bool {
        let thread = thread::current().id();
        self.handles.lock().remove(&thread).is_some()
    }

    /// Number of live thread handles.
    pub fn handle_count(&self) -> usize {
        self.handles.lock().len()
    }

    /// The calling thread's most recent encoding diagnostic, if any.
    pub fn thread_diagnostic(&self) -> Option<String> {
        let thread = thread::current().id();
        let handles = self.handles.lock();
        let handle = handles.get(&thread)?;
        let diagnostic = handle.lock().last_error().map(str::to_owned);
        diagnostic
    }
}

impl Default for EncodingRuntime {
    fn default() -> Self {
        Self::new()
    }
}
