//! Per-thread trace ids
//!
//! Every thread that logs gets a small numeric id (`gid`), assigned on first
//! use. Trace ids are kept in a process-wide map keyed by that id, so a
//! request handler can tag every line it logs with one correlation token.

use parking_lot::RwLock;
use rand::Rng;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;

static NEXT_GID: AtomicU64 = AtomicU64::new(1);
static TRACE_DISABLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static GID: Cell<u64> = const { Cell::new(0) };
}

fn trace_map() -> &'static RwLock<HashMap<u64, String>> {
    static MAP: OnceLock<RwLock<HashMap<u64, String>>> = OnceLock::new();
    MAP.get_or_init(|| RwLock::new(HashMap::with_capacity(64)))
}

/// Id of the calling thread, stable for the thread's lifetime
pub fn current_gid() -> u64 {
    GID.with(|gid| {
        let id = gid.get();
        if id != 0 {
            return id;
        }
        let id = NEXT_GID.fetch_add(1, Ordering::Relaxed);
        gid.set(id);
        id
    })
}

/// Turn trace id bookkeeping off (or back on) for the whole process.
///
/// While disabled, setters are ignored. Ids already stored stay readable.
pub fn set_trace_disabled(disabled: bool) {
    TRACE_DISABLED.store(disabled, Ordering::Relaxed);
}

pub fn trace_disabled() -> bool {
    TRACE_DISABLED.load(Ordering::Relaxed)
}

/// Random 16 character hex id
pub fn gen_trace_id() -> String {
    format!("{:016x}", rand::thread_rng().gen::<u64>())
}

/// Append the trace id of `gid` to `out`, returning whether one was found.
pub(crate) fn write_trace(gid: u64, out: &mut String) -> bool {
    match trace_map().read().get(&gid) {
        Some(id) => {
            out.push_str(id);
            true
        }
        None => false,
    }
}

pub fn get_trace() -> Option<String> {
    get_trace_with_gid(current_gid())
}

pub fn get_trace_with_gid(gid: u64) -> Option<String> {
    trace_map().read().get(&gid).cloned()
}

/// Bind `trace_id` to the current thread. An empty id generates a new one.
pub fn set_trace(trace_id: impl Into<String>) {
    set_trace_with_gid(current_gid(), trace_id);
}

/// Bind a freshly generated id to the current thread and return it.
pub fn set_new_trace() -> String {
    let id = gen_trace_id();
    set_trace(id.clone());
    id
}

pub fn set_trace_with_gid(gid: u64, trace_id: impl Into<String>) {
    if trace_disabled() {
        return;
    }
    let mut trace_id = trace_id.into();
    if trace_id.is_empty() {
        trace_id = gen_trace_id();
    }
    trace_map().write().insert(gid, trace_id);
}

pub fn del_trace() {
    del_trace_with_gid(current_gid());
}

pub fn del_trace_with_gid(gid: u64) {
    trace_map().write().remove(&gid);
}

/// Binds a trace id to the current thread until dropped.
///
/// ```
/// use rust_pooled_logger::core::trace;
///
/// {
///     let _guard = trace::TraceGuard::new("req-42");
///     assert_eq!(trace::get_trace().as_deref(), Some("req-42"));
/// }
/// assert_eq!(trace::get_trace(), None);
/// ```
#[must_use = "the trace id is removed as soon as the guard is dropped"]
pub struct TraceGuard {
    gid: u64,
}

impl TraceGuard {
    pub fn new(trace_id: impl Into<String>) -> Self {
        let gid = current_gid();
        set_trace_with_gid(gid, trace_id);
        Self { gid }
    }
}

impl Drop for TraceGuard {
    fn drop(&mut self) {
        del_trace_with_gid(self.gid);
    }
}
