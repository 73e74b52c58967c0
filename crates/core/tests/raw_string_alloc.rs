//! Allocation accounting for raw ConVar string storage
//!
//! A counting global allocator checks that growing a value allocates
//! exactly once and frees the old block exactly once, and that shrinking
//! touches the allocator not at all.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use cvar_unhide_core::{CommandArgs, ConVarDef, CvarRegistry, BufferedConsole};
use cvar_unhide_core::commands::set_raw;
use cvar_unhide_core::registry::RawString;

struct CountingAlloc;

thread_local! {
    static TRACKING: Cell<bool> = const { Cell::new(false) };
    static ALLOCS: Cell<usize> = const { Cell::new(0) };
    static DEALLOCS: Cell<usize> = const { Cell::new(0) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
    // try_with: the thread-local may already be gone during thread teardown
    let tracking = TRACKING.try_with(Cell::get).unwrap_or(false);
    if tracking {
        let _ = counter.try_with(|c| c.set(c.get() + 1));
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump(&ALLOCS);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        bump(&DEALLOCS);
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

/// Run `f` and return (allocations, deallocations) made on this thread
fn count<R>(f: impl FnOnce() -> R) -> (R, usize, usize) {
    ALLOCS.with(|c| c.set(0));
    DEALLOCS.with(|c| c.set(0));
    TRACKING.with(|t| t.set(true));
    let result = f();
    TRACKING.with(|t| t.set(false));
    (result, ALLOCS.with(Cell::get), DEALLOCS.with(Cell::get))
}

#[test]
fn grow_allocates_once_and_releases_old_block_once() {
    let mut raw = RawString::new("ab");

    let (grew, allocs, deallocs) = count(|| raw.assign("abcdefgh"));

    assert!(grew);
    assert_eq!(allocs, 1);
    assert_eq!(deallocs, 1);
    assert_eq!(raw.capacity(), 9);
}

#[test]
fn shrink_and_same_size_do_not_touch_allocator() {
    let mut raw = RawString::new("abcdefgh");

    let (grew, allocs, deallocs) = count(|| {
        let a = raw.assign("x");
        let b = raw.assign("12345678");
        a || b
    });

    assert!(!grew);
    assert_eq!(allocs, 0);
    assert_eq!(deallocs, 0);
    assert_eq!(raw.as_str(), "12345678");
}

#[test]
fn cvar_set_growth_releases_previous_storage() {
    let mut registry = CvarRegistry::new();
    registry.register_var(ConVarDef::new("foo", "1")).unwrap();
    let args = CommandArgs::tokenize("cvar_set foo 1234567890 nocallback");

    // Output and outcome strings allocate too; measure the storage alone
    let var = registry.find_var("foo").unwrap();
    assert_eq!(var.value().raw_string().capacity(), 2);

    let mut out = BufferedConsole::new();
    let outcome = set_raw(&mut registry, &args, &mut out).unwrap();

    assert!(outcome.reallocated);
    let var = registry.find_var("foo").unwrap();
    assert_eq!(var.value().raw_string().capacity(), 11);
    assert_eq!(var.int_value(), 1234567890);
    assert_eq!(var.string_value(), "1234567890");
}
