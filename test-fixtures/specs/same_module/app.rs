//! The same call pattern as `internal_caller`, but from another module.

fn cross_module_caller() {
    unsafe_speedup(); //~ error Hazard propagate
}
