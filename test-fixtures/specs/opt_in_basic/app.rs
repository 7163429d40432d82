//! A body usage needs an opt-in; an enclosing opt-in silences it.

use util::FastIndex;

fn unrelieved() {
    build_index(); //~ warning FastIndex opt-in
}

#[opt_in(FastIndex)]
fn relieved() {
    build_index();
}

fn unrelated() {
    plain();
}
