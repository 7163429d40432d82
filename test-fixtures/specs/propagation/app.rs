//! Signature positions leak; an opt-in alone is no relief there.

use util::Indexer;

#[opt_in(FastIndex)]
pub fn rebuild(indexer: Indexer) { //~ warning FastIndex propagate
    build_index();
}

#[FastIndex]
pub fn propagated(indexer: Indexer) {
    build_index();
}
