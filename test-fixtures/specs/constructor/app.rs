//! Construction gates twice: the call, and the type it names.

fn construct() {
    let indexer = Indexer(4); //~ warning FastIndex opt-in
    //~^ warning FastIndex opt-in
    let _ = indexer;
}

#[opt_in(FastIndex)]
fn relieved() {
    let _ = Indexer(4);
}
