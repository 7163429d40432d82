//! A binary-scope marker cannot be waived in source, even inside a body.

#[opt_in(Hazard)] //~ config argument-binary-scope
fn tempted() {
    unsafe_speedup(); //~ error Hazard propagate
}

#[Hazard]
pub fn propagated() {
    unsafe_speedup();
}
