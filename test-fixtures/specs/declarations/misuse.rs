#[opt_in] //~ config opt-in-without-arguments
fn empty_list() {}

#[opt_in(Ordinary)] //~ config argument-not-marker
fn not_a_marker() {}

#[opt_in(Hazard)] //~ config argument-binary-scope
fn binary_marker() {}

#[opt_in(FastIndex)]
fn fine() {}
