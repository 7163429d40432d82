//! Marker declarations themselves are validated.

#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[experimental(severity = warning, scope = source_only)]
#[target(fn, struct)]
pub struct WellTargeted;

#[experimental(severity = warning, scope = source_only)]
#[target(expr, file)] //~ config disallowed-target
//~^ config disallowed-target
pub struct BadlyTargeted;

pub struct Ordinary;
