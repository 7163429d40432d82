#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[Hazard]
pub fn unsafe_speedup() {}
