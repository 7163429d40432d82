#[experimental(severity = error, scope = binary)]
pub struct Hazard;

#[Hazard]
pub fn unsafe_speedup() {}

pub fn internal_caller() {
    unsafe_speedup();
}
