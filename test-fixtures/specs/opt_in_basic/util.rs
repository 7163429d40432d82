//! Marker declaration and the gated surface used by this fixture.

#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[FastIndex]
pub fn build_index() {}

pub fn plain() {}
