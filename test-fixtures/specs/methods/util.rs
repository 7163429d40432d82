#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[FastIndex]
pub struct Engine;

impl Engine {
    pub fn start(&self) {}
}
