#[experimental(severity = warning, scope = source_only)]
pub struct FastIndex;

#[FastIndex]
pub struct Indexer(pub u32);
