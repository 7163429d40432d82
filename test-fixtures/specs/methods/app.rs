//! Members inherit the container's markers.

fn uses_method() {
    let engine = Engine; //~ warning FastIndex opt-in
    engine.start(); //~ warning FastIndex opt-in
}

#[opt_in(FastIndex)]
fn relieved() {
    let engine = Engine;
    engine.start();
    Engine::start(&engine);
}
