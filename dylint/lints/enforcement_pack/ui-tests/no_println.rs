// Test case for NO_PRINTLN lint

fn bad_println() {
    println!("following redirect");
}

fn bad_eprintln() {
    eprintln!("redirect limit exceeded");
}

fn bad_dbg() {
    let jumps = 3;
    dbg!(jumps);
}

// Good: using tracing
fn good_tracing() {
    tracing::info!(phase = "Validation", "following redirect");
}

fn main() {
    bad_println();
    bad_eprintln();
    bad_dbg();
    good_tracing();
}
