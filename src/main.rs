fn main() {
    // per-project failures are already logged; only setup errors reach here
    if let Err(e) = tablewire::run() {
        tracing::error!("{e:#}");
    }
}
