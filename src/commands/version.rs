//! Command: print version information.

/// Print the puppetize version to stdout.
pub fn run() {
    let version = option_env!("PUPPETIZE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("puppetize {version}");
}
