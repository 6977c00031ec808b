fn main() {
    // Embed `git describe` output when building from a checkout; fall back to
    // the crate version for registry builds.
    let git_info = std::process::Command::new("git")
        .args(["describe", "--always", "--tags", "--long", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match git_info {
        Some(info) => {
            println!("cargo:rerun-if-changed=.git/HEAD");
            println!("cargo:rustc-env=_GIT_INFO={info}");
        }
        None => {
            println!("cargo:rustc-env=_GIT_INFO={}", env!("CARGO_PKG_VERSION"));
        }
    }
}
