use std::process::Command;

fn main() {
    println!("cargo:rustc-env=QUICKPOLL_GIT_HASH={}", capture("git", &["rev-parse", "--short", "HEAD"]));
    println!("cargo:rustc-env=QUICKPOLL_BUILD_DATE={}", capture("date", &["+%Y-%m-%d"]));

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
}

fn capture(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
