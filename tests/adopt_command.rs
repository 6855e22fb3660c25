#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for `adopt`.

mod common;

use common::{TestContextBuilder, is_symlink};
use dotctl::commands;

#[cfg(unix)]
#[test]
fn adopt_moves_links_and_registers() {
    let ctx = TestContextBuilder::new()
        .with_home_file(".config/foo/foo.toml", "answer = 42\n")
        .build();
    let mut session = ctx.session("arch", false);
    commands::adopt::run(&mut session, &["foo".to_string(), "arch".to_string()], &ctx.log)
        .unwrap();

    let moved = ctx.root().join("foo/foo.toml");
    assert_eq!(std::fs::read_to_string(&moved).unwrap(), "answer = 42\n");

    let link = ctx.home().join(".config/foo");
    assert!(is_symlink(&link));
    assert_eq!(
        std::fs::read_to_string(link.join("foo.toml")).unwrap(),
        "answer = 42\n"
    );

    let reloaded = ctx.session("arch", false);
    assert_eq!(reloaded.config.packages_for_system("arch"), vec!["foo"]);
    assert!(reloaded.config.packages_for_system("macos").is_empty());
}

#[cfg(unix)]
#[test]
fn adopt_everything_skips_desktop_directories() {
    let ctx = TestContextBuilder::new()
        .with_home_file(".config/alacritty/alacritty.toml", "")
        .with_home_file(".config/pulse/client.conf", "")
        .with_home_file(".config/gtk-3.0/settings.ini", "")
        .build();
    let mut session = ctx.session("arch", false);
    commands::adopt::run(&mut session, &[], &ctx.log).unwrap();

    assert!(is_symlink(&ctx.home().join(".config/alacritty")));
    assert!(ctx.home().join(".config/pulse").is_dir());
    assert!(!is_symlink(&ctx.home().join(".config/pulse")));
    let reloaded = ctx.session("ubuntu", false);
    assert_eq!(reloaded.config.packages_for_system("ubuntu"), vec!["alacritty"]);
}

#[test]
fn adopt_without_config_directory_succeeds() {
    let ctx = TestContextBuilder::new().build();
    let mut session = ctx.session("arch", false);
    commands::adopt::run(&mut session, &[], &ctx.log).unwrap();
    assert!(ctx.log.contains("No ~/.config directory found"));
}
