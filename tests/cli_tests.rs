//! Route guards as the terminal client applies them.

mod common;

use biblio::auth::{FileStore, Route, SessionStore};
use biblio::cli::commands::Context;
use biblio::cli::output::Output;
use biblio::ClientConfig;
use rstest::rstest;

fn context(dir: &tempfile::TempDir, privilege: Option<i64>) -> Context {
    let path = dir.path().join("session.json");
    if let Some(privilege) = privilege {
        FileStore::new(&path)
            .save(&common::session(3, privilege))
            .unwrap();
    }
    let config = ClientConfig {
        session_file: Some(path.to_string_lossy().into_owned()),
        ..ClientConfig::default()
    };
    Context::new(config, Output::no_color())
}

#[rstest]
#[case(None, Route::Login, true)]
#[case(None, Route::Search, false)]
#[case(None, Route::Upload, false)]
#[case(Some(0), Route::Login, false)]
#[case(Some(0), Route::Search, true)]
#[case(Some(0), Route::paper("CS101", 2019), true)]
#[case(Some(0), Route::Upload, false)]
#[case(Some(1), Route::Upload, true)]
fn test_commands_respect_guards(
    #[case] privilege: Option<i64>,
    #[case] route: Route,
    #[case] allowed: bool,
) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir, privilege);
    let result = ctx.enter(&route);
    assert_eq!(result.is_ok(), allowed, "{:?} as {:?}", route, privilege);
    if let Err(e) = result {
        assert!(e.is_auth());
    }
}

#[test]
fn test_signed_out_message_points_to_login() {
    let dir = tempfile::tempdir().unwrap();
    let err = context(&dir, None).enter(&Route::Search).unwrap_err();
    assert!(err.to_string().contains("biblio login"));
}

#[test]
fn test_logout_removes_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&dir, Some(0));
    assert!(ctx.sessions.is_authenticated());

    ctx.sessions.logout().unwrap();
    assert!(!dir.path().join("session.json").exists());
    assert!(ctx.enter(&Route::Search).is_err());
}
