use chrono::{DateTime, Utc};
use std::fmt;

use super::session::Session;

/// Every page of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Search,
    Paper { course_code: String, year: i32 },
    Upload,
}

impl Route {
    /// Where signed-in users land.
    pub const DEFAULT: Route = Route::Search;

    pub fn paper(course_code: impl Into<String>, year: i32) -> Self {
        Route::Paper {
            course_code: course_code.into(),
            year,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Search => "/search".to_string(),
            Route::Paper { course_code, year } => format!("/{}/{}", course_code, year),
            Route::Upload => "/upload".to_string(),
        }
    }

    /// Resolve a path. The root and anything unrecognised go to Login.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["search"] => Route::Search,
            ["upload"] => Route::Upload,
            [code, year] => match year.parse() {
                Ok(year) => Route::paper(*code, year),
                Err(_) => Route::Login,
            },
            _ => Route::Login,
        }
    }

    /// Guards consulted, in order, before this route is shown.
    pub fn guards(&self) -> &'static [Guard] {
        match self {
            Route::Login | Route::Register => &[Guard::Login],
            Route::Search | Route::Paper { .. } => &[Guard::Auth],
            Route::Upload => &[Guard::Auth, Guard::Privilege],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Signed-in users only.
    Auth,
    /// Signed-out users only; keeps the login and register pages away from
    /// someone who already has a session.
    Login,
    /// Lecturers only.
    Privilege,
}

impl Guard {
    pub fn check(self, session: Option<&Session>, now: DateTime<Utc>) -> Access {
        let authenticated = session.is_some_and(|s| s.is_authenticated_at(now));
        let allowed = match self {
            Guard::Auth => authenticated,
            Guard::Login => !authenticated,
            Guard::Privilege => session.is_some_and(Session::is_lecturer),
        };

        if allowed {
            Access::Allow
        } else {
            Access::Redirect(match self {
                Guard::Auth => Route::Login,
                Guard::Login | Guard::Privilege => Route::DEFAULT,
            })
        }
    }
}

/// Run every guard of `route`; the first redirect wins.
pub fn authorize(route: &Route, session: Option<&Session>) -> Access {
    authorize_at(route, session, Utc::now())
}

pub fn authorize_at(route: &Route, session: Option<&Session>, now: DateTime<Utc>) -> Access {
    for guard in route.guards() {
        let access = guard.check(session, now);
        if !access.is_allowed() {
            tracing::debug!(route = %route, ?guard, ?access, "Navigation redirected");
            return access;
        }
    }
    Access::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::mint;
    use rstest::rstest;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_000_000, 0).unwrap()
    }

    fn session(exp: i64, privilege: i64) -> Session {
        Session {
            user_id: 1,
            username: "ada".into(),
            token: mint(&json!({ "exp": exp })),
            privilege,
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(session(999_999, 0)))]
    #[case(Some(session(1_000_001, 0)))]
    #[case(Some(session(1_000_001, 1)))]
    fn test_auth_and_login_guards_are_complements(#[case] s: Option<Session>) {
        let auth = Guard::Auth.check(s.as_ref(), now()).is_allowed();
        let login = Guard::Login.check(s.as_ref(), now()).is_allowed();
        assert_ne!(auth, login);
    }

    #[test]
    fn test_redirect_targets() {
        assert_eq!(
            Guard::Auth.check(None, now()),
            Access::Redirect(Route::Login)
        );
        let live = session(2_000_000, 0);
        assert_eq!(
            Guard::Login.check(Some(&live), now()),
            Access::Redirect(Route::Search)
        );
        assert_eq!(
            Guard::Privilege.check(Some(&live), now()),
            Access::Redirect(Route::Search)
        );
    }

    #[rstest]
    #[case(Route::Upload, None, Access::Redirect(Route::Login))]
    #[case(Route::Upload, Some(session(2_000_000, 0)), Access::Redirect(Route::Search))]
    #[case(Route::Upload, Some(session(2_000_000, 1)), Access::Allow)]
    #[case(Route::Upload, Some(session(10, 1)), Access::Redirect(Route::Login))]
    #[case(Route::paper("CS101", 2019), Some(session(2_000_000, 0)), Access::Allow)]
    #[case(Route::Search, None, Access::Redirect(Route::Login))]
    #[case(Route::Login, None, Access::Allow)]
    #[case(Route::Register, Some(session(2_000_000, 0)), Access::Redirect(Route::Search))]
    fn test_authorize(#[case] route: Route, #[case] s: Option<Session>, #[case] expected: Access) {
        assert_eq!(authorize_at(&route, s.as_ref(), now()), expected);
    }

    #[rstest]
    #[case("/", Route::Login)]
    #[case("", Route::Login)]
    #[case("/login", Route::Login)]
    #[case("/register/", Route::Register)]
    #[case("/search?x=1", Route::Search)]
    #[case("/upload", Route::Upload)]
    #[case("/CS101/2019", Route::paper("CS101", 2019))]
    #[case("/CS101/latest", Route::Login)]
    #[case("/CS101/", Route::Login)]
    #[case("/a/b/c", Route::Login)]
    fn test_route_parsing(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[test]
    fn test_paper_path() {
        assert_eq!(Route::paper("MA200", 2020).path(), "/MA200/2020");
    }
}
