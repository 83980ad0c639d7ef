//! Integration tests.

mod common;

#[cfg(test)]
mod tests {
    use newsdesk_client::{
        models::{Role, User},
        navigator::Navigator,
        notify::Severity,
        router::{before_each, GuardOutcome, Route, Router},
        session::TOKEN_KEY,
        storage::DurableStorage,
        stores::AuthStore,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, ResponseTemplate,
    };

    use crate::common::{harness, harness_with_token, user};

    fn signed_in_as(role: &str) -> User {
        User {
            id: Some(4),
            username: "kim".to_string(),
            email: "kim@example.com".to_string(),
            role: Some(Role::new(role)),
        }
    }

    #[tokio::test]
    async fn anonymous_visitor_is_sent_to_login_for_member_pages() {
        let h = harness().await;
        let mut auth = AuthStore::new(h.api.clone());
        assert_eq!(
            before_each(&mut auth, None, &Route::Profile).await,
            GuardOutcome::Redirect("/login".to_string())
        );
        assert_eq!(
            before_each(&mut auth, None, &Route::EditorCreate).await,
            GuardOutcome::Redirect("/login".to_string())
        );
        assert_eq!(before_each(&mut auth, None, &Route::About).await, GuardOutcome::Proceed);
        assert_eq!(before_each(&mut auth, None, &Route::Login).await, GuardOutcome::Proceed);
    }

    #[tokio::test]
    async fn non_editor_is_sent_home_with_an_error() {
        let h = harness().await;
        h.session.sign_in("t", signed_in_as("reader"));
        let mut auth = AuthStore::new(h.api.clone());

        let router = Router::new(h.navigator.clone(), h.notifier());
        let navigation = router.push(&mut auth, "/categories").await;
        assert_eq!(navigation.route, Route::Home);
        assert!(navigation.redirected);
        assert_eq!(navigation.title, "Home | Newsdesk");
        assert_eq!(h.navigator.current_path(), "/");

        let notes = h.notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].title, "Access denied");
    }

    #[tokio::test]
    async fn signed_in_user_skips_guest_pages() {
        let h = harness().await;
        h.session.sign_in("t", signed_in_as("reader"));
        let mut auth = AuthStore::new(h.api.clone());
        assert_eq!(
            before_each(&mut auth, None, &Route::Register).await,
            GuardOutcome::Redirect("/".to_string())
        );
        assert_eq!(before_each(&mut auth, None, &Route::Profile).await, GuardOutcome::Proceed);
    }

    #[tokio::test]
    async fn persisted_token_is_resolved_into_a_profile() {
        let h = harness_with_token(Some("jwt-ok")).await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user("kim", json!({ "name": "editor" }))))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut auth = AuthStore::new(h.api.clone());
        let router = Router::new(h.navigator.clone(), h.notifier());
        let navigation = router.push(&mut auth, "/editor").await;
        assert_eq!(navigation.route, Route::EditorCreate);
        assert!(!navigation.redirected);
        assert_eq!(navigation.title, "New article | Newsdesk");
        assert!(auth.is_editor());
        assert!(h.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn rejected_token_on_public_route_keeps_the_destination() {
        let h = harness_with_token(Some("jwt-bad")).await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut auth = AuthStore::new(h.api.clone());
        let router = Router::new(h.navigator.clone(), None);
        let navigation = router.push(&mut auth, "/about").await;
        assert_eq!(navigation.route, Route::About);
        assert!(!navigation.redirected);
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(h.navigator.history(), vec!["/".to_string(), "/about".to_string()]);
    }

    #[tokio::test]
    async fn rejected_token_continues_signed_out() {
        let h = harness_with_token(Some("jwt-bad")).await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut auth = AuthStore::new(h.api.clone());
        let router = Router::new(h.navigator.clone(), None);
        let navigation = router.push(&mut auth, "/profile").await;
        assert_eq!(navigation.route, Route::Login);
        assert!(navigation.redirected);
        assert!(!auth.is_authenticated());
        assert_eq!(h.storage.get(TOKEN_KEY), None);
        assert_eq!(h.navigator.history(), vec!["/".to_string(), "/login".to_string()]);
    }
}
