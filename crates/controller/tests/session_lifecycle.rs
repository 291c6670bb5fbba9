//! Integration tests for login and logout through `AppContext`.

mod common;

use catalog::ValidationError;
use common::{Call, MockGateway, catalog_of, error_notices};
use controller::{AppContext, ControllerError, SearchPhase};
use gateway::Operation;
use state::{StateEvent, drain};

#[tokio::test]
async fn test_invalid_credentials_never_reach_the_gateway() {
    let gateway = MockGateway::with_dogs(catalog_of(3));
    let mut app = AppContext::new(gateway.clone());
    let mut events = app.subscribe();

    assert_eq!(
        app.login("   ", "jane@example.com").await,
        Err(ControllerError::Validation(ValidationError::MissingField {
            field: "name"
        }))
    );
    assert!(matches!(
        app.login("Jane", "not-an-email").await,
        Err(ControllerError::Validation(ValidationError::InvalidEmail { .. }))
    ));

    assert!(gateway.calls().is_empty());
    assert!(!app.session().is_authenticated());
    assert_eq!(error_notices(&drain(&mut events)).len(), 2);
}

#[tokio::test]
async fn test_login_trims_name() {
    let gateway = MockGateway::with_dogs(catalog_of(3));
    let mut app = AppContext::new(gateway.clone());

    app.login("  Jane  ", "jane@example.com").await.unwrap();

    assert_eq!(
        gateway.calls()[0],
        Call::Login {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string()
        }
    );
    assert_eq!(app.session().identity().map(|i| i.name.as_str()), Some("Jane"));
}

#[tokio::test]
async fn test_rejected_login_leaves_session_untouched() {
    let gateway = MockGateway::with_dogs(catalog_of(3));
    gateway.fail(Operation::Login);
    let mut app = AppContext::new(gateway.clone());
    let mut events = app.subscribe();

    assert!(app.login("Jane", "jane@example.com").await.is_err());

    assert!(!app.session().is_authenticated());
    assert_eq!(app.controller().phase(), SearchPhase::Idle);
    assert_eq!(gateway.count(|c| matches!(c, Call::Search(_))), 0);
    let events = drain(&mut events);
    assert_eq!(
        error_notices(&events)[0].message,
        "Failed to log in. Please try again."
    );
}

#[tokio::test]
async fn test_breed_failure_does_not_block_login() {
    let gateway = MockGateway::with_dogs(catalog_of(3));
    gateway.fail(Operation::Breeds);
    let mut app = AppContext::new(gateway.clone());
    let mut events = app.subscribe();

    app.login("Jane", "jane@example.com").await.unwrap();

    assert!(app.session().is_authenticated());
    assert!(app.picker().breeds().is_empty());
    assert_eq!(app.controller().phase(), SearchPhase::Ready);
    let events = drain(&mut events);
    assert_eq!(error_notices(&events)[0].message, "Failed to fetch dog breeds");
}

#[tokio::test]
async fn test_logout_tears_down_local_state() {
    let gateway = MockGateway::with_dogs(catalog_of(30));
    let mut app = AppContext::new(gateway.clone());
    app.login("Jane", "jane@example.com").await.unwrap();
    app.toggle_favorite("1").unwrap();
    app.picker_mut().toggle("Pug");
    app.controller().go_to_page(2);
    let mut events = app.subscribe();

    app.logout().await.unwrap();

    assert!(!app.session().is_authenticated());
    assert!(app.favorites().is_empty());
    assert!(app.picker().selected().is_empty());
    assert!(app.picker().breeds().is_empty());
    assert_eq!(app.controller().phase(), SearchPhase::Idle);
    assert!(app.controller().results().is_empty());
    assert_eq!(app.controller().page(), 1);
    assert!(gateway.calls().contains(&Call::Logout));

    let events = drain(&mut events);
    assert!(events.contains(&StateEvent::SessionChanged {
        authenticated: false
    }));
    assert!(events.contains(&StateEvent::FavoritesChanged { count: 0 }));
}

#[tokio::test]
async fn test_logout_failure_still_clears_locally() {
    let gateway = MockGateway::with_dogs(catalog_of(30));
    let mut app = AppContext::new(gateway.clone());
    app.login("Jane", "jane@example.com").await.unwrap();
    app.toggle_favorite("1").unwrap();
    gateway.fail(Operation::Logout);

    assert!(app.logout().await.is_err());

    assert!(!app.session().is_authenticated());
    assert!(app.favorites().is_empty());
    assert!(app.controller().results().is_empty());
    assert_eq!(app.search().await, Err(ControllerError::NotAuthenticated));
}

#[tokio::test]
async fn test_login_again_after_logout() {
    let gateway = MockGateway::with_dogs(catalog_of(12));
    let mut app = AppContext::new(gateway.clone());

    app.login("Jane", "jane@example.com").await.unwrap();
    app.logout().await.unwrap();
    app.login("Sam", "sam@example.com").await.unwrap();

    assert_eq!(app.session().identity().map(|i| i.email.as_str()), Some("sam@example.com"));
    assert_eq!(app.controller().results().len(), 12);
    assert_eq!(gateway.count(|c| matches!(c, Call::Search(_))), 2);
}
