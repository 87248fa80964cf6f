use email_status::config::PollSettings;
use email_status::models::{EmailCategory, PollStatus, StatusKind};
use email_status::page::{bootstrap, MemoryPage, PageBlock, STATUS_STYLESHEET};
use email_status::services::PollPhase;
use email_status::test_utils::test_helpers::ScriptedSource;
use std::sync::Arc;
use std::time::Duration;

const LOGIN_URL: &str = "https://shop.example.com/accounts/login/";

fn url_with(query: &str) -> String {
    format!("{}?{}", LOGIN_URL, query)
}

#[tokio::test(start_paused = true)]
async fn test_verification_redirect_inserts_container_and_starts_poller() {
    let page = MemoryPage::registration_page();
    let source = Arc::new(ScriptedSource::always(PollStatus::pending()));

    let poller = bootstrap(
        &page,
        &url_with("email=a%40b.com&command=verification&async=true"),
        source.clone(),
        PollSettings::default(),
    )
    .expect("bootstrap should succeed")
    .expect("poller should start");

    assert_eq!(poller.target_email(), "a@b.com");
    assert_eq!(poller.category(), EmailCategory::Verification);
    assert!(poller.is_polling());
    assert_eq!(poller.phase(), PollPhase::InitialDelay);

    let blocks = page.blocks();
    assert_eq!(
        blocks
            .iter()
            .filter(|block| **block == PageBlock::StatusContainer)
            .count(),
        1
    );
    let container = blocks
        .iter()
        .position(|block| *block == PageBlock::StatusContainer);
    let alerts = blocks
        .iter()
        .position(|block| *block == PageBlock::AlertContainer);
    assert_eq!(container.map(|index| index + 1), alerts);
    assert_eq!(page.styles(), vec![STATUS_STYLESHEET.to_string()]);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(
        source.queried(),
        vec![("a@b.com".to_string(), EmailCategory::Verification)]
    );

    let elements = page.status_elements().expect("status elements");
    assert!(elements.spinner_visible);
    assert_eq!(elements.message_class, "alert alert-info");

    poller.stop();
}

#[tokio::test(start_paused = true)]
async fn test_page_reflects_final_status() {
    let page = MemoryPage::registration_page();
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(PollStatus::pending()),
        Ok(PollStatus::new(StatusKind::Failed).with_error_message("<b>quota</b> exceeded")),
    ]));

    let poller = bootstrap(
        &page,
        &url_with("email=a%40b.com&command=verification&async=true"),
        source,
        PollSettings::default(),
    )
    .expect("bootstrap should succeed")
    .expect("poller should start");
    poller.stopped().await;

    let elements = page.status_elements().expect("status elements");
    assert!(!elements.spinner_visible);
    assert_eq!(elements.message_class, "alert alert-warning");
    assert!(elements.message_html.contains("Error: "));
    assert!(elements.message_html.contains("quota"));
    assert!(!elements.message_html.contains("<b>"));

    let markup = page.markup().expect("markup");
    assert!(markup.contains(r#"<i class="fas fa-exclamation-triangle me-2"></i>"#));
    assert!(markup.contains("display: none;"));
}

#[tokio::test(start_paused = true)]
async fn test_async_false_does_nothing() {
    let page = MemoryPage::registration_page();
    let source = Arc::new(ScriptedSource::always(PollStatus::pending()));

    let poller = bootstrap(
        &page,
        &url_with("email=a%40b.com&command=verification&async=false"),
        source.clone(),
        PollSettings::default(),
    )
    .expect("bootstrap should succeed");

    assert!(poller.is_none());
    assert!(!page.blocks().contains(&PageBlock::StatusContainer));
    assert!(page.styles().is_empty());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_email_does_nothing() {
    let page = MemoryPage::registration_page();
    let source = Arc::new(ScriptedSource::always(PollStatus::pending()));

    let poller = bootstrap(
        &page,
        &url_with("command=verification&async=true"),
        source.clone(),
        PollSettings::default(),
    )
    .expect("bootstrap should succeed");

    assert!(poller.is_none());
    assert!(page.status_elements().is_none());
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_page_without_anchor_still_polls() {
    let page = MemoryPage::new(vec![PageBlock::Html("<p>Welcome</p>".to_string())]);
    let source = Arc::new(ScriptedSource::always(PollStatus::sent()));

    let poller = bootstrap(
        &page,
        &url_with("email=a%40b.com&command=verification&async=true"),
        source.clone(),
        PollSettings::default(),
    )
    .expect("bootstrap should succeed")
    .expect("poller should start");
    poller.stopped().await;

    assert_eq!(source.calls(), 1);
    assert!(page.status_elements().is_none());
    assert_eq!(page.blocks().len(), 1);
}

#[tokio::test]
async fn test_invalid_page_url_is_an_error() {
    let page = MemoryPage::registration_page();
    let source = Arc::new(ScriptedSource::always(PollStatus::pending()));

    let result = bootstrap(&page, "/accounts/login/?email=a", source, PollSettings::default());
    assert!(result.is_err());
    assert!(page.status_elements().is_none());
}
