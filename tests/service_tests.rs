//! Integration tests for the intent-level navigation service.

mod common;

use bikecalc_navigator::*;
use common::*;
use std::sync::atomic::Ordering;

fn service(journal: &Journal) -> NavigationService {
    service_with(journal, NavigationService::builder())
}

fn service_with(journal: &Journal, builder: NavigationServiceBuilder) -> NavigationService {
    init_logging();
    builder
        .factory(RecordingFactory::new(journal))
        .config(offline_config())
        .build()
        .unwrap()
}

fn current(navigator: &NavigationService) -> Option<String> {
    navigator
        .current_unit()
        .map(|u| u.path_segment().to_string())
}

#[tokio::test]
async fn test_named_intents_push_factory_units() {
    let journal = Journal::new();
    let navigator = service(&journal);

    navigator.navigate_to_home().await.unwrap();
    navigator.navigate_to_profile().await.unwrap();
    navigator.navigate_to_tool("gear-ratio").await.unwrap();
    navigator.navigate_to_help("erd").await.unwrap();

    assert_eq!(
        segments(&navigator.items()),
        ["help-erd", "tool-gear-ratio", "profile", "home"]
    );
    assert_eq!(current(&navigator).as_deref(), Some("help-erd"));
}

#[tokio::test]
async fn test_home_clears_the_stack() {
    let journal = Journal::new();
    let navigator = service(&journal);

    navigator.navigate_to_home().await.unwrap();
    navigator.navigate_to_tool("chain-length").await.unwrap();
    navigator.navigate_to_help("chain-wear").await.unwrap();
    journal.take();

    let result = navigator.navigate_to_home().await.unwrap();

    assert_eq!(
        result,
        NavigationResult::Success {
            path: "home".to_string()
        }
    );
    assert_eq!(segments(&navigator.items()), ["home"]);
    for segment in ["home", "tool-chain-length", "help-chain-wear"] {
        assert_eq!(journal.count(&format!("dispose:{}", segment)), 1);
    }
    assert_eq!(journal.count("init:home"), 1);
}

#[tokio::test]
async fn test_each_navigation_creates_a_fresh_unit() {
    let journal = Journal::new();
    let factory = RecordingFactory::new(&journal);
    let created = factory.counter();
    let navigator = NavigationService::builder()
        .factory(factory)
        .config(offline_config())
        .build()
        .unwrap();

    navigator.navigate_to_tool("gear-ratio").await.unwrap();
    navigator.navigate_to_tool("gear-ratio").await.unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 2);
    let items = navigator.items();
    assert!(!same_unit(items[0].as_ref(), items[1].as_ref()));
}

#[tokio::test]
async fn test_navigate_back() {
    let journal = Journal::new();
    let navigator = service(&journal);

    assert!(!navigator.can_navigate_back());
    assert_eq!(navigator.navigate_back().await, None);

    navigator.navigate_to_home().await.unwrap();
    navigator.navigate_to_profile().await.unwrap();
    assert!(navigator.can_navigate_back());

    assert_eq!(navigator.navigate_back().await, Some(true));
    assert_eq!(current(&navigator).as_deref(), Some("home"));
    assert_eq!(journal.count("resume:home"), 1);
}

#[tokio::test]
async fn test_navigate_to_rejects_empty_path_segment() {
    let journal = Journal::new();
    let navigator = service(&journal);

    let err = navigator
        .navigate_to(unit("  ", &journal))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::InvalidUnit { .. }));
    assert!(navigator.items().is_empty());
}

#[tokio::test]
async fn test_navigate_to_with_passes_context_to_guards() {
    let journal = Journal::new();
    let navigator = service_with(
        &journal,
        NavigationService::builder().guard(guard_fn(|_, _, context| {
            match context.params().get("confirm") {
                Some("yes") => GuardResult::Allow,
                _ => GuardResult::deny("confirmation required"),
            }
        })),
    );

    let blocked = navigator
        .navigate_to(unit("reset", &journal))
        .await
        .unwrap();
    assert_eq!(blocked.reason(), Some("confirmation required"));

    let context =
        NavigationContext::new().with_params(NavigationParams::new().with("confirm", "yes"));
    let allowed = navigator
        .navigate_to_with(unit("reset", &journal), &context)
        .await
        .unwrap();
    assert!(allowed.is_success());
}

#[tokio::test]
async fn test_context_source_is_active_unit() {
    let journal = Journal::new();
    let sources = Journal::new();
    let record = sources.clone();
    let navigator = service_with(
        &journal,
        NavigationService::builder().guard(guard_fn(move |_, _, context| {
            record.record(context.source().unwrap_or("_").to_string());
            GuardResult::Allow
        })),
    );

    navigator.navigate_to_profile().await.unwrap();
    navigator.navigate_to_help("saddle-height").await.unwrap();

    assert_eq!(sources.entries(), ["_", "profile"]);
}

// ---- deep links ----

#[tokio::test]
async fn test_navigate_to_path_with_query() {
    let journal = Journal::new();
    let seen = Journal::new();
    let record = seen.clone();
    let navigator = service_with(
        &journal,
        NavigationService::builder().guard(guard_fn(move |_, _, context| {
            if let Some(erd) = context.params().get_as::<u32>("erd") {
                record.record(erd.to_string());
            }
            GuardResult::Allow
        })),
    );

    let result = navigator
        .navigate_to_path("/tools/spoke-length?erd=601")
        .await
        .unwrap();

    assert_eq!(
        result,
        NavigationResult::Success {
            path: "tool-spoke-length".to_string()
        }
    );
    assert_eq!(seen.entries(), ["601"]);
}

#[tokio::test]
async fn test_navigate_to_home_path_clears_stack() {
    let journal = Journal::new();
    let navigator = service(&journal);
    navigator.navigate_to_profile().await.unwrap();

    navigator.navigate_to_path("/").await.unwrap();

    assert_eq!(segments(&navigator.items()), ["home"]);
}

#[tokio::test]
async fn test_navigate_to_unknown_path() {
    let journal = Journal::new();
    let navigator = service(&journal);

    let err = navigator.navigate_to_path("/settings").await.unwrap_err();

    assert_eq!(err, NavigationError::UnknownPath("/settings".to_string()));
    assert!(navigator.items().is_empty());
}

#[tokio::test]
async fn test_caller_follows_redirect_explicitly() {
    let journal = Journal::new();
    let navigator = service_with(
        &journal,
        NavigationService::builder().guard(AuthGuard::new(|| false, ["profile"], "/home")),
    );

    let result = navigator.navigate_to_profile().await.unwrap();
    assert!(navigator.items().is_empty());

    let target = result.redirect_path().unwrap();
    navigator.navigate_to_path(target).await.unwrap();
    assert_eq!(segments(&navigator.items()), ["home"]);
}

#[cfg(feature = "cache")]
#[tokio::test]
async fn test_repeated_deep_links_hit_cache() {
    let journal = Journal::new();
    let navigator = service(&journal);

    navigator.navigate_to_path("/help/erd").await.unwrap();
    navigator.navigate_to_path("/help/erd").await.unwrap();
    let _ = navigator.navigate_to_path("/nowhere").await;

    let stats = navigator.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
}

// ---- builder and factory ----

#[test]
fn test_builder_requires_factory() {
    let err = NavigationService::builder().build().unwrap_err();
    assert_eq!(err, NavigationError::MissingDependency("unit factory"));
}

#[tokio::test]
async fn test_factory_error_leaves_stack_untouched() {
    let journal = Journal::new();
    let factory_journal = journal.clone();
    let navigator = NavigationService::builder()
        .factory(factory_fn(move |intent, _| match intent {
            NavigationIntent::Tool(id) => Err(NavigationError::UnknownIntent(id.clone())),
            other => Ok(unit(&segment_for(other), &factory_journal)),
        }))
        .config(offline_config())
        .build()
        .unwrap();

    navigator.navigate_to_home().await.unwrap();
    let err = navigator.navigate_to_tool("warp-drive").await.unwrap_err();

    assert_eq!(err, NavigationError::UnknownIntent("warp-drive".to_string()));
    assert_eq!(segments(&navigator.items()), ["home"]);
}

#[tokio::test]
async fn test_factory_receives_navigator() {
    let journal = Journal::new();
    let factory_journal = journal.clone();
    let navigator = NavigationService::builder()
        .factory(factory_fn(move |intent, navigator| {
            factory_journal.record(format!(
                "create:{} back={}",
                segment_for(intent),
                navigator.can_navigate_back()
            ));
            Ok(unit(&segment_for(intent), &factory_journal))
        }))
        .config(offline_config())
        .build()
        .unwrap();

    navigator.navigate_to_home().await.unwrap();
    navigator.navigate_to_profile().await.unwrap();

    assert_eq!(journal.count("create:home back=false"), 1);
    assert_eq!(journal.count("create:profile back=true"), 1);
}

#[tokio::test]
async fn test_weak_handle_does_not_keep_service_alive() {
    let journal = Journal::new();
    let navigator = service(&journal);
    let weak = navigator.downgrade();
    assert!(weak.upgrade().is_some());

    drop(navigator);
    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_subscribe_and_shutdown() {
    let journal = Journal::new();
    let navigator = service(&journal);
    navigator.subscribe(RecordingObserver::new(&journal));

    navigator.navigate_to_home().await.unwrap();
    assert_eq!(journal.count("changed:_->home"), 1);

    let clone = navigator.clone();
    let report = clone.shutdown().await;
    assert_eq!(report.completed, 1);
    assert!(navigator.items().is_empty());
}
