//! Tests for db::repository::error module.

use solartrace::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("insert_reading");
    assert_eq!(ctx.operation, Some("insert_reading".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("fetch_readings_since")
        .with_entity("station")
        .with_entity_id("Cama_1")
        .with_details("pool exhausted")
        .retryable();

    assert_eq!(ctx.operation, Some("fetch_readings_since".to_string()));
    assert_eq!(ctx.entity, Some("station".to_string()));
    assert_eq!(ctx.entity_id, Some("Cama_1".to_string()));
    assert_eq!(ctx.details, Some("pool exhausted".to_string()));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("insert_reading")
        .with_entity("reading")
        .with_entity_id(17)
        .with_details("duplicate key")
        .retryable();

    let display = ctx.to_string();
    assert!(display.contains("operation=insert_reading"));
    assert!(display.contains("entity=reading"));
    assert!(display.contains("id=17"));
    assert!(display.contains("details=duplicate key"));
    assert!(display.contains("retryable=true"));
}

#[test]
fn test_empty_context_displays_nothing() {
    assert_eq!(ErrorContext::default().to_string(), "");
}

#[test]
fn test_display_prefix_per_kind() {
    let cases = [
        (RepositoryError::connection("refused"), "Connection error"),
        (RepositoryError::query("bad column"), "Query error"),
        (RepositoryError::not_found("no row"), "Not found"),
        (RepositoryError::validation("no station"), "validation error"),
        (RepositoryError::configuration("no url"), "Configuration error"),
        (RepositoryError::internal("join failed"), "Internal error"),
        (RepositoryError::transaction("rollback"), "Transaction error"),
        (RepositoryError::timeout("slow"), "Timeout error"),
    ];

    for (err, prefix) in cases {
        let text = err.to_string();
        assert!(text.contains(prefix), "{}", text);
        assert!(text.contains(err.message()), "{}", text);
    }
}

#[test]
fn test_kind_names() {
    assert_eq!(RepositoryError::connection("x").kind(), "connection");
    assert_eq!(RepositoryError::query("x").kind(), "query");
    assert_eq!(RepositoryError::not_found("x").kind(), "not_found");
    assert_eq!(RepositoryError::validation("x").kind(), "validation");
    assert_eq!(RepositoryError::configuration("x").kind(), "configuration");
    assert_eq!(RepositoryError::internal("x").kind(), "internal");
    assert_eq!(RepositoryError::transaction("x").kind(), "transaction");
    assert_eq!(RepositoryError::timeout("x").kind(), "timeout");
}

#[test]
fn test_message_excludes_context() {
    let err = RepositoryError::validation("sensor_id must not be null")
        .with_operation("insert_reading");
    assert_eq!(err.message(), "sensor_id must not be null");
    assert!(err.to_string().contains("operation=insert_reading"));
}

#[test]
fn test_retryable_kinds() {
    assert!(RepositoryError::connection("temp failure").is_retryable());
    assert!(RepositoryError::timeout("timeout").is_retryable());
    assert!(!RepositoryError::query("syntax").is_retryable());
    assert!(!RepositoryError::not_found("missing").is_retryable());
    assert!(!RepositoryError::validation("invalid").is_retryable());

    let retryable_query =
        RepositoryError::query_with_context("serialization failure", ErrorContext::default().retryable());
    assert!(retryable_query.is_retryable());
}

#[test]
fn test_connection_with_context_is_always_retryable() {
    let err = RepositoryError::connection_with_context(
        "failed to connect",
        ErrorContext::new("health_check"),
    );
    assert!(err.is_retryable());
    assert_eq!(err.context().operation.as_deref(), Some("health_check"));
}

#[test]
fn test_with_operation_overrides_previous() {
    let err = RepositoryError::query_with_context("boom", ErrorContext::new("inner"))
        .with_operation("ingest_reading");
    assert_eq!(err.context().operation.as_deref(), Some("ingest_reading"));
}

#[test]
fn test_with_entity_sets_station() {
    let err = RepositoryError::connection("down").with_entity("station", "Referencia");
    let ctx = err.context();
    assert_eq!(ctx.entity.as_deref(), Some("station"));
    assert_eq!(ctx.entity_id.as_deref(), Some("Referencia"));
    assert!(ctx.retryable);
}

#[test]
fn test_repository_result_alias() {
    let ok: RepositoryResult<i32> = Ok(42);
    assert_eq!(ok.unwrap(), 42);

    let err: RepositoryResult<i32> = Err(RepositoryError::not_found("test"));
    assert_eq!(err.unwrap_err().kind(), "not_found");
}
