//! Redis Backend Integration Tests
//!
//! These tests require a running Redis instance.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo test --features redis --test redis_integration_test
//! ```
//!
//! ## Environment Variables
//!
//! - `TEST_REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
//!
//! ## What's Tested
//!
//! 1. Redis connection and health check
//! 2. Window replace/read roundtrip and TTL states
//! 3. History push/trim bounds, including trim-to-zero
//! 4. Contract parity with the in-memory backend

#![cfg(feature = "redis")]

use fetchrace::backend::{CacheBackend, RedisBackend, TtlState};
use std::env;
use std::time::Duration;

/// Helper: Get Redis connection URL from environment or use default
fn get_redis_url() -> String {
    env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

/// Helper: Create a test Redis backend
async fn create_test_backend() -> Result<RedisBackend, Box<dyn std::error::Error>> {
    let backend = RedisBackend::from_connection_string(&get_redis_url()).await?;
    Ok(backend)
}

/// Helper: Check if Redis is available
async fn is_redis_available() -> bool {
    match create_test_backend().await {
        Ok(backend) => backend.health_check().await.unwrap_or(false),
        Err(_) => false,
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Test 1: Connection and health check
// =============================================================================

#[tokio::test]
async fn test_redis_connection() {
    if !is_redis_available().await {
        println!("Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");

    let is_healthy = backend
        .health_check()
        .await
        .expect("Health check should not error");
    assert!(is_healthy, "Redis health check should return true");
}

// =============================================================================
// Test 2: Window replace/read and TTL
// =============================================================================

#[tokio::test]
async fn test_redis_replace_read_and_ttl() {
    if !is_redis_available().await {
        println!("Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend().await.expect("Failed to connect");
    let key = "fetchrace_test:window";
    backend.delete(key).await.expect("Failed to clean key");

    backend
        .replace_list(key, strs(&["a", "b", "c"]), Duration::from_secs(600))
        .await
        .expect("Failed to replace");

    assert_eq!(
        backend.read_range(key, 0).await.unwrap(),
        strs(&["a", "b", "c"])
    );
    assert_eq!(backend.read_range(key, 2).await.unwrap(), strs(&["a", "b"]));
    assert_eq!(backend.list_len(key).await.unwrap(), 3);

    match backend.ttl(key).await.unwrap() {
        TtlState::Remaining(secs) => assert!(secs <= 600 && secs > 500),
        other => panic!("Expected Remaining, got {:?}", other),
    }

    // Empty replace deletes the key.
    backend
        .replace_list(key, Vec::new(), Duration::from_secs(600))
        .await
        .expect("Failed to replace with empty");
    assert_eq!(backend.ttl(key).await.unwrap(), TtlState::Missing);
}

// =============================================================================
// Test 3: History push/trim bounds
// =============================================================================

#[tokio::test]
async fn test_redis_push_and_trim() {
    if !is_redis_available().await {
        println!("Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend().await.expect("Failed to connect");
    let key = "fetchrace_test:history";
    backend.delete(key).await.expect("Failed to clean key");

    for i in 0..5 {
        backend
            .push_front(key, format!("entry_{}", i))
            .await
            .expect("Failed to push");
    }

    backend.trim_list(key, 3).await.expect("Failed to trim");
    assert_eq!(
        backend.read_range(key, 0).await.unwrap(),
        strs(&["entry_4", "entry_3", "entry_2"])
    );

    backend.delete(key).await.expect("Failed to clean up");
}

#[tokio::test]
async fn test_redis_trim_to_zero_empties_list() {
    if !is_redis_available().await {
        println!("Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend().await.expect("Failed to connect");
    let key = "fetchrace_test:trim_zero";
    backend.delete(key).await.expect("Failed to clean key");

    backend.push_front(key, "a".to_string()).await.unwrap();
    backend.push_front(key, "b".to_string()).await.unwrap();

    // Must empty the list, matching the in-memory backend, not keep it whole.
    backend.trim_list(key, 0).await.expect("Failed to trim");
    assert_eq!(backend.list_len(key).await.unwrap(), 0);
    assert!(backend.read_range(key, 0).await.unwrap().is_empty());
}
