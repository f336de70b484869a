//! Basic usage example of the fetch coordinator.

use fetchrace::{
    backend::InMemoryBackend, CacheWindow, FetchCoordinator, FetchRequest, FetchService,
    FetchStrategy, InMemoryStore, Product, TimingRecorder,
};

/// A handful of products standing in for the durable store.
fn seed_products() -> Vec<Product> {
    let rows = [
        ("p_001", "Walnut Desk", 449.0, "walnut"),
        ("p_002", "Steel Chair", 149.5, "steel"),
        ("p_003", "Brass Lamp", 89.0, "brass"),
        ("p_004", "Oak Shelf", 210.0, "oak"),
        ("p_005", "Glass Table", 320.0, "glass"),
    ];

    rows.iter()
        .map(|(id, name, price, material)| Product {
            id: id.to_string(),
            name: name.to_string(),
            price: *price,
            description: format!("A {} made of {}", name.to_lowercase(), material),
            company: "Acme Furnishings".to_string(),
            avatar: format!("https://img.example.com/{}.png", id),
            material: material.to_string(),
            created_at: 1_700_000_000_000,
        })
        .collect()
}

#[tokio::main]
async fn main() -> fetchrace::Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== fetchrace - Basic Example ===\n");

    // 1. Wire the coordinator from its collaborators
    println!("1. Initializing in-memory backend and store...");
    let backend = InMemoryBackend::new();
    let store = InMemoryStore::seeded(seed_products());
    let service = FetchService::new(FetchCoordinator::new(
        CacheWindow::new(backend.clone()),
        store,
        TimingRecorder::new(backend),
    ));
    println!("   ✓ Coordinator ready\n");

    // 2. Store-only: queries the store and repopulates the window
    println!("2. Store-only fetch (limit 3):");
    let response = service
        .fetch(FetchRequest {
            strategy: FetchStrategy::Store,
            limit: 3,
        })
        .await;
    println!(
        "   ✓ {} entities from {} in {}ms (hit: {})\n",
        response.count, response.resolved, response.timings.total_ms, response.cache_hit
    );

    // 3. Cache-only: served entirely from the window just written
    println!("3. Cache-only fetch (limit 3):");
    let response = service
        .fetch(FetchRequest {
            strategy: FetchStrategy::Cache,
            limit: 3,
        })
        .await;
    println!(
        "   ✓ {} entities from {} in {}ms (hit: {}, TTL: {:?})\n",
        response.count,
        response.resolved,
        response.timings.total_ms,
        response.cache_hit,
        response.ttl_remaining
    );

    // 4. Hybrid: window holds 3, so two more come from the store
    println!("4. Hybrid fetch (limit 5, window holds 3):");
    let response = service
        .fetch(FetchRequest {
            strategy: FetchStrategy::Hybrid,
            limit: 5,
        })
        .await;
    println!(
        "   ✓ {} entities from {} in {}ms (hit: {})",
        response.count, response.resolved, response.timings.total_ms, response.cache_hit
    );
    for entity in &response.entities {
        println!("     - {} ({})", entity.name, entity.id);
    }
    println!();

    // 5. Compare the recorded timings
    println!("5. Strategy ranking (ascending by mean):");
    for stats in service.reporter().aggregate().await? {
        println!(
            "   {:>6}: {} samples, avg {:.1}ms (min {}, max {})",
            stats.strategy.name(),
            stats.samples,
            stats.avg_ms,
            stats.min_ms,
            stats.max_ms
        );
    }

    println!("\n=== Done ===\n");
    Ok(())
}
