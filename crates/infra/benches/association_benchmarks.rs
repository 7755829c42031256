use std::sync::Arc;

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use catalog_core::{ComponentId, ProductId};
use catalog_infra::association_manager::AssociationManager;
use catalog_infra::association_store::{AssociationStore, InMemoryAssociationStore};
use catalog_infra::item_store::{InMemoryItemStore, ItemStore};
use catalog_products::{ComponentKind, NewItem, PageRequest, ProductKind};

type Manager = AssociationManager<
    Arc<InMemoryItemStore<ProductKind>>,
    Arc<InMemoryItemStore<ComponentKind>>,
    Arc<InMemoryAssociationStore>,
>;

/// `products` products and `components` components, nothing associated yet.
async fn seeded(products: usize, components: usize) -> Manager {
    let product_store = Arc::new(InMemoryItemStore::<ProductKind>::new());
    let component_store = Arc::new(InMemoryItemStore::<ComponentKind>::new());
    for i in 0..products {
        product_store
            .insert(NewItem::new(format!("product-{i}"), None), Utc::now())
            .await
            .unwrap();
    }
    for i in 0..components {
        component_store
            .insert(NewItem::new(format!("component-{i}"), None), Utc::now())
            .await
            .unwrap();
    }
    AssociationManager::new(
        product_store,
        component_store,
        Arc::new(InMemoryAssociationStore::new()),
    )
}

fn bench_add_remove_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let manager = rt.block_on(seeded(1, 1));
    let (p, cmp) = (ProductId::new(1), ComponentId::new(1));

    let mut group = c.benchmark_group("association_latency");
    group.bench_function("add_then_remove", |b| {
        b.to_async(&rt).iter(|| async {
            manager.add_component_to_product(p, cmp, 3).await.unwrap();
            manager.remove_component_from_product(p, cmp).await.unwrap();
        })
    });

    rt.block_on(manager.add_component_to_product(p, cmp, 1)).unwrap();
    group.bench_function("update_quantity", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(manager.update_component_quantity(p, cmp, 5).await.unwrap());
        })
    });
    group.bench_function("rejected_duplicate_add", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(manager.add_component_to_product(p, cmp, 1).await.unwrap_err());
        })
    });
    group.finish();
}

fn bench_listing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("association_listing");

    for size in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));

        // One product containing `size` components.
        let wide = rt.block_on(async {
            let manager = seeded(1, size).await;
            for id in 1..=size as i64 {
                manager
                    .add_component_to_product(ProductId::new(1), ComponentId::new(id), 1)
                    .await
                    .unwrap();
            }
            manager
        });
        group.bench_with_input(BenchmarkId::new("components_for_product", size), &size, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(wide.components_for_product(ProductId::new(1)).await.unwrap());
            })
        });

        // `size` products sharing one component.
        let shared = rt.block_on(async {
            let manager = seeded(size, 1).await;
            for id in 1..=size as i64 {
                manager
                    .add_component_to_product(ProductId::new(id), ComponentId::new(1), 1)
                    .await
                    .unwrap();
            }
            manager
        });
        group.bench_with_input(BenchmarkId::new("products_by_component", size), &size, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(
                    shared
                        .products_by_component(ComponentId::new(1), PageRequest::default())
                        .await
                        .unwrap(),
                );
            })
        });
        group.bench_with_input(BenchmarkId::new("count_by_component", size), &size, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(
                    shared
                        .associations()
                        .count_by_component(ComponentId::new(1))
                        .await
                        .unwrap(),
                );
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add_remove_latency, bench_listing);
criterion_main!(benches);
