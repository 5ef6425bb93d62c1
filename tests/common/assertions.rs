use pgsift::{Classification, EntityType, Event, StatementCategory};

/// Assert that every statement landed in exactly the expected buckets
pub fn assert_bucket_sizes(classification: &Classification, queries: usize, seeds: usize, migrations: usize) {
    assert_eq!(
        (
            classification.queries.len(),
            classification.seeds.len(),
            classification.migrations.len()
        ),
        (queries, seeds, migrations),
        "Expected (queries, seeds, migrations) = ({}, {}, {}), got {:?}",
        queries,
        seeds,
        migrations,
        classification
    );
}

/// Assert that a bucket's statements are in ascending source order
pub fn assert_bucket_ordered(classification: &Classification, category: StatementCategory) {
    let locations: Vec<_> = classification
        .bucket(category)
        .iter()
        .map(|statement| statement.location.unwrap_or(0))
        .collect();
    let mut sorted = locations.clone();
    sorted.sort_unstable();
    assert_eq!(
        locations, sorted,
        "Expected {} bucket in source order, got offsets {:?}",
        category, locations
    );
}

/// Assert that an event for the given entity exists
pub fn assert_has_event(events: &[Event], entity_type: EntityType, schema: Option<&str>, name: &str) {
    let found = events.iter().any(|event| {
        event.entity_type == entity_type
            && event.entity_name == name
            && event.schema.as_deref() == schema
    });
    assert!(
        found,
        "Expected {} event for {:?}.{}, but found: {:?}",
        entity_type, schema, name, events
    );
}
