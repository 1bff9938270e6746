use fieldmap_core::{DrawnFeature, FeatureGeometry, FeatureId, FeatureProperties, Vertex};
use fieldmap_designer::FeatureStore;

fn feature(id: &str, lat: f64) -> DrawnFeature {
    DrawnFeature {
        id: FeatureId::new(id),
        geometry: FeatureGeometry::Point(Vertex::new(lat, 2.0)),
        properties: FeatureProperties {
            measurement: String::new(),
            category: None,
            color: "#3388ff".to_string(),
        },
        render_handle: None,
    }
}

#[test]
fn test_delete_last_removes_only_the_newest() {
    let mut store = FeatureStore::new();
    for (i, id) in ["a", "b", "c", "d"].iter().enumerate() {
        store.append(feature(id, i as f64)).unwrap();
    }
    let before = store.list();

    let removed = store.delete_last().unwrap();

    assert_eq!(removed, before[3]);
    assert_eq!(store.list(), before[..3].to_vec());
}

#[test]
fn test_list_is_a_snapshot() {
    let mut store = FeatureStore::new();
    store.append(feature("a", 1.0)).unwrap();
    let snapshot = store.list();
    store.append(feature("b", 2.0)).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_get_by_id() {
    let mut store = FeatureStore::new();
    store.append(feature("a", 1.0)).unwrap();
    store.append(feature("b", 2.0)).unwrap();

    let b = store.get(&FeatureId::new("b")).unwrap();
    assert_eq!(b.geometry, FeatureGeometry::Point(Vertex::new(2.0, 2.0)));
    assert!(store.get(&FeatureId::new("z")).is_none());
}
