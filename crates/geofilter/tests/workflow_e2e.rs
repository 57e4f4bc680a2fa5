//! End-to-end tests for the editing workflow: parse a filter, switch modes,
//! store it, reload it and apply it to a set of caches.

use geofilter::filter::{
    basic_loss, is_basic_expressible, to_advanced, to_basic, to_basic_named, ConfigParser,
    FilterEvaluator, FilterForm, LeafKind, Outcome,
};
use geofilter::geocache::{CacheSize, CacheType, Coordinates, Geocache};
use geofilter::{ContextKind, FilterStore, LeafCriterion, MemoryMedium, NamedFilter};

fn caches() -> Vec<Geocache> {
    serde_json::from_str(
        r#"[
            { "geocode": "GC100", "name": "Mill Multi", "type": "multi", "size": "small",
              "difficulty": 2.0, "terrain": 1.5, "coords": { "lat": 52.52, "lon": 13.40 },
              "hidden": "2015-04-01", "owner": "alice", "favorites": 12, "found": false },
            { "geocode": "GC101", "name": "Tree Climb", "type": "traditional", "size": "regular",
              "difficulty": 1.5, "terrain": 5.0, "owner": "bob", "favorites": 3, "found": true },
            { "geocode": "GC102", "name": "Unknown Bits", "type": "multi" },
            { "geocode": "GC103", "name": "Puzzle Park", "type": "mystery", "size": "micro",
              "difficulty": 4.0, "terrain": 2.0, "favorites": 40, "archived": true }
        ]"#,
    )
    .expect("fixture parses")
}

fn geocodes(records: &[&Geocache]) -> Vec<String> {
    records.iter().map(|r| r.geocode.clone()).collect()
}

#[test]
fn test_fixture_shapes() {
    let records = caches();
    assert_eq!(records[0].size, Some(CacheSize::Small));
    assert_eq!(records[0].coords, Some(Coordinates::new(52.52, 13.40)));
    assert_eq!(records[2].difficulty, None);
}

#[test]
fn test_basic_filter_applies() {
    let records = caches();
    let filter = NamedFilter::from_config("AND(TYPE(multi,mystery),DIFFICULTY(1-3),TERRAIN())").unwrap();
    assert!(is_basic_expressible(&filter));

    let evaluator = FilterEvaluator::for_filter(&filter);
    assert_eq!(geocodes(&evaluator.filter_records(&records)), vec!["GC100"]);
    assert_eq!(evaluator.evaluate(&records[2]), Outcome::Inconclusive);
}

#[test]
fn test_include_inconclusive_widens_selection() {
    let records = caches();
    let strict = NamedFilter::from_config("AND(TYPE(multi),DIFFICULTY(-3))").unwrap();
    let lenient = NamedFilter::from_config("INCONCLUSIVE(AND(TYPE(multi),DIFFICULTY(-3)))").unwrap();

    assert_eq!(
        geocodes(&FilterEvaluator::for_filter(&strict).filter_records(&records)),
        vec!["GC100"]
    );
    assert_eq!(
        geocodes(&FilterEvaluator::for_filter(&lenient).par_filter_records(&records)),
        vec!["GC100", "GC102"]
    );
}

#[test]
fn test_inverse_terrain() {
    let records = caches();
    let filter = NamedFilter::from_config("NOT(TERRAIN(4-5))").unwrap();
    let outcomes: Vec<Outcome> = FilterEvaluator::for_filter(&filter)
        .outcomes(&records)
        .into_iter()
        .map(|(_, outcome)| outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![
            Outcome::Match,
            Outcome::NoMatch,
            Outcome::Inconclusive,
            Outcome::Match
        ]
    );
}

#[test]
fn test_advanced_to_basic_with_confirmation_data() {
    let advanced = NamedFilter::from_config(
        "[popular]NOT(AND(FAVORITES(10-),TERRAIN(-2),TYPE(multi),STATUS(found:no)))",
    )
    .unwrap();
    assert!(!is_basic_expressible(&advanced));

    let loss = basic_loss(&advanced);
    assert_eq!(loss.name.as_deref(), Some("popular"));
    assert!(loss.inverse);
    assert_eq!(
        loss.dropped
            .iter()
            .filter_map(|n| n.as_leaf())
            .map(LeafCriterion::kind)
            .collect::<Vec<_>>(),
        vec![LeafKind::Favorites, LeafKind::Status]
    );

    let basic = to_basic_named(&advanced);
    assert!(basic.name.is_empty());
    assert_eq!(
        basic.tree_config(),
        "AND(TYPE(multi),DIFFICULTY(),TERRAIN(-2))"
    );
    assert!(is_basic_expressible(&basic));
}

#[test]
fn test_mode_switch_round_trip_is_stable() {
    let tree = ConfigParser::parse("OR(TERRAIN(2-),TYPE(earth),SIZE(large))")
        .unwrap()
        .tree;
    let basic = to_basic(tree.as_ref());
    let back = to_advanced(Some(&basic));
    assert_eq!(to_basic(back.as_ref()), basic);
}

#[test]
fn test_editor_form_rebuilds_tree() {
    let filter = NamedFilter::from_config("INCONCLUSIVE(NOT(OR(TYPE(multi),SIZE(micro))))").unwrap();
    let mut form = FilterForm::from_tree(filter.tree.as_ref());
    assert!(form.include_inconclusive && form.inverse && form.or);

    form.inverse = false;
    form.items.pop();
    assert_eq!(
        form.to_tree().map(|t| t.to_config()).as_deref(),
        Some("INCONCLUSIVE(OR(TYPE(multi)))")
    );

    form.items.clear();
    assert_eq!(form.to_tree(), None);
}

#[test]
fn test_save_load_apply() {
    let records = caches();
    let mut store = FilterStore::open(MemoryMedium::new()).unwrap();

    let filter = NamedFilter::from_config("[good ones]AND(FAVORITES(10-),STATUS(archived:no))").unwrap();
    store.save(&filter).unwrap();
    store.set_active(ContextKind::Live, &filter).unwrap();

    let loaded = store.require("good ones").unwrap();
    assert_eq!(loaded, filter);

    // GC103 is archived, GC100 does not state it.
    let evaluator = FilterEvaluator::for_filter(&loaded);
    assert_eq!(evaluator.evaluate(&records[0]), Outcome::Inconclusive);
    assert_eq!(evaluator.evaluate(&records[3]), Outcome::NoMatch);

    let active = store.active(ContextKind::Live).unwrap().unwrap();
    assert_eq!(active.name, "good ones");
    assert_eq!(active.tree, filter.tree);
}

#[test]
fn test_distance_and_text_filters() {
    let records = caches();
    let filter = NamedFilter::from_config(
        "OR(DISTANCE(52.5,13.4,-5),NAME(regex,'^puzzle'),OWNER(equals,'BOB',case))",
    )
    .unwrap();
    let evaluator = FilterEvaluator::for_filter(&filter);

    assert_eq!(evaluator.evaluate(&records[0]), Outcome::Match);
    // Owner is "bob": case-sensitive equals fails, distance is unknown.
    assert_eq!(evaluator.evaluate(&records[1]), Outcome::Inconclusive);
    assert_eq!(evaluator.evaluate(&records[3]), Outcome::Match);

    assert_eq!(records[3].cache_type, Some(CacheType::Mystery));
}
