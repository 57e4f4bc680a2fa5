//! Tests for the config parser and writer.

use super::leaf::{CountRange, DateRange, DistanceCriterion, StatusCriteria, TextMatch};
use super::*;
use crate::geocache::{CacheSize, CacheType, Coordinates};
use chrono::NaiveDate;
use proptest::prelude::*;

fn parse_tree(input: &str) -> FilterNode {
    ConfigParser::parse(input)
        .expect("should parse")
        .tree
        .expect("should have a tree")
}

fn parse_err(input: &str) -> ParseError {
    match ConfigParser::parse(input).unwrap_err() {
        FilterError::Parse(err) => err,
        other => panic!("expected parse error, got {other:?}"),
    }
}

// ==================== Basic Parsing Tests ====================

#[test]
fn test_parse_empty_is_no_filter() {
    assert_eq!(ConfigParser::parse("").unwrap().tree, None);
    assert_eq!(ConfigParser::parse("  \n\t").unwrap().tree, None);
    assert_eq!(FilterNode::from_config("").unwrap(), None);
}

#[test]
fn test_parse_single_leaf() {
    assert_eq!(
        parse_tree("TYPE(multi,traditional)"),
        FilterNode::leaf(LeafCriterion::types([CacheType::Traditional, CacheType::Multi]))
    );
}

#[test]
fn test_parse_case_insensitive() {
    assert_eq!(
        parse_tree("and(type(MULTI),Terrain(1-2))"),
        parse_tree("AND(TYPE(multi),TERRAIN(1-2))")
    );
}

#[test]
fn test_parse_whitespace_between_tokens() {
    assert_eq!(
        parse_tree("  OR ( SIZE ( micro , small ) , NOT ( DIFFICULTY ( 4- ) ) )  "),
        FilterNode::or(vec![
            FilterNode::leaf(LeafCriterion::sizes([CacheSize::Micro, CacheSize::Small])),
            FilterNode::negate(FilterNode::leaf(
                LeafCriterion::difficulty(Some(4.0), None).unwrap()
            )),
        ])
    );
}

#[test]
fn test_parse_empty_combinators() {
    assert_eq!(parse_tree("AND()"), FilterNode::and(vec![]));
    assert_eq!(parse_tree("OR()"), FilterNode::or(vec![]));
}

#[test]
fn test_parse_preserves_child_order() {
    let tree = parse_tree("AND(TERRAIN(),TYPE(),DIFFICULTY())");
    let kinds: Vec<LeafKind> = tree.leaves().iter().map(|l| l.kind()).collect();
    assert_eq!(
        kinds,
        vec![LeafKind::Terrain, LeafKind::Type, LeafKind::Difficulty]
    );
}

#[test]
fn test_parse_quoted_text() {
    let tree = parse_tree(r"NAME(contains,'Bob\'s, (old) mill')");
    assert_eq!(
        tree,
        FilterNode::leaf(LeafCriterion::Name(
            TextMatch::new(TextMode::Contains, "Bob's, (old) mill", false).unwrap()
        ))
    );
}

#[test]
fn test_parse_empty_params() {
    let tree = parse_tree("HIDDEN(,2021-06-30)");
    assert_eq!(
        tree,
        FilterNode::leaf(LeafCriterion::Hidden(
            DateRange::new(None, NaiveDate::from_ymd_opt(2021, 6, 30)).unwrap()
        ))
    );

    let tree = parse_tree("HIDDEN(2021-06-30,)");
    assert_eq!(
        tree,
        FilterNode::leaf(LeafCriterion::Hidden(
            DateRange::new(NaiveDate::from_ymd_opt(2021, 6, 30), None).unwrap()
        ))
    );
}

// ==================== Error Tests ====================

#[test]
fn test_parse_error_unexpected_character() {
    assert_eq!(
        parse_err("AND(TYPE(multi);TERRAIN())"),
        ParseError::UnexpectedCharacter {
            character: ';',
            position: 15
        }
    );
}

#[test]
fn test_parse_error_unclosed_parenthesis() {
    assert_eq!(parse_err("AND(TYPE(multi)"), ParseError::UnclosedParenthesis);
    assert_eq!(parse_err("TYPE(multi"), ParseError::UnclosedParenthesis);
    assert_eq!(parse_err("FUTURE(a,(b)"), ParseError::UnclosedParenthesis);
}

#[test]
fn test_parse_error_missing_open_paren() {
    assert_eq!(parse_err("AND"), ParseError::UnexpectedEndOfInput);
    assert!(matches!(
        parse_err("AND,"),
        ParseError::UnexpectedToken { position: 3, .. }
    ));
}

#[test]
fn test_parse_error_trailing_input() {
    assert_eq!(
        parse_err("TYPE(multi) TYPE(mystery)"),
        ParseError::TrailingInput { position: 12 }
    );
    assert_eq!(parse_err("AND())"), ParseError::TrailingInput { position: 5 });
}

#[test]
fn test_parse_error_wrong_arity() {
    assert_eq!(
        parse_err("NOT()"),
        ParseError::WrongArity {
            tag: "NOT",
            found: 0
        }
    );
    assert_eq!(
        parse_err("INCONCLUSIVE(TYPE(),SIZE())"),
        ParseError::WrongArity {
            tag: "INCONCLUSIVE",
            found: 2
        }
    );
}

#[test]
fn test_parse_error_malformed_leaf() {
    assert!(matches!(
        parse_err("AND(TYPE(multi),DIFFICULTY(0-9))"),
        ParseError::MalformedParameter { ref tag, .. } if tag == "DIFFICULTY"
    ));
    assert!(matches!(
        parse_err("TYPE(NOT(x))"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_combinator_rejects_bare_params() {
    assert!(matches!(
        parse_err("AND(multi)"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_parse_never_partial() {
    // The valid prefix must not leak out of a failed parse.
    assert!(ConfigParser::parse("AND(TYPE(multi),TERRAIN(9))").is_err());
    assert!(ConfigParser::parse("AND(TYPE(multi),").is_err());
}

// ==================== Unknown Kind Tests ====================

#[test]
fn test_unknown_kind_is_skipped() {
    let outcome = ConfigParser::parse("AND(TYPE(multi),ATTRIBUTES(a,(b,c)),TERRAIN(-2))").unwrap();
    assert_eq!(outcome.skipped, vec!["ATTRIBUTES".to_string()]);
    assert!(!outcome.is_lossless());
    assert_eq!(
        outcome.tree,
        Some(FilterNode::and(vec![
            FilterNode::leaf(LeafCriterion::types([CacheType::Multi])),
            FilterNode::leaf(LeafCriterion::terrain(None, Some(2.0)).unwrap()),
        ]))
    );
}

#[test]
fn test_unknown_root_is_no_filter() {
    let outcome = ConfigParser::parse("LOGCOUNT(found,5-)").unwrap();
    assert_eq!(outcome.tree, None);
    assert_eq!(outcome.skipped, vec!["LOGCOUNT".to_string()]);
}

#[test]
fn test_wrapper_around_unknown_is_dropped() {
    let outcome = ConfigParser::parse("OR(NOT(LISTS(x)),INCONCLUSIVE(ORIGIN(y)),SIZE(micro))").unwrap();
    assert_eq!(outcome.skipped, vec!["LISTS".to_string(), "ORIGIN".to_string()]);
    assert_eq!(
        outcome.tree,
        Some(FilterNode::or(vec![FilterNode::leaf(LeafCriterion::sizes([
            CacheSize::Micro
        ]))]))
    );
}

#[test]
fn test_wrapper_arity_counts_unknown_children() {
    assert_eq!(
        parse_err("NOT(TYPE(),LISTS(x))"),
        ParseError::WrongArity {
            tag: "NOT",
            found: 2
        }
    );
}

#[test]
fn test_parse_strict_rejects_unknown() {
    assert_eq!(
        ConfigParser::parse_strict("AND(TYPE(),RATING(3))").unwrap_err(),
        FilterError::unknown_kind("RATING")
    );
    assert!(ConfigParser::parse_strict("AND(TYPE())").unwrap().is_some());
}

// ==================== Writer Tests ====================

#[test]
fn test_parse_error_too_deep() {
    let config = format!("{}TYPE(multi){}", "NOT(".repeat(20_000), ")".repeat(20_000));
    assert_eq!(
        parse_err(&config),
        ParseError::TooDeep {
            position: 4 * MAX_DEPTH
        }
    );

    // Unknown kinds are skipped without recursion, so they may nest freely.
    let skipped = format!("{}{}", "LOGS(".repeat(20_000), ")".repeat(20_000));
    assert_eq!(ConfigParser::parse(&skipped).unwrap().tree, None);
}

#[test]
fn test_parse_accepts_max_depth() {
    let depth = MAX_DEPTH - 1;
    let config = format!("{}TYPE(multi){}", "NOT(".repeat(depth), ")".repeat(depth));
    let tree = parse_tree(&config);
    assert_eq!(tree.depth(), MAX_DEPTH);
    assert_eq!(tree.to_config(), config);
}

#[test]
fn test_negative_zero_distance_roundtrips() {
    let criterion = DistanceCriterion::new(Coordinates::new(52.5, 13.4), Some(-0.0), Some(5.0)).unwrap();
    let node = FilterNode::leaf(LeafCriterion::Distance(criterion));
    let config = node.to_config();

    assert_eq!(config, "DISTANCE(52.5,13.4,0-5)");
    assert_eq!(FilterNode::from_config(&config), Ok(Some(node)));
}

#[test]
fn test_to_config_is_canonical() {
    let tree = parse_tree(" and( type(MYSTERY , multi) , name(EQUALS,'X') ) ");
    assert_eq!(tree.to_config(), "AND(TYPE(multi,mystery),NAME(equals,'X'))");
}

#[test]
fn test_to_config_opt() {
    assert_eq!(to_config_opt(None), "");
    let tree = FilterNode::or(vec![]);
    assert_eq!(to_config_opt(Some(&tree)), "OR()");
}

#[test]
fn test_roundtrip_every_leaf_kind() {
    let mut status = StatusCriteria::default();
    status.found = Some(false);
    status.premium = Some(true);

    let tree = FilterNode::and(vec![
        FilterNode::leaf(LeafCriterion::types([CacheType::Earth, CacheType::Lab])),
        FilterNode::leaf(LeafCriterion::difficulty(Some(1.5), None).unwrap()),
        FilterNode::leaf(LeafCriterion::terrain(Some(2.0), Some(2.0)).unwrap()),
        FilterNode::leaf(LeafCriterion::sizes([CacheSize::VeryLarge, CacheSize::NotChosen])),
        FilterNode::leaf(LeafCriterion::Name(
            TextMatch::new(TextMode::Regex, r"^the\s+\w+$", true).unwrap(),
        )),
        FilterNode::leaf(LeafCriterion::Owner(
            TextMatch::new(TextMode::StartsWith, r"o'neil\", false).unwrap(),
        )),
        FilterNode::leaf(LeafCriterion::Description(
            TextMatch::new(TextMode::EndsWith, "", false).unwrap(),
        )),
        FilterNode::leaf(LeafCriterion::Favorites(CountRange::new(Some(3), Some(40)).unwrap())),
        FilterNode::leaf(LeafCriterion::Distance(
            DistanceCriterion::new(Coordinates::new(-33.8688, 151.2093), Some(0.5), None).unwrap(),
        )),
        FilterNode::leaf(LeafCriterion::Hidden(
            DateRange::new(
                NaiveDate::from_ymd_opt(2001, 5, 3),
                NaiveDate::from_ymd_opt(2010, 1, 1),
            )
            .unwrap(),
        )),
        FilterNode::leaf(LeafCriterion::Status(status)),
    ]);

    let config = tree.to_config();
    assert_eq!(FilterNode::from_config(&config).unwrap(), Some(tree));
}

// ==================== Property Tests ====================

fn ordered<T: PartialOrd + Copy>(a: Option<T>, b: Option<T>) -> (Option<T>, Option<T>) {
    match (a, b) {
        (Some(x), Some(y)) if x > y => (Some(y), Some(x)),
        other => other,
    }
}

fn rating() -> impl Strategy<Value = f64> {
    (2u32..=10).prop_map(|halves| f64::from(halves) / 2.0)
}

fn text() -> impl Strategy<Value = TextMatch> {
    let mode = prop_oneof![
        Just(TextMode::Contains),
        Just(TextMode::StartsWith),
        Just(TextMode::EndsWith),
        Just(TextMode::Equals),
    ];
    (mode, "[a-zA-Z0-9 ',()\\\\]{0,12}", any::<bool>())
        .prop_map(|(mode, value, case)| TextMatch::new(mode, value, case).unwrap())
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn set_or_range_leaf() -> impl Strategy<Value = LeafCriterion> {
    prop_oneof![
        proptest::sample::subsequence(CacheType::ALL.to_vec(), 0..4).prop_map(LeafCriterion::types),
        proptest::sample::subsequence(CacheSize::ALL.to_vec(), 0..3).prop_map(LeafCriterion::sizes),
        (proptest::option::of(rating()), proptest::option::of(rating())).prop_map(|(a, b)| {
            let (lo, hi) = ordered(a, b);
            LeafCriterion::difficulty(lo, hi).unwrap()
        }),
        (proptest::option::of(rating()), proptest::option::of(rating())).prop_map(|(a, b)| {
            let (lo, hi) = ordered(a, b);
            LeafCriterion::terrain(lo, hi).unwrap()
        }),
    ]
}

fn distance_km() -> impl Strategy<Value = f64> {
    prop_oneof![Just(-0.0f64), Just(0.0f64), 0.0f64..1000.0]
}

fn other_leaf() -> impl Strategy<Value = LeafCriterion> {
    prop_oneof![
        text().prop_map(LeafCriterion::Name),
        text().prop_map(LeafCriterion::Owner),
        text().prop_map(LeafCriterion::Description),
        (proptest::option::of(0u32..5000), proptest::option::of(0u32..5000)).prop_map(|(a, b)| {
            let (lo, hi) = ordered(a, b);
            LeafCriterion::Favorites(CountRange::new(lo, hi).unwrap())
        }),
        (
            -90.0f64..=90.0,
            -180.0f64..=180.0,
            proptest::option::of(distance_km()),
            proptest::option::of(distance_km()),
        )
            .prop_map(|(lat, lon, a, b)| {
                let (lo, hi) = ordered(a, b);
                LeafCriterion::Distance(
                    DistanceCriterion::new(Coordinates::new(lat, lon), lo, hi).unwrap(),
                )
            }),
        (proptest::option::of(date()), proptest::option::of(date())).prop_map(|(a, b)| {
            let (from, to) = ordered(a, b);
            LeafCriterion::Hidden(DateRange::new(from, to).unwrap())
        }),
        (
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(found, disabled, archived, premium)| {
                LeafCriterion::Status(StatusCriteria {
                    found,
                    disabled,
                    archived,
                    premium,
                })
            }),
    ]
}

fn leaf() -> impl Strategy<Value = LeafCriterion> {
    prop_oneof![set_or_range_leaf(), other_leaf()]
}

fn tree() -> impl Strategy<Value = FilterNode> {
    leaf().prop_map(FilterNode::leaf).prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(FilterNode::and),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(FilterNode::or),
            inner.clone().prop_map(FilterNode::negate),
            inner.prop_map(FilterNode::include_inconclusive),
        ]
    })
}

proptest! {
    #[test]
    fn config_roundtrip(tree in tree()) {
        let config = tree.to_config();
        let parsed = FilterNode::from_config(&config);
        prop_assert_eq!(parsed, Ok(Some(tree)));
    }

    #[test]
    fn writer_is_deterministic(tree in tree()) {
        let config = tree.to_config();
        let reparsed = parse_tree(&config);
        prop_assert_eq!(reparsed.to_config(), config);
    }

    #[test]
    fn basic_fixed_point(tree in proptest::option::of(tree())) {
        let once = to_basic(tree.as_ref());
        let twice = to_basic(to_advanced(Some(&once)).as_ref());
        prop_assert_eq!(once, twice);
    }
}
