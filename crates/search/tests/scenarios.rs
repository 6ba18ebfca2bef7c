use sacred_numbers::{BuildOptions, NoProgress, RemarkableSet};
use sacred_search::{check_number, check_property, check_property_ratio, Dataset, PropertySelection};

fn named(property: &str) -> PropertySelection {
    PropertySelection::Named(vec![property.to_string()])
}

#[test]
fn moon_to_earth_radius_ratio_is_remarkable() {
    let set = RemarkableSet::build(&BuildOptions::default()).unwrap();
    let matches = check_number(&set, 1737.4 / 6371.0);

    let top = matches.first().expect("at least one match");
    assert!(top.relevance > 0.0);
    assert!(top.delta.abs() <= 0.01);
    assert!(matches.iter().all(|m| m.delta <= 0.01 && m.relevance > 0.0));
}

#[test]
fn non_numeric_records_are_skipped() {
    let set = RemarkableSet::build(&BuildOptions {
        complexity: 20.0,
        n: 5,
        ..Default::default()
    })
    .unwrap();
    let dataset = Dataset::from_json_str(r#"{"A": {"mass": 10}, "B": {"mass": "n/a"}}"#).unwrap();

    let report = check_property(&set, &dataset, &named("mass"), &mut NoProgress).unwrap();
    let mass = report.property("mass").expect("mass matches");
    assert_eq!(mass.items.len(), 1);
    assert_eq!(mass.items[0].item, "A");
    assert_eq!(mass.items[0].value, 10.0);
    assert!(report.get("mass", "B").is_none());
}

#[test]
fn ratios_divide_the_smaller_by_the_larger() {
    let set = RemarkableSet::build(&BuildOptions {
        complexity: 20.0,
        n: 5,
        ratio_mode: true,
        ..Default::default()
    })
    .unwrap();
    let dataset = Dataset::from_json_str(r#"{"A": {"x": 2}, "B": {"x": 6}}"#).unwrap();

    let report = check_property_ratio(&set, &dataset, &named("x"), &mut NoProgress).unwrap();
    let x = report.property("x").expect("x matches");
    assert_eq!(x.items.len(), 1);
    assert_eq!(x.items[0].item, "A/B");
    assert_eq!(x.items[0].value, 2.0 / 6.0);
    assert_eq!(x.items[0].matches[0].name, "1/3");
}

#[test]
fn ratio_labels_follow_the_smaller_record() {
    let set = RemarkableSet::build(&BuildOptions {
        complexity: 20.0,
        n: 5,
        ratio_mode: true,
        ..Default::default()
    })
    .unwrap();
    let dataset = Dataset::from_json_str(r#"[{"x": 6}, {"x": 2}]"#).unwrap();

    let report = check_property_ratio(&set, &dataset, &named("x"), &mut NoProgress).unwrap();
    assert!(report.get("x", "1/0").is_some());
    assert!(report.get("x", "0/1").is_none());
}

#[test]
fn report_serializes_as_nested_maps() {
    let set = RemarkableSet::build(&BuildOptions {
        complexity: 20.0,
        n: 5,
        ..Default::default()
    })
    .unwrap();
    let dataset = Dataset::from_json_str(r#"{"A": {"mass": 3}}"#).unwrap();
    let report = check_property(&set, &dataset, &PropertySelection::Auto, &mut NoProgress).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json.as_object().map(|m| m.len()), Some(1));
    assert_eq!(json["mass"].as_object().map(|m| m.len()), Some(1));
    assert_eq!(json["mass"]["A"][0]["name"], "3");
    assert_eq!(json["mass"]["A"][0]["value"], 3.0);
}
