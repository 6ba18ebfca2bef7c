use crate::dataset::Dataset;
use crate::error::Result;
use crate::matcher::{check_number, MatchResult};
use sacred_numbers::{checkpoint, Milestones, Progress, ProgressEvent, RemarkableSet};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Property reports between two progress updates
const PROPERTY_BATCH: u64 = 4;

/// Ratio reports between two progress updates
const RATIO_BATCH: u64 = 10;

/// Which properties a scan visits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertySelection {
    /// Union of every property name found in the dataset
    #[default]
    Auto,
    Named(Vec<String>),
}

impl PropertySelection {
    /// `Auto` when `names` is empty
    #[must_use]
    pub fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            Self::Auto
        } else {
            Self::Named(names)
        }
    }

    fn resolve(&self, dataset: &Dataset) -> Vec<String> {
        match self {
            Self::Auto => dataset.property_names(),
            Self::Named(names) => names.clone(),
        }
    }
}

/// Matches of one record (or one `A/B` pair of records)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMatches {
    pub item: String,
    pub value: f64,
    pub matches: Vec<MatchResult>,
}

/// Items of one property with at least one match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyMatches {
    pub property: String,
    pub items: Vec<ItemMatches>,
}

/// Scan outcome; properties without any match are absent.
///
/// Serializes as `{property: {item: [match, ..]}}` in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub properties: Vec<PropertyMatches>,
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for property in &self.properties {
            map.serialize_entry(&property.property, &ItemsByName(&property.items))?;
        }
        map.end()
    }
}

struct ItemsByName<'a>(&'a [ItemMatches]);

impl Serialize for ItemsByName<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for item in self.0 {
            map.serialize_entry(&item.item, &item.matches)?;
        }
        map.end()
    }
}

impl ScanReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[must_use]
    pub fn property(&self, property: &str) -> Option<&PropertyMatches> {
        self.properties.iter().find(|p| p.property == property)
    }

    /// Matches of `item` under `property`
    #[must_use]
    pub fn get(&self, property: &str, item: &str) -> Option<&[MatchResult]> {
        self.property(property)?
            .items
            .iter()
            .find(|i| i.item == item)
            .map(|i| i.matches.as_slice())
    }

    fn push(&mut self, property: &str, item: ItemMatches) {
        match self.properties.last_mut() {
            Some(last) if last.property == property => last.items.push(item),
            _ => self.properties.push(PropertyMatches {
                property: property.to_string(),
                items: vec![item],
            }),
        }
    }
}

/// Match every numeric value of the selected properties.
///
/// Non-numeric values are skipped silently.
pub fn check_property<P: Progress + ?Sized>(
    set: &RemarkableSet,
    dataset: &Dataset,
    selection: &PropertySelection,
    progress: &mut P,
) -> Result<ScanReport> {
    let properties = selection.resolve(dataset);
    let total = (properties.len() * dataset.len()) as u64;
    start(progress, total);

    let mut report = ScanReport::default();
    let mut milestones = Milestones::new(PROPERTY_BATCH);
    let mut count = 0u64;

    for property in &properties {
        relabel(progress, property, count, total);
        for (index, (name, _)) in dataset.records().enumerate() {
            if milestones.due(count) {
                checkpoint(progress, "Compute", count, total)?;
            }
            count += 1;

            let Some(value) = dataset.number(index, property) else {
                continue;
            };
            let matches = check_number(set, value);
            if !matches.is_empty() {
                report.push(
                    property,
                    ItemMatches {
                        item: name.to_string(),
                        value,
                        matches,
                    },
                );
            }
        }
    }

    finish(progress, &report);
    Ok(report)
}

/// Match the ratio of every pair of records on the selected properties.
///
/// The smaller value is always divided by the larger one, so ratios stay in
/// [0, 1]; the item is labelled `smaller/larger`. Pairs whose larger value
/// is 0 are skipped.
pub fn check_property_ratio<P: Progress + ?Sized>(
    set: &RemarkableSet,
    dataset: &Dataset,
    selection: &PropertySelection,
    progress: &mut P,
) -> Result<ScanReport> {
    let properties = selection.resolve(dataset);
    let records: Vec<&str> = dataset.records().map(|(name, _)| name).collect();
    let n = records.len() as u64;
    let total = properties.len() as u64 * n * n.saturating_sub(1) / 2;
    start(progress, total);

    let mut report = ScanReport::default();
    let mut milestones = Milestones::new(RATIO_BATCH);
    let mut count = 0u64;

    for property in &properties {
        relabel(progress, property, count, total);
        for i in 0..records.len() {
            let Some(first) = dataset.number(i, property) else {
                count += (records.len() - i - 1) as u64;
                continue;
            };
            for j in i + 1..records.len() {
                if milestones.due(count) {
                    checkpoint(progress, "Compute", count, total)?;
                }
                count += 1;

                let Some(second) = dataset.number(j, property) else {
                    continue;
                };
                let (smaller, larger, label) = if first >= second {
                    (second, first, format!("{}/{}", records[j], records[i]))
                } else {
                    (first, second, format!("{}/{}", records[i], records[j]))
                };
                if larger == 0.0 {
                    continue;
                }

                let ratio = smaller / larger;
                let matches = check_number(set, ratio);
                if !matches.is_empty() {
                    report.push(
                        property,
                        ItemMatches {
                            item: label,
                            value: ratio,
                            matches,
                        },
                    );
                }
            }
        }
    }

    finish(progress, &report);
    Ok(report)
}

fn start<P: Progress + ?Sized>(progress: &mut P, total: u64) {
    log::debug!("Compute ({total})");
    progress.event(ProgressEvent::Phase {
        label: format!("Compute ({total})"),
        total,
    });
}

fn relabel<P: Progress + ?Sized>(progress: &mut P, property: &str, count: u64, total: u64) {
    let fraction = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    };
    progress.event(ProgressEvent::Update {
        label: Some(format!("Compute {property} ({total})")),
        fraction,
    });
}

fn finish<P: Progress + ?Sized>(progress: &mut P, report: &ScanReport) {
    progress.event(ProgressEvent::Update {
        label: None,
        fraction: 1.0,
    });
    log::info!(
        "Scan done: {} properties with matches, {} items",
        report.properties.len(),
        report.properties.iter().map(|p| p.items.len()).sum::<usize>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sacred_numbers::{BuildOptions, NoProgress};

    fn small_set(ratio_mode: bool) -> RemarkableSet {
        RemarkableSet::build(&BuildOptions {
            complexity: 20.0,
            n: 5,
            ratio_mode,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn selection_defaults_to_auto() {
        assert_eq!(PropertySelection::from_names(Vec::new()), PropertySelection::Auto);
        assert_eq!(
            PropertySelection::from_names(vec!["x".to_string()]),
            PropertySelection::Named(vec!["x".to_string()])
        );
    }

    #[test]
    fn auto_selection_visits_every_property() {
        let set = small_set(false);
        let dataset = Dataset::from_json_str(r#"{"A": {"x": 3, "y": 5}, "B": {"z": 7}}"#).unwrap();
        let report =
            check_property(&set, &dataset, &PropertySelection::Auto, &mut NoProgress).unwrap();
        let properties: Vec<&str> = report.properties.iter().map(|p| p.property.as_str()).collect();
        assert_eq!(properties, vec!["x", "y", "z"]);
        assert_eq!(report.get("z", "B").unwrap()[0].name, "7[Pri]");
    }

    #[test]
    fn unmatched_properties_are_left_out() {
        let set = small_set(false);
        let dataset = Dataset::from_json_str(r#"{"A": {"x": 3, "label": "foo"}}"#).unwrap();
        let report =
            check_property(&set, &dataset, &PropertySelection::Auto, &mut NoProgress).unwrap();
        assert!(report.property("label").is_none());
        assert!(report.property("x").is_some());
    }

    #[test]
    fn ratio_pairs_skip_missing_values() {
        let set = small_set(true);
        let dataset =
            Dataset::from_json_str(r#"[{"x": 2}, {"x": "?"}, {"x": 4}, {"x": 0}]"#).unwrap();
        let selection = PropertySelection::Named(vec!["x".to_string()]);
        let report = check_property_ratio(&set, &dataset, &selection, &mut NoProgress).unwrap();

        let half = report.get("x", "0/2").expect("2/4");
        assert_eq!(half[0].value, 0.5);
        assert!(report.get("x", "1/0").is_none());
        assert!(report.get("x", "0/1").is_none());
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<ProgressEvent>,
    }

    impl Progress for Recorder {
        fn event(&mut self, event: ProgressEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn scans_report_progress_per_property() {
        let set = small_set(false);
        let dataset = Dataset::from_json_str(r#"{"A": {"x": 3, "y": 5}, "B": {"x": 7}}"#).unwrap();
        let mut recorder = Recorder::default();
        check_property(&set, &dataset, &PropertySelection::Auto, &mut recorder).unwrap();

        assert_eq!(
            recorder.events[0],
            ProgressEvent::Phase {
                label: "Compute (4)".to_string(),
                total: 4
            }
        );
        let labels: Vec<String> = recorder
            .events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Update { label, .. } => label.clone(),
                ProgressEvent::Phase { .. } => None,
            })
            .collect();
        assert_eq!(labels, vec!["Compute x (4)", "Compute y (4)"]);
        assert_eq!(
            recorder.events.last(),
            Some(&ProgressEvent::Update {
                label: None,
                fraction: 1.0
            })
        );
    }
}
