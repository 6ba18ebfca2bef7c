use crate::error::Result;
use crate::key::Key;
use crate::options::{BuildOptions, PowerCost};
use crate::progress::{self, Milestones, Progress};
use crate::table::{Entry, Merge, Table};
use serde::Serialize;

/// Outcome counters of one closure pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub title: String,
    /// Operands kept after the budget pre-filter
    pub operands: usize,
    /// Candidate pairs (or unary applications) evaluated
    pub evaluated: u64,
    pub inserted: usize,
    pub replaced: usize,
    pub lowered: usize,
}

impl PassStats {
    fn new(title: &str, operands: usize) -> Self {
        Self {
            title: title.to_string(),
            operands,
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: Merge) {
        match outcome {
            Merge::Insert => self.inserted += 1,
            Merge::Replace => self.replaced += 1,
            Merge::Lower => self.lowered += 1,
            Merge::Keep => {}
        }
    }
}

struct UnaryOp {
    cost: PowerCost,
    apply: fn(f64) -> f64,
    label: fn(&str) -> String,
}

fn unary_ops(options: &BuildOptions) -> Vec<UnaryOp> {
    let tuning = &options.tuning;
    let mut ops = vec![
        UnaryOp {
            cost: tuning.square,
            apply: |v| v * v,
            label: |name| format!("{name}²"),
        },
        UnaryOp {
            cost: tuning.cube,
            apply: |v| v * v * v,
            label: |name| format!("{name}³"),
        },
        UnaryOp {
            cost: tuning.square,
            apply: f64::sqrt,
            label: |name| format!("√{name}"),
        },
        UnaryOp {
            cost: tuning.cube,
            apply: f64::cbrt,
            label: |name| format!("∛{name}"),
        },
    ];
    if options.fourth_powers {
        ops.push(UnaryOp {
            cost: tuning.fourth,
            apply: |v| v.powi(4),
            label: |name| format!("{name}⁴"),
        });
        ops.push(UnaryOp {
            cost: tuning.fourth,
            apply: |v| v.sqrt().sqrt(),
            label: |name| format!("∜{name}"),
        });
    }
    ops
}

/// Powers and roots of every entry present when the pass starts.
///
/// 0 and 1 are fixed points of every power and are skipped. Entries created
/// here are not fed back into the same pass.
pub(crate) fn powers(table: &mut Table, options: &BuildOptions) -> PassStats {
    let ops = unary_ops(options);
    let operands = table.snapshot(|entry| entry.value != 0.0 && entry.value != 1.0);
    let mut stats = PassStats::new("Powers", operands.len());

    for operand in &operands {
        for op in &ops {
            stats.evaluated += 1;
            let complexity = op.cost.cost(operand.complexity);
            if complexity > options.complexity {
                continue;
            }
            let value = (op.apply)(operand.value);
            let Some(key) = Key::of(value) else {
                continue;
            };
            let outcome = table.merge(
                key,
                Entry {
                    name: (op.label)(&operand.name),
                    value,
                    complexity,
                    overridable: true,
                },
            );
            stats.record(outcome);
        }
    }

    log::info!(
        "Powers: {} operands, {} new entries, table size {}",
        stats.operands,
        stats.inserted,
        table.len()
    );
    stats
}

/// Operand pairs a binary operation refuses
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Exclusions {
    /// Skip `a == b`
    pub not_eq: bool,
    /// Skip pairs containing 0
    pub not_zero: bool,
    /// Skip pairs containing 1
    pub not_one: bool,
    /// Skip a right operand of 1
    pub right_not_one: bool,
    /// Keep only `a < b`
    pub right_greater: bool,
}

impl Exclusions {
    fn rejects(&self, a: f64, b: f64) -> bool {
        (self.not_eq && a == b)
            || (self.not_zero && (a == 0.0 || b == 0.0))
            || (self.not_one && (a == 1.0 || b == 1.0))
            || (self.right_not_one && b == 1.0)
            || (self.right_greater && a >= b)
    }
}

/// A binary composition: value law, cost law, symmetry and exclusions
pub(crate) struct BinaryOp {
    pub title: &'static str,
    pub joint: &'static str,
    pub value: fn(f64, f64) -> f64,
    /// Must be non-decreasing in each argument
    pub cost: fn(f64, f64) -> f64,
    pub commutative: bool,
    pub exclusions: Exclusions,
}

impl BinaryOp {
    pub fn mul() -> Self {
        Self {
            title: "Mul",
            joint: "×",
            value: |a, b| a * b,
            cost: |a, b| 1.0 + a * b,
            commutative: true,
            exclusions: Exclusions {
                not_eq: true,
                not_zero: true,
                not_one: true,
                ..Default::default()
            },
        }
    }

    pub fn sum() -> Self {
        Self {
            title: "Sum",
            joint: "+",
            value: |a, b| a + b,
            cost: |a, b| 1.0 + (a + b) * 2.0,
            commutative: true,
            exclusions: Exclusions {
                not_eq: true,
                not_zero: true,
                ..Default::default()
            },
        }
    }

    pub fn frac(ratio_mode: bool) -> Self {
        Self {
            title: "Frac",
            joint: "/",
            value: |a, b| a / b,
            cost: |a, b| 1.0 + (a + b) * 2.0,
            commutative: false,
            exclusions: Exclusions {
                not_eq: true,
                not_zero: true,
                right_not_one: true,
                right_greater: ratio_mode,
                ..Default::default()
            },
        }
    }
}

/// Combine every pair of current entries with `op`.
///
/// Operands are the entries whose cost, paired with the cheapest possible
/// partner (complexity 1), still fits the budget. They are walked cheapest
/// first, so a row stops as soon as the pair cost leaves the budget.
/// Commutative operations only visit `i <= j`.
pub(crate) fn compose<P: Progress + ?Sized>(
    table: &mut Table,
    op: &BinaryOp,
    options: &BuildOptions,
    progress: &mut P,
) -> Result<PassStats> {
    let budget = options.complexity;
    let operands = table.snapshot(|entry| (op.cost)(entry.complexity, 1.0) <= budget);
    let len = operands.len() as u64;
    let total = if op.commutative {
        len * (len + 1) / 2
    } else {
        len * len
    };
    let mut stats = PassStats::new(op.title, operands.len());

    progress::phase(
        progress,
        format!("Init numbers: {} ({total})", op.title),
        total,
    );

    let mut milestones = Milestones::new(options.tuning.batch_size);
    let mut count = 0u64;

    for (i, left) in operands.iter().enumerate() {
        let start = if op.commutative { i } else { 0 };
        for (j, right) in operands.iter().enumerate().skip(start) {
            if milestones.due(count) {
                progress::checkpoint(progress, op.title, count, total)?;
            }

            let complexity = (op.cost)(left.complexity, right.complexity);
            if complexity > budget {
                // the rest of the row is at least as costly
                count += (operands.len() - j) as u64;
                break;
            }
            count += 1;

            if op.exclusions.rejects(left.value, right.value) {
                continue;
            }

            let value = (op.value)(left.value, right.value);
            let Some(key) = Key::of(value) else {
                continue;
            };

            let outcome = table.assess(&key, complexity);
            match outcome {
                Merge::Keep => {}
                Merge::Lower => table.lower(&key, complexity),
                Merge::Insert | Merge::Replace => table.apply(
                    key,
                    outcome,
                    Entry {
                        name: format!("{}{}{}", left.name, op.joint, right.name),
                        value,
                        complexity,
                        overridable: true,
                    },
                ),
            }
            stats.record(outcome);
        }
    }

    stats.evaluated = count;
    progress::finish(progress);

    log::info!(
        "{}: {} operands, {} pairs, {} new, {} renamed, {} cheaper, table size {}",
        op.title,
        stats.operands,
        stats.evaluated,
        stats.inserted,
        stats.replaced,
        stats.lowered,
        table.len()
    );
    Ok(stats)
}
