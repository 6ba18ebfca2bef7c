use crate::closure::{compose, powers, BinaryOp, PassStats};
use crate::error::Result;
use crate::key::Key;
use crate::options::BuildOptions;
use crate::progress::{self, NoProgress, Progress, ProgressEvent};
use crate::seeds::seed;
use crate::table::Table;
use serde::Serialize;

/// One member of the finalized universe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemarkableNumber {
    /// Canonical identity (deduplication key, not the display value)
    pub key: Key,

    /// Symbolic label, e.g. `π`, `5[Pri]`, `3²`, `φ+3`
    pub name: String,

    /// Unrounded value
    pub value: f64,

    /// Generation cost; lower is more fundamental
    pub complexity: f64,

    /// False for seeds, which closure never renames
    pub can_override: bool,

    /// Match-time penalty derived from `complexity`
    pub complexity_factor: f64,
}

/// Immutable universe of remarkable numbers, sorted by ascending value
#[derive(Debug, Clone)]
pub struct RemarkableSet {
    numbers: Vec<RemarkableNumber>,
    options: BuildOptions,
    passes: Vec<PassStats>,
}

impl RemarkableSet {
    /// Build silently
    pub fn build(options: &BuildOptions) -> Result<Self> {
        Self::build_with_progress(options, &mut NoProgress)
    }

    /// Seeds → powers → Mul → Sum → Sum → Frac → finalize.
    ///
    /// Sum runs twice so two-hop sums surface, and before Frac so fractions
    /// can take sums as operands.
    pub fn build_with_progress<P: Progress + ?Sized>(
        options: &BuildOptions,
        progress: &mut P,
    ) -> Result<Self> {
        options.validate()?;

        let mut table = Table::new();
        seed(&mut table, options.effective_n());

        let mut passes = vec![powers(&mut table, options)];
        for op in [
            BinaryOp::mul(),
            BinaryOp::sum(),
            BinaryOp::sum(),
            BinaryOp::frac(options.ratio_mode),
        ] {
            passes.push(compose(&mut table, &op, options, progress)?);
        }

        let numbers = finalize(table, options, progress);
        log::info!("Remarkable numbers ready: {}", numbers.len());

        Ok(Self {
            numbers,
            options: options.clone(),
            passes,
        })
    }

    #[must_use]
    pub fn numbers(&self) -> &[RemarkableNumber] {
        &self.numbers
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemarkableNumber> {
        self.numbers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Match tolerance the set was built for
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.options.delta
    }

    /// Counters of every closure pass, in execution order
    #[must_use]
    pub fn passes(&self) -> &[PassStats] {
        &self.passes
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&RemarkableNumber> {
        self.numbers.iter().find(|number| number.name == name)
    }

    /// Entry sharing the canonical key of `value`.
    ///
    /// Values are non-negative, so key order agrees with value order.
    #[must_use]
    pub fn find_by_value(&self, value: f64) -> Option<&RemarkableNumber> {
        let key = Key::of(value)?;
        let index = self.numbers.partition_point(|number| number.key < key);
        self.numbers.get(index).filter(|number| number.key == key)
    }
}

/// Materialize the table as a value-sorted sequence with complexity factors.
/// Ratio mode drops everything above 1.
fn finalize<P: Progress + ?Sized>(
    table: Table,
    options: &BuildOptions,
    progress: &mut P,
) -> Vec<RemarkableNumber> {
    let total = table.len() as u64;
    progress::phase(progress, format!("Init numbers: finalize ({total})"), total);
    progress.event(ProgressEvent::Update {
        label: Some("Init numbers: build array".to_string()),
        fraction: 0.0,
    });

    let curve = options.tuning.factor;
    let mut numbers: Vec<RemarkableNumber> = table
        .into_entries()
        .filter(|(_, entry)| !(options.ratio_mode && entry.value > 1.0))
        .map(|(key, entry)| RemarkableNumber {
            key,
            complexity_factor: curve.factor(entry.complexity),
            name: entry.name,
            value: entry.value,
            complexity: entry.complexity,
            can_override: entry.overridable,
        })
        .collect();

    progress.event(ProgressEvent::Update {
        label: Some(format!("Init numbers: sort ({})", numbers.len())),
        fraction: 0.6,
    });
    numbers.sort_by(|a, b| {
        a.value
            .total_cmp(&b.value)
            .then_with(|| a.key.cmp(&b.key))
    });

    progress::finish(progress);
    numbers
}
