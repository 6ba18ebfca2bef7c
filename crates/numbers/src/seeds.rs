use crate::key::Key;
use crate::series::{first_primes, Fibonacci};
use crate::table::{Entry, Table};

/// Named mathematical constant seeding the universe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedConstant {
    pub name: &'static str,
    pub value: f64,
    pub complexity: f64,
}

/// π, φ, e, the silver ratio, the plastic number and the tribonacci constant
#[must_use]
pub fn named_constants() -> [NamedConstant; 6] {
    let sqrt_69 = 69f64.sqrt();
    let sqrt_33 = 33f64.sqrt();

    [
        NamedConstant {
            name: "π",
            value: std::f64::consts::PI,
            complexity: 3.0,
        },
        NamedConstant {
            name: "φ",
            value: (1.0 + 5f64.sqrt()) / 2.0,
            complexity: 3.0,
        },
        NamedConstant {
            name: "ℇ",
            value: std::f64::consts::E,
            complexity: 7.0,
        },
        NamedConstant {
            name: "δs",
            value: 1.0 + std::f64::consts::SQRT_2,
            complexity: 7.0,
        },
        // Real root of x³ = x + 1
        NamedConstant {
            name: "ρ",
            value: ((9.0 + sqrt_69) / 18.0).cbrt() + ((9.0 - sqrt_69) / 18.0).cbrt(),
            complexity: 11.0,
        },
        // Real root of x³ = x² + x + 1
        NamedConstant {
            name: "γ",
            value: ((19.0 + 3.0 * sqrt_33).cbrt() + (19.0 - 3.0 * sqrt_33).cbrt() + 1.0) / 3.0,
            complexity: 11.0,
        },
    ]
}

/// Insert constants, `0..=n`, the first `n` primes and the first `n`
/// Fibonacci terms. Seeds are never renamed afterwards.
pub(crate) fn seed(table: &mut Table, n: usize) {
    for constant in named_constants() {
        insert(table, constant.name.to_string(), constant.value, constant.complexity);
    }

    for i in 0..=n {
        insert(table, i.to_string(), i as f64, i as f64);
    }

    for (index, prime) in first_primes(n).into_iter().enumerate() {
        insert(table, format!("{prime}[Pri]"), prime as f64, (index + 2) as f64);
    }

    for (index, term) in Fibonacci::new().take(n).enumerate() {
        insert(table, format!("{term}[Fib]"), term as f64, ((index + 1) * 2) as f64);
    }

    log::debug!("Seeded {} remarkable numbers (n={n})", table.len());
}

fn insert(table: &mut Table, name: String, value: f64, complexity: f64) {
    let Some(key) = Key::of(value) else {
        return;
    };
    table.merge(
        key,
        Entry {
            name,
            value,
            complexity,
            overridable: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> Table {
        let mut table = Table::new();
        seed(&mut table, n);
        table
    }

    fn lookup(table: &Table, value: f64) -> &Entry {
        table.get(&Key::of(value).unwrap()).expect("seeded value")
    }

    #[test]
    fn constants_have_expected_values() {
        let constants = named_constants();
        assert!((constants[1].value - 1.618_033_988_749_895).abs() < 1e-12);
        assert!((constants[3].value - 2.414_213_562_373_095).abs() < 1e-12);
        assert!((constants[4].value - 1.324_717_957_244_746).abs() < 1e-12);
        assert!((constants[5].value - 1.839_286_755_214_161).abs() < 1e-12);
        // ρ³ = ρ + 1 and γ³ = γ² + γ + 1
        let rho = constants[4].value;
        assert!((rho.powi(3) - rho - 1.0).abs() < 1e-12);
        let gamma = constants[5].value;
        assert!((gamma.powi(3) - gamma.powi(2) - gamma - 1.0).abs() < 1e-12);
    }

    #[test]
    fn integers_cost_their_magnitude() {
        let table = seeded(5);
        for i in 0..=5 {
            let entry = lookup(&table, i as f64);
            assert_eq!(entry.complexity, i as f64);
            assert_eq!(entry.name, i.to_string());
        }
    }

    #[test]
    fn primes_keep_integer_names_but_lower_cost() {
        let table = seeded(5);
        // 5 is the 3rd prime: 2 + 2 < 5
        let five = lookup(&table, 5.0);
        assert_eq!(five.name, "5");
        assert_eq!(five.complexity, 4.0);

        let eleven = lookup(&table, 11.0);
        assert_eq!(eleven.name, "11[Pri]");
        assert_eq!(eleven.complexity, 6.0);
    }

    #[test]
    fn fibonacci_terms_are_seeded() {
        let table = seeded(5);
        let eight = lookup(&table, 8.0);
        assert_eq!(eight.name, "8[Fib]");
        assert_eq!(eight.complexity, 10.0);
        assert!(!eight.overridable);
    }

    #[test]
    fn zero_n_keeps_constants_and_zero() {
        let table = seeded(0);
        assert_eq!(table.len(), 7);
        assert_eq!(lookup(&table, 0.0).complexity, 0.0);
    }
}
