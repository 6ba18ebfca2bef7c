//! Restartable integer sequences.
//!
//! Every sequence is a plain [`Iterator`]; nothing unbounded is ever
//! materialized. Consume with [`Sequence::first`] (the first `k` terms) or
//! [`Sequence::first_at_least`] (the first term reaching a bound).

/// Consumption contracts shared by all sequences
pub trait Sequence: Iterator<Item = u64> + Sized {
    /// The first `k` terms
    fn first(self, k: usize) -> Vec<u64> {
        self.take(k).collect()
    }

    /// The first term `>= bound`, `None` if the sequence ends before
    fn first_at_least(mut self, bound: u64) -> Option<u64> {
        self.find(|&term| term >= bound)
    }
}

impl<I: Iterator<Item = u64>> Sequence for I {}

/// Fibonacci numbers with the duplicated 1 dropped: 1, 2, 3, 5, 8, …
#[derive(Debug, Clone)]
pub struct Fibonacci {
    previous: u64,
    current: u64,
}

impl Fibonacci {
    #[must_use]
    pub fn new() -> Self {
        Self {
            previous: 0,
            current: 1,
        }
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Fibonacci {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let next = self.previous.checked_add(self.current)?;
        self.previous = self.current;
        self.current = next;
        Some(next)
    }
}

/// Primes by trial division against the primes found so far
#[derive(Debug, Clone)]
pub struct Primes {
    found: Vec<u64>,
    candidate: u64,
}

impl Primes {
    #[must_use]
    pub fn new() -> Self {
        Self {
            found: Vec::new(),
            candidate: 1,
        }
    }
}

impl Default for Primes {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Primes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            self.candidate = self.candidate.checked_add(1)?;
            let candidate = self.candidate;
            let composite = self
                .found
                .iter()
                .take_while(|&&p| p.saturating_mul(p) <= candidate)
                .any(|&p| candidate % p == 0);
            if !composite {
                self.found.push(candidate);
                return Some(candidate);
            }
        }
    }
}

/// All primes `<= limit` (sieve of Eratosthenes)
#[must_use]
pub fn primes_up_to(limit: usize) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for i in 2..=limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u64);
        let mut multiple = i.saturating_mul(i);
        while multiple <= limit {
            composite[multiple] = true;
            multiple += i;
        }
    }
    primes
}

/// The first `n` primes: sieve past the target, truncate, widen if short
#[must_use]
pub fn first_primes(n: usize) -> Vec<u64> {
    if n == 0 {
        return Vec::new();
    }
    let mut limit = n.saturating_mul(10).max(16);
    loop {
        let mut primes = primes_up_to(limit);
        if primes.len() >= n {
            primes.truncate(n);
            return primes;
        }
        limit = limit.saturating_mul(2);
    }
}

/// Deterministic Miller-Rabin; these witnesses cover every `u64`
#[must_use]
pub fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut odd = n - 1;
    let mut twos = 0;
    while odd % 2 == 0 {
        odd /= 2;
        twos += 1;
    }

    WITNESSES.iter().all(|&witness| {
        let mut x = pow_mod(witness, odd, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..twos {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    })
}

pub(crate) fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (u128::from(a) * u128::from(b) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// A figurate family defined by its closed form (1-based index)
#[derive(Debug, Clone, Copy)]
pub struct Figurate {
    pub name: &'static str,
    nth: fn(u128) -> u128,
}

impl Figurate {
    /// Term at 1-based `index`, `None` past `u64`
    #[must_use]
    pub fn nth_term(&self, index: u64) -> Option<u64> {
        u64::try_from((self.nth)(u128::from(index))).ok()
    }

    /// Membership by binary search over the index; terms are strictly
    /// increasing
    #[must_use]
    pub fn contains(&self, n: u64) -> bool {
        let mut high = 1u64;
        loop {
            match self.nth_term(high) {
                Some(term) if term == n => return true,
                Some(term) if term < n => high = high.saturating_mul(2),
                _ => break,
            }
        }

        let mut low = high / 2 + 1;
        while low < high {
            let mid = low + (high - low) / 2;
            match self.nth_term(mid) {
                Some(term) if term == n => return true,
                Some(term) if term < n => low = mid + 1,
                _ => high = mid,
            }
        }
        false
    }

    #[must_use]
    pub fn iter(&self) -> FigurateIter {
        FigurateIter {
            family: *self,
            index: 0,
        }
    }
}

/// Lazy walk over a [`Figurate`] family
#[derive(Debug, Clone)]
pub struct FigurateIter {
    family: Figurate,
    index: u64,
}

impl Iterator for FigurateIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.index = self.index.checked_add(1)?;
        self.family.nth_term(self.index)
    }
}

const fn centered(k: u128, n: u128) -> u128 {
    1 + k * n * (n - 1) / 2
}

pub const FIGURATE: &[Figurate] = &[
    Figurate { name: "triangular", nth: |n| n * (n + 1) / 2 },
    Figurate { name: "centered triangular", nth: |n| centered(3, n) },
    Figurate { name: "square", nth: |n| n * n },
    Figurate { name: "centered square", nth: |n| centered(4, n) },
    Figurate { name: "pentagonal", nth: |n| n * (3 * n - 1) / 2 },
    Figurate { name: "centered pentagonal", nth: |n| centered(5, n) },
    Figurate { name: "hexagonal", nth: |n| n * (2 * n - 1) },
    Figurate { name: "centered hexagonal", nth: |n| centered(6, n) },
    Figurate { name: "heptagonal", nth: |n| n * (5 * n - 3) / 2 },
    Figurate { name: "centered heptagonal", nth: |n| centered(7, n) },
    Figurate { name: "octagonal", nth: |n| n * (3 * n - 2) },
    Figurate { name: "centered octagonal", nth: |n| centered(8, n) },
    Figurate { name: "enneagonal", nth: |n| (7 * n * n - 5 * n) / 2 },
    Figurate { name: "centered enneagonal", nth: |n| centered(9, n) },
    Figurate { name: "decagonal", nth: |n| 4 * n * n - 3 * n },
    Figurate { name: "centered decagonal", nth: |n| centered(10, n) },
    Figurate { name: "dodecagonal", nth: |n| 5 * n * n - 4 * n },
    Figurate { name: "centered dodecagonal", nth: |n| centered(12, n) },
    Figurate { name: "star", nth: |n| 1 + 6 * n * (n - 1) },
    Figurate { name: "tetrahedral", nth: |n| n * (n + 1) * (n + 2) / 6 },
    Figurate {
        name: "centered tetrahedral",
        nth: |n| {
            let m = n - 1;
            (2 * m + 1) * (m * m + m + 3) / 3
        },
    },
    Figurate { name: "cubic", nth: |n| n * n * n },
    Figurate {
        name: "centered cubic",
        nth: |n| {
            let m = n - 1;
            m * m * m + n * n * n
        },
    },
    Figurate { name: "octahedral", nth: |n| n * (2 * n * n + 1) / 3 },
    Figurate {
        name: "centered octahedral",
        nth: |n| {
            let m = n - 1;
            (2 * m + 1) * (2 * m * m + 2 * m + 3) / 3
        },
    },
    Figurate { name: "dodecahedral", nth: |n| n * (3 * n - 1) * (3 * n - 2) / 2 },
    Figurate {
        name: "centered dodecahedral",
        nth: |n| {
            let m = n - 1;
            (2 * m + 1) * (5 * m * m + 5 * m + 1)
        },
    },
    Figurate { name: "icosahedral", nth: |n| n * (5 * n * n - 5 * n + 2) / 2 },
    Figurate {
        name: "centered icosahedral",
        nth: |n| {
            let m = n - 1;
            (2 * m + 1) * (5 * m * m + 5 * m + 3) / 3
        },
    },
    Figurate { name: "square pyramidal", nth: |n| n * (n + 1) * (2 * n + 1) / 6 },
    Figurate { name: "hexagonal pyramidal", nth: |n| n * (n + 1) * (4 * n - 1) / 6 },
];
