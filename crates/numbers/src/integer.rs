//! Arithmetic facts about a single integer.

use crate::series::{is_prime, mul_mod, Fibonacci, Sequence, FIGURATE};

/// Divisors of `n` other than 1 and `n`, ascending
#[must_use]
pub fn divisors(n: u64) -> Vec<u64> {
    if n < 2 {
        return Vec::new();
    }
    let mut all = vec![1u64];
    for (prime, power) in factorize(n) {
        let previous = all.len();
        let mut scale = 1u64;
        for _ in 0..power {
            scale *= prime;
            for index in 0..previous {
                all.push(all[index] * scale);
            }
        }
    }
    all.sort_unstable();
    all.retain(|&d| d != 1 && d != n);
    all
}

/// Prime factors of `n` with their multiplicity, ascending
#[must_use]
pub fn factorize(n: u64) -> Vec<(u64, u32)> {
    let mut primes = Vec::new();
    let mut rest = n;
    let mut candidate = 2u64;
    while rest > 1 && candidate < 1000 && candidate * candidate <= rest {
        while rest % candidate == 0 {
            primes.push(candidate);
            rest /= candidate;
        }
        candidate += 1;
    }
    split(rest, &mut primes);
    primes.sort_unstable();

    let mut grouped: Vec<(u64, u32)> = Vec::new();
    for prime in primes {
        match grouped.last_mut() {
            Some((last, power)) if *last == prime => *power += 1,
            _ => grouped.push((prime, 1)),
        }
    }
    grouped
}

fn split(n: u64, primes: &mut Vec<u64>) {
    if n < 2 {
        return;
    }
    if is_prime(n) {
        primes.push(n);
        return;
    }
    let factor = rho(n);
    split(factor, primes);
    split(n / factor, primes);
}

/// A non-trivial factor of the odd composite `n` (Pollard's rho, Floyd cycle)
fn rho(n: u64) -> u64 {
    if n % 2 == 0 {
        return 2;
    }
    let step = |x: u64, c: u64| {
        ((u128::from(mul_mod(x, x, n)) + u128::from(c)) % u128::from(n)) as u64
    };
    let mut c = 1u64;
    loop {
        let (mut slow, mut fast, mut found) = (2u64, 2u64, 1u64);
        while found == 1 {
            slow = step(slow, c);
            fast = step(step(fast, c), c);
            found = gcd(slow.abs_diff(fast), n);
        }
        if found != n {
            return found;
        }
        c += 1;
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Names of the sequences containing `n`
#[must_use]
pub fn series_of(n: u64) -> Vec<&'static str> {
    let mut names = Vec::new();
    if Fibonacci::new().first_at_least(n) == Some(n) {
        names.push("fibonacci");
    }
    if is_prime(n) {
        names.push("prime");
    }
    names.extend(
        FIGURATE
            .iter()
            .filter(|family| family.contains(n))
            .map(|family| family.name),
    );
    names
}
