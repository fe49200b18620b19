//! Named math-function registries
//!
//! Two fixed tables map case-insensitive names to one- and two-argument real
//! functions.  They are built once on first use and never mutated; the
//! evaluator and the random generator share them by reference.
//!
//! The name set mirrors the host math library the equation format was
//! designed against, so existing equation text keeps meaning the same thing.
//! Most entries are `std::f64` methods; the C-math remainder (Bessel, error
//! functions, `tgamma`, exponent extraction, …) comes from [`libm`].  Names
//! that are *not* registered are handled by the evaluator, which treats an
//! unknown one-argument application as identity and an unknown two-argument
//! application as a pass-through of its first operand.
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A registered one-argument function
pub type SingleFn = fn(f64) -> f64;

/// A registered two-argument function
pub type DoubleFn = fn(f64, f64) -> f64;

const SINGLE_TABLE: &[(&str, SingleFn)] = &[
    ("Abs", f64::abs),
    ("Acos", f64::acos),
    ("Acosh", f64::acosh),
    ("Asin", f64::asin),
    ("Asinh", f64::asinh),
    ("Atan", f64::atan),
    ("Atanh", f64::atanh),
    ("Cbrt", f64::cbrt),
    ("Ceil", f64::ceil),
    ("Cos", f64::cos),
    ("Cosh", f64::cosh),
    ("Erf", libm::erf),
    ("Erfc", libm::erfc),
    ("Erfcinv", |x| erf_inv(1.0 - x)),
    ("Erfinv", erf_inv),
    ("Exp", f64::exp),
    ("Exp2", f64::exp2),
    ("Expm1", f64::exp_m1),
    ("Floor", f64::floor),
    ("Gamma", libm::tgamma),
    ("Ilogb", |x| f64::from(libm::ilogb(x))),
    ("Inf", |sign| {
        if sign >= 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    }),
    ("J0", libm::j0),
    ("J1", libm::j1),
    ("Log", f64::ln),
    ("Log10", f64::log10),
    ("Log1p", f64::ln_1p),
    ("Log2", f64::log2),
    ("Logb", |x| {
        if x == 0.0 {
            f64::NEG_INFINITY
        } else if x.is_infinite() {
            f64::INFINITY
        } else if x.is_nan() {
            x
        } else {
            f64::from(libm::ilogb(x))
        }
    }),
    ("Pow10", |x| 10f64.powi(x as i32)),
    ("Round", f64::round),
    ("RoundToEven", f64::round_ties_even),
    ("Sin", f64::sin),
    ("Sinh", f64::sinh),
    ("Sqrt", f64::sqrt),
    ("Tan", f64::tan),
    ("Tanh", f64::tanh),
    ("Trunc", f64::trunc),
    ("Y0", libm::y0),
    ("Y1", libm::y1),
];

const DOUBLE_TABLE: &[(&str, DoubleFn)] = &[
    ("Atan2", f64::atan2),
    ("Copysign", f64::copysign),
    ("Dim", libm::fdim),
    ("Hypot", f64::hypot),
    ("Jn", |n, x| libm::jn(n as i32, x)),
    ("Ldexp", |x, e| libm::scalbn(x, e as i32)),
    ("Max", f64::max),
    ("Min", f64::min),
    ("Mod", |x, y| x % y),
    ("Nextafter", libm::nextafter),
    ("Pow", f64::powf),
    ("Remainder", libm::remainder),
    ("Yn", |n, x| libm::yn(n as i32, x)),
];

static SINGLES: LazyLock<BTreeMap<String, SingleFn>> = LazyLock::new(|| {
    SINGLE_TABLE
        .iter()
        .map(|&(name, f)| (name.to_ascii_uppercase(), f))
        .collect()
});

static DOUBLES: LazyLock<BTreeMap<String, DoubleFn>> = LazyLock::new(|| {
    DOUBLE_TABLE
        .iter()
        .map(|&(name, f)| (name.to_ascii_uppercase(), f))
        .collect()
});

static NAMES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    SINGLE_TABLE
        .iter()
        .map(|&(name, _)| name)
        .chain(DOUBLE_TABLE.iter().map(|&(name, _)| name))
        .collect()
});

/// Looks up a one-argument function by case-insensitive name
pub fn single(name: &str) -> Option<SingleFn> {
    SINGLES.get(&name.to_ascii_uppercase()).copied()
}

/// Looks up a two-argument function by case-insensitive name
pub fn double(name: &str) -> Option<DoubleFn> {
    DOUBLES.get(&name.to_ascii_uppercase()).copied()
}

/// All registered names in their canonical spelling
pub fn names() -> &'static [&'static str] {
    &NAMES
}

/// Inverse error function
///
/// A closed-form first guess refined with Newton steps against [`libm::erf`];
/// accurate to a few ulps over the open interval, with the conventional
/// infinities at ±1 and NaN outside.
fn erf_inv(x: f64) -> f64 {
    use std::f64::consts::PI;

    if x.is_nan() || !(-1.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 1.0 {
        return f64::INFINITY;
    }
    if x == -1.0 {
        return f64::NEG_INFINITY;
    }
    if x == 0.0 {
        return x;
    }

    // Winitzki's approximation as the starting point
    const A: f64 = 0.147;
    let ln1mx2 = (1.0 - x * x).ln();
    let t = 2.0 / (PI * A) + ln1mx2 / 2.0;
    let mut r = ((t * t - ln1mx2 / A).sqrt() - t).sqrt().copysign(x);

    // Newton: f(r) = erf(r) - x, f'(r) = 2/sqrt(pi) * exp(-r^2)
    for _ in 0..3 {
        let err = libm::erf(r) - x;
        r -= err * PI.sqrt() / 2.0 * (r * r).exp();
    }
    r
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lookup_is_case_insensitive() {
        for name in ["Expm1", "EXPM1", "expm1"] {
            let f = single(name).unwrap();
            assert_relative_eq!(f(1.0), f64::exp(1.0) - 1.0, max_relative = 1e-12);
        }
        assert!(double("atan2").is_some());
        assert!(single("NoSuchFunction").is_none());
        assert!(double("NoSuchFunction").is_none());
    }

    #[test]
    fn single_and_double_names_do_not_overlap() {
        for &(name, _) in DOUBLE_TABLE {
            assert!(single(name).is_none(), "{name} registered twice");
        }
    }

    #[test]
    fn names_keep_canonical_spelling() {
        let names = names();
        assert_eq!(names.len(), SINGLE_TABLE.len() + DOUBLE_TABLE.len());
        for expected in ["Expm1", "RoundToEven", "Atan2", "Nextafter", "Y1"] {
            assert!(names.contains(&expected), "{expected} missing");
        }
    }

    #[test]
    fn erf_inv_inverts_erf() {
        for x in [-2.5, -1.0, -0.3, 0.0, 1e-6, 0.5, 1.9] {
            let y = libm::erf(x);
            assert_relative_eq!(erf_inv(y), x, max_relative = 1e-9);
        }
        assert_eq!(erf_inv(1.0), f64::INFINITY);
        assert_eq!(erf_inv(-1.0), f64::NEG_INFINITY);
        assert!(erf_inv(1.5).is_nan());
    }

    #[test]
    fn erfc_inv_mirrors_erf_inv() {
        let f = single("Erfcinv").unwrap();
        assert_relative_eq!(f(0.5), erf_inv(0.5), max_relative = 1e-12);
        assert_eq!(f(0.0), f64::INFINITY);
        assert_eq!(f(2.0), f64::NEG_INFINITY);
    }

    #[test]
    fn integer_flavoured_entries() {
        let inf = single("Inf").unwrap();
        assert_eq!(inf(1.0), f64::INFINITY);
        assert_eq!(inf(-1.0), f64::NEG_INFINITY);

        let pow10 = single("Pow10").unwrap();
        assert_eq!(pow10(3.0), 1000.0);
        assert_eq!(pow10(3.9), 1000.0);

        let ldexp = double("Ldexp").unwrap();
        assert_eq!(ldexp(0.75, 4.0), 12.0);

        let jn = double("Jn").unwrap();
        assert_relative_eq!(jn(0.0, 1.25), libm::j0(1.25), max_relative = 1e-12);

        let round_even = single("RoundToEven").unwrap();
        assert_eq!(round_even(2.5), 2.0);
        assert_eq!(round_even(3.5), 4.0);
    }
}
