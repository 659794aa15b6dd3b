//! Properties of the operations across functions.

use crate::defs::Error;
use crate::defs::RoundingMode;
use crate::ops::scalar::dot_product;
use crate::real::Real;
use rand::random;

// Asserts that |a - b| <= 2^(e - p + k), where e is the exponent of b, or 0 if `abs` is set.
fn assert_close(a: &Real, b: &Real, p: usize, k: isize, abs: bool) {
    let d = a.sub(b, p + 128).unwrap();
    if d.is_zero() {
        return;
    }
    let e = if abs || b.is_zero() {
        0
    } else {
        b.exponent().unwrap() as isize
    };
    let de = d.exponent().unwrap() as isize;
    assert!(de <= e - p as isize + k, "{} vs {}, p = {}", a, b, p);
}

fn random_f64(scale: f64) -> f64 {
    (random::<f64>() - 0.5) * 2.0 * scale
}

fn random_prec() -> usize {
    random::<usize>() % 500 + 1
}

#[test]
fn test_add_commutative() {
    for _ in 0..1000 {
        let p = random_prec();
        let a = Real::from_f64(random_f64(1.0e10), random_prec()).unwrap();
        let b = Real::from_f64(random_f64(1.0), random_prec()).unwrap();

        let s1 = a.add(&b, p).unwrap();
        let s2 = b.add(&a, p).unwrap();

        assert_eq!(s1.precision(), p);
        assert_eq!(s1, s2);
        assert_eq!(s1.as_big_float(), s2.as_big_float());
    }
}

#[test]
fn test_sin_cos_identity() {
    for _ in 0..100 {
        let p = random_prec() + 32;
        let x = Real::from_f64(random_f64(100.0), p).unwrap();

        let s = x.sin(p).unwrap();
        let c = x.cos(p).unwrap();
        let s2 = s.mul(&s, p + 64).unwrap();
        let c2 = c.mul(&c, p + 64).unwrap();
        let one = s2.add(&c2, p + 64).unwrap();

        assert_close(&one, &Real::one(p).unwrap(), p, 3, false);
    }

    // at multiples of 2π
    for k in [1, 2, 7, 1000, -3] {
        let p = 128;
        let x = Real::two_pi(p)
            .unwrap()
            .mul(&Real::from_i64(k, 64).unwrap(), p)
            .unwrap();

        let (s, c) = x.sin_cos(p).unwrap();
        let one = s.mul(&s, 256).unwrap().add(&c.mul(&c, 256).unwrap(), 256).unwrap();
        assert_close(&one, &Real::one(p).unwrap(), p, 3, false);
        assert!(s.exponent().unwrap() < -100);
    }
}

#[test]
fn test_sqrt_square() {
    for _ in 0..500 {
        let p = random_prec() + 8;
        let x = Real::from_f64(random_f64(1.0e100).abs(), p).unwrap();
        if x.is_zero() {
            continue;
        }

        let s = x.sqrt(p).unwrap();
        let s2 = s.mul(&s, p).unwrap();

        assert_close(&s2, &x, p, 2, false);
    }

    let x = Real::from_f64(-1.0, 64).unwrap();
    assert_eq!(x.sqrt(64).unwrap_err(), Error::DomainError);
}

#[test]
fn test_ln_exp() {
    for _ in 0..300 {
        let p = random_prec() + 8;
        let x = Real::from_f64(random_f64(50.0), p).unwrap();

        let ex = x.exp(p).unwrap();
        let l = ex.ln(p).unwrap();

        // the rounding error of exp(x) becomes an absolute error of ln.
        assert_close(&l, &x, p, 7, true);
    }

    assert_eq!(Real::zero(64).unwrap().ln(64).unwrap_err(), Error::DomainError);
    assert_eq!(
        Real::from_f64(-0.5, 64).unwrap().ln(64).unwrap_err(),
        Error::DomainError
    );
}

#[test]
fn test_exp_ln() {
    for _ in 0..300 {
        let p = random_prec() + 8;
        let x = Real::from_f64(random_f64(1.0e20).abs(), p).unwrap();
        if x.is_zero() {
            continue;
        }

        let l = x.ln(p).unwrap();
        let ex = l.exp(p).unwrap();

        // the rounding error of ln(x) is multiplied by |ln(x)| <= 2^6.
        assert_close(&ex, &x, p, 8, false);
    }
}

#[test]
fn test_pow_consistency() {
    for _ in 0..200 {
        let p = random_prec() + 8;
        let b = Real::from_f64(random_f64(100.0).abs() + 0.01, p).unwrap();
        let n = random::<i64>() % 20;
        let y = Real::from_i64(n, 64).unwrap();

        // integer power agrees with exp(y*ln(b)) computed at a wider precision
        let v1 = b.pow(&y, p).unwrap();
        let l = b.ln(p + 64).unwrap();
        let v2 = l.mul(&y, p + 64).unwrap().exp(p + 64).unwrap();

        assert_close(&v1, &v2, p, 1, false);
    }
}

#[test]
fn test_higher_precision_is_more_accurate() {
    for _ in 0..100 {
        let x = Real::from_f64(random_f64(10.0), 64).unwrap();

        let reference = [x.sin(1024).unwrap(), x.exp(1024).unwrap()];
        let lo = [x.sin(64).unwrap(), x.exp(64).unwrap()];
        let hi = [x.sin(256).unwrap(), x.exp(256).unwrap()];

        for ((r, l), h) in reference.iter().zip(lo.iter()).zip(hi.iter()) {
            let d_lo = l.sub(r, 1024).unwrap().abs();
            let d_hi = h.sub(r, 1024).unwrap().abs();
            assert!(d_hi <= d_lo);
        }
    }
}

#[test]
fn test_results_in_requested_precision() {
    let x = Real::from_f64(0.75, 200).unwrap();
    let y = Real::from_f64(1.25, 30).unwrap();

    for p in [1, 13, 64, 65, 300] {
        assert_eq!(x.sin(p).unwrap().precision(), p);
        assert_eq!(x.cos(p).unwrap().precision(), p);
        assert_eq!(x.tan(p).unwrap().precision(), p);
        assert_eq!(x.exp(p).unwrap().precision(), p);
        assert_eq!(x.ln(p).unwrap().precision(), p);
        assert_eq!(x.sqrt(p).unwrap().precision(), p);
        assert_eq!(x.pow(&y, p).unwrap().precision(), p);

        // the result fits in p bits
        let s = x.sin(p).unwrap();
        assert_eq!(s.round(p, RoundingMode::ToZero).unwrap(), s);
    }
}

#[test]
fn test_scalar_utilities() {
    let two = Real::from_u64(2, 64).unwrap();
    let three = Real::from_u64(3, 64).unwrap();
    let four = Real::from_u64(4, 64).unwrap();
    assert_eq!(two.fma(&three, &four, 64).unwrap(), Real::from_u64(10, 64).unwrap());

    assert!(dot_product(&[], &[], 64).unwrap().is_zero());
    assert_eq!(
        dot_product(&[two.clone()], &[], 64).unwrap_err(),
        Error::LengthMismatch
    );

    let x = Real::from_f64(1.5, 64).unwrap();
    let expected = [
        (RoundingMode::ToEven, 2.0),
        (RoundingMode::ToZero, 1.0),
        (RoundingMode::Up, 2.0),
        (RoundingMode::Down, 1.0),
    ];
    for (rm, v) in expected {
        assert_eq!(x.round_to_int(64, rm).unwrap().to_f64(), v);
    }
}

#[test]
fn test_copy_is_independent() {
    let x = Real::from_f64(1.5, 64).unwrap();
    let mut y = x.clone();
    y = y.add(&Real::one(64).unwrap(), 64).unwrap();
    assert_eq!(x.to_f64(), 1.5);
    assert_eq!(y.to_f64(), 2.5);
}
