// src/noyau/lecture.rs
//
// Lecture numérique en virgule fixe : entiers “scalés” (×10^w).
// Le moteur garde des rationnels exacts tant qu’il peut ; tout ce qui ne l’est
// pas (π, e, sin, ln, √ irrationnelle, ...) passe par ici puis revient en
// rationnel de dénominateur 10^w.
//
// Toutes les fonctions rendent l’échelle demandée. Les séries ajoutent leurs
// propres chiffres de garde ; ceux du moteur restent l’affaire de l’appelant.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/* ------------------------ Conversions ------------------------ */

/// Chiffres de garde propres aux séries (troncatures cumulées).
const GARDE_INTERNE: usize = 10;

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// r -> entier “scalé” = round(r * 10^w)
pub fn vers_fixe(r: &BigRational, w: usize) -> BigInt {
    (r * BigRational::from_integer(pow10(w)))
        .round()
        .to_integer()
}

/// entier “scalé” -> rationnel exact v / 10^w
pub fn depuis_fixe(v: BigInt, w: usize) -> BigRational {
    BigRational::new(v, pow10(w))
}

/// Division entière arrondie vers -∞ (b > 0).
fn div_floor(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    if (a - &q * b).is_negative() {
        q - 1
    } else {
        q
    }
}

/* ------------------------ Caches par échelle ------------------------ */

type Cache = OnceLock<Mutex<HashMap<usize, BigInt>>>;

static PI_CACHE: Cache = OnceLock::new();
static LN2_CACHE: Cache = OnceLock::new();
static LN10_CACHE: Cache = OnceLock::new();

fn en_cache(cache: &'static Cache, w: usize, calcul: impl FnOnce(usize) -> BigInt) -> BigInt {
    let m = cache.get_or_init(|| Mutex::new(HashMap::new()));
    // un verrou empoisonné ne contient que des valeurs complètes
    let mut guard = m.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(v) = guard.get(&w) {
        return v.clone();
    }

    let v = calcul(w);
    guard.insert(w, v.clone());
    v
}

/* ------------------------ π (Machin) ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q;
    let mut sum = BigInt::zero();

    loop {
        let d = &q_pow * BigInt::from(2 * k + 1);

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q2;
        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    // extra pour amortir les erreurs de troncature
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;

    // retire les digits extra
    pi / pow10(extra)
}

/// π × 10^w
pub fn pi_fixe(w: usize) -> BigInt {
    en_cache(&PI_CACHE, w, pi_scaled_compute)
}

/* ------------------------ Logarithmes ------------------------ */

/// atanh(z) pour |z| ≤ 1/3, z et résultat en virgule fixe (×10^w).
fn atanh_fixe(z: &BigInt, w: usize) -> BigInt {
    let un = pow10(w);
    let z2 = z * z / &un;

    let mut puissance = z.clone();
    let mut somme = BigInt::zero();
    let mut n: u64 = 1;

    while !puissance.is_zero() {
        somme += &puissance / BigInt::from(n);
        puissance = &puissance * &z2 / &un;
        n += 2;
    }

    somme
}

/// ln 2 = 2·atanh(1/3)
fn ln2_fixe(w: usize) -> BigInt {
    en_cache(&LN2_CACHE, w, |w| {
        let wg = w + GARDE_INTERNE;
        let tiers = pow10(wg) / 3;
        atanh_fixe(&tiers, wg) * 2 / pow10(GARDE_INTERNE)
    })
}

/// ln 10 × 10^w
pub fn ln10_fixe(w: usize) -> BigInt {
    en_cache(&LN10_CACHE, w, |w| {
        ln_fixe(&BigRational::from_integer(BigInt::from(10)), w)
    })
}

/// ln(x) × 10^w, pour x > 0 (contrôlé par l’appelant).
///
/// x = y·2^k avec y ∈ (1/2, 2), puis ln y = 2·atanh((y-1)/(y+1)).
pub fn ln_fixe(x: &BigRational, w: usize) -> BigInt {
    let k = x.numer().bits() as i64 - x.denom().bits() as i64;
    let deux_k = BigRational::from_integer(BigInt::one() << k.unsigned_abs() as usize);

    let y = if k >= 0 { x / &deux_k } else { x * &deux_k };

    let un = BigRational::one();
    let z = (&y - &un) / (&y + &un);

    let wg = w + GARDE_INTERNE;
    let ln = atanh_fixe(&vers_fixe(&z, wg), wg) * 2 + ln2_fixe(wg) * BigInt::from(k);
    ln / pow10(GARDE_INTERNE)
}

/* ------------------------ Exponentielle ------------------------ */

/// exp(x) × 10^w pour x ≥ 0.
///
/// Réduction x/2^k ≤ 1/2, Taylor, puis k élévations au carré.
/// Chaque carré double l’erreur relative : chiffres de garde en proportion.
fn exp_fixe_positif(x: &BigRational, w: usize) -> BigInt {
    let k = (x.numer().bits() as i64 - x.denom().bits() as i64 + 2).max(0) as usize;
    let w2 = w + k / 3 + GARDE_INTERNE;
    let un = pow10(w2);

    let y = vers_fixe(&(x / BigRational::from_integer(BigInt::one() << k)), w2);

    let mut somme = un.clone();
    let mut terme = un.clone();
    let mut n: u64 = 1;
    loop {
        terme = &terme * &y / (&un * BigInt::from(n));
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    for _ in 0..k {
        somme = &somme * &somme / &un;
    }

    somme / pow10(w2 - w)
}

/// exp(x) en rationnel ; pour x < 0, inverse exact de exp(|x|)
/// (garde les très petites valeurs au lieu de les tronquer à 0).
pub fn exp_rat(x: &BigRational, w: usize) -> BigRational {
    let e = exp_fixe_positif(&x.abs(), w);
    if x.is_negative() {
        // e ≥ 10^w : jamais nul
        BigRational::new(pow10(w), e)
    } else {
        depuis_fixe(e, w)
    }
}

/* ------------------------ Trigonométrie ------------------------ */

/// (sin x, cos x) × 10^w.
///
/// Réduction modulo 2π dans (-π, π] à l’échelle w + chiffres entiers de x,
/// puis séries de Taylor.
pub fn sin_cos_fixe(x: &BigRational, w: usize) -> (BigInt, BigInt) {
    let chiffres_entiers = x.abs().to_integer().to_string().len();
    let w2 = w + chiffres_entiers + GARDE_INTERNE;
    let un = pow10(w2);

    let pi = pi_fixe(w2);
    let deux_pi = &pi * 2;

    let xs = vers_fixe(x, w2);
    let mut r = &xs - div_floor(&xs, &deux_pi) * &deux_pi;
    if r > pi {
        r -= &deux_pi;
    }

    let r2 = &r * &r / &un;

    let serie = |depart: BigInt, mut n: u64| {
        let mut terme = depart;
        let mut somme = BigInt::zero();
        while !terme.is_zero() {
            somme += &terme;
            terme = -(&terme * &r2) / (&un * BigInt::from((n + 1) * (n + 2)));
            n += 2;
        }
        somme
    };

    let sin = serie(r.clone(), 1);
    let cos = serie(un.clone(), 0);

    let reduction = pow10(w2 - w);
    (sin / &reduction, cos / &reduction)
}

/* ------------------------ √ ------------------------ */

/// sqrt(r) en entier scalé : floor( sqrt(r) * 10^digits )
/// r = n/d
fn rational_sqrt_scaled(r: &BigRational, digits: usize) -> BigInt {
    let n = r.numer().clone();
    let d = r.denom().clone();

    if n.is_zero() {
        return BigInt::zero();
    }

    // On veut y ≈ sqrt(n/d) * 10^digits
    // => y^2 ≈ (n * 10^(2*digits)) / d
    let target = n * pow10(2 * digits);

    // point de départ
    let mut y = pow10(digits);

    // Newton sur y pour sqrt(target/d)
    loop {
        let q = &target / (&d * &y);
        let y_next = (&y + q) >> 1;

        if y_next == y || y_next == (&y - 1u32) {
            // ajustement final (floor)
            let mut y_adj = y_next;

            while (&y_adj + 1u32) * (&y_adj + 1u32) * &d <= target {
                y_adj += 1u32;
            }
            while &y_adj * &y_adj * &d > target {
                y_adj -= 1u32;
            }
            return y_adj;
        }

        y = y_next;
    }
}

/// sqrt(r) pour r ≥ 0 : exacte si numérateur et dénominateur sont des carrés,
/// sinon approchée à 10^-w.
pub fn sqrt_rat(r: &BigRational, w: usize) -> BigRational {
    let (n, d) = (r.numer(), r.denom());
    let (rn, rd) = (n.sqrt(), d.sqrt());

    if &(&rn * &rn) == n && &(&rd * &rd) == d {
        return BigRational::new(rn, rd);
    }

    depuis_fixe(rational_sqrt_scaled(r, w), w)
}

/* ------------------------ Puissance entière exacte ------------------------ */

pub fn rational_pow_int(base: BigRational, exp: i64) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    if exp < 0 {
        let pos = rational_pow_int(base, exp.checked_neg().unwrap_or(i64::MAX));
        return pos.recip();
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base;

    while e > 0 {
        if (e & 1) == 1 {
            acc *= b.clone();
        }
        e >>= 1;
        if e > 0 {
            b *= b.clone();
        }
    }
    acc
}
