//! 256-bit word arithmetic
//!
//! Every operation is total and wraps modulo 2^256. Division and modulo
//! by zero yield zero. Signed operations reinterpret words as 256-bit
//! two's complement; signed division truncates toward zero and the
//! remainder takes the sign of the dividend.

use ember_primitives::{U256, U512};

/// The sign bit of a 256-bit two's-complement word
const SIGN_BIT: usize = 255;

/// Wrapping addition
pub fn add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

/// Wrapping subtraction
pub fn sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// Wrapping multiplication
pub fn mul(a: U256, b: U256) -> U256 {
    a.overflowing_mul(b).0
}

/// Unsigned division; division by zero yields zero
pub fn div(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a / b
    }
}

/// Unsigned remainder; modulo by zero yields zero
pub fn rem(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a % b
    }
}

fn is_negative(value: U256) -> bool {
    value.bit(SIGN_BIT)
}

/// Two's-complement negation
fn neg(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

fn abs(value: U256) -> U256 {
    if is_negative(value) {
        neg(value)
    } else {
        value
    }
}

/// Signed division, truncating toward zero. Division by zero yields zero;
/// MIN_INT / -1 yields MIN_INT (the positive counterpart does not exist).
pub fn sdiv(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let min = U256::one() << SIGN_BIT;
    if a == min && b == U256::MAX {
        return min;
    }
    let quotient = abs(a) / abs(b);
    if is_negative(a) != is_negative(b) {
        neg(quotient)
    } else {
        quotient
    }
}

/// Signed remainder; the sign follows the dividend. Modulo by zero
/// yields zero.
pub fn srem(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let remainder = abs(a) % abs(b);
    if is_negative(a) {
        neg(remainder)
    } else {
        remainder
    }
}

/// (a + b) mod m, computed without intermediate overflow. m = 0 yields
/// zero.
pub fn addmod(a: U256, b: U256, m: U256) -> U256 {
    if m.is_zero() {
        return U256::zero();
    }
    let sum = U512::from(a) + U512::from(b);
    low_word(sum % U512::from(m))
}

/// (a * b) mod m over the full 512-bit product. m = 0 yields zero.
pub fn mulmod(a: U256, b: U256, m: U256) -> U256 {
    if m.is_zero() {
        return U256::zero();
    }
    low_word(a.full_mul(b) % U512::from(m))
}

/// base^exponent mod 2^256
pub fn exp(base: U256, exponent: U256) -> U256 {
    base.overflowing_pow(exponent).0
}

/// Sign-extend `value` from byte width `bits + 1`. For bits <= 31 the bit
/// at position bits*8+7 is propagated through all higher bits; for
/// bits >= 32 the value is unchanged.
pub fn signextend(bits: U256, value: U256) -> U256 {
    if bits >= U256::from(32u64) {
        return value;
    }
    let bit_index = bits.low_u64() as usize * 8 + 7;
    if bit_index >= SIGN_BIT {
        return value;
    }
    if value.bit(bit_index) {
        value | (U256::MAX << (bit_index + 1))
    } else {
        value & ((U256::one() << (bit_index + 1)) - U256::one())
    }
}

/// The pos-th most significant byte of `value`, or zero for pos >= 32
pub fn byte(pos: U256, value: U256) -> U256 {
    if pos >= U256::from(32u64) {
        return U256::zero();
    }
    let index = 31 - pos.low_u64() as usize;
    U256::from(value.byte(index))
}

/// Signed less-than
pub fn slt(a: U256, b: U256) -> bool {
    match (is_negative(a), is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        _ => a < b,
    }
}

/// Signed greater-than
pub fn sgt(a: U256, b: U256) -> bool {
    slt(b, a)
}

fn low_word(value: U512) -> U256 {
    // The callers reduce modulo a U256 first, so the high limbs are zero.
    let mut limbs = [0u64; 4];
    limbs.copy_from_slice(&value.0[..4]);
    U256(limbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(v: u64) -> U256 {
        U256::from(v)
    }

    /// -v as a 256-bit two's-complement word
    fn negative(v: u64) -> U256 {
        neg(U256::from(v))
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(add(U256::MAX, U256::one()), U256::zero());
        assert_eq!(add(w(2), w(3)), w(5));
    }

    #[test]
    fn test_sub_wraps() {
        // 2 - 5 = 2^256 - 3
        assert_eq!(sub(w(2), w(5)), negative(3));
        assert_eq!(sub(U256::zero(), U256::one()), U256::MAX);
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(mul(w(6), w(7)), w(42));
        // MAX * 2 = 2^256 - 2
        assert_eq!(mul(U256::MAX, w(2)), negative(2));
    }

    #[test]
    fn test_div_by_zero_is_zero() {
        assert_eq!(div(w(10), U256::zero()), U256::zero());
        assert_eq!(rem(w(10), U256::zero()), U256::zero());
        assert_eq!(sdiv(w(10), U256::zero()), U256::zero());
        assert_eq!(srem(w(10), U256::zero()), U256::zero());
    }

    #[test]
    fn test_sdiv_signs() {
        assert_eq!(sdiv(w(10), w(3)), w(3));
        assert_eq!(sdiv(negative(10), w(3)), negative(3));
        assert_eq!(sdiv(w(10), negative(3)), negative(3));
        assert_eq!(sdiv(negative(10), negative(3)), w(3));
    }

    #[test]
    fn test_sdiv_min_by_minus_one() {
        let min = U256::one() << 255;
        assert_eq!(sdiv(min, U256::MAX), min);
    }

    #[test]
    fn test_srem_sign_follows_dividend() {
        assert_eq!(srem(w(10), w(3)), w(1));
        assert_eq!(srem(negative(10), w(3)), negative(1));
        assert_eq!(srem(w(10), negative(3)), w(1));
        assert_eq!(srem(negative(10), negative(3)), negative(1));
    }

    #[test]
    fn test_addmod() {
        assert_eq!(addmod(w(10), w(10), w(8)), w(4));
        // Intermediate sum exceeds 2^256
        assert_eq!(addmod(U256::MAX, U256::MAX, w(7)), (U256::MAX % w(7)) * w(2) % w(7));
        assert_eq!(addmod(w(1), w(2), U256::zero()), U256::zero());
    }

    #[test]
    fn test_mulmod() {
        assert_eq!(mulmod(w(10), w(10), w(8)), w(4));
        // Full 512-bit product before reduction
        assert_eq!(mulmod(U256::MAX, U256::MAX, U256::MAX - w(1)), w(1));
        assert_eq!(mulmod(w(3), w(4), U256::zero()), U256::zero());
    }

    #[test]
    fn test_exp() {
        assert_eq!(exp(w(2), w(10)), w(1024));
        assert_eq!(exp(w(0), w(0)), w(1));
        assert_eq!(exp(w(10), w(0)), w(1));
        // 2^256 wraps to zero
        assert_eq!(exp(w(2), w(256)), U256::zero());
    }

    #[test]
    fn test_signextend_low_byte() {
        // Extend 0xff from one byte: becomes -1
        assert_eq!(signextend(w(0), w(0xff)), U256::MAX);
        // 0x7f stays positive
        assert_eq!(signextend(w(0), w(0x7f)), w(0x7f));
        // High garbage above the kept width is masked off
        assert_eq!(signextend(w(0), w(0x17f)), w(0x7f));
    }

    #[test]
    fn test_signextend_wide_is_identity() {
        let value = U256::from_big_endian(&[0xAB; 32]);
        assert_eq!(signextend(w(32), value), value);
        assert_eq!(signextend(U256::MAX, value), value);
        assert_eq!(signextend(w(31), value), value);
    }

    #[test]
    fn test_byte() {
        let value = U256::from_big_endian(&{
            let mut buf = [0u8; 32];
            buf[0] = 0xAA;
            buf[31] = 0xBB;
            buf
        });
        assert_eq!(byte(w(0), value), w(0xAA));
        assert_eq!(byte(w(31), value), w(0xBB));
        assert_eq!(byte(w(32), value), U256::zero());
        assert_eq!(byte(U256::MAX, value), U256::zero());
    }

    #[test]
    fn test_signed_comparison() {
        assert!(slt(negative(1), w(0)));
        assert!(slt(negative(2), negative(1)));
        assert!(!slt(w(1), negative(1)));
        assert!(sgt(w(0), negative(1)));
        assert!(!sgt(w(3), w(3)));
    }

    #[test]
    fn test_bitwise_identities() {
        let x = U256::from_big_endian(&[0x5C; 32]);
        assert_eq!(!(!x), x);
        assert_eq!(x ^ x, U256::zero());
        assert_eq!(x & U256::MAX, x);
    }
}
