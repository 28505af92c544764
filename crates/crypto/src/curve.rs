//! Typed wrappers over the BLST point, scalar and pairing primitives.
//!
//! Each group gets its own wrapper so that G1, G2 and GT values can never be
//! mixed up:
//! - [`G1Affine`]: identities and epoch secret keys
//! - [`G2Affine`] / [`G2Projective`]: eon keys and the c1 commitment
//! - [`Gt`]: Miller loop outputs and their powers
//!
//! All `unsafe` code of the crate lives here, limited to the point and scalar
//! calls BLST only exposes through its C bindings. Every such call writes into
//! a locally owned output value, so no aliasing reaches the C side. GT
//! arithmetic uses the safe `blst_fp12` methods.

use std::fmt;

use blst::{
    blst_bendian_from_scalar, blst_fp12, blst_hash_to_g1, blst_lendian_from_scalar, blst_p1,
    blst_p1_affine, blst_p1_affine_compress, blst_p1_affine_generator, blst_p1_affine_in_g1,
    blst_p1_deserialize, blst_p1_to_affine, blst_p1_uncompress, blst_p2, blst_p2_affine,
    blst_p2_affine_compress, blst_p2_affine_generator, blst_p2_affine_in_g2, blst_p2_compress,
    blst_p2_deserialize, blst_p2_generator, blst_p2_mult, blst_p2_to_affine, blst_p2_uncompress,
    blst_scalar, blst_scalar_from_be_bytes, BLST_ERROR,
};

use crate::constants::{
    G1_COMPRESSED_SIZE, G1_UNCOMPRESSED_SIZE, G2_COMPRESSED_SIZE, G2_UNCOMPRESSED_SIZE, GT_SIZE,
    SCALAR_BITS,
};
use crate::error::{Result, ShutterError};

// =========================
// SCALARS
// =========================

/// An element of the BLS12-381 scalar field, always below the group order.
#[derive(Clone, Default)]
pub struct Scalar {
    inner: blst_scalar,
}

impl Scalar {
    /// Creates a scalar from a 32-byte big-endian value, reduced modulo the
    /// group order.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Self {
        let mut inner = blst_scalar::default();
        unsafe {
            blst_scalar_from_be_bytes(&mut inner, bytes.as_ptr(), bytes.len());
        }
        Self { inner }
    }

    /// Big-endian encoding.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        unsafe {
            blst_bendian_from_scalar(out.as_mut_ptr(), &self.inner);
        }
        out
    }

    /// Little-endian encoding, as consumed by BLST point multiplication.
    pub fn to_bytes_le(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        unsafe {
            blst_lendian_from_scalar(out.as_mut_ptr(), &self.inner);
        }
        out
    }

    /// Number of significant bits; zero for the zero scalar.
    pub fn bit_len(&self) -> usize {
        let le = self.to_bytes_le();
        match le.iter().rposition(|byte| *byte != 0) {
            Some(top) => top * 8 + (8 - le[top].leading_zeros() as usize),
            None => 0,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scalar(<redacted>)")
    }
}

// =========================
// G1
// =========================

/// Affine point in G1.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct G1Affine(blst_p1_affine);

impl G1Affine {
    /// The standard G1 generator.
    pub fn generator() -> Self {
        Self(unsafe { *blst_p1_affine_generator() })
    }

    /// Hash a message to G1 (RFC 9380 `_XMD:SHA-256_SSWU_RO_`) under `dst`.
    pub fn hash_to_curve(message: &[u8], dst: &[u8]) -> Self {
        let mut point = blst_p1::default();
        let mut affine = blst_p1_affine::default();
        unsafe {
            blst_hash_to_g1(
                &mut point,
                message.as_ptr(),
                message.len(),
                dst.as_ptr(),
                dst.len(),
                std::ptr::null(),
                0,
            );
            blst_p1_to_affine(&mut affine, &point);
        }
        Self(affine)
    }

    /// Parse a compressed (48-byte) or uncompressed (96-byte) G1 point.
    ///
    /// The point must be on the curve and in the prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut affine = blst_p1_affine::default();
        let res = match bytes.len() {
            G1_COMPRESSED_SIZE => unsafe { blst_p1_uncompress(&mut affine, bytes.as_ptr()) },
            G1_UNCOMPRESSED_SIZE => unsafe { blst_p1_deserialize(&mut affine, bytes.as_ptr()) },
            len => {
                return Err(ShutterError::InvalidG1Point(format!(
                    "expected {G1_COMPRESSED_SIZE} or {G1_UNCOMPRESSED_SIZE} bytes, got {len}"
                )))
            }
        };
        if res != BLST_ERROR::BLST_SUCCESS {
            return Err(ShutterError::InvalidG1Point(format!("{res:?}")));
        }
        if !unsafe { blst_p1_affine_in_g1(&affine) } {
            return Err(ShutterError::InvalidG1Point("point is not in G1".into()));
        }
        Ok(Self(affine))
    }

    /// Compressed 48-byte encoding.
    pub fn to_compressed(&self) -> [u8; G1_COMPRESSED_SIZE] {
        let mut out = [0u8; G1_COMPRESSED_SIZE];
        unsafe {
            blst_p1_affine_compress(out.as_mut_ptr(), &self.0);
        }
        out
    }
}

impl fmt::Debug for G1Affine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G1Affine({})", hex::encode(self.to_compressed()))
    }
}

// =========================
// G2
// =========================

/// Affine point in G2.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct G2Affine(blst_p2_affine);

impl G2Affine {
    /// The standard G2 generator.
    pub fn generator() -> Self {
        Self(unsafe { *blst_p2_affine_generator() })
    }

    /// Parse a compressed (96-byte) or uncompressed (192-byte) G2 point.
    ///
    /// The point must be on the curve and in the prime-order subgroup.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut affine = blst_p2_affine::default();
        let res = match bytes.len() {
            G2_COMPRESSED_SIZE => unsafe { blst_p2_uncompress(&mut affine, bytes.as_ptr()) },
            G2_UNCOMPRESSED_SIZE => unsafe { blst_p2_deserialize(&mut affine, bytes.as_ptr()) },
            len => {
                return Err(ShutterError::InvalidG2Point(format!(
                    "expected {G2_COMPRESSED_SIZE} or {G2_UNCOMPRESSED_SIZE} bytes, got {len}"
                )))
            }
        };
        if res != BLST_ERROR::BLST_SUCCESS {
            return Err(ShutterError::InvalidG2Point(format!("{res:?}")));
        }
        if !unsafe { blst_p2_affine_in_g2(&affine) } {
            return Err(ShutterError::InvalidG2Point("point is not in G2".into()));
        }
        Ok(Self(affine))
    }

    /// Compressed 96-byte encoding.
    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_SIZE] {
        let mut out = [0u8; G2_COMPRESSED_SIZE];
        unsafe {
            blst_p2_affine_compress(out.as_mut_ptr(), &self.0);
        }
        out
    }
}

impl fmt::Debug for G2Affine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G2Affine({})", hex::encode(self.to_compressed()))
    }
}

/// Projective point in G2, the output of scalar multiplication.
#[derive(Clone, Copy, Default)]
pub struct G2Projective(blst_p2);

impl G2Projective {
    /// Compute `scalar · G2`.
    pub fn mul_generator(scalar: &Scalar) -> Self {
        let mut point = blst_p2::default();
        unsafe {
            blst_p2_mult(
                &mut point,
                blst_p2_generator(),
                scalar.to_bytes_le().as_ptr(),
                SCALAR_BITS,
            );
        }
        Self(point)
    }

    pub fn to_affine(&self) -> G2Affine {
        let mut affine = blst_p2_affine::default();
        unsafe {
            blst_p2_to_affine(&mut affine, &self.0);
        }
        G2Affine(affine)
    }

    /// Compressed 96-byte encoding.
    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_SIZE] {
        let mut out = [0u8; G2_COMPRESSED_SIZE];
        unsafe {
            blst_p2_compress(out.as_mut_ptr(), &self.0);
        }
        out
    }
}

// =========================
// GT
// =========================

/// Element of the pairing target group (an Fp12 value).
///
/// Miller loop outputs are only meaningful up to the final exponentiation;
/// [`Gt::final_exp`] maps them to the canonical GT element.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Gt(blst_fp12);

impl Gt {
    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(blst_fp12::default())
    }

    /// Miller loop of `(p, q)`, without the final exponentiation.
    pub fn miller_loop(p: &G1Affine, q: &G2Affine) -> Self {
        Self(blst_fp12::miller_loop(&q.0, &p.0))
    }

    /// Full pairing `e(p, q)`.
    pub fn pairing(p: &G1Affine, q: &G2Affine) -> Self {
        Self::miller_loop(p, q).final_exp()
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    pub fn square(&self) -> Self {
        Self(self.0 * self.0)
    }

    /// Raise to `exponent` with right-to-left square-and-multiply.
    ///
    /// Scans the exponent from its least significant bit: a set bit multiplies
    /// the current base into the accumulator, the base is squared after every
    /// bit, and the loop stops once no set bits remain.
    pub fn pow(&self, exponent: &Scalar) -> Self {
        let bits = exponent.to_bytes_le();
        let mut acc = Self::one();
        let mut base = *self;

        for i in 0..exponent.bit_len() {
            if (bits[i / 8] >> (i % 8)) & 1 == 1 {
                acc = acc.mul(&base);
            }
            base = base.square();
        }

        acc
    }

    pub fn final_exp(&self) -> Self {
        Self(self.0.final_exp())
    }

    pub fn is_one(&self) -> bool {
        self.0 == blst_fp12::default()
    }

    /// Whether the element lies in the order-r subgroup of Fp12*.
    pub fn in_group(&self) -> bool {
        self.0.in_group()
    }

    /// Big-endian serialization of all twelve Fp coordinates.
    pub fn to_bendian(&self) -> [u8; GT_SIZE] {
        self.0.to_bendian()
    }
}

impl fmt::Debug for Gt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gt(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GROUP_ORDER;

    fn scalar_from_u64(value: u64) -> Scalar {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Scalar::from_bytes_be(&bytes)
    }

    fn order_plus(offset: u8) -> [u8; 32] {
        let mut value = GROUP_ORDER;
        value[31] += offset;
        value
    }

    #[test]
    fn test_scalar_bit_len() {
        assert_eq!(Scalar::default().bit_len(), 0);
        assert_eq!(scalar_from_u64(1).bit_len(), 1);
        assert_eq!(scalar_from_u64(255).bit_len(), 8);
        assert_eq!(scalar_from_u64(256).bit_len(), 9);
    }

    #[test]
    fn test_scalar_endianness() {
        let scalar = scalar_from_u64(0x0102);
        let be = scalar.to_bytes_be();
        let le = scalar.to_bytes_le();
        assert_eq!(&be[30..], &[0x01, 0x02]);
        assert_eq!(&le[..2], &[0x02, 0x01]);
    }

    #[test]
    fn test_scalar_below_order_is_unchanged() {
        let mut value = GROUP_ORDER;
        value[31] -= 1;
        assert_eq!(Scalar::from_bytes_be(&value).to_bytes_be(), value);
        assert_eq!(Scalar::from_bytes_be(&[0u8; 32]), Scalar::default());
    }

    #[test]
    fn test_scalar_reduces_at_and_above_order() {
        assert_eq!(Scalar::from_bytes_be(&GROUP_ORDER), Scalar::default());
        assert_eq!(Scalar::from_bytes_be(&order_plus(1)), scalar_from_u64(1));
    }

    #[test]
    fn test_scalar_reduces_max_value() {
        // 2^256 - 1 - 2q
        let expected: [u8; 32] = [
            0x18, 0x24, 0xb1, 0x59, 0xac, 0xc5, 0x05, 0x6f, 0x99, 0x8c, 0x4f, 0xef, 0xec, 0xbc,
            0x4f, 0xf5, 0x58, 0x84, 0xb7, 0xfa, 0x00, 0x03, 0x48, 0x02, 0x00, 0x00, 0x00, 0x01,
            0xff, 0xff, 0xff, 0xfd,
        ];
        let reduced = Scalar::from_bytes_be(&[0xff; 32]).to_bytes_be();
        assert_eq!(reduced, expected);
        assert!(reduced < GROUP_ORDER);
    }

    #[test]
    fn test_gt_square_matches_mul() {
        let ml = Gt::miller_loop(&G1Affine::generator(), &G2Affine::generator());
        assert_eq!(ml.square(), ml.mul(&ml));
        assert!(Gt::one().is_one());
        assert!(!ml.is_one());
    }

    #[test]
    fn test_gt_pow_matches_repeated_multiplication() {
        let base = Gt::miller_loop(&G1Affine::generator(), &G2Affine::generator());

        let mut expected = Gt::one();
        for _ in 0..13 {
            expected = expected.mul(&base);
        }

        assert_eq!(base.pow(&scalar_from_u64(13)), expected);
        assert!(base.pow(&Scalar::default()).is_one());
        assert_eq!(base.pow(&scalar_from_u64(1)), base);
    }

    #[test]
    fn test_pairing_is_bilinear() {
        let a = scalar_from_u64(7);
        let g1 = G1Affine::generator();
        let a_g2 = G2Projective::mul_generator(&a).to_affine();

        let lhs = Gt::pairing(&g1, &a_g2);
        let rhs = Gt::pairing(&g1, &G2Affine::generator()).pow(&a);

        assert_eq!(lhs, rhs);
        assert!(lhs.in_group());
        assert!(!lhs.is_one());
    }

    #[test]
    fn test_pow_commutes_with_final_exp() {
        let r = scalar_from_u64(0xdead_beef);
        let ml = Gt::miller_loop(&G1Affine::generator(), &G2Affine::generator());
        assert_eq!(ml.pow(&r).final_exp(), ml.final_exp().pow(&r));
    }

    #[test]
    fn test_g1_point_roundtrip() {
        let point = G1Affine::hash_to_curve(b"identity", b"TEST_DST");
        let parsed = G1Affine::from_bytes(&point.to_compressed()).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_g2_projective_compression_matches_affine() {
        let point = G2Projective::mul_generator(&scalar_from_u64(42));
        assert_eq!(point.to_compressed(), point.to_affine().to_compressed());

        let parsed = G2Affine::from_bytes(&point.to_compressed()).unwrap();
        assert_eq!(parsed, point.to_affine());
    }

    #[test]
    fn test_invalid_point_lengths() {
        assert!(matches!(
            G1Affine::from_bytes(&[0u8; 47]),
            Err(ShutterError::InvalidG1Point(_))
        ));
        assert!(matches!(
            G2Affine::from_bytes(&[0u8; 95]),
            Err(ShutterError::InvalidG2Point(_))
        ));
    }

    #[test]
    fn test_invalid_point_bytes() {
        // Compression flag set, but the x-coordinate is not on the curve.
        let mut bytes = [0xffu8; 96];
        bytes[0] = 0x9f;
        assert!(G2Affine::from_bytes(&bytes).is_err());
    }
}
