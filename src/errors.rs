//! Error types.

/// Alias for [`core::result::Result`] with the `rsa-core` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// A component required by the operation is absent.
    MissingValue,

    /// Modulus is larger than 16384 bits.
    ModulusTooLarge,

    /// Modulus is even.
    BadModulusParity,

    /// Public exponent is even, too small, too large, or not below the modulus.
    BadExponent,

    /// The set of present components does not form a recognised key shape.
    BadKeyShape,

    /// A prime factor is not below the modulus.
    FactorOutOfRange,

    /// `p * q` does not equal the modulus.
    FactorizationMismatch,

    /// `d * e` is not congruent to 1 modulo `p - 1` and `q - 1`.
    ExponentNotInverse,

    /// Stored CRT values disagree with `d`, `p` and `q`.
    CrtValuesIncorrect,

    /// Digest length does not match the digest algorithm.
    InvalidMessageLength,

    /// Digest algorithm has no PKCS#1 encoding.
    UnknownDigestAlgorithm,

    /// Recovered signature payload has trailing or missing bytes.
    BadSignatureLength,

    /// Recovered signature payload differs from the expected encoding.
    SignatureMismatch,

    /// FIPS public key plausibility check or pairwise consistency test failed.
    PublicKeyValidationFailed,

    /// Buffer allocation failed.
    AllocationFailure,

    /// Message too long for the key size.
    MessageTooLong,

    /// Output buffer is shorter than the key size.
    OutputBufferTooSmall,

    /// Input length differs from the key size.
    DataLengthMismatch,

    /// Input, read as an integer, is not below the modulus.
    DataTooLargeForModulus,

    /// Padding check failed while recovering a payload.
    InvalidPadding,

    /// Padding mode is not supported by the operation.
    InvalidPaddingScheme,

    /// The known-answer self-test failed; signing and verification are disabled.
    SelfTestFailed,

    /// Internal error.
    Internal,
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::MissingValue => write!(f, "value missing"),
            Error::ModulusTooLarge => write!(f, "modulus too large"),
            Error::BadModulusParity => write!(f, "modulus is not odd"),
            Error::BadExponent => write!(f, "bad public exponent"),
            Error::BadKeyShape => write!(f, "bad rsa parameters"),
            Error::FactorOutOfRange => write!(f, "prime factor out of range"),
            Error::FactorizationMismatch => write!(f, "n is not equal to p * q"),
            Error::ExponentNotInverse => write!(f, "d * e is not congruent to 1"),
            Error::CrtValuesIncorrect => write!(f, "crt values incorrect"),
            Error::InvalidMessageLength => write!(f, "invalid message length"),
            Error::UnknownDigestAlgorithm => write!(f, "unknown digest algorithm"),
            Error::BadSignatureLength => write!(f, "bad signature"),
            Error::SignatureMismatch => write!(f, "mismatched signature"),
            Error::PublicKeyValidationFailed => write!(f, "public key validation failed"),
            Error::AllocationFailure => write!(f, "allocation failure"),
            Error::MessageTooLong => write!(f, "message too long"),
            Error::OutputBufferTooSmall => write!(f, "output buffer too small"),
            Error::DataLengthMismatch => write!(f, "data length not equal to modulus length"),
            Error::DataTooLargeForModulus => write!(f, "data too large for modulus"),
            Error::InvalidPadding => write!(f, "padding check failed"),
            Error::InvalidPaddingScheme => write!(f, "invalid padding scheme"),
            Error::SelfTestFailed => write!(f, "self-test failed"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl From<Error> for signature::Error {
    fn from(err: Error) -> Self {
        Self::from_source(err)
    }
}
