//! Key material shared by the integration tests.

#![allow(dead_code)]

use base64ct::{Base64, Encoding};
use hex_literal::hex;
use rsa_core::{BigUint, RsaKey};

pub const KAT_N: [u8; 128] = hex!(
    "d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285"
    "e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770"
    "b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e"
    "719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9"
);

pub const KAT_D: [u8; 128] = hex!(
    "5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1"
    "dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc1"
    "83622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e"
    "389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801"
);

pub const KAT_P: [u8; 64] = hex!(
    "e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b06"
    "4e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681"
);

pub const KAT_Q: [u8; 64] = hex!(
    "e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2"
    "ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559"
);

pub const KAT_DMP1: [u8; 64] = hex!(
    "a327c8e8f19d4150428f5e055a3ceaca846a19e30d45534ad60d894b56caf9b1"
    "bf0c9a8d965b0a882dfd2e1485154ee5cbe052e8d4f525c2d5fa9554b1992a01"
);

pub const KAT_DMQ1: [u8; 64] = hex!(
    "91f17ceb411a247e056287f79787f498b9cc2d1400e43dce10b91dcfe8e30adf"
    "80820d42d12b54f4247dce8eee193421cd602e843930f944c81a0dfa730081d9"
);

pub const KAT_IQMP: [u8; 64] = hex!(
    "75915a454770b49082423761244ccec65a6e48ae9966344b675610facad9162f"
    "a5bd1cc5108c322c2fb3c144f807773a2c7d097f63e5c8d3bd8ce8efac2ade04"
);

/// PKCS#1 v1.5 ciphertexts under the 1024-bit key and their plaintexts.
pub const DECRYPT_VECTORS: [(&str, &str); 4] = [
    (
        "f0f4qsNunKxRgsag5/p3AER7uoqs/Gupe33kuJWGAkLjobLsLszxp7uwVngeoxpDi87rTcJ9y0Sbu2QfnV/KvwEHiuQ8NL1FCRt4ujwgNtQms9XHjkTeLUX9tapoxdA0QhLsjblZFdb3fAvZXHGKPTBdHkxHut6LHG37SxbHeQY=",
        "x",
    ),
    (
        "l+L4+CdrgcFJ9LngppA+o7pZAKmZs4Gu5cRsum7OAji0+XNamTaPKxgtAio5A8ltRLJxrfZnRFOIOyn4964vMIB2YfVG/Vak//kLIn/rbgaVGndmWxQuR6ykEruOuqn5JUqv4JHaW30aDzEkCbpXWpFJ7dhfrWZdSv4XKpt9cY4=",
        "testing.",
    ),
    (
        "JtlpY3lTeCmkRRrIgfuOXH0ubMOL1U/n6nM6r6kF2iuRiFIPapfEzHF2WSvrbxZXa8gzJo1PuAJiJ6Vy90vOWbP43VEXLk5wyGZPePwHQ1WwOcE+6okZ9j9zmAmAnQUyaUjPfhwyDC64ObjiSKeIPCYSsdURy/Z67lcTZ6JJ8+8=",
        "testing.\n",
    ),
    (
        "TcyqI5jrGyln5AspqnvWShPIjKIZtXbNApf9TqAZrsl31RS+k6blEJy6YVZeow9QKis+UyIcz08nMGX/D3lm/JA4bwpyBFAvSFr2MNjNpGh9QqEcGryI0CpLA1fy56x7YGB/Y0eJZXnSj91udGubJTEI9ULTouoFAKxoWq7ioTc=",
        "01234567890123456789012345678901234567890123456789012",
    ),
];

/// DER `RSAPublicKey` of a 2048-bit key with `e = 65537`.
pub const PUBLIC_2048_DER: &str = "\
    MIIBCgKCAQEAtsQsUV8QpqrygsY+2+JCQ6Fw8/omM71IM2N/R8pPbzbgOl0p78MZ\
    GsgPOQ2HSznjD0FPzsH8oO2B5Uftws04LHb2HJAYlz25+lN5cqfHAfa3fgmC38Ff\
    wBkn7l582UtPWZ/wcBOnyCgb3yLcvJrXyrt8QxHJgvWO23ITrUVYszImbXQ67YGS\
    0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0NfFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J\
    9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejIn04APPKIjpMyQdnWlby7rNyQtE4+CV+j\
    cFjqJbE/Xilcvqxt6DirjFCvYeKYl1uHLwIDAQAB";

pub fn uint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

pub fn decimal(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 10).unwrap()
}

pub fn f4() -> BigUint {
    BigUint::from(65_537u32)
}

/// 1024-bit key with factors and CRT values.
pub fn kat_key() -> RsaKey {
    RsaKey::new_private(
        &uint(&KAT_N),
        &f4(),
        &uint(&KAT_D),
        &uint(&KAT_P),
        &uint(&KAT_Q),
        &uint(&KAT_DMP1),
        &uint(&KAT_DMQ1),
        &uint(&KAT_IQMP),
    )
    .unwrap()
}

/// The same key as [`kat_key`], reduced to `(n, e, d)`.
pub fn kat_key_minimal() -> RsaKey {
    RsaKey::new_private_no_crt(&uint(&KAT_N), &f4(), &uint(&KAT_D)).unwrap()
}

pub fn kat_public_key() -> RsaKey {
    RsaKey::new_public(&uint(&KAT_N), &f4()).unwrap()
}

/// 512-bit key the PSS vectors were produced with.
pub fn pss_key() -> RsaKey {
    let n = decimal("9353930466774385905609975137998169297361893554149986716853295022578535724979677252958524466350471210367835187480748268864277464700638583474144061408845077");
    let d = decimal("7266398431328116344057699379749222532279343923819063639497049039389899328538543087657733766554155839834519529439851673014800261285757759040931985506583861");
    RsaKey::new_private_no_crt(&n, &f4(), &d).unwrap()
}

/// Modulus of [`PUBLIC_2048_DER`].
pub fn public_2048_modulus() -> BigUint {
    let der = Base64::decode_vec(PUBLIC_2048_DER).unwrap();
    // SEQUENCE header, INTEGER header, leading zero byte.
    uint(&der[9..265])
}

pub fn public_2048() -> RsaKey {
    RsaKey::new_public(&public_2048_modulus(), &f4()).unwrap()
}

/// 2047-bit key with `e = 3`.
pub fn cube_key() -> RsaKey {
    let n = hex!(
        "7163c842b2190a8970942b2764aed42d4124647b6f30e09a2da1c0e2"
        "56aa2ee24e790c40c96a4bd66d75c371a915e0703c476b4e1a06f1bd"
        "38c5a3c10ae3bd30f4ef62a5aa4f512ad145a06c48e96469a22ce8e6"
        "21e052f0669a8c34155512d82e55447f0b7e18da94bd911ac7b3aabe"
        "706843668964593ee71b2e5e484bcf0c7834101ab5d61bba1e63e623"
        "7af40489ce36a260dab70add4fbec24d659db0f7cac099b0a3aa4549"
        "acde7fc858a793a975e6cf65ca276b743525f0883980f6ad069bec34"
        "6d787797386d50fe0c9734be967c7d84ae5b8f349b094079457c0c0c"
        "6fee34c42a0b832603804f71e49f3320081637512c6cbf2bb81b6f6b"
        "e239846d"
    );
    let d = hex!(
        "4b97dad7216607064b0d721a431f381e2b6d98524a2095bc1e6bd5ec"
        "39c6c9ec3450b2d5db9c328ef3a3d7a11b63eaf57d84f2341159f67e"
        "25d917d607427e20a34a41c3c6df8b71e0d9159d85f0ed9bc17345ee"
        "c140374aef11b2cd638e0c901ee382ff5cfebb3c63290b672fcd1c7e"
        "f59ad799b0ed90d49a121ee98587df5cc161c584bc5887ae2a15e787"
        "e86ab1e803366150561e0b3b3ae28ebdcf32cd46dff317ed3e1b7590"
        "cc300d1d57c9288462d06d9fbe097e52b70dc4fca313ae09906e5fab"
        "0c24729b54fe35cc38fe1496419a902f35f08460952bd4783e0e930b"
        "a8b520f83eafe6fa6589bbab6e4f4bc5c285672c99f5055eec6a2a30"
        "b06e786b"
    );
    RsaKey::new_private_no_crt(&uint(&n), &BigUint::from(3u32), &uint(&d)).unwrap()
}
