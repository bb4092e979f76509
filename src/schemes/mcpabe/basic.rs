//! Basic MCP-ABE variant.
//!
//! Every attribute share `(K1, K2)` embeds the identity hash `H(gid)^γ` of the issuing
//! authority. A ciphertext row has four elements `(C1, C2, C3, C4)`; the `C3` parts of all
//! used rows are summed up and cancel the identity terms with a single pairing.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use mcpabe::schemes::mcpabe::{setup, AttributeUniverse, basic};
//! use mcpabe::utils::policy::pest::PolicyLanguage;
//! use rabe_bn::Gt;
//! use rand::Rng;
//! let mut rng = rand::thread_rng();
//! let gp = setup(&AttributeUniverse::new(1, &[("A", 1), ("B", 2)]), &mut rng);
//! let (pk1, msk1) = basic::authgen(&gp, 1, &mut rng);
//! let (pk2, msk2) = basic::authgen(&gp, 2, &mut rng);
//! let msg: Gt = rng.gen();
//! let ct = basic::encrypt(&gp, &BTreeMap::from([(1, pk1), (2, pk2)]), msg, "A or B", PolicyLanguage::HumanPolicy, &mut rng).unwrap();
//! let sk = basic::keygen(&gp, 1, &["B"], &BTreeMap::from([(1, msk1), (2, msk2)]), &mut rng).unwrap();
//! assert_eq!(basic::decrypt(&gp, 1, &sk, &ct).unwrap(), Some(msg));
//! ```
use std::collections::BTreeMap;
use rabe_bn::{Fr, G1, G2, Gt, pairing};
use rand::{CryptoRng, Rng, RngCore};
use crate::{
    error::McpAbeError,
    schemes::mcpabe::{
        self, AttributeHash, McpAbeCiphertext, McpAbeGlobalParams, McpAbeHybridCiphertext,
        McpAbeUserKey, McpAbeVariant
    },
    utils::policy::pest::PolicyLanguage
};
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "borsh")]
use borsh::{BorshSerialize, BorshDeserialize};

/// A basic MCP-ABE authority public key (PK)
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicPublicKey {
    pub aid: u64,
    pub e_gg_alpha: Gt,
    pub g2_gamma: G2,
}

/// A basic MCP-ABE authority master key (MSK)
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicMasterKey {
    pub aid: u64,
    pub alpha: Fr,
    pub gamma: Fr,
}

/// The key share of one attribute
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicKeyShare {
    pub k1: G1,
    pub k2: G1,
}

/// The ciphertext share of one span program row
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicCiphertextShare {
    pub c1: Gt,
    pub c2: G2,
    pub c3: G2,
    pub c4: G2,
}

pub type BasicUserKey = McpAbeUserKey<(), BasicKeyShare>;
pub type BasicCiphertext = McpAbeCiphertext<BasicCiphertextShare>;
pub type BasicHybridCiphertext = McpAbeHybridCiphertext<BasicCiphertextShare>;

/// The basic MCP-ABE variant
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Basic;

impl McpAbeVariant for Basic {
    type PublicKey = BasicPublicKey;
    type MasterKey = BasicMasterKey;
    type KeyMask = ();
    type KeyShare = BasicKeyShare;
    type CiphertextShare = BasicCiphertextShare;

    fn authgen<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, aid: u64, rng: &mut R) -> (BasicPublicKey, BasicMasterKey) {
        let alpha: Fr = rng.gen();
        let gamma: Fr = rng.gen();
        debug!("authgen: basic authority {}", aid);
        (
            BasicPublicKey { aid, e_gg_alpha: gp.e_gg.pow(alpha), g2_gamma: gp.g2 * gamma },
            BasicMasterKey { aid, alpha, gamma }
        )
    }

    fn key_mask<R: RngCore + CryptoRng>(_gp: &McpAbeGlobalParams, _rng: &mut R) {}

    fn key_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        msk: &BasicMasterKey,
        _gid: Fr,
        h_gid: &G1,
        hash: &AttributeHash,
        _mask: &(),
        rng: &mut R,
    ) -> BasicKeyShare {
        let t: Fr = rng.gen();
        BasicKeyShare {
            k1: (gp.g1 * msk.alpha) + (*h_gid * msk.gamma) + (hash.g1 * t),
            k2: gp.g1 * t,
        }
    }

    fn ciphertext_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        pk: &BasicPublicKey,
        hash: &AttributeHash,
        lambda: Fr,
        omega: Fr,
        rng: &mut R,
    ) -> BasicCiphertextShare {
        let r: Fr = rng.gen();
        BasicCiphertextShare {
            c1: gp.e_gg.pow(lambda) * pk.e_gg_alpha.pow(r),
            c2: gp.g2 * (-r),
            c3: (pk.g2_gamma * r) + (gp.g2 * omega),
            c4: hash.g2 * r,
        }
    }

    fn decryption_term(_gid: Fr, _mask: &(), share: &BasicKeyShare, ct: &BasicCiphertextShare) -> (Gt, G2) {
        (
            ct.c1 * pairing(share.k1, ct.c2) * pairing(share.k2, ct.c4),
            ct.c3
        )
    }
}

/// Generates the key pair of authority `aid`.
pub fn authgen<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, aid: u64, rng: &mut R) -> (BasicPublicKey, BasicMasterKey) {
    Basic::authgen(gp, aid, rng)
}

/// Issues a basic user key for identity `gid`. See [`mcpabe::keygen`].
pub fn keygen<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    gid: u64,
    attributes: &[&str],
    msks: &BTreeMap<u64, BasicMasterKey>,
    rng: &mut R,
) -> Result<BasicUserKey, McpAbeError> {
    mcpabe::keygen::<Basic, R>(gp, gid, attributes, msks, rng)
}

/// Encrypts `msg` under `policy`. See [`mcpabe::encrypt_with`].
pub fn encrypt<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, BasicPublicKey>,
    msg: Gt,
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<BasicCiphertext, McpAbeError> {
    mcpabe::encrypt::<Basic, R>(gp, pks, msg, policy, language, rng)
}

/// Decrypts `ct` as identity `gid`. Fails if `gid` is not the identity `sk` was issued for.
///
/// # Arguments
///
///	* `gp` - Global Parameters (GP), generated by setup()
///	* `gid` - the identity of the decrypting user
///	* `sk` - a user secret key, generated by keygen()
///	* `ct` - a ciphertext, generated by encrypt()
pub fn decrypt(
    gp: &McpAbeGlobalParams,
    gid: u64,
    sk: &BasicUserKey,
    ct: &BasicCiphertext,
) -> Result<Option<Gt>, McpAbeError> {
    check_identity(gid, sk)?;
    mcpabe::decrypt::<Basic>(gp, sk, ct)
}

/// Encrypts arbitrary data under `policy`. See [`mcpabe::encrypt_data`].
pub fn encrypt_data<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, BasicPublicKey>,
    plaintext: &[u8],
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<BasicHybridCiphertext, McpAbeError> {
    mcpabe::encrypt_data::<Basic, R>(gp, pks, plaintext, policy, language, rng)
}

/// Decrypts data as identity `gid`. See [`decrypt`].
pub fn decrypt_data(
    gp: &McpAbeGlobalParams,
    gid: u64,
    sk: &BasicUserKey,
    ct: &BasicHybridCiphertext,
) -> Result<Option<Vec<u8>>, McpAbeError> {
    check_identity(gid, sk)?;
    mcpabe::decrypt_data::<Basic>(gp, sk, ct)
}

fn check_identity(gid: u64, sk: &BasicUserKey) -> Result<(), McpAbeError> {
    if gid != sk.gid {
        return Err(McpAbeError::new(&format!(
            "decrypt: key of identity {} used as identity {}",
            sk.gid, gid
        )));
    }
    Ok(())
}
