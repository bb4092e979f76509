//! Binding MCP-ABE variant.
//!
//! A user key carries one random mask `u = g1^ρ`. Every share issued for the key embeds
//! `u^(β(gid+γ))` and `u^γ`, so shares only cancel against the mask and the numeric identity
//! they were issued for. Shares taken from keys of different identities do not combine.
//! A ciphertext row has five elements `(C1, C2, C3, C4, C5)`.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use mcpabe::schemes::mcpabe::{setup, AttributeUniverse, binding};
//! use mcpabe::utils::policy::pest::PolicyLanguage;
//! let mut rng = rand::thread_rng();
//! let gp = setup(&AttributeUniverse::new(1, &[("A", 1), ("B", 2)]), &mut rng);
//! let (pk1, msk1) = binding::authgen(&gp, 1, &mut rng);
//! let (pk2, msk2) = binding::authgen(&gp, 2, &mut rng);
//! let plaintext = String::from("our plaintext!").into_bytes();
//! let ct = binding::encrypt_data(&gp, &BTreeMap::from([(1, pk1), (2, pk2)]), &plaintext, "A and B", PolicyLanguage::HumanPolicy, &mut rng).unwrap();
//! let sk = binding::keygen(&gp, 1, &["A", "B"], &BTreeMap::from([(1, msk1), (2, msk2)]), &mut rng).unwrap();
//! assert_eq!(binding::decrypt_data(&gp, &sk, &ct).unwrap(), Some(plaintext));
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

/// A binding MCP-ABE authority public key (PK)
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingPublicKey {
    pub aid: u64,
    pub e_gg_alpha: Gt,
    pub g1_beta: G1,
    pub g1_gamma: G1,
    pub g2_beta: G2,
    pub g2_gamma: G2,
}

/// A binding MCP-ABE authority master key (MSK)
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingMasterKey {
    pub aid: u64,
    pub alpha: Fr,
    pub beta: Fr,
    pub gamma: Fr,
}

/// The key share of one attribute. The mask `u` is stored once in the user key.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingKeyShare {
    pub k1: G1,
    pub k2: G1,
    pub k4: G2,
}

/// The ciphertext share of one span program row
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BindingCiphertextShare {
    pub c1: Gt,
    pub c2: G2,
    pub c3: G2,
    pub c4: G1,
    pub c5: G2,
}

pub type BindingUserKey = McpAbeUserKey<G1, BindingKeyShare>;
pub type BindingCiphertext = McpAbeCiphertext<BindingCiphertextShare>;
pub type BindingHybridCiphertext = McpAbeHybridCiphertext<BindingCiphertextShare>;

/// The binding MCP-ABE variant
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Binding;

impl McpAbeVariant for Binding {
    type PublicKey = BindingPublicKey;
    type MasterKey = BindingMasterKey;
    type KeyMask = G1;
    type KeyShare = BindingKeyShare;
    type CiphertextShare = BindingCiphertextShare;

    fn authgen<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, aid: u64, rng: &mut R) -> (BindingPublicKey, BindingMasterKey) {
        let alpha: Fr = rng.gen();
        let beta: Fr = rng.gen();
        let gamma: Fr = rng.gen();
        debug!("authgen: binding authority {}", aid);
        (
            BindingPublicKey {
                aid,
                e_gg_alpha: gp.e_gg.pow(alpha),
                g1_beta: gp.g1 * beta,
                g1_gamma: gp.g1 * gamma,
                g2_beta: gp.g2 * beta,
                g2_gamma: gp.g2 * gamma,
            },
            BindingMasterKey { aid, alpha, beta, gamma }
        )
    }

    fn key_mask<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, rng: &mut R) -> G1 {
        let rho: Fr = rng.gen();
        gp.g1 * rho
    }

    fn key_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        msk: &BindingMasterKey,
        gid: Fr,
        h_gid: &G1,
        hash: &AttributeHash,
        mask: &G1,
        rng: &mut R,
    ) -> BindingKeyShare {
        let t: Fr = rng.gen();
        BindingKeyShare {
            k1: (gp.g1 * msk.alpha)
                + (*h_gid * msk.beta)
                + (hash.g1 * t)
                + (*mask * (msk.beta * (gid + msk.gamma))),
            k2: *mask * msk.gamma,
            k4: gp.g2 * t,
        }
    }

    fn ciphertext_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        pk: &BindingPublicKey,
        hash: &AttributeHash,
        lambda: Fr,
        omega: Fr,
        rng: &mut R,
    ) -> BindingCiphertextShare {
        let r: Fr = rng.gen();
        BindingCiphertextShare {
            c1: gp.e_gg.pow(lambda) * pk.e_gg_alpha.pow(r),
            c2: gp.g2 * omega,
            c3: pk.g2_beta * r,
            c4: hash.g1 * r,
            c5: gp.g2 * (-r),
        }
    }

    fn decryption_term(gid: Fr, mask: &G1, share: &BindingKeyShare, ct: &BindingCiphertextShare) -> (Gt, G2) {
        (
            ct.c1
                * pairing(share.k2 + (*mask * gid), ct.c3)
                * pairing(ct.c4, share.k4)
                * pairing(share.k1, ct.c5),
            ct.c2 + ct.c3
        )
    }
}

/// Generates the key pair of authority `aid`.
pub fn authgen<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, aid: u64, rng: &mut R) -> (BindingPublicKey, BindingMasterKey) {
    Binding::authgen(gp, aid, rng)
}

/// Issues a binding user key for identity `gid`. See [`mcpabe::keygen`].
pub fn keygen<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    gid: u64,
    attributes: &[&str],
    msks: &BTreeMap<u64, BindingMasterKey>,
    rng: &mut R,
) -> Result<BindingUserKey, McpAbeError> {
    mcpabe::keygen::<Binding, R>(gp, gid, attributes, msks, rng)
}

/// Encrypts `msg` under `policy`. See [`mcpabe::encrypt_with`].
pub fn encrypt<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, BindingPublicKey>,
    msg: Gt,
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<BindingCiphertext, McpAbeError> {
    mcpabe::encrypt::<Binding, R>(gp, pks, msg, policy, language, rng)
}

/// Decrypts `ct` with `sk`. The identity is the one stored in the key.
pub fn decrypt(
    gp: &McpAbeGlobalParams,
    sk: &BindingUserKey,
    ct: &BindingCiphertext,
) -> Result<Option<Gt>, McpAbeError> {
    mcpabe::decrypt::<Binding>(gp, sk, ct)
}

/// Encrypts arbitrary data under `policy`. See [`mcpabe::encrypt_data`].
pub fn encrypt_data<R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, BindingPublicKey>,
    plaintext: &[u8],
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<BindingHybridCiphertext, McpAbeError> {
    mcpabe::encrypt_data::<Binding, R>(gp, pks, plaintext, policy, language, rng)
}

pub fn decrypt_data(
    gp: &McpAbeGlobalParams,
    sk: &BindingUserKey,
    ct: &BindingHybridCiphertext,
) -> Result<Option<Vec<u8>>, McpAbeError> {
    mcpabe::decrypt_data::<Binding>(gp, sk, ct)
}
