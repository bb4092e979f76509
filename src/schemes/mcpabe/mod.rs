//! `MCP-ABE`: multi-authority ciphertext-policy ABE over monotone span programs.
//!
//! * Based on the decentralized CP-ABE of Allison Lewko, Brent Waters, "Decentralizing Attribute-Based Encryption"
//! * Policies are converted into monotone span programs, see [`crate::utils::policy`]
//! * Type: encryption (attribute-based, multi-authority)
//! * Setting: bilinear groups (asymmetric)
//!
//! Attributes are partitioned across independent authorities. Each authority only issues
//! key shares for its own attributes, the global parameters fix the assignment.
//! This module holds everything both variants share: the global parameters, the key and
//! ciphertext containers, span program evaluation and the accumulation during decryption.
//! The group arithmetic of a variant lives behind [`McpAbeVariant`]:
//!
//! * [`basic::Basic`] - a pair of key elements per attribute, bound to the identity hash
//! * [`binding::Binding`] - additionally blinds all shares of a key with one random mask
//!   and the numeric identity
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use mcpabe::schemes::mcpabe::{setup, AttributeUniverse, basic};
//! use mcpabe::utils::policy::pest::PolicyLanguage;
//! let mut rng = rand::thread_rng();
//! let universe = AttributeUniverse::new(2, &[("A", 1), ("B", 2), ("C", 2)]);
//! let gp = setup(&universe, &mut rng);
//! let (pk1, msk1) = basic::authgen(&gp, 1, &mut rng);
//! let (pk2, msk2) = basic::authgen(&gp, 2, &mut rng);
//! let pks = BTreeMap::from([(1, pk1), (2, pk2)]);
//! let msks = BTreeMap::from([(1, msk1), (2, msk2)]);
//! let plaintext = String::from("our plaintext!").into_bytes();
//! let ct = basic::encrypt_data(&gp, &pks, &plaintext, "A and (B or C)", PolicyLanguage::HumanPolicy, &mut rng).unwrap();
//! let sk = basic::keygen(&gp, 2, &["A", "C"], &msks, &mut rng).unwrap();
//! assert_eq!(basic::decrypt_data(&gp, 2, &sk, &ct).unwrap(), Some(plaintext));
//! ```
use std::collections::BTreeMap;
use rabe_bn::{Fr, G1, G2, Gt, Group, pairing};
use rand::{CryptoRng, Rng, RngCore};
use crate::{
    error::McpAbeError,
    utils::{
        aes::{decrypt_symmetric, encrypt_symmetric},
        policy::{LewkoWaters, NodeLabel, PolicyToolkit, pest::PolicyLanguage},
        secretsharing::{calc_share, gen_sharing_vector},
        tools::{find_duplicate, u64_to_fr}
    }
};
#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};
#[cfg(feature = "borsh")]
use borsh::{BorshSerialize, BorshDeserialize};

pub mod basic;
pub mod binding;

/// The configuration of a deployment: how many identities exist and which authority
/// governs which attribute.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeUniverse {
    /// Identities are numbered `1..=identities`
    pub identities: u64,
    pub assignment: BTreeMap<String, u64>,
}

impl AttributeUniverse {
    /// Creates a universe from an explicit attribute to authority assignment.
    ///
    /// # Arguments
    ///
    ///	* `identities` - number of global identities, numbered from 1
    ///	* `assignment` - pairs of attribute name and authority id
    pub fn new(identities: u64, assignment: &[(&str, u64)]) -> AttributeUniverse {
        AttributeUniverse {
            identities,
            assignment: assignment
                .iter()
                .map(|(attr, aid)| (attr.to_string(), *aid))
                .collect(),
        }
    }

    /// Creates the attributes `A1..=A<size>`, each governed by a uniformly chosen authority
    /// out of `1..=authorities`.
    pub fn random<R: RngCore + CryptoRng>(
        identities: u64,
        authorities: u64,
        size: usize,
        rng: &mut R,
    ) -> Result<AttributeUniverse, McpAbeError> {
        if authorities == 0 {
            return Err(McpAbeError::new("random universe without authorities"));
        }
        let assignment = (1..=size)
            .map(|i| (format!("A{}", i), rng.gen_range(1..=authorities)))
            .collect();
        Ok(AttributeUniverse { identities, assignment })
    }
}

/// The hash of an attribute in both source groups, `(g1^f, g2^f)` for one exponent f.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeHash {
    pub g1: G1,
    pub g2: G2,
}

/// MCP-ABE global parameters (GP), shared by all authorities, users and encryptors.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpAbeGlobalParams {
    pub g1: G1,
    pub g2: G2,
    /// e(g1, g2)
    pub e_gg: Gt,
    /// identity hash table
    pub h: BTreeMap<u64, G1>,
    /// attribute hash table
    pub f: BTreeMap<String, AttributeHash>,
    /// attribute to authority assignment
    pub t: BTreeMap<String, u64>,
}

impl McpAbeGlobalParams {
    /// Returns the hash of identity `gid`
    pub fn identity(&self, gid: u64) -> Result<&G1, McpAbeError> {
        self.h
            .get(&gid)
            .ok_or_else(|| McpAbeError::new(&format!("unknown identity {}", gid)))
    }

    /// Returns the hash of `attribute`
    pub fn attribute(&self, attribute: &str) -> Result<&AttributeHash, McpAbeError> {
        self.f
            .get(attribute)
            .ok_or_else(|| McpAbeError::new(&format!("unknown attribute {}", attribute)))
    }

    /// Returns the id of the authority governing `attribute`
    pub fn authority_of(&self, attribute: &str) -> Result<u64, McpAbeError> {
        self.t
            .get(attribute)
            .copied()
            .ok_or_else(|| McpAbeError::new(&format!("attribute {} is not assigned to an authority", attribute)))
    }
}

/// An MCP-ABE user secret key (SK). `mask` is shared by all shares of the key.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpAbeUserKey<M, K> {
    pub gid: u64,
    pub attr: Vec<String>,
    pub mask: M,
    pub k: Vec<(String, K)>,
}

/// An MCP-ABE ciphertext (CT) of a [`rabe_bn::Gt`] element: the policy, the blinded message
/// and one share per span program row.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpAbeCiphertext<C> {
    pub policy: (String, PolicyLanguage),
    pub c_0: Gt,
    pub c: Vec<(NodeLabel, C)>,
}

/// An MCP-ABE ciphertext of arbitrary data: an encapsulated key and the AES-GCM ciphertext.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "borsh", derive(BorshSerialize, BorshDeserialize))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct McpAbeHybridCiphertext<C> {
    pub key: McpAbeCiphertext<C>,
    pub data: Vec<u8>,
}

/// The group arithmetic of one MCP-ABE variant.
///
/// Decryption multiplies the [`Gt`] parts of all `decryption_term`s of the pruned rows,
/// sums up their [`G2`] parts and pairs that sum once with the identity hash. A variant
/// has to arrange its shares so that the result is `e(g1, g2)^s`.
pub trait McpAbeVariant {
    type PublicKey;
    type MasterKey;
    /// Randomness shared by all shares of one user key
    type KeyMask;
    type KeyShare;
    type CiphertextShare;

    /// Generates the key pair of authority `aid`
    fn authgen<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, aid: u64, rng: &mut R) -> (Self::PublicKey, Self::MasterKey);

    fn key_mask<R: RngCore + CryptoRng>(gp: &McpAbeGlobalParams, rng: &mut R) -> Self::KeyMask;

    /// Issues the share of one attribute for the identity with hash `h_gid`
    fn key_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        msk: &Self::MasterKey,
        gid: Fr,
        h_gid: &G1,
        hash: &AttributeHash,
        mask: &Self::KeyMask,
        rng: &mut R,
    ) -> Self::KeyShare;

    /// Encrypts the shares `lambda` (of the secret) and `omega` (of zero) of one row
    fn ciphertext_share<R: RngCore + CryptoRng>(
        gp: &McpAbeGlobalParams,
        pk: &Self::PublicKey,
        hash: &AttributeHash,
        lambda: Fr,
        omega: Fr,
        rng: &mut R,
    ) -> Self::CiphertextShare;

    fn decryption_term(
        gid: Fr,
        mask: &Self::KeyMask,
        share: &Self::KeyShare,
        ct: &Self::CiphertextShare,
    ) -> (Gt, G2);
}

/// The setup algorithm of MCP-ABE. Generates the global parameters (GP) for a universe.
///
/// The attribute hashes share their exponent in both groups, so `e(F1, g2) = e(g1, F2)`.
///
/// # Arguments
///
///	* `universe` - identities and attribute assignment of the deployment
///	* `rng` - a cryptographically secure random number generator
pub fn setup<R: RngCore + CryptoRng>(universe: &AttributeUniverse, rng: &mut R) -> McpAbeGlobalParams {
    let g1: G1 = rng.gen();
    let g2: G2 = rng.gen();
    let e_gg = pairing(g1, g2);
    let h: BTreeMap<u64, G1> = (1..=universe.identities)
        .map(|gid| (gid, rng.gen()))
        .collect();
    let mut f: BTreeMap<String, AttributeHash> = BTreeMap::new();
    for attr in universe.assignment.keys() {
        let exponent: Fr = rng.gen();
        f.insert(attr.clone(), AttributeHash { g1: g1 * exponent, g2: g2 * exponent });
    }
    debug!(
        "setup: {} identities, {} attributes",
        h.len(),
        f.len()
    );
    McpAbeGlobalParams { g1, g2, e_gg, h, f, t: universe.assignment.clone() }
}

/// The key generation algorithm of MCP-ABE. Every attribute's share is issued by the master
/// key of the authority that governs it.
///
/// # Arguments
///
///	* `gp` - Global Parameters (GP), generated by setup()
///	* `gid` - the identity the key is bound to
///	* `attributes` - the attributes of the key, non-empty and without duplicates
///	* `msks` - master keys by authority id
///	* `rng` - a cryptographically secure random number generator
pub fn keygen<V: McpAbeVariant, R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    gid: u64,
    attributes: &[&str],
    msks: &BTreeMap<u64, V::MasterKey>,
    rng: &mut R,
) -> Result<McpAbeUserKey<V::KeyMask, V::KeyShare>, McpAbeError> {
    if attributes.is_empty() {
        return Err(McpAbeError::new("keygen: empty attributes!"));
    }
    if let Some(attr) = find_duplicate(attributes) {
        return Err(McpAbeError::new(&format!("keygen: duplicate attribute {}", attr)));
    }
    let h_gid = gp.identity(gid)?;
    let gid_fr = u64_to_fr(gid)?;
    let mask = V::key_mask(gp, rng);
    let mut k: Vec<(String, V::KeyShare)> = Vec::with_capacity(attributes.len());
    for attr in attributes {
        let aid = gp.authority_of(attr)?;
        let msk = msks
            .get(&aid)
            .ok_or_else(|| McpAbeError::new(&format!("keygen: no master key of authority {} for {}", aid, attr)))?;
        let hash = gp.attribute(attr)?;
        k.push((attr.to_string(), V::key_share(gp, msk, gid_fr, h_gid, hash, &mask, rng)));
    }
    debug!("keygen: issued {} shares for identity {}", k.len(), gid);
    Ok(McpAbeUserKey {
        gid,
        attr: attributes.iter().map(|a| a.to_string()).collect(),
        mask,
        k,
    })
}

/// The encrypt algorithm of MCP-ABE using the default policy toolkit. See [`encrypt_with`].
pub fn encrypt<V: McpAbeVariant, R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, V::PublicKey>,
    msg: Gt,
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<McpAbeCiphertext<V::CiphertextShare>, McpAbeError> {
    encrypt_with::<V, LewkoWaters, R>(gp, pks, msg, policy, language, &LewkoWaters, rng)
}

/// The encrypt algorithm of MCP-ABE. Encrypts a [`rabe_bn::Gt`] element under an access policy.
///
/// # Arguments
///
///	* `gp` - Global Parameters (GP), generated by setup()
///	* `pks` - public keys by authority id, one for every authority governing an attribute of the policy
///	* `msg` - the message
///	* `policy` - an access policy in the given language
///	* `language` - the language of `policy`
///	* `toolkit` - parses the policy and converts it into a span program
///	* `rng` - a cryptographically secure random number generator
pub fn encrypt_with<V: McpAbeVariant, T: PolicyToolkit, R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, V::PublicKey>,
    msg: Gt,
    policy: &str,
    language: PolicyLanguage,
    toolkit: &T,
    rng: &mut R,
) -> Result<McpAbeCiphertext<V::CiphertextShare>, McpAbeError> {
    let tree = toolkit.parse(policy, language)?;
    let msp = toolkit.to_msp(&tree)?;
    if msp.m.is_empty() || msp.m.len() != msp.pi.len() {
        return Err(McpAbeError::new("encrypt: malformed span program"));
    }
    debug!("encrypt: span program with {} rows and {} columns", msp.m.len(), msp.c);
    let s: Fr = rng.gen();
    let v = gen_sharing_vector(s, msp.c, rng);
    let w = gen_sharing_vector(Fr::zero(), msp.c, rng);
    let c_0 = msg * gp.e_gg.pow(s);
    let mut c: Vec<(NodeLabel, V::CiphertextShare)> = Vec::with_capacity(msp.m.len());
    for (row, label) in msp.m.iter().zip(msp.pi.iter()) {
        let attr = label.attribute();
        let aid = gp.authority_of(attr)?;
        let pk = pks
            .get(&aid)
            .ok_or_else(|| McpAbeError::new(&format!("encrypt: no public key of authority {} for {}", aid, attr)))?;
        let hash = gp.attribute(attr)?;
        let lambda = calc_share(row, &v)?;
        let omega = calc_share(row, &w)?;
        trace!("encrypt: row {} governed by authority {}", label, aid);
        c.push((label.clone(), V::ciphertext_share(gp, pk, hash, lambda, omega, rng)));
    }
    Ok(McpAbeCiphertext {
        policy: (policy.to_string(), language),
        c_0,
        c,
    })
}

/// The decrypt algorithm of MCP-ABE using the default policy toolkit. See [`decrypt_with`].
pub fn decrypt<V: McpAbeVariant>(
    gp: &McpAbeGlobalParams,
    sk: &McpAbeUserKey<V::KeyMask, V::KeyShare>,
    ct: &McpAbeCiphertext<V::CiphertextShare>,
) -> Result<Option<Gt>, McpAbeError> {
    decrypt_with::<V, LewkoWaters>(gp, sk, ct, &LewkoWaters)
}

/// The decrypt algorithm of MCP-ABE. Returns `None` if the attributes of the key do not
/// satisfy the policy of the ciphertext.
///
/// # Arguments
///
///	* `gp` - Global Parameters (GP), generated by setup()
///	* `sk` - a user secret key, generated by keygen()
///	* `ct` - a ciphertext, generated by encrypt()
///	* `toolkit` - the policy toolkit the ciphertext was generated with
pub fn decrypt_with<V: McpAbeVariant, T: PolicyToolkit>(
    gp: &McpAbeGlobalParams,
    sk: &McpAbeUserKey<V::KeyMask, V::KeyShare>,
    ct: &McpAbeCiphertext<V::CiphertextShare>,
    toolkit: &T,
) -> Result<Option<Gt>, McpAbeError> {
    let tree = toolkit.parse(&ct.policy.0, ct.policy.1)?;
    let labels = match toolkit.prune(&tree, &sk.attr)? {
        Some(labels) => labels,
        None => {
            debug!("decrypt: attributes of identity {} do not satisfy the policy", sk.gid);
            return Ok(None);
        }
    };
    let h_gid = gp.identity(sk.gid)?;
    let gid = u64_to_fr(sk.gid)?;
    let mut prod = Gt::one();
    let mut sum = G2::zero();
    for label in &labels {
        let (_, ct_share) = ct.c
            .iter()
            .find(|(l, _)| l == label)
            .ok_or_else(|| McpAbeError::new(&format!("decrypt: ciphertext has no row {}", label)))?;
        let (_, key_share) = sk.k
            .iter()
            .find(|(attr, _)| attr == label.attribute())
            .ok_or_else(|| McpAbeError::new(&format!("decrypt: key has no share for {}", label.attribute())))?;
        let (term, g2) = V::decryption_term(gid, &sk.mask, key_share, ct_share);
        trace!("decrypt: row {}", label);
        prod = prod * term;
        sum = sum + g2;
    }
    let blinding = prod * pairing(*h_gid, sum);
    debug!("decrypt: combined {} rows for identity {}", labels.len(), sk.gid);
    Ok(Some(ct.c_0 * blinding.inverse()))
}

/// Encrypts arbitrary data: a random [`rabe_bn::Gt`] element is encrypted under `policy`
/// and keys AES-256-GCM for `plaintext`.
pub fn encrypt_data<V: McpAbeVariant, R: RngCore + CryptoRng>(
    gp: &McpAbeGlobalParams,
    pks: &BTreeMap<u64, V::PublicKey>,
    plaintext: &[u8],
    policy: &str,
    language: PolicyLanguage,
    rng: &mut R,
) -> Result<McpAbeHybridCiphertext<V::CiphertextShare>, McpAbeError> {
    let msg: Gt = rng.gen();
    let key = encrypt::<V, R>(gp, pks, msg, policy, language, rng)?;
    let data = encrypt_symmetric(msg, plaintext, rng)?;
    Ok(McpAbeHybridCiphertext { key, data })
}

/// Decrypts data encrypted by [`encrypt_data`]. Returns `None` if the policy is not
/// satisfied and an error if the data fails authentication.
pub fn decrypt_data<V: McpAbeVariant>(
    gp: &McpAbeGlobalParams,
    sk: &McpAbeUserKey<V::KeyMask, V::KeyShare>,
    ct: &McpAbeHybridCiphertext<V::CiphertextShare>,
) -> Result<Option<Vec<u8>>, McpAbeError> {
    match decrypt::<V>(gp, sk, &ct.key)? {
        Some(msg) => decrypt_symmetric(msg, &ct.data).map(Some),
        None => Ok(None),
    }
}
