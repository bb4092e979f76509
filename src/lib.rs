//! This is the documentation for the `mcpabe` crate.
//!
//! mcpabe implements multi-authority ciphertext-policy attribute-based encryption on
//! the BN254 pairing (`rabe-bn`). Attributes are partitioned across independent
//! authorities, policies are converted into monotone span programs and decryption
//! recombines the shares of a pruned, satisfying set of rows.
//!
//! Two variants share one code path for setup, policy handling and decryption:
//!
//! * [`schemes::mcpabe::basic`] - one share pair per attribute, bound to the identity hash
//! * [`schemes::mcpabe::binding`] - additionally blinds every share of a key with one random
//!   mask and the numeric identity, so shares of different keys cannot be recombined
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use mcpabe::schemes::mcpabe::{setup, AttributeUniverse, binding};
//! use mcpabe::utils::policy::pest::PolicyLanguage;
//! use rabe_bn::Gt;
//! use rand::Rng;
//!
//! let mut rng = rand::thread_rng();
//! let universe = AttributeUniverse::new(4, &[("A", 1), ("B", 2)]);
//! let gp = setup(&universe, &mut rng);
//! let (pk1, msk1) = binding::authgen(&gp, 1, &mut rng);
//! let (pk2, msk2) = binding::authgen(&gp, 2, &mut rng);
//! let pks = BTreeMap::from([(1, pk1), (2, pk2)]);
//! let msks = BTreeMap::from([(1, msk1), (2, msk2)]);
//! let sk = binding::keygen(&gp, 1, &["A", "B"], &msks, &mut rng).unwrap();
//! let msg: Gt = rng.gen();
//! let ct = binding::encrypt(&gp, &pks, msg, "A and B", PolicyLanguage::HumanPolicy, &mut rng).unwrap();
//! assert_eq!(binding::decrypt(&gp, &sk, &ct).unwrap(), Some(msg));
//! ```
#[macro_use]
extern crate log;
extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod error;
pub mod schemes;
pub mod utils;
