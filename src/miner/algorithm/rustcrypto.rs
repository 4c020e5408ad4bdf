//! Lightweight stages backed by RustCrypto hash crates

use crate::miner::algorithm::{DigestStage, SuiteBuilder};
use crate::types::CoreAlgo;
use sha3::digest::consts::U64;

/// Registers Groestl, JH, Skein, Shabal and Whirlpool
pub fn register(builder: SuiteBuilder) -> SuiteBuilder {
    builder
        .core(CoreAlgo::Groestl, DigestStage::<groestl::Groestl512>::new())
        .core(CoreAlgo::Jh, DigestStage::<jh::Jh512>::new())
        .core(CoreAlgo::Skein, DigestStage::<skein::Skein512<U64>>::new())
        .core(CoreAlgo::Shabal, DigestStage::<shabal::Shabal512>::new())
        .core(CoreAlgo::Whirlpool, DigestStage::<whirlpool::Whirlpool>::new())
}
