//! Cipher transforms and the primitives behind them

mod asymmetric;
mod symmetric;
mod transform;

pub use transform::{BlockMode, Padding, RsaPadding, Transform};
