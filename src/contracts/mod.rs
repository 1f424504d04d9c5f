pub mod bonding_curve;

pub use bonding_curve::{
    extract_token_address, BalanceCheck, BondingCurveContract, BondingCurveCreateParams,
    FeeConfig, TokenDeployment,
};
