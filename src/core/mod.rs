pub mod normalizer;
pub mod safety;
pub mod scanner;

pub use crate::domain::model::{
    DecodedBarcode, LookupOutcome, MatchMode, ProductInfo, SafetyVerdict, ScanOutcome, Token,
    UserProfile,
};
pub use crate::domain::ports::{BarcodeReader, ConfigProvider, ProductLookup, UserStore};
pub use crate::utils::error::Result;
