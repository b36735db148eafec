pub mod asset;
pub mod book;
pub mod card;
pub mod page;

pub use asset::AssetDto;
